use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(weight) = config.difficulty_weight {
        if !weight.is_finite() || weight <= 0.0 {
            errors.push("scoring.difficulty_weight: must be a positive number".to_string());
        }
    }

    if let Some(bonus) = config.retry_bonus {
        if !bonus.is_finite() || bonus < 0.0 {
            errors.push("scoring.retry_bonus: must be non-negative".to_string());
        }
    }

    if let Some(ref style) = config.hard_style {
        if style.trim().is_empty() {
            errors.push("scoring.hard_style: must not be empty".to_string());
        }
    }

    // A factor of 1 or less would leave the bonus unrewarded
    for (name, factor) in [
        ("hard_style_factor", config.hard_style_factor),
        ("terminated_factor", config.terminated_factor),
    ] {
        if let Some(value) = factor {
            if !value.is_finite() || value <= 1.0 {
                errors.push(format!("scoring.{}: must be greater than 1.0, got {}", name, value));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> ScoringConfig {
        ScoringConfig {
            difficulty_weight: None,
            retry_bonus: None,
            hard_style: None,
            hard_style_factor: None,
            terminated_factor: None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        assert!(validate_scoring(&empty()).is_ok());
    }

    #[test]
    fn test_zero_weight() {
        let config = ScoringConfig {
            difficulty_weight: Some(0.0),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.difficulty_weight"));
    }

    #[test]
    fn test_negative_retry_bonus() {
        let config = ScoringConfig {
            retry_bonus: Some(-0.1),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("retry_bonus"));
    }

    #[test]
    fn test_blank_hard_style() {
        let config = ScoringConfig {
            hard_style: Some("  ".to_string()),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.hard_style"));
    }

    #[test]
    fn test_factor_below_one() {
        let config = ScoringConfig {
            terminated_factor: Some(0.9),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.terminated_factor"));
    }

    #[test]
    fn test_neutral_factors_rejected() {
        let config = ScoringConfig {
            hard_style_factor: Some(1.0),
            terminated_factor: Some(1.0),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("scoring.hard_style_factor"));
        assert!(errors[1].contains("scoring.terminated_factor"));
    }

    #[test]
    fn test_valid_config_keeps_bonuses_strict() {
        use crate::attempt::BlocAttempt;
        use crate::scoring::score_with;

        let config = ScoringConfig {
            hard_style_factor: Some(1.01),
            terminated_factor: Some(1.01),
            ..empty()
        };
        assert!(validate_scoring(&config).is_ok());

        let de = score_with(&BlocAttempt::new(7, "DE", 0, false), &config);
        let da = score_with(&BlocAttempt::new(7, "DA", 0, false), &config);
        let done = score_with(&BlocAttempt::new(7, "DA", 0, true), &config);
        assert!(de > da);
        assert!(done > da);
    }

    #[test]
    fn test_nan_factor_rejected() {
        let config = ScoringConfig {
            hard_style_factor: Some(f64::NAN),
            ..empty()
        };
        assert!(validate_scoring(&config).is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            difficulty_weight: Some(-1.0),    // Error 1
            retry_bonus: Some(-1.0),          // Error 2
            hard_style: Some(String::new()),  // Error 3
            hard_style_factor: Some(0.5),     // Error 4
            terminated_factor: Some(1.0),     // Error 5
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
    }
}
