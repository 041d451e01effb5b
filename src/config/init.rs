use anyhow::{Context, Result};
use std::path::Path;

use super::Config;
use crate::scoring::ScoringConfig;

/// Write a config file holding the default settings.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config {
        journal_path: None,
        page_size: None,
        scoring: Some(ScoringConfig::default()),
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    // Create parent directories
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "default config written");
    Ok(())
}
