use anyhow::{Context, Result};
use blocbook::attempt::{BlocAttempt, Style};
use blocbook::config::Config;
use blocbook::journal::{
    self, BlocQuery, BlocUpdate, Journal, JournalError, SessionQuery, SessionUpdate,
};
use blocbook::output::{self, ScoredBloc, SessionRow};
use blocbook::scoring::{self, ScoringConfig};
use blocbook::stats;
use chrono::{Local, NaiveDate};
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_INVALID: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record, list and inspect training sessions
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Record, list and inspect blocs
    Bloc {
        #[command(subcommand)]
        command: BlocCommand,
    },
    /// Score a bloc without recording it
    Score {
        #[command(flatten)]
        attempt: AttemptArgs,
    },
    /// Load sessions and blocs from a YAML or JSON file
    Import {
        file: PathBuf,
        /// Drop every existing record first
        #[arg(long)]
        replace: bool,
    },
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Start a session on a date (YYYY-MM-DD or DD/MM/YYYY, default today)
    Add {
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// List sessions with their scores, newest first
    List {
        /// Only sessions on or after this date
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Only sessions on or before this date
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        /// Only sessions within this long before today (e.g. "2weeks", "30d")
        #[arg(long, value_parser = humantime::parse_duration)]
        since: Option<Duration>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show a session with its blocs and performance
    Show { id: u64 },
    /// Change the date of a session
    Edit {
        id: u64,
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Delete a session and all of its blocs
    Delete { id: u64 },
    /// Show how many blocs a session holds
    Count { id: u64 },
    /// Journal-wide session counts
    Stats,
}

#[derive(Subcommand, Debug)]
enum BlocCommand {
    /// Record a bloc in a session
    Add {
        #[arg(long)]
        session: u64,
        #[command(flatten)]
        attempt: AttemptArgs,
    },
    /// List blocs, most recent first
    List {
        #[arg(long)]
        session: Option<u64>,
        #[arg(long)]
        difficulty: Option<u32>,
        /// Substring of the style label
        #[arg(long)]
        style: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show a bloc with its score breakdown
    Show { id: u64 },
    /// Change fields of a bloc
    Edit {
        id: u64,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
        difficulty: Option<u32>,
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        style: Option<String>,
        #[arg(long)]
        retries: Option<u32>,
        #[arg(long)]
        terminated: Option<bool>,
    },
    /// Delete a bloc
    Delete { id: u64 },
    /// Journal-wide bloc statistics
    Stats,
}

#[derive(clap::Args, Debug)]
struct AttemptArgs {
    /// Grade of the problem (1-10)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    difficulty: u32,
    /// Style label; "DE" earns the hard-style bonus
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    style: String,
    /// Failed attempts before success or giving up
    #[arg(long, default_value_t = 0)]
    retries: u32,
    /// The problem was completed
    #[arg(long)]
    terminated: bool,
}

impl AttemptArgs {
    fn to_attempt(&self) -> BlocAttempt {
        BlocAttempt::new(self.difficulty, self.style.as_str(), self.retries, self.terminated)
    }
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    /// Page number (1-based)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    page: Option<u64>,
    /// Rows per page
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    limit: Option<u64>,
}

#[derive(Parser, Debug)]
#[command(name = "blocbook")]
#[command(about = "Climbing session journal with bloc scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/blocbook/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to journal file (overrides the config file)
    #[arg(long, global = true)]
    journal: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Everything a command needs once config is resolved
struct AppContext {
    journal_path: PathBuf,
    scoring: ScoringConfig,
    page_size: Option<usize>,
    json: bool,
    verbose: bool,
    use_colors: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    journal::parse_session_date(s).map_err(|e| e.to_string())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "blocbook=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref().map(PathBuf::from);

    // Init writes the config, so it must not require one to load
    if let Commands::Init { force } = cli.command {
        let path = config_path.unwrap_or_else(blocbook::config::get_config_path);
        match blocbook::config::write_default_config(&path, force) {
            Ok(()) => {
                println!("Config written to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    // Load config
    let config = match blocbook::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let ctx = AppContext {
        journal_path: resolve_journal_path(cli.journal, &config),
        scoring,
        page_size: config.page_size,
        json: cli.json,
        verbose: cli.verbose,
        use_colors: !cli.json && output::should_use_colors(),
    };

    if let Err(e) = run(cli.command, &ctx) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }

    std::process::exit(EXIT_SUCCESS);
}

fn resolve_journal_path(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| config.journal_path.clone())
        .unwrap_or_else(journal::get_journal_path)
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<JournalError>() {
        Some(e) if e.is_not_found() => EXIT_NOT_FOUND,
        Some(e) if e.is_invalid_input() => EXIT_INVALID,
        _ => EXIT_STORAGE,
    }
}

fn run(command: Commands, ctx: &AppContext) -> Result<()> {
    let start_time = Instant::now();
    let mut journal = journal::load_journal(&ctx.journal_path)
        .with_context(|| format!("Failed to load journal at {}", ctx.journal_path.display()))?;

    if ctx.verbose {
        eprintln!(
            "Loaded {} sessions and {} blocs from {}",
            journal.sessions.len(),
            journal.blocs.len(),
            ctx.journal_path.display()
        );
    }

    let modified = match command {
        Commands::Session { command } => run_session(command, &mut journal, ctx)?,
        Commands::Bloc { command } => run_bloc(command, &mut journal, ctx)?,
        Commands::Score { attempt } => {
            let result = scoring::calculate_score(&attempt.to_attempt(), &ctx.scoring);
            if ctx.json {
                print_json(&result)?;
            } else {
                println!("{}", output::format_breakdown(&result, ctx.use_colors));
            }
            false
        }
        Commands::Import { file, replace } => {
            let seed = journal::load_seed_file(&file)?;
            let summary = journal::import_seed(&mut journal, &seed, replace)?;
            if ctx.json {
                print_json(&summary)?;
            } else {
                println!(
                    "Imported {} sessions and {} blocs from {}",
                    summary.sessions,
                    summary.blocs,
                    file.display()
                );
            }
            true
        }
        Commands::Init { .. } => false,
    };

    if modified {
        save(&journal, &ctx.journal_path)?;
    }

    if ctx.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }
    Ok(())
}

fn save(journal: &Journal, path: &Path) -> Result<()> {
    journal::save_journal(path, journal)
        .with_context(|| format!("Failed to save journal at {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn page_limit(page: &PageArgs, ctx: &AppContext) -> (Option<usize>, Option<usize>) {
    (
        page.page.map(|p| p as usize),
        page.limit.map(|l| l as usize).or(ctx.page_size),
    )
}

/// Returns whether the journal was modified
fn run_session(command: SessionCommand, journal: &mut Journal, ctx: &AppContext) -> Result<bool> {
    match command {
        SessionCommand::Add { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let session = journal.create_session(date);
            if ctx.json {
                print_json(&session)?;
            } else {
                println!("Created session #{} on {}", session.id, session.date);
            }
            Ok(true)
        }
        SessionCommand::List { from, to, since, page } => {
            let since_date = since
                .map(|window| journal::since_date(Local::now().date_naive(), window))
                .transpose()?;
            let (page, limit) = page_limit(&page, ctx);
            let query = SessionQuery {
                page,
                limit,
                // The later of the two lower bounds wins
                date_from: from.max(since_date),
                date_to: to,
            };

            let sessions = journal.list_sessions(&query)?;
            let reports = sessions.map(|s| journal.report_for(s, &ctx.scoring));

            if ctx.json {
                print_json(&reports)?;
            } else {
                let rows: Vec<SessionRow> = reports
                    .data
                    .iter()
                    .map(|r| SessionRow {
                        session: &r.session,
                        performance: &r.performance,
                    })
                    .collect();
                println!("{}", output::format_session_table(&rows, ctx.use_colors));
                if reports.pagination.total_pages > 1 {
                    println!("{}", output::format_pagination(&reports.pagination));
                }
            }
            Ok(false)
        }
        SessionCommand::Show { id } => {
            let report = journal.session_report(id, &ctx.scoring)?;
            if ctx.json {
                print_json(&report)?;
            } else {
                println!("{}", output::format_session_header(&report.session, ctx.use_colors));
                println!("{}", output::format_performance(&report.performance, ctx.use_colors));
                if !report.blocs.is_empty() {
                    println!();
                    let scored: Vec<ScoredBloc> = report
                        .blocs
                        .iter()
                        .map(|bloc| ScoredBloc {
                            bloc,
                            score: scoring::score_with(&bloc.attempt, &ctx.scoring),
                        })
                        .collect();
                    println!("{}", output::format_bloc_table(&scored, ctx.use_colors));
                }
            }
            Ok(false)
        }
        SessionCommand::Edit { id, date } => {
            let session = journal.update_session(id, SessionUpdate { date: Some(date) })?;
            if ctx.json {
                print_json(&session)?;
            } else {
                println!("Session #{} moved to {}", session.id, session.date);
            }
            Ok(true)
        }
        SessionCommand::Delete { id } => {
            let removed = journal.delete_session(id)?;
            if ctx.json {
                print_json(&serde_json::json!({ "deleted": id, "blocs_removed": removed }))?;
            } else {
                println!("Deleted session #{} and {} blocs", id, removed);
            }
            Ok(true)
        }
        SessionCommand::Count { id } => {
            let count = journal.session_bloc_count(id)?;
            if ctx.json {
                print_json(&count)?;
            } else {
                println!("{}", output::format_session_count(&count));
            }
            Ok(false)
        }
        SessionCommand::Stats => {
            let stats = stats::session_stats(journal, chrono::Utc::now());
            if ctx.json {
                print_json(&stats)?;
            } else {
                println!("{}", output::format_session_stats(&stats));
            }
            Ok(false)
        }
    }
}

/// Returns whether the journal was modified
fn run_bloc(command: BlocCommand, journal: &mut Journal, ctx: &AppContext) -> Result<bool> {
    match command {
        BlocCommand::Add { session, attempt } => {
            let bloc = journal.create_bloc(session, attempt.to_attempt())?;
            let scored = ScoredBloc {
                score: scoring::score_with(&bloc.attempt, &ctx.scoring),
                bloc: &bloc,
            };
            if ctx.json {
                print_json(&scored)?;
            } else {
                println!("{}", output::format_bloc_line(&scored, ctx.use_colors));
            }
            Ok(true)
        }
        BlocCommand::List {
            session,
            difficulty,
            style,
            page,
        } => {
            let (page, limit) = page_limit(&page, ctx);
            let query = BlocQuery {
                page,
                limit,
                session_id: session,
                difficulty,
                style,
            };
            let blocs = journal.list_blocs(&query)?;
            let scored = blocs.map(|bloc| ScoredBloc {
                bloc,
                score: scoring::score_with(&bloc.attempt, &ctx.scoring),
            });

            if ctx.json {
                print_json(&scored)?;
            } else {
                println!("{}", output::format_bloc_table(&scored.data, ctx.use_colors));
                if scored.pagination.total_pages > 1 {
                    println!("{}", output::format_pagination(&scored.pagination));
                }
            }
            Ok(false)
        }
        BlocCommand::Show { id } => {
            let bloc = journal.bloc(id).ok_or(JournalError::BlocNotFound(id))?;
            let result = scoring::calculate_score(&bloc.attempt, &ctx.scoring);
            let scored = ScoredBloc {
                bloc,
                score: result.score,
            };
            if ctx.json {
                print_json(&serde_json::json!({ "bloc": scored, "breakdown": result.breakdown }))?;
            } else {
                println!("{}", output::format_bloc_line(&scored, ctx.use_colors));
                println!("{}", output::format_breakdown(&result, ctx.use_colors));
            }
            Ok(false)
        }
        BlocCommand::Edit {
            id,
            difficulty,
            style,
            retries,
            terminated,
        } => {
            let update = BlocUpdate {
                difficulty,
                style: style.map(Style::from),
                retry_count: retries,
                terminated,
            };
            if update.is_empty() {
                anyhow::bail!(JournalError::InvalidBloc("nothing to change".to_string()));
            }
            let bloc = journal.update_bloc(id, update)?;
            let scored = ScoredBloc {
                score: scoring::score_with(&bloc.attempt, &ctx.scoring),
                bloc: &bloc,
            };
            if ctx.json {
                print_json(&scored)?;
            } else {
                println!("{}", output::format_bloc_line(&scored, ctx.use_colors));
            }
            Ok(true)
        }
        BlocCommand::Delete { id } => {
            journal.delete_bloc(id)?;
            if ctx.json {
                print_json(&serde_json::json!({ "deleted": id }))?;
            } else {
                println!("Deleted bloc #{}", id);
            }
            Ok(true)
        }
        BlocCommand::Stats => {
            let stats = stats::bloc_stats(&journal.blocs);
            if ctx.json {
                print_json(&stats)?;
            } else {
                println!("{}", output::format_bloc_stats(&stats));
            }
            Ok(false)
        }
    }
}
