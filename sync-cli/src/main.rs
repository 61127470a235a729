//! # todo-sync
//!
//! Command-line front end for a todo-sync device.
//!
//! ## Commands
//!
//! - `add`: Add a task
//! - `list`: Show tasks (today by default)
//! - `toggle`: Mark a task done or not done
//! - `delete`: Remove a task
//! - `stats`: Completion summary
//! - `demo`: Run a phone and a watch in-process and watch them sync
//!
//! ## Example
//!
//! ```bash
//! # Add a task for today
//! todo-sync add "Buy milk" --category shopping --priority high
//!
//! # Show today's tasks
//! todo-sync list
//!
//! # Complete it (id prefix is enough)
//! todo-sync toggle 1a2b3c4d
//!
//! # Act as the watch instead of the phone
//! todo-sync --role companion list --all
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todo_sync_types::{Category, DeviceRole, Priority};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{add, delete, demo, list, stats, toggle};
use config::Config;

/// Keep a to-do list in sync between a phone and a watch.
#[derive(Parser, Debug)]
#[command(name = "todo-sync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the list files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device role: primary (phone) or companion (watch)
    #[arg(long, global = true)]
    role: Option<DeviceRole>,

    /// Log sync activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(long, short)]
        description: Option<String>,

        /// high, medium or low
        #[arg(long, short, default_value = "medium")]
        priority: Priority,

        /// work, personal, shopping, health, finance or study
        #[arg(long, short, default_value = "personal")]
        category: Category,

        /// Day to schedule on (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Due day (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },

    /// Show tasks
    List {
        /// Day to show (YYYY-MM-DD, default: today)
        #[arg(long, conflicts_with_all = ["all", "overdue"])]
        date: Option<NaiveDate>,

        /// Only this category
        #[arg(long, short)]
        category: Option<Category>,

        /// Every task regardless of day
        #[arg(long)]
        all: bool,

        /// Only overdue tasks
        #[arg(long, conflicts_with = "all")]
        overdue: bool,

        /// Filter by text in title or description
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Mark a task done or not done
    Toggle {
        /// Task id or unique prefix
        id: String,
    },

    /// Remove a task
    Delete {
        /// Task id or unique prefix
        id: String,
    },

    /// Completion summary
    Stats {
        /// Day to summarise (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Run a phone and a watch in-process and show them syncing
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let role = cli.role.unwrap_or(config.device.role);

    // Determine data directory
    let data_dir = match cli.data_dir.or_else(|| config.device.data_dir.clone()) {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let sync = config.sync_config(role, &data_dir);

    match cli.command {
        Commands::Add {
            title,
            description,
            priority,
            category,
            date,
            due,
        } => {
            let task = add::NewTask {
                title,
                description,
                priority,
                category,
                date,
                due,
            };
            add::run(sync, task).await?;
        }
        Commands::List {
            date,
            category,
            all,
            overdue,
            search,
        } => {
            let filter = list::Filter {
                date,
                category,
                all,
                overdue,
                search,
            };
            list::run(sync, filter).await?;
        }
        Commands::Toggle { id } => {
            toggle::run(sync, &id).await?;
        }
        Commands::Delete { id } => {
            delete::run(sync, &id).await?;
        }
        Commands::Stats { date } => {
            stats::run(sync, date).await?;
        }
        Commands::Demo => {
            demo::run(&config).await?;
        }
    }

    Ok(())
}

/// Install the log subscriber. `RUST_LOG` wins unless `--verbose` is set.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read `--config` if given, otherwise the platform config file if present.
fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path).context("Failed to load configuration");
    }

    let default_path = directories::ProjectDirs::from("io", "todo-sync", "todo-sync")
        .map(|dirs| dirs.config_dir().join("config.toml"));
    match default_path {
        Some(path) if path.exists() => {
            Config::from_file(&path).context("Failed to load configuration")
        }
        _ => Ok(Config::default()),
    }
}

/// Get the default data directory for todo-sync.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "todo-sync", "todo-sync")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
