//! Stock planner CLI - weekly warehouse and 3PL stock planning.
//!
//! # Usage
//!
//! ```bash
//! # Start a plan (first week labelled "WC dd/mm" for this week's Monday)
//! sp-cli init
//!
//! # Enter inputs for the current week
//! sp-cli set 13 our_stock 100
//! sp-cli set 13 estimated_sales 7
//!
//! # Review the derived week and its alerts
//! sp-cli show
//! sp-cli alerts --json
//!
//! # Roll over and move between weeks
//! sp-cli advance
//! sp-cli prev
//! sp-cli goto 2
//!
//! # Check a catalog file before planning against it
//! sp-cli catalog validate catalog.yaml
//! ```
//!
//! # Commands
//!
//! - `init` - Create a plan with one blank week
//! - `show` - Print the current week
//! - `set` - Set one input of the current week
//! - `rename` - Relabel the current week
//! - `advance` - Roll the latest week over into a new week
//! - `prev` / `next` / `goto` - Move between weeks
//! - `alerts` - Print critical and caution products
//! - `catalog validate` / `catalog list` - Inspect the catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod render;

use config::{CliConfig, LogFormat};
use error::CliError;

#[derive(Parser)]
#[command(name = "sp-cli")]
#[command(author, version, about = "Weekly stock planner")]
struct Cli {
    /// Plan state file (overrides `SP_STATE_PATH`)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Catalog YAML file (overrides `SP_CATALOG_PATH`)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new plan with one blank week
    Init {
        /// Label for the first week
        #[arg(short, long, conflicts_with = "week_commencing")]
        label: Option<String>,

        /// Label the first week "WC dd/mm" for this date (YYYY-MM-DD)
        #[arg(short, long)]
        week_commencing: Option<NaiveDate>,

        /// Replace an existing plan
        #[arg(long)]
        force: bool,
    },
    /// Print the current week
    Show {
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Set one input of the current week
    Set {
        /// Product ID
        product: String,

        /// Input field (`our_stock`, `making`, `sending`, `thpl_stock`, `estimated_sales`)
        field: String,

        /// New value; non-numeric text is stored as zero
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Relabel the current week
    Rename {
        /// New label
        label: String,
    },
    /// Roll the latest week over into a new week
    Advance {
        /// Label for the new week (default: "Week N")
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Move to the previous week
    Prev,
    /// Move to the next week
    Next,
    /// Move to a week by number, starting at 1
    Goto {
        /// Week number
        week: usize,
    },
    /// Print critical and caution products of the current week
    Alerts {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Check a catalog file for problems
    Validate {
        /// Catalog YAML file (default: the configured catalog)
        path: Option<PathBuf>,
    },
    /// List the catalog's products
    List,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config.with_overrides(cli.state.clone(), cli.catalog.clone()),
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &CliConfig) -> Result<(), CliError> {
    match command {
        Commands::Init {
            label,
            week_commencing,
            force,
        } => commands::week::init(config, label, week_commencing, force).await?,
        Commands::Show { json } => commands::week::show(config, json).await?,
        Commands::Set {
            product,
            field,
            value,
        } => commands::week::set(config, &product, &field, &value).await?,
        Commands::Rename { label } => commands::week::rename(config, &label).await?,
        Commands::Advance { label } => commands::week::advance(config, label).await?,
        Commands::Prev => commands::week::previous(config).await?,
        Commands::Next => commands::week::next(config).await?,
        Commands::Goto { week } => commands::week::goto(config, week).await?,
        Commands::Alerts { json } => commands::week::alerts(config, json).await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Validate { path } => {
                commands::catalog::validate(config, path.as_deref()).await?;
            }
            CatalogAction::List => commands::catalog::list(config).await?,
        },
    }
    Ok(())
}
