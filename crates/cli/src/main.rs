#![warn(clippy::pedantic)]

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use companion_app::{LogLevel, SettingsService};
use companion_domain::{self as domain, parser};
use companion_storage::{FileBackend, LocalStorage, Log};
use log::{LevelFilter, debug};

mod commands;
mod train;

#[derive(Parser, Debug)]
#[command(version, about = "Companion - workout plan trainer", long_about = None)]
struct Args {
    /// Directory holding plans, workout logs and settings
    #[arg(long, env = "COMPANION_DATA_DIR", default_value = ".companion")]
    data_dir: PathBuf,

    /// Print debug messages
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Replace all plans by the plans in a CSV file
    Import { file: PathBuf },
    /// Replace all plans by the built-in sample program
    Sample,
    /// List the imported plans
    Plans,
    /// Run a workout interactively
    Train { plan_id: String },
    /// Show workout statistics
    Stats,
    /// Remove all plans, keeping the workout history
    Clear,
    /// Show recent log messages
    Log,
    /// Show or change settings
    Settings {
        /// Pause briefly when moving to the next exercise
        #[arg(long)]
        settle_delays: Option<bool>,
        #[arg(long)]
        log_level: Option<LogLevel>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let backend = FileBackend::new(&args.data_dir);

    let ui = companion_app::Service::new(LocalStorage::new(backend.clone()));
    let settings = ui.get_settings().map_err(|err| anyhow!(err))?;
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        settings.log_level.into()
    };
    companion_app::log::init(Arc::new(Mutex::new(Log::new(backend.clone()))), level)
        .map_err(|err| anyhow!("{err}"))?;
    debug!("using data directory {}", backend.dir().display());

    let service = domain::Service::new(LocalStorage::new(backend.clone()));
    let mut stdout = io::stdout().lock();

    match args.command {
        Commands::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            commands::import(&service, &settings, &text, &mut stdout)
        }
        Commands::Sample => {
            commands::import(&service, &settings, parser::SAMPLE_PLANS, &mut stdout)
        }
        Commands::Plans => commands::plans(&service, &mut stdout),
        Commands::Train { plan_id } => {
            let state = commands::load(&service)?;
            train::run(
                &state,
                plan_id.into(),
                &service,
                &settings,
                io::stdin().lock(),
                &mut stdout,
            )?;
            Ok(())
        }
        Commands::Stats => commands::stats(&service, &mut stdout),
        Commands::Clear => commands::clear(&service, &settings, &mut stdout),
        Commands::Log => {
            let log = companion_app::Service::new(Log::new(backend));
            commands::log_entries(&log, &mut stdout)
        }
        Commands::Settings {
            settle_delays,
            log_level,
        } => commands::settings(&ui, settle_delays, log_level, &mut stdout),
    }?;

    stdout.flush()?;
    Ok(())
}
