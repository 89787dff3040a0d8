use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use job_tracker::browser::ChromeSession;
use job_tracker::config::{AppConfig, StoreConfig};
use job_tracker::error::AppError;
use job_tracker::store;
use job_tracker::telemetry;
use job_tracker::workflows::tracking::{summarize, RunCoordinator, ThreadPacer};
use tracing::info;

use crate::render;

#[derive(Parser, Debug)]
#[command(
    name = "job-tracker",
    about = "Check job application portals and record each application's status",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Visit every pending application and write its status (default command)
    Run(RunArgs),
    /// Count applications by decision and portal without touching the browser
    Summary(SummaryArgs),
}

#[derive(Args, Debug, Default)]
struct StoreArgs {
    /// Use a directory of CSV worksheets instead of the configured spreadsheet
    #[arg(long, value_name = "DIR")]
    workbook: Option<PathBuf>,
}

impl StoreArgs {
    fn load_config(&self) -> Result<AppConfig, AppError> {
        let store = self
            .workbook
            .clone()
            .map(|directory| StoreConfig::CsvWorkbook { directory });
        Ok(AppConfig::load_with_store(store)?)
    }
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    #[command(flatten)]
    store: StoreArgs,
    /// Run Chrome without a visible window
    #[arg(long)]
    headless: bool,
    /// Override where the Workday credential cache is kept
    #[arg(long, value_name = "FILE")]
    cache_path: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct SummaryArgs {
    #[command(flatten)]
    store: StoreArgs,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    match command {
        Command::Run(args) => run_tracking(args),
        Command::Summary(args) => run_summary(args),
    }
}

fn run_tracking(args: RunArgs) -> Result<(), AppError> {
    let mut config = args.store.load_config()?;
    if args.headless {
        config.browser.headless = true;
    }
    if let Some(cache_path) = args.cache_path {
        config.cache_path = cache_path;
    }

    telemetry::init(&config.telemetry)?;
    info!(store = ?config.store, headless = config.browser.headless, "starting tracking run");

    let store = store::open(&config.store)?;
    let session = ChromeSession::launch(&config.browser)?;
    let mut coordinator = RunCoordinator::new(store.as_ref(), session, ThreadPacer, &config);
    let summary = coordinator.run()?;

    render::run_summary(&summary);
    Ok(())
}

fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let config = args.store.load_config()?;
    telemetry::init(&config.telemetry)?;

    let store = store::open(&config.store)?;
    let summary = summarize(store.as_ref())?;

    if args.json {
        render::workbook_summary_json(&summary);
    } else {
        render::workbook_summary(&summary);
    }
    Ok(())
}
