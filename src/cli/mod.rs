pub mod output;
pub mod shutdown;
pub mod window;

use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, level_filters::LevelFilter};
use window::{resolve_window, WindowArgs};

use crate::{
    aggregate::task_share::analyze_tasks,
    dashboard::{
        store::{DashboardState, DashboardStore},
        ticker::{progress_channel, ProgressTicker, DEFAULT_TICK_PERIOD},
    },
    progress::compute_progress,
    query::QueryWindow,
    source::client::HttpWorkLogSource,
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
        percentage::Percentage,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Worktally", version, long_about = None)]
#[command(about = "Summaries of time logged on projects and tasks", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        env = "WORKTALLY_API_URL",
        default_value = "http://localhost:8080",
        help = "Base url of the work log API"
    )]
    api_url: String,
    #[arg(long, default_value_t = 10, help = "Request timeout in seconds")]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show how much of the current hour, day, month and year has passed")]
    Progress {
        #[arg(long, help = "Keep refreshing until Ctrl-C")]
        watch: bool,
        #[arg(
            long,
            default_value_t = DEFAULT_TICK_PERIOD.as_millis() as u64,
            value_parser = clap::value_parser!(u64).range(1..),
            help = "Refresh period in milliseconds"
        )]
        interval_ms: u64,
    },
    #[command(about = "Hours worked per day, followed by the average")]
    Daily {
        #[command(flatten)]
        window: WindowArgs,
    },
    #[command(about = "Running total of hours worked")]
    Trend {
        #[command(flatten)]
        window: WindowArgs,
    },
    #[command(about = "Share of time per project and task")]
    Tasks {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(short = 'p', long = "min-share", help = "Hide tasks below this share", default_value_t = Percentage::ZERO)]
        min_share: Percentage,
    },
    #[command(about = "Every logged entry, newest day first")]
    Log {
        #[command(flatten)]
        window: WindowArgs,
    },
    #[command(about = "Running totals prepared by the API, in minutes or hours")]
    Cumulative {
        #[arg(long, short = 'n', default_value = "7", help = "Last n days")]
        days: String,
    },
}

/// Connection settings for the work log API.
struct Connection {
    api_url: String,
    timeout: Duration,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(
        CLI_PREFIX,
        &create_application_default_path()?,
        logging_level,
        args.log,
    )?;

    let connection = Connection {
        api_url: args.api_url,
        timeout: Duration::from_secs(args.timeout_secs),
    };

    match args.commands {
        Commands::Progress { watch, interval_ms } => {
            process_progress_command(watch, Duration::from_millis(interval_ms)).await
        }
        Commands::Daily { window } => {
            let state = fetch_state(&connection, resolve_window(window)?).await?;
            output::print_series(&format!("Hours per day, {}", state.window), &state.daily, "h");
            Ok(())
        }
        Commands::Trend { window } => {
            let state = fetch_state(&connection, resolve_window(window)?).await?;
            output::print_series(&format!("Running total, {}", state.window), &state.trend, "h");
            Ok(())
        }
        Commands::Tasks { window, min_share } => {
            let state = fetch_state(&connection, resolve_window(window)?).await?;
            let (usages, _) = analyze_tasks(&state.logs);
            output::print_tasks(&usages, min_share);
            Ok(())
        }
        Commands::Log { window } => {
            let state = fetch_state(&connection, resolve_window(window)?).await?;
            output::print_log(&state.logs);
            Ok(())
        }
        Commands::Cumulative { days } => {
            let window = resolve_window(WindowArgs::days_only(days))?;
            let days = window
                .day_count()
                .ok_or_else(|| anyhow!("Cumulative snapshots need a day count, got {window}"))?;
            let snapshots = store(&connection)?
                .cumulative_snapshots(days)
                .await
                .inspect_err(|e| error!("Failed to fetch cumulative snapshots for {window} {e:?}"))?;
            output::print_snapshots(&format!("Cumulative, {window}"), &snapshots);
            Ok(())
        }
    }
}

fn store(connection: &Connection) -> Result<DashboardStore<HttpWorkLogSource>> {
    let source = HttpWorkLogSource::new(&connection.api_url, connection.timeout)?;
    Ok(DashboardStore::new(source))
}

async fn fetch_state(connection: &Connection, window: QueryWindow) -> Result<Arc<DashboardState>> {
    let store = store(connection)?;
    let outcome = store
        .refresh(window)
        .await
        .inspect_err(|e| error!("Failed to fetch work logs for {window} {e:?}"))?;
    debug!("Refresh finished {outcome:?}");

    store
        .current()
        .ok_or_else(|| anyhow!("Nothing was fetched for {window}"))
}

async fn process_progress_command(watch: bool, period: Duration) -> Result<()> {
    if !watch {
        let now = Local::now();
        return output::print_progress(&compute_progress(&now), now.day(), false);
    }

    let (sender, mut receiver) = progress_channel();
    let shutdown = CancellationToken::new();
    let ticker = ProgressTicker::new(
        sender,
        shutdown.clone(),
        period,
        Box::new(DefaultClock),
        Local,
    );

    let printer = async {
        let mut redraw = false;
        // Ends once the ticker stops and drops its sender.
        while receiver.changed().await.is_ok() {
            let snapshot = *receiver.borrow_and_update();
            if let Err(e) = output::print_progress(&snapshot, Local::now().day(), redraw) {
                error!("Failed to print progress {e:?}");
                shutdown.cancel();
            }
            redraw = true;
        }
    };

    tokio::join!(shutdown::detect_shutdown(shutdown.clone()), ticker.run(), printer);
    Ok(())
}
