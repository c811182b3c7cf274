use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use cabin_bookings::{
    domain::{confirmed_stays, monthly_sales, Clock, DashboardStats, SystemClock},
    infra::StoreClient,
    seed::{upload_all, upload_bookings, SeedData, SeedReport},
    util::{
        format::format_currency,
        persistence::load_settings,
        version::{version_label, APP_NAME},
    },
};
use time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DASHBOARD_DAYS: u32 = 7;
const USAGE: &str = "usage: cabin_bookings <all|bookings> [DATA_DIR]\n       \
                     cabin_bookings dashboard [DAYS]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SeedScope {
    /// Replace cabins, guests and bookings.
    All,
    /// Replace bookings only.
    Bookings,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Seed { scope: SeedScope, data_dir: PathBuf },
    /// Figures for the last `days` days, ending today.
    Dashboard { days: u32 },
}

fn parse_args<I>(mut args: I) -> Result<Command, String>
where
    I: Iterator<Item = String>,
{
    let command = match args.next().as_deref() {
        Some("all") => Command::Seed {
            scope: SeedScope::All,
            data_dir: data_dir_arg(args.next()),
        },
        Some("bookings") => Command::Seed {
            scope: SeedScope::Bookings,
            data_dir: data_dir_arg(args.next()),
        },
        Some("dashboard") => {
            let days = match args.next() {
                Some(value) => match value.parse::<u32>() {
                    Ok(days) if days > 0 => days,
                    _ => return Err(format!("invalid number of days {value:?}\n{USAGE}")),
                },
                None => DEFAULT_DASHBOARD_DAYS,
            };
            Command::Dashboard { days }
        }
        Some(other) => return Err(format!("unknown command {other:?}\n{USAGE}")),
        None => return Err(USAGE.to_string()),
    };
    if let Some(extra) = args.next() {
        return Err(format!("unexpected argument {extra:?}\n{USAGE}"));
    }
    Ok(command)
}

fn data_dir_arg(arg: Option<String>) -> PathBuf {
    arg.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    info!("{APP_NAME} {}", version_label());

    let result = match command {
        Command::Seed { scope, data_dir } => seed(scope, &data_dir).await.map(log_report),
        Command::Dashboard { days } => dashboard(days).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn seed(scope: SeedScope, data_dir: &Path) -> Result<SeedReport> {
    info!("seeding from {}", data_dir.display());

    let settings = load_settings();
    let data = SeedData::load(data_dir)
        .with_context(|| format!("loading seed data from {}", data_dir.display()))?;
    let client = StoreClient::from_env().context("connecting to backing store")?;

    let report = match scope {
        SeedScope::All => upload_all(&client, &data, &settings, &SystemClock).await,
        SeedScope::Bookings => upload_bookings(&client, &data, &settings, &SystemClock).await,
    }
    .context("uploading seed data")?;
    Ok(report)
}

fn log_report(report: SeedReport) {
    for rejected in &report.rejected {
        warn!(index = rejected.index, "rejected: {}", rejected.reason);
    }
    info!(
        "uploaded {} bookings ({} rejected), total sales {}",
        report.inserted,
        report.rejected.len(),
        format_currency(report.total_sales)
    );
}

async fn dashboard(days: u32) -> Result<()> {
    let client = StoreClient::from_env().context("connecting to backing store")?;
    let today = SystemClock.today();
    let since = today
        .checked_sub(Duration::days(days.into()))
        .context("dashboard range starts before the earliest supported date")?;

    let (sales, stays, cabins) = tokio::try_join!(
        client.list_bookings_after(since),
        client.list_stays_after(since, today),
        client.list_cabins(),
    )
    .context("loading dashboard data")?;

    let confirmed = confirmed_stays(&stays);
    let stats = DashboardStats::compute(&sales, &confirmed, days, cabins.len());
    info!(
        "last {days} days: {} bookings, sales {}, {} check-ins, {}% occupancy",
        stats.num_bookings,
        format_currency(stats.sales),
        stats.checkins,
        stats.occupancy
    );

    for month in monthly_sales(&sales, since, today) {
        info!(
            "{}: {} ({} extras)",
            month.label,
            format_currency(month.total_sales),
            format_currency(month.extras_sales)
        );
    }
    Ok(())
}
