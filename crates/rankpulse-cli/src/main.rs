use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use rankpulse_core::ReportPeriod;
use rankpulse_report::Providers;

#[derive(Debug, Parser)]
#[command(name = "rankpulse-cli")]
#[command(about = "RankPulse command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List both provider inventories and the matched sites.
    Sites,
    /// Generate (and persist) the report for one site and month.
    Generate {
        /// Normalized site key, e.g. `acme.com`.
        #[arg(long)]
        site: String,
        /// Report year; defaults to the previous calendar month's year.
        #[arg(long)]
        year: Option<i32>,
        /// Report month (1-12); defaults to the previous calendar month.
        #[arg(long)]
        month: Option<u32>,
    },
    /// Print a site's persisted report history.
    History {
        #[arg(long)]
        site: String,
        #[arg(long, default_value_t = 24)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = rankpulse_core::load_app_config()?;

    match cli.command {
        Commands::Sites => {
            let providers = Providers::from_config(&config)?;
            let matches = rankpulse_report::site_inventories(&providers).await?;
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
        Commands::Generate { site, year, month } => {
            let period = resolve_period(year, month)?;
            let providers = Providers::from_config(&config)?;

            let pool_config = rankpulse_db::PoolConfig::from_app_config(&config);
            let pool = rankpulse_db::connect_pool(&config.database_url, pool_config).await?;
            rankpulse_db::run_migrations(&pool).await?;

            let report =
                rankpulse_report::generate_report(&pool, &providers, &site, period).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::History { site, limit } => {
            let pool_config = rankpulse_db::PoolConfig::from_app_config(&config);
            let pool = rankpulse_db::connect_pool(&config.database_url, pool_config).await?;

            let rows = rankpulse_db::list_reports_for_site(&pool, &site, limit).await?;
            for row in rows {
                println!(
                    "{}  {}  updated {}",
                    row.period,
                    row.site_id,
                    row.updated_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
    }

    Ok(())
}

/// Defaults to the previous calendar month when year/month are omitted;
/// a month must always come with a year.
fn resolve_period(year: Option<i32>, month: Option<u32>) -> anyhow::Result<ReportPeriod> {
    match (year, month) {
        (Some(y), Some(m)) => {
            ReportPeriod::new(y, m).ok_or_else(|| anyhow::anyhow!("{y}-{m} is not a valid month"))
        }
        (None, None) => {
            let today = Utc::now().date_naive();
            let current = ReportPeriod::new(today.year(), today.month())
                .ok_or_else(|| anyhow::anyhow!("failed to derive the current month"))?;
            Ok(current.prev())
        }
        _ => anyhow::bail!("--year and --month must be provided together"),
    }
}
