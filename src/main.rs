//! CLI entry point for the MNO performance dashboard core.
//!
//! Loads the configured speed-test and aggregate sources, applies the
//! requested filters, and reports one view of the dashboard per subcommand.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mno_perf::{
    config::DashboardConfig,
    filter::{FilterState, canonical_provider},
    loader::{load_all, load_user_file},
    output::{default_export_name, export_records, print_json, print_pretty},
    records::date::parse_date,
    state::AppState,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "mno_perf")]
#[command(about = "Mobile network operator speed test analytics", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory or base URL holding the CSV sources (overrides config)
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<String>,

    /// Speed test CSV to use instead of the configured source
    #[arg(short, long, global = true)]
    input: Option<String>,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Provider to include (repeatable). Defaults to the configured set.
    #[arg(short, long = "provider", global = true)]
    providers: Vec<String>,

    #[arg(long, global = true)]
    province: Option<String>,

    #[arg(long, global = true)]
    city: Option<String>,

    /// Earliest date, inclusive
    #[arg(long, global = true)]
    from: Option<String>,

    /// Latest date, inclusive
    #[arg(long, global = true)]
    to: Option<String>,

    /// Download speed range, e.g. "10-30" or "100+"
    #[arg(long, global = true)]
    speed_range: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline averages, provider ranking and market share
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Fastest and slowest cities
    Cities {
        #[arg(long)]
        json: bool,
    },
    /// Monthly provider trends and the daily time series
    Trend {
        #[arg(long)]
        json: bool,
    },
    /// One page of the filtered record table
    Table {
        /// Column to sort by (repeat to toggle direction)
        #[arg(short, long)]
        sort: Vec<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        json: bool,
    },
    /// Write the filtered records to CSV
    Export {
        #[arg(short, long)]
        output: Option<String>,

        /// Gzip compress the export
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Map markers for the filtered city aggregates
    Markers {
        #[arg(long)]
        json: bool,
    },
    /// Values available to the filter controls
    Options {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/mno_perf.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("mno_perf.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    }
    .with_env_overrides();
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    let mut datasets = load_all(&config).await;
    if let Some(path) = &cli.input {
        let set = load_user_file(path)?;
        info!(path, records = set.records.len(), rejected = set.rejected, "Loaded speed test file");
        datasets.records = set.records;
        datasets.rejected = set.rejected;
    }

    let mut state = AppState::new(datasets, &config);
    let filters = build_filters(&cli.filters, &state)?;
    state.set_filters(filters);

    match cli.command {
        Commands::Summary { json } => {
            let view = state.view();
            if json {
                print_json(&serde_json::json!({
                    "summary": view.summary,
                    "record_stats": view.record_stats,
                    "providers": view.provider_ranking,
                    "market_share": view.market_share,
                    "rejected": state.datasets().rejected,
                }))?;
            } else {
                let s = &view.summary;
                info!(
                    total_tests = s.total_tests,
                    avg_download = s.avg_download,
                    avg_upload = s.avg_upload,
                    avg_latency = s.avg_latency,
                    "Summary"
                );
                for p in &view.provider_ranking {
                    info!(
                        provider = %p.provider,
                        tests = p.total_tests,
                        avg_download = p.avg_download,
                        avg_upload = p.avg_upload,
                        "Provider"
                    );
                }
                for m in &view.market_share {
                    info!(provider = %m.provider, tests = m.tests, share = m.share, "Market share");
                }
                if state.datasets().rejected > 0 {
                    warn!(rejected = state.datasets().rejected, "Speed test rows skipped");
                }
            }
        }
        Commands::Cities { json } => {
            let view = state.view();
            if json {
                print_json(&view.cities)?;
            } else {
                for (rank, c) in view.cities.top.iter().enumerate() {
                    info!(rank = rank + 1, city = %c.name, avg_speed = c.avg_speed, tests = c.test_count, "Top city");
                }
                for (rank, c) in view.cities.lowest.iter().enumerate() {
                    info!(rank = rank + 1, city = %c.name, avg_speed = c.avg_speed, tests = c.test_count, "Lowest city");
                }
            }
        }
        Commands::Trend { json } => {
            let view = state.view();
            if json {
                print_json(&serde_json::json!({
                    "trends": view.trends,
                    "time_series": view.time_series,
                }))?;
            } else {
                info!(months = view.trends.dates.len(), providers = view.trends.series.len(), "Provider trends");
                print_pretty(&view.trends);
                for point in &view.time_series {
                    info!(date = %point.date, avg_download = point.avg_download, avg_upload = point.avg_upload, "Daily");
                }
            }
        }
        Commands::Table { sort, page, json } => {
            for column in &sort {
                state.sort_by(column);
            }
            state.go_to_page(page);
            let rows = state.page_rows();

            if json {
                print_json(&serde_json::json!({
                    "sort": state.sort,
                    "page": state.page(),
                    "pages": state.page_count(),
                    "rows": rows,
                }))?;
            } else {
                info!(page = state.page(), pages = state.page_count(), "Records");
                for r in &rows {
                    info!(
                        date = ?r.date,
                        provider = %r.provider,
                        download = r.download,
                        upload = r.upload,
                        latency = ?r.latency,
                        tier = ?r.tier(),
                        city = %r.city,
                        province = %r.province,
                        "Record"
                    );
                }
            }
        }
        Commands::Export { output, gzip } => {
            let path = output.unwrap_or_else(|| default_export_name(gzip));
            export_records(&path, &state.sorted_records(), gzip)?;
        }
        Commands::Markers { json } => {
            let map = state.view().map;
            if json {
                print_json(&map)?;
            } else {
                for m in &map.markers {
                    info!(
                        location = %m.location,
                        provider = %m.provider,
                        lat = m.latitude,
                        lng = m.longitude,
                        download = m.download,
                        tier = ?m.tier,
                        "Marker"
                    );
                }
                info!(markers = map.markers.len(), skipped = map.skipped, "Map layer");
            }
        }
        Commands::Options { json } => {
            let options = state.filter_options();
            if json {
                print_json(&options)?;
            } else {
                info!(providers = ?options.providers, "Providers");
                info!(provinces = ?options.provinces, "Provinces");
                info!(cities = ?options.cities, "Cities");
            }
        }
    }

    Ok(())
}

/// Turns CLI flags into a filter state, starting from the default providers.
fn build_filters(args: &FilterArgs, state: &AppState) -> Result<FilterState> {
    let mut filters = if args.providers.is_empty() {
        state.filters.clone()
    } else {
        FilterState::default().with_providers(args.providers.iter().map(|p| canonical_provider(p)))
    };

    filters.province = args.province.clone();
    filters.city = args.city.clone();
    filters.date_from = args.from.as_deref().map(parse_cli_date).transpose()?;
    filters.date_to = args.to.as_deref().map(parse_cli_date).transpose()?;
    filters.speed_range = args.speed_range.as_deref().map(str::parse).transpose()?;

    Ok(filters)
}

fn parse_cli_date(s: &str) -> Result<chrono::NaiveDate> {
    parse_date(s).with_context(|| format!("Unrecognized date '{s}'"))
}
