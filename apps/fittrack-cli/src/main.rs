use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use runtime::{AppConfig, CliArgs};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use metric_log::config::MetricLogConfig;
use metric_log::model::{MetricEntry, NewMetricEntry};
use metric_log::MetricLog;
use user_directory::client::DirectoryApi;
use user_directory::config::DirectoryConfig;
use user_directory::domain::service::UserDirectory;
use user_directory::model::{DirectoryQuery, Role};

/// FitTrack - metric log and admin user directory tools
#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "FitTrack - metric log and admin user directory tools")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load metric entries from a JSON file and print the log
    Metrics {
        /// JSON array of entries: [{"metricId", "value", "unit", "date", "time"}]
        #[arg(long)]
        entries: PathBuf,

        /// Print only this metric's series, newest first
        #[arg(long)]
        metric: Option<String>,
    },
    /// Browse and administer user profiles
    Directory {
        #[command(subcommand)]
        action: DirectoryAction,
    },
}

#[derive(Subcommand)]
enum DirectoryAction {
    /// Print one filtered page of profiles
    List {
        /// Read profiles from a JSON file instead of the backend
        #[arg(long)]
        users: Option<PathBuf>,

        /// Case-insensitive match on display name, email or role
        #[arg(long)]
        search: Option<String>,

        /// Exact role tag; "all" or an empty value means every role
        #[arg(long)]
        role: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,

        /// 0 uses the configured default
        #[arg(long, default_value_t = 0)]
        page_size: usize,

        /// Only profiles awaiting approval
        #[arg(long)]
        pending: bool,
    },
    /// Change a user's role
    SetRole {
        id: String,
        role: String,
    },
    /// Approve a user, or revoke approval with --revoke
    Approve {
        id: String,
        #[arg(long)]
        revoke: bool,
    },
    /// Deactivate a user
    Deactivate { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs { verbose: cli.verbose };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.app.data_dir));
    tracing::info!("FitTrack starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command {
        Some(Commands::Metrics { entries, metric }) => {
            run_metrics(&config, &entries, metric.as_deref())
        }
        Some(Commands::Directory { action }) => run_directory(&config, action).await,
        None => bail!("No command given; see --help"),
    }
}

/// `--role` value that disables the role filter.
const ALL_ROLES: &str = "all";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricSummary {
    metric_id: String,
    count: usize,
    latest: Option<MetricEntry>,
}

fn run_metrics(config: &AppConfig, entries_path: &Path, metric: Option<&str>) -> Result<()> {
    let cfg: MetricLogConfig = config.module_config("metric_log")?;
    let log = MetricLog::new(&cfg);
    let api = log.api();

    let entries: Vec<NewMetricEntry> = read_json(entries_path)?;
    let inserted = api.add_many(entries);
    tracing::info!(count = inserted.len(), "Loaded metric entries");

    match metric {
        Some(id) => print_json(&api.query_by_metric(id)),
        None => {
            let summary: Vec<MetricSummary> = api
                .metric_ids()
                .into_iter()
                .map(|id| MetricSummary {
                    count: api.query_by_metric(&id).len(),
                    latest: api.latest_for_metric(&id),
                    metric_id: id,
                })
                .collect();
            print_json(&summary)
        }
    }
}

async fn run_directory(config: &AppConfig, action: DirectoryAction) -> Result<()> {
    let cfg: DirectoryConfig = config.module_config("user_directory")?;
    let service = user_directory::build_directory(&cfg)?;

    match action {
        DirectoryAction::List {
            users,
            search,
            role,
            page,
            page_size,
            pending,
        } => {
            match users {
                Some(path) => {
                    let raw: Vec<serde_json::Value> = read_json(&path)?;
                    service.replace_profiles(user_directory::decode_profiles(raw));
                }
                None => {
                    service.refresh().await.map_err(user_facing)?;
                }
            }

            if pending {
                return print_json(&service.pending_approvals());
            }

            let mut query = DirectoryQuery::new();
            if let Some(text) = search {
                query = query.search(text);
            }
            if let Some(role) = role.filter(|r| r != ALL_ROLES) {
                query = query.role(role);
            }
            print_json(&service.view(&query, page, page_size))
        }
        DirectoryAction::SetRole { id, role } => {
            let role: Role = role.parse().map_err(user_facing)?;
            let api = connect(service).await?;
            let updated = api.update_role(&id, role).await.map_err(user_facing)?;
            print_json(&updated)
        }
        DirectoryAction::Approve { id, revoke } => {
            let api = connect(service).await?;
            let updated = api.set_approval(&id, !revoke).await.map_err(user_facing)?;
            print_json(&updated)
        }
        DirectoryAction::Deactivate { id } => {
            let api = connect(service).await?;
            api.deactivate(&id).await.map_err(user_facing)?;
            print_json(&serde_json::json!({ "id": id, "deactivated": true }))
        }
    }
}

/// Mutations need the current list so unknown ids are rejected locally.
async fn connect(service: Arc<UserDirectory>) -> Result<Arc<dyn DirectoryApi>> {
    let api = user_directory::local_client(service);
    api.refresh().await.map_err(user_facing)?;
    Ok(api)
}

/// Short, kind-based message first; the backend detail follows.
fn user_facing(err: user_directory::error::DirectoryError) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", err.kind().user_message(), err)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
