//! `phc-monitor`: operator CLI for PHC outbreak, resource and underserved alerts.

use std::path::PathBuf;
use std::sync::Arc;

use alert_store::{AlertSignals, SimulatedKind, SqliteStore};
use clap::{Parser, Subcommand};
use monitor::console::{ConsoleCommand, HELP};
use monitor::{render, DashboardService, Fetched, MonitorConfig, Poller};
use phc_api::{ApiParams, PhcApiClient};
use phc_core::{AlertFeedEntry, DEFAULT_TOP_N};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "phc-monitor")]
#[command(about = "Monitor PHC outbreak, resource and underserved alerts")]
struct Args {
    /// SQLite file for local alert state. Falls back to PHC_STATE_PATH.
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// API base path. Falls back to PHC_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check API health
    Health,
    /// List facilities with outbreak alerts
    Facilities,
    /// Show the underserved ranking
    Underserved {
        /// Number of facilities to rank
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },
    /// Show simulated alerts followed by the API alert feed
    Feed {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,

        /// Include alerts already marked resolved
        #[arg(long)]
        include_resolved: bool,
    },
    /// Show connectivity advice for a facility
    Advice {
        /// Facility name
        name: String,
    },
    /// Record a simulated alert for a facility
    Simulate {
        /// Facility id or name
        facility_id: String,

        /// outbreak, resource or underserved
        kind: SimulatedKind,
    },
    /// Delete all simulated alerts
    Clear,
    /// Mark a feed entry resolved
    Resolve {
        /// Feed entry id
        alert_id: String,
    },
    /// Poll the alert feed until Ctrl-C, accepting commands on stdin
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = MonitorConfig::from_env()?;
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    if let Some(path) = args.state {
        config.state_path = path;
    }
    debug!(?config, "Loaded configuration");

    let api = PhcApiClient::new(config.api.clone())?;
    let kv = SqliteStore::open(&config.state_path)?;
    let service = DashboardService::new(Arc::new(api), Arc::new(kv), AlertSignals::new());
    let json = args.json;

    match args.command {
        Command::Health => {
            let status = service.health().await?;
            print_value(json, &status, render::health)?;
        }
        Command::Facilities => {
            let fetched = service.facilities(&ApiParams::new()).await;
            print_fetched(json, &fetched, |data| render::facilities(data))?;
        }
        Command::Underserved { top_n } => {
            let fetched = service.underserved(&ApiParams::new().top_n(top_n)).await;
            print_fetched(json, &fetched, render::underserved)?;
        }
        Command::Feed {
            limit,
            include_resolved,
        } => {
            let mut params = ApiParams::new();
            if let Some(limit) = limit {
                params = params.limit(limit);
            }

            let mut fetched = if include_resolved {
                service.alerts_feed(&params).await
            } else {
                service.open_alerts_feed(&params).await
            };
            if let Some(limit) = limit {
                fetched.data.truncate(limit);
            }
            print_fetched(json, &fetched, |data| render::feed(data))?;
        }
        Command::Advice { name } => {
            let advice = service.telecom_advice(&name, &ApiParams::new()).await?;
            print_value(json, &advice, |data| render::advice(data))?;
        }
        Command::Simulate { facility_id, kind } => {
            let alert = service.send_alert(&facility_id, kind).await?;
            print_value(json, &alert, |a| format!("{} {}\n", a.id, a.message))?;
        }
        Command::Clear => {
            service.clear_alerts()?;
            if !json {
                println!("Simulated alerts cleared");
            }
        }
        Command::Resolve { alert_id } => {
            let changed = service.resolve(&alert_id)?;
            if json {
                println!("{}", serde_json::json!({"id": alert_id, "changed": changed}));
            } else if changed {
                println!("Resolved {}", alert_id);
            } else {
                println!("{} was already resolved", alert_id);
            }
        }
        Command::Watch => watch(service, &config, json).await?,
    }

    Ok(())
}

fn print_value<T: Serialize>(
    json: bool,
    value: &T,
    to_text: impl Fn(&T) -> String,
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", to_text(value));
    }
    Ok(())
}

fn print_fetched<T: Serialize>(
    json: bool,
    fetched: &Fetched<T>,
    to_text: impl Fn(&T) -> String,
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(fetched)?);
    } else {
        if let Some(notice) = render::origin_notice(fetched) {
            eprintln!("{}", notice);
        }
        print!("{}", to_text(&fetched.data));
    }
    Ok(())
}

/// Print the merged, unresolved feed.
fn show_feed(service: &DashboardService, api_feed: Vec<AlertFeedEntry>, json: bool) {
    let entries = service
        .resolved()
        .retain_unresolved(service.merge_with_simulated(api_feed));

    if json {
        match serde_json::to_string(&entries) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("Failed to encode feed: {}", e),
        }
    } else {
        println!("--- {} alerts ---", entries.len());
        print!("{}", render::feed(&entries));
    }
}

/// Poll the feed and redraw it on every poll, signal or console command.
async fn watch(
    service: DashboardService,
    config: &MonitorConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Last API feed, reused when only the local log changes.
    let latest: Arc<Mutex<Vec<AlertFeedEntry>>> = Arc::default();

    let poll_service = service.clone();
    let poll_latest = latest.clone();
    let handle = Poller::spawn(config.feed_interval, move || {
        let service = poll_service.clone();
        let latest = poll_latest.clone();
        async move {
            let fetched = service.api_feed(&ApiParams::new()).await;
            if let Some(notice) = render::origin_notice(&fetched) {
                eprintln!("{}", notice);
            }
            *latest.lock().await = fetched.data.clone();
            show_feed(&service, fetched.data, json);
        }
    });

    info!(interval = ?config.feed_interval, "Watching alert feed (Ctrl-C to stop)");
    eprintln!("{}", HELP);

    let mut signals = service.signals().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Stopping watch");
                break;
            }
            signal = signals.recv() => match signal {
                Ok(signal) => {
                    debug!(?signal, "Alert log changed");
                    let api_feed = latest.lock().await.clone();
                    show_feed(&service, api_feed, json);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Missed alert signals, reloading");
                    let api_feed = latest.lock().await.clone();
                    show_feed(&service, api_feed, json);
                }
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => run_console(&service, &latest, &line, json).await,
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    stdin_open = false;
                }
            },
        }
    }

    handle.cancel();
    Ok(())
}

async fn run_console(
    service: &DashboardService,
    latest: &Mutex<Vec<AlertFeedEntry>>,
    line: &str,
    json: bool,
) {
    let command = match ConsoleCommand::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return,
        Err(message) => {
            eprintln!("{}", message);
            return;
        }
    };

    // Simulate and clear broadcast a signal, which triggers the redraw.
    let redraw = match command {
        ConsoleCommand::Simulate { facility_id, kind } => {
            service.send_alert(&facility_id, kind).await.map(|_| false)
        }
        ConsoleCommand::Clear => service.clear_alerts().map(|()| false),
        ConsoleCommand::Resolve { alert_id } => service.resolve(&alert_id).map(|changed| {
            if !changed {
                eprintln!("{} was already resolved", alert_id);
            }
            changed
        }),
        ConsoleCommand::Refresh => {
            let fetched = service.api_feed(&ApiParams::new()).await;
            *latest.lock().await = fetched.data;
            Ok(true)
        }
        ConsoleCommand::Help => {
            eprintln!("{}", HELP);
            Ok(false)
        }
    };

    match redraw {
        Ok(true) => {
            let api_feed = latest.lock().await.clone();
            show_feed(service, api_feed, json);
        }
        Ok(false) => {}
        Err(e) => eprintln!("{}", e),
    }
}
