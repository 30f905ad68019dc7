use anyhow::{Context, Result};
use auction_house_sync::config::SyncConfig;
use auction_house_sync::store::ListingStore;
use auction_house_sync::sync::SyncEngine;
use auction_house_sync::{api, build_engine, open_store};
use env_logger::Builder;
use log::{LevelFilter, info, error};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// What the invocation should do
enum Command {
    Sync,
    List,
    ResetCursor,
}

// Simple CLI without clap
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger; RUST_LOG overrides the default level
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && (args[1] == "--version" || args[1] == "-v") {
        println!("Auction House Sync v{}", auction_house_sync::VERSION);
        return Ok(());
    }

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        print_usage(&args[0]);
        return Ok(());
    }

    // Parse optional arguments
    let mut config_path: Option<PathBuf> = None;
    let mut overrides: Vec<(String, String)> = Vec::new();
    let mut command = Command::Sync;
    let mut watch = false;
    let mut serve = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--config" | "-f" | "--cluster" | "-c" | "--auction-house" | "--genesis"
            | "--db" | "--idl" | "--interval" | "--http-addr") => {
                if i + 1 < args.len() {
                    if flag == "--config" || flag == "-f" {
                        config_path = Some(PathBuf::from(&args[i + 1]));
                    } else {
                        overrides.push((flag.to_string(), args[i + 1].clone()));
                    }
                    i += 2;
                } else {
                    println!("Error: Missing value for {}", flag);
                    return Ok(());
                }
            },
            "--watch" | "-w" => {
                watch = true;
                i += 1;
            },
            "--serve" => {
                serve = true;
                i += 1;
            },
            "--list" => {
                command = Command::List;
                i += 1;
            },
            "--reset-cursor" => {
                command = Command::ResetCursor;
                i += 1;
            },
            _ => {
                println!("Unknown argument: {}", args[i]);
                i += 1;
            }
        }
    }

    let mut config = SyncConfig::load(config_path.as_deref())?;
    for (flag, value) in overrides {
        apply_flag(&mut config, &flag, value)?;
    }

    let store = open_store(&config)?;

    match command {
        Command::List => {
            let listings = store.active_listings().await?;
            let cursor = store.cursor().await?;
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "cursor": cursor,
                "activeListings": listings,
            }))?);
            return Ok(());
        },
        Command::ResetCursor => {
            store.reset_cursor().await?;
            println!("Cleared sync cursor; the next cycle starts from the genesis signature");
            return Ok(());
        },
        Command::Sync => {}
    }

    // Schema and configuration problems stop us here, before any cycle
    let engine = Arc::new(build_engine(&config, store.clone())?);

    if serve {
        let addr: SocketAddr = config
            .http_addr
            .parse()
            .with_context(|| format!("Invalid --http-addr {}", config.http_addr))?;
        let api_store: Arc<dyn ListingStore> = store.clone();
        tokio::spawn(async move {
            if let Err(e) = api::serve(addr, api_store).await {
                error!("API server stopped: {}", e);
            }
        });
    }

    if watch {
        watch_loop(engine, &config).await
    } else {
        let report = engine.run_cycle().await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        if serve {
            info!("Sync finished; serving listings until interrupted");
            tokio::signal::ctrl_c().await?;
        }
        Ok(())
    }
}

/// Run a cycle every `interval_secs`, one at a time, until interrupted
async fn watch_loop(engine: Arc<SyncEngine>, config: &SyncConfig) -> Result<()> {
    let limit = Duration::from_secs(config.cycle_timeout_secs.max(1));
    let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Watching every {}s", config.interval_secs);
    loop {
        tokio::select! {
            _ = ticker.tick() => {},
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                return Ok(());
            }
        }

        match tokio::time::timeout(limit, engine.run_cycle()).await {
            Ok(Ok(report)) => info!(
                "Cycle done: {} processed ({} listed, {} cancelled, {} sold), cursor {}",
                report.processed, report.listings, report.cancellations, report.sales, report.cursor
            ),
            Ok(Err(e)) if e.is_fatal() => return Err(e.into()),
            Ok(Err(e)) => error!("Error syncing auction house listings: {}", e),
            Err(_) => error!(
                "Cycle exceeded {}s and was stopped; the next cycle resumes from the last commit",
                limit.as_secs()
            ),
        }
    }
}

fn apply_flag(config: &mut SyncConfig, flag: &str, value: String) -> Result<()> {
    match flag {
        "--cluster" | "-c" => config.rpc_url = value,
        "--auction-house" => config.auction_house = Some(value),
        "--genesis" => config.genesis_signature = Some(value),
        "--db" => config.db_path = PathBuf::from(value),
        "--idl" => config.idl_path = Some(PathBuf::from(value)),
        "--interval" => {
            config.interval_secs = value
                .parse()
                .with_context(|| format!("Invalid --interval {}", value))?
        },
        "--http-addr" => config.http_addr = value,
        _ => {}
    }
    Ok(())
}

fn print_usage(program: &str) {
    println!("Auction House Sync v{}", auction_house_sync::VERSION);
    println!("\nUsage:");
    println!("  {} [--config PATH] [--cluster URL] [--auction-house ADDR] [--genesis SIG] [--watch] [--serve]", program);
    println!("  {} --list", program);
    println!("  {} --reset-cursor", program);
    println!("  {} --version", program);
    println!("\nOptions:");
    println!("  --config, -f PATH      Read settings from a JSON file");
    println!("  --cluster, -c URL      Use the specified RPC URL (default: devnet)");
    println!("  --auction-house ADDR   Auction house whose transactions are scanned");
    println!("  --genesis SIG          Start here when no cursor has been committed");
    println!("  --db PATH              Listing database directory");
    println!("  --idl PATH             Auction-house IDL (default: embedded)");
    println!("  --watch, -w            Run a cycle every --interval seconds");
    println!("  --interval SECS        Seconds between cycles in watch mode (default: 300)");
    println!("  --serve                Serve GET /api/nft/activeListings");
    println!("  --http-addr ADDR       Listen address for --serve (default: 127.0.0.1:8080)");
    println!("  --list                 Print active listings and the cursor");
    println!("  --reset-cursor         Forget the cursor");
    println!("  --version, -v          Show version information");
}
