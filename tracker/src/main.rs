use anyhow::Context;
use clap::{Parser, Subcommand};
use covidcore::view::RefreshOutcome;
use covidcore::Scope;
use gui_bridge::bridge::routes;
use log::info;
use render::{render_marker, render_tree};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::TrackerConfig;
use workflow::runner::Runner;

mod gui_bridge;
mod render;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Epidemic statistics by country, for tree and map views")]
struct Args {
    /// Load tracker settings from YAML
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base URL of the statistics API (the `/locations` endpoint is appended)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// YAML file holding the pinned countries
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Read a saved `/locations` payload instead of calling the API
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Worldwide totals
    World,
    /// Every country, with provinces where reported
    Countries,
    /// Only the pinned countries
    Pinned,
    /// Pin a country
    Pin { country: String },
    /// Unpin a country
    Unpin { country: String },
    /// List map markers for every region
    Markers,
    /// Print the map message that centers the map on a country
    Locate { country: String },
    /// Keep the rendering bridge running (Ctrl+C to stop)
    Serve {
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    let bind = match &args.command {
        Command::Serve { bind } => *bind,
        _ => None,
    };
    let config = config.with_overrides(args.api_url.clone(), args.settings.clone(), bind);

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime")?;
    runtime.block_on(run(config, args.snapshot, args.command))
}

async fn run(config: TrackerConfig, snapshot: Option<PathBuf>, command: Command) -> anyhow::Result<()> {
    let runner = Runner::from_config(&config, snapshot).context("setting up data source")?;

    match command {
        Command::World => print_scope(&runner, Scope::World).await?,
        Command::Countries => print_scope(&runner, Scope::Countries).await?,
        Command::Pinned => print_scope(&runner, Scope::Pinned).await?,
        Command::Pin { country } => {
            if runner.pin(&country).await.context("pinning country")? {
                println!("Pinned {country}.");
            } else {
                println!("{country} is already pinned.");
            }
            print_pins(&runner);
        }
        Command::Unpin { country } => {
            if runner.unpin(&country).await.context("unpinning country")? {
                println!("Unpinned {country}.");
            } else {
                println!("{country} was not pinned.");
            }
            print_pins(&runner);
        }
        Command::Markers => {
            runner
                .refresh(Scope::Countries)
                .await
                .context("fetching statistics")?;
            for marker in runner.markers()? {
                println!("{}", render_marker(&marker));
            }
        }
        Command::Locate { country } => {
            runner
                .refresh(Scope::Countries)
                .await
                .context("fetching statistics")?;
            let message = runner
                .locate(&country)
                .with_context(|| format!("locating {country}"))?;
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
        Command::Serve { .. } => serve(Arc::new(runner), config.bind).await?,
    }

    Ok(())
}

async fn print_scope(runner: &Runner, scope: Scope) -> anyhow::Result<()> {
    let outcome = runner
        .refresh(scope)
        .await
        .with_context(|| format!("refreshing {scope} statistics"))?;
    if let RefreshOutcome::Published { revision, nodes } = outcome {
        info!("{scope}: revision {revision}, {nodes} root nodes");
    }
    let nodes = runner.provider(scope).root_nodes();
    if nodes.is_empty() {
        println!("No {scope} statistics to show.");
    } else {
        print!("{}", render_tree(&nodes));
    }
    Ok(())
}

fn print_pins(runner: &Runner) {
    let pins = runner.pins();
    if pins.is_empty() {
        println!("No pinned countries.");
    } else {
        println!("Pinned: {}", pins.iter().collect::<Vec<_>>().join(", "));
    }
}

async fn serve(runner: Arc<Runner>, bind: SocketAddr) -> anyhow::Result<()> {
    // A failed first fetch still serves; the views stay empty until a refresh succeeds.
    if let Err(err) = runner.refresh_all().await {
        eprintln!("initial refresh failed: {err}");
    }

    let (addr, server) = warp::serve(routes(runner))
        .try_bind_with_graceful_shutdown(bind, async {
            signal::ctrl_c().await.ok();
        })
        .with_context(|| format!("binding bridge to {bind}"))?;
    println!("Rendering bridge listening on http://{addr} (Ctrl+C to stop)...");
    server.await;
    Ok(())
}
