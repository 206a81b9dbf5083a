mod config;
mod server;
mod source;
mod ticker;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mood_core::{Classifier, LexiconClassifier, MoodEngine, RawItem, Scene};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::AppConfig;
use crate::server::AppState;
use crate::source::HttpSource;

#[derive(Parser)]
#[command(name = "mood", about = "Real-time geo-sentiment globe engine")]
struct Cli {
    /// Config file (TOML). Falls back to $MOOD_CONFIG, then defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed the engine RNG for reproducible scenes
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the source, tick the engine and serve scenes over HTTP
    Serve {
        /// Listen address, overrides [server] bind
        #[arg(long)]
        bind: Option<String>,
    },

    /// Classify a piece of text
    Classify {
        text: String,
    },

    /// Compose one scene from a JSON-lines file of raw items
    Replay {
        /// One RawItem per line, each with `produced_at`
        file: PathBuf,

        /// Frame time in Unix seconds (default: latest `produced_at`)
        #[arg(long)]
        at: Option<f64>,

        /// Pretty-print the scene
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Serve { bind } => cmd_serve(&cli, config, bind.as_deref()).await,
        Commands::Classify { text } => cmd_classify(text),
        Commands::Replay { file, at, pretty } => cmd_replay(&cli, config, file, *at, *pretty),
        Commands::Config => cmd_config(&config),
    }
}

fn build_engine(cli: &Cli, config: &AppConfig) -> Result<MoodEngine> {
    let engine = match cli.seed {
        Some(seed) => MoodEngine::with_seed(config.engine.clone(), seed),
        None => MoodEngine::new(config.engine.clone()),
    };
    engine.context("invalid engine config")
}

async fn cmd_serve(cli: &Cli, config: AppConfig, bind: Option<&str>) -> Result<()> {
    let engine = build_engine(cli, &config)?;
    let buffer = engine.buffer();
    let cancel = CancellationToken::new();
    let tracker = TaskTracker::new();

    match &config.source.url {
        Some(url) => {
            let source = HttpSource::new(url, &config.source)?;
            let classifier: Arc<dyn Classifier> = Arc::new(LexiconClassifier::new());
            tracing::info!("polling {url}");
            tracker.spawn(source::run_ingestion(
                source,
                buffer.clone(),
                classifier,
                config.source.poll_interval(),
                config.source.backoff(),
                cancel.clone(),
            ));
        }
        None => tracing::warn!("no [source] url configured; scenes will stay empty"),
    }

    let (scenes_tx, scenes_rx) = watch::channel(Arc::new(Scene::default()));
    tracker.spawn(ticker::run_ticker(engine, scenes_tx, cancel.clone()));

    let addr = bind.unwrap_or(config.server.bind.as_str());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr().context("failed to read bound address")?;
    tracing::info!("listening on http://{local}");
    eprintln!("mood: serving on http://{local}");

    let router = server::build_router(Arc::new(AppState {
        scenes: scenes_rx,
        buffer,
    }));
    let shutdown = cancel.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            wait_for_signal().await;
            shutdown.cancel();
        })
        .await
        .context("server error")?;

    cancel.cancel();
    tracker.close();
    tracker.wait().await;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}

fn cmd_classify(text: &str) -> Result<()> {
    let classifier = LexiconClassifier::new();
    let polarity = classifier.polarity(text);
    let sentiment = classifier.classify(text);
    println!("{}\t{polarity:.3}", sentiment.as_str());
    Ok(())
}

fn read_replay_items(path: &Path) -> Result<Vec<(RawItem, f64)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut items = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item: RawItem = match serde_json::from_str(line) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("{}:{}: skipping malformed line: {e}", path.display(), lineno + 1);
                continue;
            }
        };
        match item.produced_at {
            Some(at) => items.push((item, at)),
            None => {
                tracing::warn!("{}:{}: skipping item without produced_at", path.display(), lineno + 1)
            }
        }
    }
    Ok(items)
}

fn cmd_replay(
    cli: &Cli,
    config: AppConfig,
    path: &Path,
    at: Option<f64>,
    pretty: bool,
) -> Result<()> {
    let items = read_replay_items(path)?;
    let seed = cli.seed.unwrap_or(0);
    let mut engine =
        MoodEngine::with_seed(config.engine, seed).context("invalid engine config")?;
    let classifier = LexiconClassifier::new();

    let mut accepted = 0usize;
    for (item, observed_at) in &items {
        match engine.ingest(item, &classifier, *observed_at) {
            Ok(_) => accepted += 1,
            Err(e) => tracing::debug!("rejected item: {e}"),
        }
    }

    let now = at
        .or_else(|| items.iter().map(|(_, t)| *t).reduce(f64::max))
        .unwrap_or(0.0);
    let scene = engine.on_tick(now);

    let json = if pretty {
        serde_json::to_string_pretty(&scene)
    } else {
        scene.to_json()
    }
    .context("failed to serialize scene")?;
    println!("{json}");

    if cli.verbose {
        eprintln!(
            "--- replay: lines={}, accepted={accepted}, retained={}, clusters={} ---",
            items.len(),
            scene.retained_count,
            scene.cluster_markers.len()
        );
    }
    Ok(())
}

fn cmd_config(config: &AppConfig) -> Result<()> {
    let text = toml::to_string_pretty(config).context("failed to render config")?;
    print!("{text}");
    Ok(())
}
