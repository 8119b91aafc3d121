use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use vchat_app::display;
use vchat_app::runtime::{spawn_session, SessionOptions};
use vchat_foundation::{PhaseManager, SessionPhase, ShutdownHandler};
use vchat_scenario::ScenarioRegistry;
use vchat_stt::{CaptureConfig, UtteranceScript};

#[derive(Parser, Debug)]
#[command(name = "vchat", about = "Scripted video-chat session driver")]
struct Cli {
    /// Scenario TOML file; the built-in scenario is used when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Directory containing the video assets
    #[arg(long, default_value = "video_files", env = "VCHAT_ASSET_ROOT")]
    assets: PathBuf,

    /// Utterance script JSON; the demo conversation is used when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Simulated clip length in seconds
    #[arg(long, default_value_t = 4)]
    clip_secs: u64,

    /// Recognition language
    #[arg(long, default_value = "en-US")]
    language: String,
}

fn init_logging() -> anyhow::Result<()> {
    std::fs::create_dir_all("logs")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "vchat.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout.and(non_blocking_file))
        .with_env_filter(log_level)
        .init();
    std::mem::forget(_guard);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!(
        "Starting VChat session at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let cli = Cli::parse();
    let phases = PhaseManager::new();
    let shutdown = ShutdownHandler::new().install().await;

    let registry = match &cli.scenario {
        Some(path) => Arc::new(
            vchat_scenario::config::load_from_path(path)
                .with_context(|| format!("loading scenario from {}", path.display()))?,
        ),
        None => Arc::new(ScenarioRegistry::builtin()),
    };

    let script = match &cli.script {
        Some(path) => UtteranceScript::from_path(path)
            .with_context(|| format!("loading utterance script from {}", path.display()))?,
        None => UtteranceScript::demo(),
    };

    let options = SessionOptions {
        asset_root: cli.assets,
        capture: CaptureConfig {
            language: cli.language,
            ..Default::default()
        },
        script,
        clip_duration: Duration::from_secs(cli.clip_secs),
    };
    let handle = spawn_session(options, registry);
    phases.transition(SessionPhase::Live)?;

    let mut updates = handle.subscribe();
    loop {
        tokio::select! {
            _ = shutdown.wait() => {
                tracing::info!("Shutdown signal received");
                break;
            }
            update = updates.recv() => {
                match update {
                    Ok(update) => display::render(&update),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Display fell behind, {} updates skipped", skipped);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        tracing::info!("Session closed its update stream");
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("Beginning graceful shutdown");
    phases.transition(SessionPhase::Stopping)?;

    let metrics = handle.metrics.clone();
    handle.shutdown().await;
    tracing::info!("Session stats - {}", metrics.summary());

    phases.transition(SessionPhase::Ended)?;
    tracing::info!("Shutdown complete");
    Ok(())
}
