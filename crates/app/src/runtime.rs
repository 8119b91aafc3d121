//! Session runtime: owns the conversation controller and wires it to the
//! capture and playback collaborators.
//!
//! One tokio task hosts the controller. Every inbound event (transcript,
//! playback completion, session command, uptime tick) is handled to
//! completion before the next is taken, so controller state never sees
//! concurrent mutation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use vchat_playback::{
    next_play_id, PlaybackEvent, PlaybackRequest, PlaybackSurface, SimulatedSurface,
};
use vchat_scenario::{ConversationController, ScenarioRegistry, TransitionCause};
use vchat_stt::{CaptureConfig, CaptureHandle, ScriptedCapture, TranscriptEvent, UtteranceScript};

use crate::telemetry::SessionMetrics;

const UPTIME_TICK: Duration = Duration::from_secs(1);

/// Options for starting a conversation session
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Directory the scenario's relative asset paths resolve against.
    pub asset_root: PathBuf,
    pub capture: CaptureConfig,
    pub script: UtteranceScript,
    /// How long the simulated surface pretends each non-looping clip runs.
    pub clip_duration: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("video_files"),
            capture: CaptureConfig::default(),
            script: UtteranceScript::demo(),
            clip_duration: Duration::from_secs(4),
        }
    }
}

/// Session controls exposed to the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Back to the entry scene, call timer zeroed.
    Restart,
    /// Hang up and tear the session down.
    Stop,
}

/// Observable session state, broadcast after every change
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub scene: String,
    pub asset: PathBuf,
    pub looped: bool,
    pub listening: bool,
    pub transcript: String,
    pub elapsed_seconds: u64,
}

/// Handle to a running session
pub struct SessionHandle {
    pub metrics: SessionMetrics,
    update_tx: broadcast::Sender<SessionUpdate>,
    command_tx: mpsc::Sender<SessionCommand>,
    session_task: JoinHandle<()>,
}

impl SessionHandle {
    /// Subscribe to session updates (multiple subscribers supported)
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.update_tx.subscribe()
    }

    /// Ask the session to reset to the entry scene.
    pub async fn restart(&self) {
        let _ = self.command_tx.send(SessionCommand::Restart).await;
    }

    /// Gracefully stop the session and wait for teardown
    pub async fn shutdown(self) {
        info!("Shutting down session...");
        let _ = self.command_tx.send(SessionCommand::Stop).await;
        let _ = self.session_task.await;
        info!("Session shutdown complete");
    }
}

/// Start a session against the simulated collaborators.
pub fn spawn_session(options: SessionOptions, registry: Arc<ScenarioRegistry>) -> SessionHandle {
    let metrics = SessionMetrics::default();
    let (transcript_tx, transcript_rx) = mpsc::channel::<TranscriptEvent>(64);
    let (playback_tx, playback_rx) = mpsc::channel::<PlaybackEvent>(16);
    let (command_tx, command_rx) = mpsc::channel::<SessionCommand>(8);
    let (update_tx, _) = broadcast::channel::<SessionUpdate>(64);

    let capture = ScriptedCapture::spawn(options.capture.clone(), options.script.clone(), transcript_tx);
    let surface = SimulatedSurface::new(options.clip_duration, playback_tx);

    let session = SessionTask {
        controller: ConversationController::new(registry),
        surface,
        capture,
        asset_root: options.asset_root,
        current_play: None,
        transcript_rx,
        playback_rx,
        command_rx,
        update_tx: update_tx.clone(),
        metrics: metrics.clone(),
    };
    let session_task = tokio::spawn(session.run());

    SessionHandle {
        metrics,
        update_tx,
        command_tx,
        session_task,
    }
}

/// The controller's host task
struct SessionTask<S: PlaybackSurface> {
    controller: ConversationController,
    surface: S,
    capture: CaptureHandle,
    asset_root: PathBuf,
    /// Play id of the clip currently on screen; completions for anything
    /// else are stale and ignored.
    current_play: Option<u64>,
    transcript_rx: mpsc::Receiver<TranscriptEvent>,
    playback_rx: mpsc::Receiver<PlaybackEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
    update_tx: broadcast::Sender<SessionUpdate>,
    metrics: SessionMetrics,
}

impl<S: PlaybackSurface> SessionTask<S> {
    async fn run(mut self) {
        info!(target: "session", "Session starting in scene {:?}", self.controller.current_scene_id());
        self.play_current().await;
        self.publish();

        let mut uptime =
            tokio::time::interval_at(tokio::time::Instant::now() + UPTIME_TICK, UPTIME_TICK);

        loop {
            tokio::select! {
                Some(event) = self.transcript_rx.recv() => {
                    self.handle_transcript(event).await;
                }

                Some(event) = self.playback_rx.recv() => {
                    self.handle_playback(event).await;
                }

                command = self.command_rx.recv() => {
                    match command {
                        Some(SessionCommand::Restart) => {
                            self.metrics.increment_restarts();
                            let transition = self.controller.restart();
                            info!(target: "session", "Session restarted ({:?} -> {:?})", transition.from, transition.to);
                            self.play_current().await;
                            self.publish();
                        }
                        Some(SessionCommand::Stop) | None => {
                            info!(target: "session", "Session stop requested");
                            break;
                        }
                    }
                }

                _ = uptime.tick() => {
                    self.controller.tick();
                    self.publish();
                }
            }
        }

        // Release collaborators on every exit path.
        self.capture.stop();
        if let Err(err) = self.surface.stop().await {
            debug!(target: "session", "Playback surface already closed: {}", err);
        }
        info!(target: "session", "Session ended ({})", self.metrics.summary());
    }

    async fn handle_transcript(&mut self, event: TranscriptEvent) {
        match event {
            TranscriptEvent::Final { utterance_id, text } => {
                debug!(target: "session", "Final utterance {}: {:?}", utterance_id, text);
                self.metrics.increment_finals();
                if let Some(transition) = self.controller.on_transcript(&text) {
                    match transition.cause {
                        TransitionCause::Fallback => self.metrics.increment_fallbacks(),
                        _ => self.metrics.increment_trigger_matches(),
                    }
                    self.play_current().await;
                }
                self.publish();
            }
            TranscriptEvent::Partial { utterance_id, text } => {
                debug!(target: "session", "Partial utterance {}: {:?}", utterance_id, text);
                self.metrics.increment_partials();
            }
            TranscriptEvent::Error { code, message } => {
                warn!(target: "session", "Capture error [{}]: {}", code, message);
                self.metrics.increment_capture_errors();
            }
        }
    }

    async fn handle_playback(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Completed { play_id } => {
                if self.current_play != Some(play_id) {
                    debug!(target: "session", "Ignoring stale completion (play {})", play_id);
                    return;
                }
                self.metrics.increment_completions();
                match self.controller.on_playback_complete() {
                    Ok(Some(_)) => {
                        self.play_current().await;
                        self.publish();
                    }
                    Ok(None) => {}
                    Err(err) => {
                        // Startup validation makes this unreachable; a hit
                        // means the registry invariant is broken.
                        error!(target: "session", "Completion failed: {}", err);
                    }
                }
            }
            PlaybackEvent::Started { play_id } => {
                debug!(target: "session", "Playback started (play {})", play_id);
            }
            PlaybackEvent::Stopped { play_id } => {
                debug!(target: "session", "Playback stopped (play {})", play_id);
            }
        }
    }

    async fn play_current(&mut self) {
        let playback = self.controller.current_asset();
        let play_id = next_play_id();
        self.current_play = Some(play_id);
        let request = PlaybackRequest {
            play_id,
            asset: self.asset_root.join(&playback.asset),
            looped: playback.looped,
        };
        if let Err(err) = self.surface.play(request).await {
            error!(target: "session", "Playback surface rejected clip: {}", err);
        }
    }

    fn publish(&self) {
        let playback = self.controller.current_asset();
        let update = SessionUpdate {
            scene: self.controller.current_scene_id().to_string(),
            asset: self.asset_root.join(&playback.asset),
            looped: playback.looped,
            listening: self.controller.is_listening(),
            transcript: self.controller.last_transcript().to_string(),
            elapsed_seconds: self.controller.elapsed_seconds(),
        };
        let _ = self.update_tx.send(update);
    }
}
