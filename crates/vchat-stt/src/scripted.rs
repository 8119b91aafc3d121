//! Scripted transcript source
//!
//! Replays a canned list of utterances on a schedule, standing in for a live
//! recognition engine. Capture is a scoped resource: `spawn` acquires it,
//! `stop` (or dropping the handle) releases it on every exit path, so a
//! session can never leave an orphaned capture task running.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::next_utterance_id;
use crate::types::{CaptureConfig, TranscriptEvent};

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read utterance script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse utterance script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One scripted utterance: wait `delay_ms` after the previous one, then speak.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptedUtterance {
    pub delay_ms: u64,
    pub text: String,
}

/// Ordered utterances for one session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct UtteranceScript {
    pub utterances: Vec<ScriptedUtterance>,
}

impl UtteranceScript {
    /// Load a script from a JSON file: `[{"delay_ms": 2000, "text": "hello"}, ...]`
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Canned conversation used when no script file is given.
    pub fn demo() -> Self {
        let lines = [
            (4_000, "hello there"),
            (6_000, "how is it going today"),
            (6_000, "what is the weather like"),
            (6_000, "open the pod bay doors"),
            (6_000, "tell me a secret"),
            (6_000, "okay goodbye"),
        ];
        Self {
            utterances: lines
                .iter()
                .map(|(delay_ms, text)| ScriptedUtterance {
                    delay_ms: *delay_ms,
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }
}

/// Scripted capture source.
pub struct ScriptedCapture;

impl ScriptedCapture {
    /// Acquire the capture resource: spawns the replay task and returns the
    /// handle that owns it.
    pub fn spawn(
        config: CaptureConfig,
        script: UtteranceScript,
        event_tx: mpsc::Sender<TranscriptEvent>,
    ) -> CaptureHandle {
        info!(
            target: "capture",
            "Starting scripted capture (language: {}, {} utterances)",
            config.language,
            script.len()
        );
        let task = tokio::spawn(run(config, script, event_tx));
        CaptureHandle { task }
    }
}

async fn run(config: CaptureConfig, script: UtteranceScript, event_tx: mpsc::Sender<TranscriptEvent>) {
    for utterance in script.utterances {
        tokio::time::sleep(Duration::from_millis(utterance.delay_ms)).await;

        // Engine contract: finalized text arrives lowercase.
        let text = utterance.text.trim().to_lowercase();
        let utterance_id = next_utterance_id();

        if config.partial_results {
            if let Some(first_word) = text.split_whitespace().next() {
                let partial = TranscriptEvent::Partial {
                    utterance_id,
                    text: first_word.to_string(),
                };
                if event_tx.send(partial).await.is_err() {
                    debug!(target: "capture", "Event channel closed, stopping capture");
                    return;
                }
            }
        }

        debug!(target: "capture", "Final utterance {}: {:?}", utterance_id, text);
        let event = TranscriptEvent::Final { utterance_id, text };
        if event_tx.send(event).await.is_err() {
            debug!(target: "capture", "Event channel closed, stopping capture");
            return;
        }

        if !config.continuous {
            debug!(target: "capture", "Single-shot capture complete");
            return;
        }
    }

    // Script exhausted: the microphone stays open but nothing more arrives.
    // The session keeps listening until the handle releases us.
    debug!(target: "capture", "Utterance script exhausted; capture idle");
    std::future::pending::<()>().await;
}

/// Owns the running capture task. Stopping is idempotent and also happens on
/// drop, covering abrupt teardown paths.
pub struct CaptureHandle {
    task: JoinHandle<()>,
}

impl CaptureHandle {
    pub fn stop(&mut self) {
        if !self.task.is_finished() {
            self.task.abort();
            info!(target: "capture", "Capture stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
