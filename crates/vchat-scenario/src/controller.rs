//! Conversation controller: the state machine that walks the scene graph.
//!
//! Two inbound events drive it. Finalized transcripts advance the machine
//! only while the active scene is listening (keyword rules, declaration
//! order, first match wins, no match lands on the fallback scene). Playback
//! completions advance non-looping scenes to their completion target. Both
//! handlers mutate session state and return the transition they performed,
//! so the hosting runtime can react without polling.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};

use crate::error::ScenarioError;
use crate::registry::ScenarioRegistry;

/// What the rendering collaborator should currently display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    pub asset: String,
    pub looped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// A trigger rule of the listening scene matched the utterance.
    Keyword,
    /// Listening input matched no rule.
    Fallback,
    /// A non-looping clip finished playing.
    Completed,
    /// Session reset to the entry scene.
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub cause: TransitionCause,
}

/// Owns all mutable session state: current scene, last transcript, uptime.
///
/// The controller is single-owner and synchronous; the hosting runtime is
/// expected to run each handler to completion before dispatching the next
/// event.
pub struct ConversationController {
    registry: Arc<ScenarioRegistry>,
    current: String,
    last_transcript: String,
    elapsed_seconds: u64,
    change_tx: Sender<Transition>,
    change_rx: Receiver<Transition>,
}

impl ConversationController {
    pub fn new(registry: Arc<ScenarioRegistry>) -> Self {
        let (change_tx, change_rx) = crossbeam_channel::unbounded();
        Self {
            current: registry.entry().to_string(),
            registry,
            last_transcript: String::new(),
            elapsed_seconds: 0,
            change_tx,
            change_rx,
        }
    }

    /// Handle one finalized utterance from the transcription collaborator.
    ///
    /// The transcript is recorded unconditionally; a transition happens only
    /// if the active scene is listening. Any text is accepted, the empty
    /// string matches nothing and falls back.
    pub fn on_transcript(&mut self, text: &str) -> Option<Transition> {
        let normalized = text.trim().to_lowercase();
        debug!(
            target: "scenario",
            "Transcript in scene {:?}: {:?}",
            self.current, normalized
        );

        let matched = {
            let scene = self.current_scene();
            if !scene.is_listening() {
                // Mid-clip speech: keep the transcript for display, change nothing.
                self.last_transcript = normalized;
                return None;
            }
            scene
                .triggers
                .iter()
                .find(|rule| {
                    rule.keywords
                        .iter()
                        .any(|keyword| normalized.contains(keyword.as_str()))
                })
                .map(|rule| rule.next.clone())
        };
        self.last_transcript = normalized;

        let transition = match matched {
            Some(next) => self.goto(next, TransitionCause::Keyword),
            None => self.goto(self.registry.fallback().to_string(), TransitionCause::Fallback),
        };
        Some(transition)
    }

    /// Handle the playback collaborator reporting the current clip finished.
    ///
    /// Looping clips never complete; if the surface reports one anyway the
    /// event is ignored. A non-looping scene without a completion target is
    /// a malformed registry, which construction-time validation rules out.
    pub fn on_playback_complete(&mut self) -> Result<Option<Transition>, ScenarioError> {
        let (looped, on_complete) = {
            let scene = self.current_scene();
            (scene.looped, scene.on_complete.clone())
        };

        if looped {
            warn!(
                target: "scenario",
                "Ignoring completion event for looping scene {:?}",
                self.current
            );
            return Ok(None);
        }

        let next = on_complete.ok_or_else(|| ScenarioError::MissingCompletionTarget {
            id: self.current.clone(),
        })?;
        Ok(Some(self.goto(next, TransitionCause::Completed)))
    }

    /// Asset and loop flag for the active scene. Pure read; stable between
    /// transitions.
    pub fn current_asset(&self) -> Playback {
        let scene = self.current_scene();
        Playback {
            asset: scene.asset.clone(),
            looped: scene.looped,
        }
    }

    /// Reset to the entry scene, clearing transcript and uptime.
    pub fn restart(&mut self) -> Transition {
        self.last_transcript.clear();
        self.elapsed_seconds = 0;
        self.goto(self.registry.entry().to_string(), TransitionCause::Restart)
    }

    /// Advance the uptime counter by one second. Independent of transitions.
    pub fn tick(&mut self) -> u64 {
        self.elapsed_seconds += 1;
        self.elapsed_seconds
    }

    pub fn current_scene_id(&self) -> &str {
        &self.current
    }

    pub fn last_transcript(&self) -> &str {
        &self.last_transcript
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Whether the active scene accepts live transcript input.
    pub fn is_listening(&self) -> bool {
        self.current_scene().is_listening()
    }

    pub fn registry(&self) -> &Arc<ScenarioRegistry> {
        &self.registry
    }

    /// Observe transitions without being able to mutate the controller.
    pub fn subscribe(&self) -> Receiver<Transition> {
        self.change_rx.clone()
    }

    fn current_scene(&self) -> &crate::registry::Scene {
        self.registry
            .get(&self.current)
            .expect("validated registry resolves every reachable scene id")
    }

    fn goto(&mut self, to: String, cause: TransitionCause) -> Transition {
        let from = std::mem::replace(&mut self.current, to);
        let transition = Transition {
            from,
            to: self.current.clone(),
            cause,
        };
        info!(
            target: "scenario",
            "Scene transition: {:?} -> {:?} ({:?})",
            transition.from, transition.to, cause
        );
        let _ = self.change_tx.send(transition.clone());
        transition
    }
}
