//! Speech capture abstraction for VChat
//!
//! Defines the transcription collaborator contract: event types the
//! conversation runtime consumes, capture configuration, and a scripted
//! capture source that replays canned utterances on a schedule so sessions
//! run deterministically without a live recognition engine.

use std::sync::atomic::{AtomicU64, Ordering};

pub mod scripted;
pub mod types;

pub use scripted::{CaptureHandle, ScriptedCapture, UtteranceScript};
pub use types::{CaptureConfig, TranscriptEvent};

/// Generates unique utterance IDs
static UTTERANCE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique utterance ID
pub fn next_utterance_id() -> u64 {
    UTTERANCE_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}
