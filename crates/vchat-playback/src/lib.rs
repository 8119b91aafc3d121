//! Playback surface abstraction for VChat
//!
//! The rendering collaborator contract: a surface is handed an asset and a
//! loop flag, plays it, and reports exactly one completion per non-looping
//! play (never for looping clips). `SimulatedSurface` implements the contract
//! with a timer so the conversation runtime can run headless.

use std::sync::atomic::{AtomicU64, Ordering};

pub mod engine;
pub mod error;
pub mod types;

pub use engine::{PlaybackSurface, SimulatedSurface};
pub use error::PlaybackError;
pub use types::{PlaybackEvent, PlaybackRequest};

/// Generates unique play IDs
static PLAY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique play ID
pub fn next_play_id() -> u64 {
    PLAY_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}
