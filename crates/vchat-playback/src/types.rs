//! Core types for the playback surface contract

use std::path::PathBuf;

/// Request to render one clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    /// Distinguishes this play from earlier plays of the same asset, so a
    /// completion can always be tied to the play that produced it.
    pub play_id: u64,
    /// Resolved media path.
    pub asset: PathBuf,
    /// Looping clips repeat until superseded and never complete.
    pub looped: bool,
}

/// Playback surface events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The surface began rendering the clip
    Started { play_id: u64 },
    /// A non-looping clip finished naturally
    Completed { play_id: u64 },
    /// Playback was stopped before completing
    Stopped { play_id: u64 },
}
