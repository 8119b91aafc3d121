use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared counters for cross-task session monitoring
#[derive(Clone, Default)]
pub struct SessionMetrics {
    // Transcript events
    pub finals: Arc<AtomicU64>,
    pub partials: Arc<AtomicU64>,
    pub capture_errors: Arc<AtomicU64>,

    // Transition outcomes
    pub trigger_matches: Arc<AtomicU64>,
    pub fallbacks: Arc<AtomicU64>,
    pub completions: Arc<AtomicU64>,
    pub restarts: Arc<AtomicU64>,
}

impl SessionMetrics {
    pub fn increment_finals(&self) {
        self.finals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_partials(&self) {
        self.partials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_capture_errors(&self) {
        self.capture_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_trigger_matches(&self) {
        self.trigger_matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fallbacks(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_completions(&self) {
        self.completions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_restarts(&self) {
        self.restarts.fetch_add(1, Ordering::Relaxed);
    }

    /// One-line summary for the end-of-session log.
    pub fn summary(&self) -> String {
        format!(
            "finals: {}, partials: {}, matches: {}, fallbacks: {}, completions: {}, restarts: {}, capture errors: {}",
            self.finals.load(Ordering::Relaxed),
            self.partials.load(Ordering::Relaxed),
            self.trigger_matches.load(Ordering::Relaxed),
            self.fallbacks.load(Ordering::Relaxed),
            self.completions.load(Ordering::Relaxed),
            self.restarts.load(Ordering::Relaxed),
            self.capture_errors.load(Ordering::Relaxed),
        )
    }
}
