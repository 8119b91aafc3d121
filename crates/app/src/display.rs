//! Console rendering of session updates
//!
//! Stands in for the call UI: a status line per update carrying the call
//! timer, listening/responding indicator, active scene, and the latest
//! transcript.

use tracing::info;

use crate::runtime::SessionUpdate;

/// Format a call duration as `mm:ss`. Minutes keep counting past the hour.
pub fn format_uptime(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// One status line for the transcript console.
pub fn status_line(update: &SessionUpdate) -> String {
    let status = if update.listening {
        "awaiting voice command"
    } else {
        "processing response"
    };
    let transcript = if update.transcript.is_empty() {
        "no signal detected".to_string()
    } else {
        format!("\"{}\"", update.transcript)
    };
    format!(
        "[{}] {} | scene {} | {}",
        format_uptime(update.elapsed_seconds),
        status,
        update.scene,
        transcript
    )
}

pub fn render(update: &SessionUpdate) {
    info!(target: "display", "{}", status_line(update));
}
