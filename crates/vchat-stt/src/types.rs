//! Core types for the speech capture contract

/// Transcription event types
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    /// Partial transcription result (ongoing speech). Display only; the
    /// conversation controller never acts on partials.
    Partial { utterance_id: u64, text: String },
    /// Final transcription result (utterance complete)
    Final { utterance_id: u64, text: String },
    /// Capture/transcription error
    Error { code: String, message: String },
}

/// Capture configuration, fixed at session start
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CaptureConfig {
    /// Recognition language/locale (e.g. "en-US")
    pub language: String,
    /// Keep capturing across utterances rather than stopping after one
    pub continuous: bool,
    /// Emit partial recognition results
    pub partial_results: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
            partial_results: false,
        }
    }
}
