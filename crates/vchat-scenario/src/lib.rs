//! Scenario registry and conversation controller for VChat
//!
//! This crate holds the scripted-conversation core: an immutable registry of
//! scenes (one video asset each, plus transition rules) validated for closure
//! at construction, and the controller that advances through it on transcript
//! and playback-completion events.

pub mod config;
pub mod controller;
pub mod error;
pub mod registry;

pub use controller::{ConversationController, Playback, Transition, TransitionCause};
pub use error::{ConfigError, ScenarioError};
pub use registry::{Scene, ScenarioRegistry, TriggerRule};
