//! Scenario file loading. The on-disk shape mirrors the registry one to one,
//! so a file can restage the whole conversation without touching code.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::registry::{Scene, ScenarioRegistry};

/// On-disk scenario description (TOML).
///
/// ```toml
/// entry = "intro"
/// fallback = "fallback"
///
/// [scenes.intro]
/// asset = "prompt.mp4"
/// on_complete = "idle"
///
/// [scenes.idle]
/// asset = "idle.mp4"
/// loop = true
///
/// [[scenes.idle.triggers]]
/// keywords = ["hi", "hello"]
/// next = "greeting"
/// ```
#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    pub entry: String,
    pub fallback: String,
    pub scenes: HashMap<String, Scene>,
}

/// Load and validate a scenario from a TOML file.
pub fn load_from_path(path: &Path) -> Result<ScenarioRegistry, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let file: ScenarioFile = toml::from_str(&raw)?;
    let registry = ScenarioRegistry::new(file.entry, file.fallback, file.scenes)?;
    info!(
        target: "scenario",
        "Loaded scenario from {} ({} scenes, entry {:?})",
        path.display(),
        registry.len(),
        registry.entry()
    );
    Ok(registry)
}
