//! Immutable scene registry: one entry per video clip, validated for closure
//! (no dangling scene references) before the first session starts.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ScenarioError;

/// One keyword rule. An utterance matches if it contains ANY of the keywords
/// as a substring; word boundaries are deliberately not considered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TriggerRule {
    pub keywords: Vec<String>,
    pub next: String,
}

/// A scene: one playable clip plus its transition rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scene {
    /// Media path relative to the asset root.
    pub asset: String,
    /// Looping clips repeat forever and never complete naturally.
    #[serde(rename = "loop", default)]
    pub looped: bool,
    /// Next scene when the clip finishes playing. Only looping scenes may omit it.
    #[serde(default)]
    pub on_complete: Option<String>,
    /// Keyword rules, evaluated in declaration order while this scene is active.
    #[serde(default)]
    pub triggers: Vec<TriggerRule>,
}

impl Scene {
    /// A scene with trigger rules accepts live transcript input.
    pub fn is_listening(&self) -> bool {
        !self.triggers.is_empty()
    }
}

/// The fixed scene graph for one scripted conversation.
///
/// Constructed once at startup; `new` refuses any graph that is not closed,
/// so lookups of reachable ids cannot fail afterwards.
#[derive(Debug, Clone)]
pub struct ScenarioRegistry {
    entry: String,
    fallback: String,
    scenes: HashMap<String, Scene>,
}

impl ScenarioRegistry {
    pub fn new(
        entry: String,
        fallback: String,
        scenes: HashMap<String, Scene>,
    ) -> Result<Self, ScenarioError> {
        let registry = Self {
            entry,
            fallback,
            scenes,
        };
        registry.validate()?;
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Result<&Scene, ScenarioError> {
        self.scenes.get(id).ok_or_else(|| ScenarioError::UnknownScene {
            id: id.to_string(),
        })
    }

    /// Scene the controller starts (and restarts) in.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Scene reached when listening input matches no trigger rule.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Closure check: every id referenced anywhere must resolve, and every
    /// non-looping scene must say where playback completion goes.
    fn validate(&self) -> Result<(), ScenarioError> {
        self.get(&self.entry)?;
        self.get(&self.fallback)?;

        for (id, scene) in &self.scenes {
            match &scene.on_complete {
                Some(next) => {
                    self.get(next)?;
                }
                None if !scene.looped => {
                    return Err(ScenarioError::MissingCompletionTarget { id: id.clone() });
                }
                None => {}
            }
            for rule in &scene.triggers {
                self.get(&rule.next)?;
            }
        }
        Ok(())
    }

    /// The stock V-Chat scenario: an intro clip, a looping listening clip with
    /// five keyword rules, and six one-shot response clips that all return to
    /// listening.
    pub fn builtin() -> Self {
        fn response(asset: &str) -> Scene {
            Scene {
                asset: asset.to_string(),
                looped: false,
                on_complete: Some("idle".to_string()),
                triggers: Vec::new(),
            }
        }

        fn rule(keywords: &[&str], next: &str) -> TriggerRule {
            TriggerRule {
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                next: next.to_string(),
            }
        }

        let mut scenes = HashMap::new();
        scenes.insert("intro".to_string(), response("prompt.mp4"));
        scenes.insert(
            "idle".to_string(),
            Scene {
                asset: "idle.mp4".to_string(),
                looped: true,
                on_complete: None,
                triggers: vec![
                    rule(&["hi", "hello", "hey", "greetings"], "greeting"),
                    rule(
                        &["how are you", "status", "how is it going"],
                        "general_response",
                    ),
                    rule(&["weather", "forecast", "temperature"], "weather"),
                    rule(&["bye", "goodbye", "exit"], "goodbye"),
                    rule(&["easter egg", "secret", "hidden"], "easter_egg"),
                ],
            },
        );
        scenes.insert("greeting".to_string(), response("greeting.mp4"));
        scenes.insert(
            "general_response".to_string(),
            response("general_response.mp4"),
        );
        scenes.insert("weather".to_string(), response("weather.mp4"));
        scenes.insert("goodbye".to_string(), response("goodbye.mp4"));
        scenes.insert("easter_egg".to_string(), response("easter_egg.mp4"));
        scenes.insert("fallback".to_string(), response("fallback.mp4"));

        Self::new("intro".to_string(), "fallback".to_string(), scenes)
            .expect("built-in scenario graph is closed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looping(asset: &str) -> Scene {
        Scene {
            asset: asset.to_string(),
            looped: true,
            on_complete: None,
            triggers: Vec::new(),
        }
    }

    #[test]
    fn builtin_has_eight_scenes() {
        let registry = ScenarioRegistry::builtin();
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.entry(), "intro");
        assert_eq!(registry.fallback(), "fallback");
    }

    #[test]
    fn builtin_listening_scene_is_idle_only() {
        let registry = ScenarioRegistry::builtin();
        assert!(registry.get("idle").unwrap().is_listening());
        for id in [
            "intro",
            "greeting",
            "general_response",
            "weather",
            "goodbye",
            "easter_egg",
            "fallback",
        ] {
            assert!(!registry.get(id).unwrap().is_listening(), "{id}");
        }
    }

    #[test]
    fn builtin_completions_route_back_to_idle() {
        let registry = ScenarioRegistry::builtin();
        for id in [
            "intro",
            "greeting",
            "general_response",
            "weather",
            "goodbye",
            "easter_egg",
            "fallback",
        ] {
            let scene = registry.get(id).unwrap();
            assert_eq!(scene.on_complete.as_deref(), Some("idle"), "{id}");
        }
    }

    #[test]
    fn get_unknown_scene_fails() {
        let registry = ScenarioRegistry::builtin();
        let err = registry.get("does_not_exist").unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownScene { .. }));
    }

    #[test]
    fn dangling_on_complete_rejected() {
        let mut scenes = HashMap::new();
        scenes.insert("loop".to_string(), looping("a.mp4"));
        scenes.insert(
            "clip".to_string(),
            Scene {
                asset: "b.mp4".to_string(),
                looped: false,
                on_complete: Some("nowhere".to_string()),
                triggers: Vec::new(),
            },
        );
        let err = ScenarioRegistry::new("loop".to_string(), "loop".to_string(), scenes)
            .unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownScene { id } if id == "nowhere"));
    }

    #[test]
    fn dangling_trigger_target_rejected() {
        let mut scenes = HashMap::new();
        let mut listening = looping("a.mp4");
        listening.triggers.push(TriggerRule {
            keywords: vec!["hello".to_string()],
            next: "missing".to_string(),
        });
        scenes.insert("loop".to_string(), listening);
        let err = ScenarioRegistry::new("loop".to_string(), "loop".to_string(), scenes)
            .unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownScene { id } if id == "missing"));
    }

    #[test]
    fn non_looping_scene_without_completion_rejected() {
        let mut scenes = HashMap::new();
        scenes.insert("loop".to_string(), looping("a.mp4"));
        scenes.insert(
            "clip".to_string(),
            Scene {
                asset: "b.mp4".to_string(),
                looped: false,
                on_complete: None,
                triggers: Vec::new(),
            },
        );
        let err = ScenarioRegistry::new("loop".to_string(), "loop".to_string(), scenes)
            .unwrap_err();
        assert!(matches!(err, ScenarioError::MissingCompletionTarget { id } if id == "clip"));
    }

    #[test]
    fn unknown_entry_rejected() {
        let mut scenes = HashMap::new();
        scenes.insert("loop".to_string(), looping("a.mp4"));
        let err = ScenarioRegistry::new("start".to_string(), "loop".to_string(), scenes)
            .unwrap_err();
        assert!(matches!(err, ScenarioError::UnknownScene { id } if id == "start"));
    }
}
