use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::api::types::SceneId;
use crate::error::NavResult;

/// One step in a UI root lookup chain. Steps are tried in order; the first hit wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UiLookup {
    /// The root named in `NavConfig::scene_ui` for the scene being resolved.
    Declared,
    /// First visible object with this tag.
    Tag(String),
    /// Root of the scene's back-navigation control.
    BackControlRoot,
    /// Parent of the object with this name, or the object itself if it is a root.
    NamedParent(String),
    /// First root object of the scene whose name contains any of these substrings.
    RootNameContains(Vec<String>),
}

/// What to do with a request that arrives while a transition is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Refuse it with `NavError::TransitionInFlight`.
    #[default]
    Reject,
    /// Hold it and start it once the running transition finishes.
    Queue,
}

/// Navigation configuration.
/// Every field has a default, so a JSON document only needs the overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Scene that hosts the home UI (default: "HomeScreen").
    pub home_scene: SceneId,
    /// Explicit scene → UI root name mapping, consulted by `UiLookup::Declared`.
    pub scene_ui: HashMap<SceneId, String>,
    /// Lookup chain for the home UI root.
    pub home_lookup: Vec<UiLookup>,
    /// Lookup chain for a planet UI root.
    pub planet_lookup: Vec<UiLookup>,
    /// Overlapping request handling (default: reject).
    pub overlap: OverlapPolicy,
    /// Maximum pending requests under `OverlapPolicy::Queue` (default: 4).
    pub max_queued: usize,
    /// Ticks an engine operation may stay pending before the transition gives up.
    /// `None` waits forever (default: 600, ten seconds at 60 Hz).
    pub op_timeout_ticks: Option<u32>,
    /// Key code treated as the platform back key (default: 27, Escape / Android back).
    pub back_key_code: u32,
    /// Create the controller on first use, with a warning, instead of refusing requests.
    pub lazy_controller: bool,
}

pub const DEFAULT_HOME_SCENE: &str = "HomeScreen";
pub const HOME_UI_TAG: &str = "HomeUI";
pub const PLANET_UI_TAG: &str = "PlanetUI";
pub const BACK_BUTTON_NAME: &str = "BackButton";
pub const BACK_KEY_CODE: u32 = 27;

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            home_scene: SceneId::from(DEFAULT_HOME_SCENE),
            scene_ui: HashMap::new(),
            home_lookup: vec![
                UiLookup::Declared,
                UiLookup::Tag(HOME_UI_TAG.to_string()),
                UiLookup::RootNameContains(vec!["UI".to_string(), "Canvas".to_string()]),
            ],
            planet_lookup: vec![
                UiLookup::Declared,
                UiLookup::Tag(PLANET_UI_TAG.to_string()),
                UiLookup::BackControlRoot,
                UiLookup::NamedParent(BACK_BUTTON_NAME.to_string()),
            ],
            overlap: OverlapPolicy::Reject,
            max_queued: 4,
            op_timeout_ticks: Some(600),
            back_key_code: BACK_KEY_CODE,
            lazy_controller: false,
        }
    }
}

impl NavConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> NavResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declare the UI root object name for a scene.
    pub fn with_scene_ui(mut self, scene: impl Into<SceneId>, root: impl Into<String>) -> Self {
        self.scene_ui.insert(scene.into(), root.into());
        self
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_timeout(mut self, ticks: Option<u32>) -> Self {
        self.op_timeout_ticks = ticks;
        self
    }

    /// The first tag in the home lookup chain, used to re-acquire the home UI
    /// when the home scene finishes loading.
    pub fn home_tag(&self) -> Option<&str> {
        self.home_lookup.iter().find_map(|step| match step {
            UiLookup::Tag(tag) => Some(tag.as_str()),
            _ => None,
        })
    }
}
