use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::api::types::SceneId;
use crate::error::NavResult;

/// Scene catalog for the in-memory engine: which UI objects each scene contains.
/// Loaded from a JSON file or built in code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneCatalog {
    /// Scene name → contents.
    #[serde(default)]
    pub scenes: HashMap<SceneId, SceneDesc>,
}

/// Contents of one scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDesc {
    /// UI objects, parents listed before their children.
    #[serde(default)]
    pub objects: Vec<UiObjectDesc>,
}

/// Describes one UI object inside a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiObjectDesc {
    /// Object name (e.g., "BackButton").
    pub name: String,
    /// Optional tag (e.g., "PlanetUI").
    #[serde(default)]
    pub tag: Option<String>,
    /// Name of the parent object in the same scene. Absent for root objects.
    #[serde(default)]
    pub parent: Option<String>,
    /// Whether the object starts visible (default: true).
    #[serde(default = "default_active")]
    pub active: bool,
    /// Whether the object carries the back-navigation control.
    #[serde(default)]
    pub back_control: bool,
}

fn default_active() -> bool {
    true
}

impl UiObjectDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            parent: None,
            active: true,
            back_control: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_back_control(mut self) -> Self {
        self.back_control = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.active = false;
        self
    }
}

impl SceneCatalog {
    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> NavResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add or replace a scene.
    pub fn insert(&mut self, scene: impl Into<SceneId>, objects: Vec<UiObjectDesc>) {
        self.scenes.insert(scene.into(), SceneDesc { objects });
    }

    pub fn get(&self, scene: &SceneId) -> Option<&SceneDesc> {
        self.scenes.get(scene)
    }

    pub fn contains(&self, scene: &SceneId) -> bool {
        self.scenes.contains_key(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_catalog() {
        let json = r#"{
            "scenes": {
                "HomeScreen": { "objects": [ { "name": "HomeCanvas", "tag": "HomeUI" } ] },
                "Mars": {
                    "objects": [
                        { "name": "MarsOverlay" },
                        { "name": "BackButton", "parent": "MarsOverlay", "back_control": true },
                        { "name": "Legend", "parent": "MarsOverlay", "active": false }
                    ]
                },
                "Empty": {}
            }
        }"#;
        let catalog = SceneCatalog::from_json(json).unwrap();
        assert_eq!(catalog.scenes.len(), 3);

        let home = catalog.get(&SceneId::from("HomeScreen")).unwrap();
        assert_eq!(home.objects[0].tag.as_deref(), Some("HomeUI"));
        assert!(home.objects[0].active);

        let mars = catalog.get(&SceneId::from("Mars")).unwrap();
        assert_eq!(mars.objects[1].parent.as_deref(), Some("MarsOverlay"));
        assert!(mars.objects[1].back_control);
        assert!(!mars.objects[2].active);

        assert!(catalog.get(&SceneId::from("Empty")).unwrap().objects.is_empty());
    }

    #[test]
    fn unknown_scene_is_absent() {
        let catalog = SceneCatalog::default();
        assert!(!catalog.contains(&SceneId::from("Pluto")));
    }
}
