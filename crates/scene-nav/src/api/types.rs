use std::fmt;
use serde::{Deserialize, Serialize};

/// Name of a loadable scene unit (e.g. "HomeScreen", "Mars").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for SceneId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Weak handle to an engine-owned UI root object.
/// The navigation layer only toggles visibility through it; it never owns the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UiHandle(pub u32);

/// Handle to an in-flight asynchronous scene operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpId(pub u32);

/// How a scene is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Load on top of whatever is already loaded.
    Additive,
    /// Unload everything, then load this scene alone.
    Exclusive,
}

/// Progress of an asynchronous scene operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpStatus {
    Pending,
    Done,
    Failed(String),
}

/// Notification that a scene finished loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLoaded {
    pub scene: SceneId,
    pub mode: LoadMode,
}

/// Which UI root a lookup or report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiRole {
    Home,
    Planet,
}

impl fmt::Display for UiRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiRole::Home => f.write_str("home"),
            UiRole::Planet => f.write_str("planet"),
        }
    }
}

/// A root object of a loaded scene, as reported by the UI registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootObject {
    pub handle: UiHandle,
    pub name: String,
}
