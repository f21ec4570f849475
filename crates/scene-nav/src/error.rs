use crate::api::types::{SceneId, UiRole};

/// Errors raised by the navigation layer.
///
/// None of these are fatal: request-time errors are returned to the caller,
/// errors raised mid-transition are logged and collected on the controller.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// A request arrived while no controller is registered.
    #[error("no navigation controller is registered")]
    MissingController,

    /// A UI root lookup came up empty.
    #[error("{role} UI not found after loading {scene}; tag its root or declare it in scene_ui")]
    MissingUi { role: UiRole, scene: SceneId },

    /// A request arrived while another transition is running.
    #[error("a scene transition is already in flight")]
    TransitionInFlight,

    /// The engine reported a failed load or unload.
    #[error("{op} of scene {scene} failed: {reason}")]
    SceneOp {
        scene: SceneId,
        op: SceneOpKind,
        reason: String,
    },

    /// An engine operation did not complete in time.
    #[error("{op} of scene {scene} did not complete within {ticks} ticks")]
    Timeout {
        scene: SceneId,
        op: SceneOpKind,
        ticks: u32,
    },

    /// Configuration or catalog JSON could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Which kind of engine operation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOpKind {
    Load,
    Unload,
}

impl std::fmt::Display for SceneOpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneOpKind::Load => f.write_str("load"),
            SceneOpKind::Unload => f.write_str("unload"),
        }
    }
}

pub type NavResult<T> = Result<T, NavError>;
