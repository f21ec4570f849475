//! Engine-facing contracts.
//!
//! The navigation layer never touches scenes or UI objects directly. The host
//! engine implements these traits; `sim::SimEngine` is the in-memory version
//! used by tests and the demo.

use super::types::{LoadMode, OpId, OpStatus, RootObject, SceneId, SceneLoaded, UiHandle};

/// Asynchronous scene loading and unloading.
pub trait SceneLoader {
    /// Begin loading a scene. Completion is observed through `poll`.
    fn load(&mut self, scene: &SceneId, mode: LoadMode) -> OpId;

    /// Begin unloading a scene. Completion is observed through `poll`.
    fn unload(&mut self, scene: &SceneId) -> OpId;

    /// Check the progress of an operation started by `load` or `unload`.
    fn poll(&mut self, op: OpId) -> OpStatus;

    /// Whether the scene is currently loaded.
    fn is_loaded(&self, scene: &SceneId) -> bool;

    /// Drain "scene loaded" notifications raised since the last call.
    fn take_loaded(&mut self) -> Vec<SceneLoaded> {
        Vec::new()
    }
}

/// Lookup and visibility of UI root objects.
pub trait UiRegistry {
    /// First visible object carrying the tag. Hidden objects are not found.
    fn find_by_tag(&self, tag: &str) -> Option<UiHandle>;

    /// First visible object with the exact name.
    fn find_by_name(&self, name: &str) -> Option<UiHandle>;

    /// Parent object, if the object is not a root.
    fn parent(&self, handle: UiHandle) -> Option<UiHandle>;

    /// Root object of the first visible back-navigation control.
    fn back_control_root(&self) -> Option<UiHandle>;

    /// Root objects of a loaded scene, visible or not.
    fn scene_roots(&self, scene: &SceneId) -> Vec<RootObject>;

    /// Object name, if the handle is still alive.
    fn name(&self, handle: UiHandle) -> Option<String>;

    /// Show or hide an object. Returns false if the handle is stale.
    fn set_visible(&mut self, handle: UiHandle, visible: bool) -> bool;
}

/// Control over the AR session, if the host has one.
pub trait SessionControl {
    /// Disable the AR session. Returns false when no session exists.
    fn disable_session(&mut self) -> bool {
        false
    }
}

/// Everything the navigation layer needs from the host engine.
pub trait Host: SceneLoader + UiRegistry + SessionControl {}

impl<T: SceneLoader + UiRegistry + SessionControl> Host for T {}
