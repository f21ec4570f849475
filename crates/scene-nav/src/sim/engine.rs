use std::collections::{HashMap, HashSet};
use log::debug;
use crate::api::host::{SceneLoader, SessionControl, UiRegistry};
use crate::api::types::{LoadMode, OpId, OpStatus, RootObject, SceneId, SceneLoaded, UiHandle};
use super::catalog::SceneCatalog;

/// A UI object living in a loaded scene.
#[derive(Debug, Clone)]
pub struct UiObject {
    pub handle: UiHandle,
    pub name: String,
    pub tag: Option<String>,
    pub scene: SceneId,
    pub parent: Option<UiHandle>,
    /// Own active flag. Visibility also depends on the parents.
    pub active: bool,
    pub back_control: bool,
}

/// A call made against the loader, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderCall {
    Load(SceneId, LoadMode),
    Unload(SceneId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpAction {
    Load(LoadMode),
    Unload,
}

#[derive(Debug, Clone)]
struct SimOp {
    scene: SceneId,
    action: OpAction,
    remaining: u32,
}

/// In-memory headless engine.
///
/// Scene contents come from a `SceneCatalog`. Operations complete after
/// `latency` pending polls. UI objects are stored in a flat Vec, which is
/// plenty for the handful of roots a navigation flow touches.
pub struct SimEngine {
    catalog: SceneCatalog,
    objects: Vec<UiObject>,
    loaded: Vec<SceneId>,
    ops: HashMap<OpId, SimOp>,
    stalled: HashSet<SceneId>,
    loaded_events: Vec<SceneLoaded>,
    calls: Vec<LoaderCall>,
    /// `Some(enabled)` when an AR session exists.
    session: Option<bool>,
    latency: u32,
    next_op: u32,
    next_handle: u32,
}

impl SimEngine {
    pub fn new(catalog: SceneCatalog) -> Self {
        Self {
            catalog,
            objects: Vec::with_capacity(32),
            loaded: Vec::new(),
            ops: HashMap::new(),
            stalled: HashSet::new(),
            loaded_events: Vec::new(),
            calls: Vec::new(),
            session: None,
            latency: 1,
            next_op: 1,
            next_handle: 1,
        }
    }

    /// Number of pending polls before an operation completes (default: 1).
    pub fn with_latency(mut self, latency: u32) -> Self {
        self.latency = latency;
        self
    }

    /// Give the engine a running AR session.
    pub fn with_session(mut self) -> Self {
        self.session = Some(true);
        self
    }

    /// Load a scene immediately, as the engine does for the startup scene.
    pub fn boot(&mut self, scene: impl Into<SceneId>) -> bool {
        let scene = scene.into();
        let ok = self.apply_load(&scene, LoadMode::Exclusive).is_ok();
        if ok {
            // The startup scene's own notification fires before anyone subscribes.
            self.loaded_events.clear();
        }
        ok
    }

    /// Keep operations on this scene pending until `release` is called.
    pub fn stall(&mut self, scene: impl Into<SceneId>) {
        self.stalled.insert(scene.into());
    }

    pub fn release(&mut self, scene: &SceneId) {
        self.stalled.remove(scene);
    }

    /// Unload a scene immediately, outside any operation. Stands in for other
    /// code tearing a scene down.
    pub fn unload_now(&mut self, scene: &SceneId) -> bool {
        self.apply_unload(scene).is_ok()
    }

    // -- Inspection --

    pub fn loaded_scenes(&self) -> &[SceneId] {
        &self.loaded
    }

    pub fn calls(&self) -> &[LoaderCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Operations started and not yet finished.
    pub fn pending_ops(&self) -> usize {
        self.ops.len()
    }

    /// Number of additive loads issued for a scene.
    pub fn additive_loads(&self, scene: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, LoaderCall::Load(s, LoadMode::Additive) if s.as_str() == scene))
            .count()
    }

    pub fn session_enabled(&self) -> Option<bool> {
        self.session
    }

    /// Handle of the first object with this name, visible or not.
    pub fn handle_of(&self, name: &str) -> Option<UiHandle> {
        self.objects.iter().find(|o| o.name == name).map(|o| o.handle)
    }

    /// Whether the object is visible, taking its parents into account.
    pub fn is_visible(&self, handle: UiHandle) -> bool {
        self.index_of(handle)
            .map(|idx| self.active_in_hierarchy(idx))
            .unwrap_or(false)
    }

    /// Visibility of the first object with this name. `None` if no such object exists.
    pub fn visible_by_name(&self, name: &str) -> Option<bool> {
        self.handle_of(name).map(|h| self.is_visible(h))
    }

    pub fn object(&self, handle: UiHandle) -> Option<&UiObject> {
        self.objects.iter().find(|o| o.handle == handle)
    }

    // -- Internals --

    fn index_of(&self, handle: UiHandle) -> Option<usize> {
        self.objects.iter().position(|o| o.handle == handle)
    }

    fn active_in_hierarchy(&self, mut idx: usize) -> bool {
        loop {
            let obj = &self.objects[idx];
            if !obj.active {
                return false;
            }
            match obj.parent.and_then(|p| self.index_of(p)) {
                Some(parent) => idx = parent,
                None => return true,
            }
        }
    }

    fn root_of(&self, handle: UiHandle) -> UiHandle {
        let mut current = handle;
        while let Some(parent) = self.object(current).and_then(|o| o.parent) {
            current = parent;
        }
        current
    }

    fn find_visible(&self, pred: impl Fn(&UiObject) -> bool) -> Option<UiHandle> {
        self.objects
            .iter()
            .enumerate()
            .find(|&(idx, o)| pred(o) && self.active_in_hierarchy(idx))
            .map(|(_, o)| o.handle)
    }

    fn next_handle(&mut self) -> UiHandle {
        let handle = UiHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn remove_scene(&mut self, scene: &SceneId) {
        self.objects.retain(|o| &o.scene != scene);
        self.loaded.retain(|s| s != scene);
    }

    fn apply_load(&mut self, scene: &SceneId, mode: LoadMode) -> Result<(), String> {
        let desc = match self.catalog.get(scene) {
            Some(desc) => desc.clone(),
            None => return Err(format!("scene {} is not in the catalog", scene)),
        };

        if mode == LoadMode::Exclusive {
            self.objects.clear();
            self.loaded.clear();
        } else if self.loaded.contains(scene) {
            return Ok(());
        }

        let first = self.objects.len();
        for obj in &desc.objects {
            let handle = self.next_handle();
            self.objects.push(UiObject {
                handle,
                name: obj.name.clone(),
                tag: obj.tag.clone(),
                scene: scene.clone(),
                parent: None,
                active: obj.active,
                back_control: obj.back_control,
            });
        }
        // Parents resolve by name within the freshly loaded scene.
        for (offset, obj) in desc.objects.iter().enumerate() {
            if let Some(parent_name) = &obj.parent {
                let parent = self.objects[first..]
                    .iter()
                    .find(|o| &o.name == parent_name)
                    .map(|o| o.handle);
                self.objects[first + offset].parent = parent;
            }
        }

        self.loaded.push(scene.clone());
        self.loaded_events.push(SceneLoaded { scene: scene.clone(), mode });
        debug!("sim: loaded {} ({:?}), {} objects", scene, mode, desc.objects.len());
        Ok(())
    }

    fn apply_unload(&mut self, scene: &SceneId) -> Result<(), String> {
        if !self.loaded.contains(scene) {
            return Err(format!("scene {} is not loaded", scene));
        }
        self.remove_scene(scene);
        debug!("sim: unloaded {}", scene);
        Ok(())
    }

    fn start(&mut self, scene: &SceneId, action: OpAction) -> OpId {
        let id = OpId(self.next_op);
        self.next_op += 1;
        self.ops.insert(id, SimOp {
            scene: scene.clone(),
            action,
            remaining: self.latency,
        });
        id
    }
}

impl SceneLoader for SimEngine {
    fn load(&mut self, scene: &SceneId, mode: LoadMode) -> OpId {
        self.calls.push(LoaderCall::Load(scene.clone(), mode));
        self.start(scene, OpAction::Load(mode))
    }

    fn unload(&mut self, scene: &SceneId) -> OpId {
        self.calls.push(LoaderCall::Unload(scene.clone()));
        self.start(scene, OpAction::Unload)
    }

    fn poll(&mut self, op: OpId) -> OpStatus {
        let (scene, action) = match self.ops.get_mut(&op) {
            None => return OpStatus::Failed(format!("unknown operation {:?}", op)),
            Some(entry) => {
                if entry.remaining > 0 {
                    entry.remaining -= 1;
                    return OpStatus::Pending;
                }
                (entry.scene.clone(), entry.action)
            }
        };
        if self.stalled.contains(&scene) {
            return OpStatus::Pending;
        }

        // Finished operations are dropped; polling one again reports it unknown.
        self.ops.remove(&op);
        let result = match action {
            OpAction::Load(mode) => self.apply_load(&scene, mode),
            OpAction::Unload => self.apply_unload(&scene),
        };
        match result {
            Ok(()) => OpStatus::Done,
            Err(reason) => OpStatus::Failed(reason),
        }
    }

    fn is_loaded(&self, scene: &SceneId) -> bool {
        self.loaded.contains(scene)
    }

    fn take_loaded(&mut self) -> Vec<SceneLoaded> {
        std::mem::take(&mut self.loaded_events)
    }
}

impl UiRegistry for SimEngine {
    fn find_by_tag(&self, tag: &str) -> Option<UiHandle> {
        self.find_visible(|o| o.tag.as_deref() == Some(tag))
    }

    fn find_by_name(&self, name: &str) -> Option<UiHandle> {
        self.find_visible(|o| o.name == name)
    }

    fn parent(&self, handle: UiHandle) -> Option<UiHandle> {
        self.object(handle).and_then(|o| o.parent)
    }

    fn back_control_root(&self) -> Option<UiHandle> {
        self.find_visible(|o| o.back_control).map(|h| self.root_of(h))
    }

    fn scene_roots(&self, scene: &SceneId) -> Vec<RootObject> {
        self.objects
            .iter()
            .filter(|o| &o.scene == scene && o.parent.is_none())
            .map(|o| RootObject { handle: o.handle, name: o.name.clone() })
            .collect()
    }

    fn name(&self, handle: UiHandle) -> Option<String> {
        self.object(handle).map(|o| o.name.clone())
    }

    fn set_visible(&mut self, handle: UiHandle, visible: bool) -> bool {
        match self.objects.iter_mut().find(|o| o.handle == handle) {
            Some(obj) => {
                obj.active = visible;
                true
            }
            None => false,
        }
    }
}

impl SessionControl for SimEngine {
    fn disable_session(&mut self) -> bool {
        match self.session.as_mut() {
            Some(enabled) => {
                *enabled = false;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::UiObjectDesc;

    fn catalog() -> SceneCatalog {
        let mut catalog = SceneCatalog::default();
        catalog.insert("HomeScreen", vec![UiObjectDesc::new("HomeCanvas").with_tag("HomeUI")]);
        catalog.insert("Mars", vec![
            UiObjectDesc::new("MarsOverlay").with_tag("PlanetUI"),
            UiObjectDesc::new("BackButton").with_parent("MarsOverlay").with_back_control(),
        ]);
        catalog
    }

    fn run(engine: &mut SimEngine, op: OpId) -> OpStatus {
        for _ in 0..10 {
            let status = engine.poll(op);
            if status != OpStatus::Pending {
                return status;
            }
        }
        OpStatus::Pending
    }

    #[test]
    fn additive_load_completes_after_latency() {
        let mut engine = SimEngine::new(catalog()).with_latency(2);
        engine.boot("HomeScreen");
        let mars = SceneId::from("Mars");
        let op = engine.load(&mars, LoadMode::Additive);
        assert_eq!(engine.poll(op), OpStatus::Pending);
        assert_eq!(engine.poll(op), OpStatus::Pending);
        assert_eq!(engine.poll(op), OpStatus::Done);
        assert!(engine.is_loaded(&mars));
        assert_eq!(engine.loaded_scenes().len(), 2);
        assert_eq!(engine.take_loaded().len(), 1);
    }

    #[test]
    fn hidden_parent_hides_children_from_lookup() {
        let mut engine = SimEngine::new(catalog()).with_latency(0);
        let op = engine.load(&SceneId::from("Mars"), LoadMode::Additive);
        run(&mut engine, op);
        let overlay = engine.find_by_tag("PlanetUI").unwrap();
        assert!(engine.find_by_name("BackButton").is_some());
        engine.set_visible(overlay, false);
        assert!(engine.find_by_tag("PlanetUI").is_none());
        assert!(engine.find_by_name("BackButton").is_none());
        assert!(engine.back_control_root().is_none());
    }

    #[test]
    fn unload_drops_objects_and_stale_handles() {
        let mut engine = SimEngine::new(catalog()).with_latency(0);
        let mars = SceneId::from("Mars");
        let op = engine.load(&mars, LoadMode::Additive);
        run(&mut engine, op);
        let overlay = engine.handle_of("MarsOverlay").unwrap();
        let op = engine.unload(&mars);
        assert_eq!(run(&mut engine, op), OpStatus::Done);
        assert!(!engine.is_loaded(&mars));
        assert!(!engine.set_visible(overlay, true));
    }

    #[test]
    fn exclusive_load_replaces_everything() {
        let mut engine = SimEngine::new(catalog()).with_latency(0);
        engine.boot("HomeScreen");
        let op = engine.load(&SceneId::from("Mars"), LoadMode::Additive);
        run(&mut engine, op);
        let op = engine.load(&SceneId::from("HomeScreen"), LoadMode::Exclusive);
        run(&mut engine, op);
        assert_eq!(engine.loaded_scenes(), &[SceneId::from("HomeScreen")]);
        assert!(engine.handle_of("MarsOverlay").is_none());
    }

    #[test]
    fn unknown_scene_fails() {
        let mut engine = SimEngine::new(catalog()).with_latency(0);
        let op = engine.load(&SceneId::from("Pluto"), LoadMode::Additive);
        assert!(matches!(run(&mut engine, op), OpStatus::Failed(_)));
    }

    #[test]
    fn stalled_scene_stays_pending() {
        let mut engine = SimEngine::new(catalog()).with_latency(0);
        engine.stall("Mars");
        let mars = SceneId::from("Mars");
        let op = engine.load(&mars, LoadMode::Additive);
        assert_eq!(run(&mut engine, op), OpStatus::Pending);
        engine.release(&mars);
        assert_eq!(engine.poll(op), OpStatus::Done);
    }

    #[test]
    fn finished_operations_are_dropped() {
        let mut engine = SimEngine::new(catalog()).with_latency(0);
        let mars = SceneId::from("Mars");
        let load = engine.load(&mars, LoadMode::Additive);
        let unknown = engine.load(&SceneId::from("Pluto"), LoadMode::Additive);
        assert_eq!(engine.pending_ops(), 2);

        assert_eq!(engine.poll(load), OpStatus::Done);
        assert!(matches!(engine.poll(unknown), OpStatus::Failed(_)));
        assert_eq!(engine.pending_ops(), 0);
        assert!(matches!(engine.poll(load), OpStatus::Failed(_)));
        assert!(engine.is_loaded(&mars));
    }

    #[test]
    fn unload_now_skips_the_operation_queue() {
        let mut engine = SimEngine::new(catalog());
        engine.boot("HomeScreen");
        let home = SceneId::from("HomeScreen");
        assert!(engine.unload_now(&home));
        assert!(!engine.is_loaded(&home));
        assert!(!engine.unload_now(&home));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn session_disable() {
        let mut engine = SimEngine::new(catalog());
        assert!(!engine.disable_session());
        let mut engine = SimEngine::new(catalog()).with_session();
        assert!(engine.disable_session());
        assert_eq!(engine.session_enabled(), Some(false));
    }
}
