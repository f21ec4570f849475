use log::{error, info, warn};
use crate::api::config::NavConfig;
use crate::core::controller::{InstanceId, NavigationController};
use crate::error::{NavError, NavResult};

/// Outcome of `ControllerSlot::initialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialized {
    /// The new instance is now the active controller.
    Registered(InstanceId),
    /// Another instance was already active; the new one was destroyed at once.
    Duplicate(InstanceId),
}

/// Holds the one live navigation controller.
///
/// Owned by whoever drives the frame loop (usually `NavRunner`) and handed to
/// triggers by reference. Replaces a process-wide singleton: duplicates are
/// refused and destroyed, teardown only clears the slot for its own instance.
pub struct ControllerSlot {
    active: Option<NavigationController>,
    next_instance: u32,
}

impl ControllerSlot {
    pub fn new() -> Self {
        Self {
            active: None,
            next_instance: 1,
        }
    }

    fn next_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    /// Create a controller and register it, unless one is already live.
    pub fn initialize(&mut self, config: NavConfig) -> Initialized {
        let id = self.next_id();
        if let Some(active) = &self.active {
            info!("duplicate controller {:?} found, destroying it (active is {:?})", id, active.id());
            return Initialized::Duplicate(id);
        }
        let mut controller = NavigationController::new(id, config);
        controller.subscribe();
        info!("controller {:?} registered", id);
        self.active = Some(controller);
        Initialized::Registered(id)
    }

    /// The live controller, or `MissingController` (logged) if there is none.
    pub fn active_mut(&mut self) -> NavResult<&mut NavigationController> {
        match self.active.as_mut() {
            Some(controller) => Ok(controller),
            None => {
                error!("no navigation controller registered; initialize one with the home scene");
                Err(NavError::MissingController)
            }
        }
    }

    pub fn active(&self) -> Option<&NavigationController> {
        self.active.as_ref()
    }

    /// The live controller, if any, without logging.
    pub fn get_mut(&mut self) -> Option<&mut NavigationController> {
        self.active.as_mut()
    }

    /// The live controller, creating an emergency one with a warning if the slot is empty.
    pub fn get_or_create(&mut self, config: &NavConfig) -> &mut NavigationController {
        self.active.get_or_insert_with(|| {
            let id = InstanceId(self.next_instance);
            self.next_instance += 1;
            warn!("controller accessed before initialization, creating emergency instance {:?}", id);
            let mut controller = NavigationController::new(id, config.clone());
            controller.subscribe();
            controller
        })
    }

    /// Destroy an instance. Clears the slot and unsubscribes only if it is the live one.
    pub fn teardown(&mut self, id: InstanceId) -> bool {
        if self.active.as_ref().map(|c| c.id()) != Some(id) {
            return false;
        }
        if let Some(mut controller) = self.active.take() {
            controller.unsubscribe();
        }
        info!("controller {:?} torn down", id);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }
}

impl Default for ControllerSlot {
    fn default() -> Self {
        Self::new()
    }
}
