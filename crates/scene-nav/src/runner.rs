use log::{debug, info};
use crate::api::config::NavConfig;
use crate::api::host::Host;
use crate::core::controller::{InstanceId, NavigationController};
use crate::core::slot::{ControllerSlot, Initialized};
use crate::error::{NavError, NavResult};
use crate::input::queue::{InputQueue, NavInput};
use crate::input::triggers::requests_for_tick;

/// Frame-driven runner that wires the host engine, the input queue and the
/// controller slot together.
///
/// Call `tick` once per frame: queued input becomes controller requests, the
/// running transition advances, and scene-loaded notifications are delivered.
pub struct NavRunner<H: Host> {
    host: H,
    slot: ControllerSlot,
    input: InputQueue,
    config: NavConfig,
    frame: u64,
}

impl<H: Host> NavRunner<H> {
    pub fn new(host: H, config: NavConfig) -> Self {
        Self {
            host,
            slot: ControllerSlot::new(),
            input: InputQueue::new(),
            config,
            frame: 0,
        }
    }

    /// Register a controller with the runner's configuration.
    /// Calling it again is harmless: the extra instance is destroyed.
    pub fn init(&mut self) -> Initialized {
        self.slot.initialize(self.config.clone())
    }

    /// Destroy a controller instance; only the live one clears the slot.
    pub fn teardown(&mut self, id: InstanceId) -> bool {
        self.slot.teardown(id)
    }

    /// Push an input event; it is handled on the next tick.
    pub fn push_input(&mut self, event: NavInput) {
        self.input.push(event);
    }

    /// Run one scheduling tick.
    pub fn tick(&mut self) {
        self.frame += 1;

        let events = self.input.take_batch();
        for request in requests_for_tick(&events, self.config.back_key_code) {
            // Rejections are logged where they happen; the UI layer never sees a fault.
            if let Ok(controller) = self.controller_for_request() {
                match controller.request(request) {
                    Ok(accepted) => debug!("input request {:?}", accepted),
                    Err(err) => debug!("input request dropped: {}", err),
                }
            }
        }

        if let Some(controller) = self.slot.get_mut() {
            controller.tick(&mut self.host);
        }

        for loaded in self.host.take_loaded() {
            match self.slot.get_mut() {
                Some(controller) => controller.on_scene_loaded(&self.host, &loaded.scene, loaded.mode),
                None => debug!("scene {} loaded with no controller registered", loaded.scene),
            }
        }
    }

    /// Tick until no transition is in flight, or `max_ticks` runs out.
    /// Returns the number of ticks taken, or `None` if still busy.
    pub fn run_until_idle(&mut self, max_ticks: u32) -> Option<u32> {
        for n in 1..=max_ticks {
            self.tick();
            let busy = self.slot.active().map_or(false, |c| c.is_busy());
            if !busy && self.input.is_empty() {
                info!("idle after {} ticks", n);
                return Some(n);
            }
        }
        None
    }

    fn controller_for_request(&mut self) -> NavResult<&mut NavigationController> {
        if self.config.lazy_controller {
            Ok(self.slot.get_or_create(&self.config))
        } else {
            self.slot.active_mut()
        }
    }

    pub fn controller(&self) -> Option<&NavigationController> {
        self.slot.active()
    }

    pub fn controller_mut(&mut self) -> Result<&mut NavigationController, NavError> {
        self.slot.active_mut()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
