use log::debug;
use crate::api::types::SceneId;

/// Input events the navigation layer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavInput {
    /// The planet view's back control was activated.
    Back,
    /// The home control was activated (full reset).
    Home,
    /// A planet button was activated.
    Planet(SceneId),
    /// A platform key was pressed. Only the configured back key does anything.
    KeyDown { key_code: u32 },
}

/// Events pushed by UI bindings and the platform layer between ticks.
///
/// `NavRunner::tick` takes the whole batch at once, so one tick handles
/// everything that arrived since the previous one, in arrival order.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: Vec<NavInput>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: NavInput) {
        debug!("input: {:?}", event);
        self.pending.push(event);
    }

    /// Everything pushed since the last batch was taken.
    pub fn take_batch(&mut self) -> Vec<NavInput> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
