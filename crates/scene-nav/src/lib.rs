pub mod api;
pub mod core;
pub mod error;
pub mod input;
pub mod runner;
#[cfg(feature = "sim")]
pub mod sim;

// Re-export key types at crate root for convenience
pub use api::config::{NavConfig, OverlapPolicy, UiLookup};
pub use api::host::{Host, SceneLoader, SessionControl, UiRegistry};
pub use api::types::{LoadMode, OpId, OpStatus, RootObject, SceneId, SceneLoaded, UiHandle, UiRole};
pub use crate::core::controller::{Accepted, InstanceId, NavigationController, Phase};
pub use crate::core::resolve::resolve_ui;
pub use crate::core::slot::{ControllerSlot, Initialized};
pub use crate::core::transition::{NavigationState, Request};
pub use error::{NavError, NavResult, SceneOpKind};
pub use input::queue::{InputQueue, NavInput};
pub use input::triggers::requests_for_tick;
pub use runner::NavRunner;

#[cfg(feature = "sim")]
pub use sim::{LoaderCall, SceneCatalog, SimEngine, UiObjectDesc};
