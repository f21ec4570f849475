// sim/mod.rs
//
// In-memory headless engine implementing the host traits.
// Used by the test suites and the planet-tour demo; real hosts bring their own.

pub mod catalog;
pub mod engine;

pub use catalog::{SceneCatalog, SceneDesc, UiObjectDesc};
pub use engine::{LoaderCall, SimEngine, UiObject};
