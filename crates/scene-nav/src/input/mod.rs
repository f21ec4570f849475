pub mod queue;
pub mod triggers;
