pub mod controller;
pub mod resolve;
pub mod slot;
pub mod transition;
