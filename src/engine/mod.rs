//! Engine controller: foreground search and the ponder worker lifecycle.

mod controller;

pub use controller::{Engine, EngineConfig};
