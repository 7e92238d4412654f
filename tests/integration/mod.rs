//! Integration test modules for ugenwrap
//!
//! - realtime: streaming clients as host units
//! - nonrealtime: batch clients as async commands
//! - loader: registration through `PluginLoader`

pub mod loader;
pub mod realtime;
