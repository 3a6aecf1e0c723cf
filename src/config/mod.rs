//! Configuration loading and layering
//!
//! Handles loading from config files and environment variables with proper
//! precedence (CLI > Env > File > Defaults). CLI flags are applied by the
//! command handlers on top of the value returned here.

pub mod loader;

pub use loader::{load_config, ENV_PREFIX};
