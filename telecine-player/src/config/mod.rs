//! Configuration loading
//!
//! Layers, later ones winning: built-in defaults, the TOML file,
//! environment variables, command-line flags. The result is validated
//! once before any hardware is opened.

pub mod env;
pub mod loader;

pub use env::apply_env;
pub use loader::{load_file, LoadError, DEFAULT_CONFIG_PATH};
