//! Configuration types
//!
//! Board-agnostic configuration structures, deserialized from TOML by the
//! player binary when the `serde` feature is enabled.

pub mod hardware;
pub mod panel;
pub mod types;

pub use hardware::*;
pub use panel::*;
pub use types::*;
