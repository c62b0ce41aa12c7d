//! Telecine Hardware Abstraction Layer
//!
//! This crate defines the capability traits the panel driver and the
//! playback loop are written against. Platform crates implement them;
//! nothing here touches real hardware, so every consumer can be tested
//! with in-memory mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  telecine-player (binary)               │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  telecine-core / telecine-drivers       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  telecine-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ telecine-hal- │
//!             │     linux     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`spi::SpiBus`] - Bus Transport (write-only SPI master)
//! - [`gpio::OutputPin`] - Control-Line Driver (D/C, RST, backlight)
//! - [`clock::Clock`] - Monotonic time and blocking sleeps

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use gpio::{Level, OutputPin};
pub use spi::{SpiBus, SpiConfig};
