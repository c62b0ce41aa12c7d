//! Panel driver implementations
//!
//! This crate provides the concrete frame sink for telecine-core, written
//! against the telecine-hal traits:
//!
//! - ST7789 command protocol (reset, init tables, addressing window)
//! - Chunked pixel transfer sized to the bus limit

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod st7789;
pub mod transfer;

pub use st7789::St7789;
