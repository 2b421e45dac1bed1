//! Stockyard Core - Shared types library.
//!
//! This crate provides common types used across all Stockyard components:
//! - `server` - Warehouse back-office service
//! - `cli` - Command-line tools for fixtures and zone-map rendering
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients,
//! no backend calls. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, bin addresses, status enums, and the warehouse
//!   domain model (zones, bins, items, cycles, counts)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
