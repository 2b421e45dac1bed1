//! Inventory backend API client.
//!
//! Provides typed access to the external inventory backend that owns all
//! persistence: zones and their structural configuration, bin occupancy,
//! stocked items, item moves, and cycle-count records.
//!
//! # Architecture
//!
//! - REST/JSON over `reqwest`, bearer-token auth, tenant scoping via
//!   `X-Tenant-Id`
//! - One module per concern: `zones`, `stock`, `cycles`
//! - Typed deserialization into `stockyard-core` domain types at the
//!   boundary; structural invariants (e.g. unique aisle numbers) are
//!   validated here so downstream derivation code can trust its inputs
//!
//! The backend owns consistency and transactional integrity. This client
//! performs no retries; failures propagate once to the caller.

pub mod client;
pub mod cycles;
pub mod stock;
pub mod zones;

pub use client::InventoryClient;
pub use cycles::{CompleteCycleOutcome, StartCycleOutcome};

use thiserror::Error;

/// Errors that can occur when interacting with the inventory backend.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Backend data violates a structural invariant.
    #[error("Invalid backend data: {0}")]
    InvalidData(String),
}
