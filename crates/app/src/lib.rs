//! # devreg-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** that storage adapters implement:
//!   - `DeviceRepository` — create, list, get, update, delete for devices
//! - Define the **driving port** as a use-case struct:
//!   - `DeviceService` — the five registry operations, mapping absent
//!     records to `NotFoundError`
//!
//! ## Dependency rule
//! Depends on `devreg-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
