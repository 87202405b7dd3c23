//! # devreg-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** for the device collection
//!   (`/devices`, `/devices/{id}`) plus a `/health` probe
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and [`RegistryError`](devreg_domain::error::RegistryError)
//!   into HTTP responses
//!
//! ## Dependency rule
//! Depends on `devreg-app` (for port traits and services) and `devreg-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
