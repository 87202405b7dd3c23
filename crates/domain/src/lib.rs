//! # devreg-domain
//!
//! Pure domain model for the device registry.
//!
//! ## Responsibilities
//! - Foundational types: the sequential [`DeviceId`](id::DeviceId) and the
//!   error conventions shared by every layer
//! - Define the **Device** record and its client-controlled attributes
//! - Decode device payloads from JSON, reporting failures as
//!   [`DecodeError`](error::DecodeError)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod device;
