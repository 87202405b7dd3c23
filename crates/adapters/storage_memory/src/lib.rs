//! # devreg-adapter-storage-memory
//!
//! Process-memory persistence adapter.
//!
//! ## Responsibilities
//! - Implement the [`DeviceRepository`](devreg_app::ports::DeviceRepository)
//!   port defined in `devreg-app::ports::storage`
//! - Own the insertion-ordered device list and the id counter behind one lock
//!
//! Nothing survives a restart.
//!
//! ## Dependency rule
//! Depends on `devreg-app` (for port traits) and `devreg-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod device_repo;

pub use device_repo::InMemoryDeviceRepository;
