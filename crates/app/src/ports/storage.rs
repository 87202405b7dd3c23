//! Storage port — repository trait for the device collection.

use std::future::Future;

use devreg_domain::device::{Device, DeviceAttributes};
use devreg_domain::error::RegistryError;
use devreg_domain::id::DeviceId;

/// Repository holding the ordered device collection and its id counter.
///
/// Every method must behave atomically with respect to every other method:
/// implementations serialize access so that at most one operation observes or
/// mutates the collection at a time.
pub trait DeviceRepository {
    /// Assign the next sequential id, append the device and return it.
    /// Fails with [`RegistryError::IdsExhausted`] rather than reuse an id.
    fn create(
        &self,
        attributes: DeviceAttributes,
    ) -> impl Future<Output = Result<Device, RegistryError>> + Send;

    /// Get a device by its identifier.
    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, RegistryError>> + Send;

    /// Get all devices in insertion order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, RegistryError>> + Send;

    /// Replace the attributes of an existing device in place, keeping its id
    /// and position. Returns `None` when no device has `id`.
    fn update(
        &self,
        id: DeviceId,
        attributes: DeviceAttributes,
    ) -> impl Future<Output = Result<Option<Device>, RegistryError>> + Send;

    /// Remove a device, preserving the order of the remaining ones.
    /// Returns the removed device, or `None` when no device has `id`.
    fn delete(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, RegistryError>> + Send;
}
