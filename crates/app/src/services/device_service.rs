//! Device service — use-cases for managing devices.

use devreg_domain::device::{Device, DeviceAttributes};
use devreg_domain::error::{NotFoundError, RegistryError};
use devreg_domain::id::DeviceId;

use crate::ports::DeviceRepository;

fn not_found(id: DeviceId) -> RegistryError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}

/// Application service for device CRUD operations.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new device under the next sequential id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdsExhausted`] when no id is left to assign.
    #[tracing::instrument(skip(self, attributes), fields(brand = %attributes.brand, model = %attributes.model))]
    pub async fn create_device(&self, attributes: DeviceAttributes) -> Result<Device, RegistryError> {
        let device = self.repo.create(attributes).await?;
        tracing::debug!(device_id = %device.id, "device created");
        Ok(device)
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no device with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: DeviceId) -> Result<Device, RegistryError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// List all devices in the order they were created.
    ///
    /// # Errors
    ///
    /// Returns an error propagated from the repository.
    pub async fn list_devices(&self) -> Result<Vec<Device>, RegistryError> {
        self.repo.get_all().await
    }

    /// Replace every attribute of an existing device. The id never changes.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no device with `id` exists.
    #[tracing::instrument(skip(self, attributes))]
    pub async fn update_device(
        &self,
        id: DeviceId,
        attributes: DeviceAttributes,
    ) -> Result<Device, RegistryError> {
        let device = self
            .repo
            .update(id, attributes)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::debug!(device_id = %device.id, "device updated");
        Ok(device)
    }

    /// Delete a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no device with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn delete_device(&self, id: DeviceId) -> Result<(), RegistryError> {
        self.repo.delete(id).await?.ok_or_else(|| not_found(id))?;
        tracing::debug!(device_id = %id, "device deleted");
        Ok(())
    }
}
