//! In-memory implementation of [`DeviceRepository`].

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use devreg_app::ports::DeviceRepository;
use devreg_domain::device::{Device, DeviceAttributes};
use devreg_domain::error::RegistryError;
use devreg_domain::id::DeviceId;

/// Collection state guarded as a single unit.
#[derive(Debug)]
struct Registry {
    /// `None` once the last representable id has been handed out.
    next_id: Option<DeviceId>,
    devices: Vec<Device>,
}

impl Registry {
    fn position(&self, id: DeviceId) -> Option<usize> {
        self.devices.iter().position(|device| device.id == id)
    }
}

/// Device repository kept entirely in process memory.
///
/// Devices are stored in insertion order and looked up by linear scan. One
/// [`Mutex`] guards both the list and the id counter, so every operation is
/// serialized against every other one. The lock is never held across an
/// `.await`.
#[derive(Debug)]
pub struct InMemoryDeviceRepository {
    inner: Mutex<Registry>,
}

impl Default for InMemoryDeviceRepository {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Registry {
                next_id: Some(DeviceId::FIRST),
                devices: Vec::new(),
            }),
        }
    }
}

impl InMemoryDeviceRepository {
    /// Create an empty repository whose first device will get id `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn starting_at(next_id: DeviceId) -> Self {
        let repo = Self::default();
        repo.lock().next_id = Some(next_id);
        repo
    }

    // Every mutation is a single Vec operation, so a panic elsewhere while
    // the guard was held cannot leave the registry half-updated.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("recovering poisoned device registry lock");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl DeviceRepository for InMemoryDeviceRepository {
    fn create(
        &self,
        attributes: DeviceAttributes,
    ) -> impl Future<Output = Result<Device, RegistryError>> + Send {
        let mut registry = self.lock();
        let result = match registry.next_id {
            Some(id) => {
                let device = Device::new(id, attributes);
                registry.next_id = id.next();
                registry.devices.push(device.clone());
                Ok(device)
            }
            None => Err(RegistryError::IdsExhausted),
        };
        drop(registry);
        async { result }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, RegistryError>> + Send {
        let registry = self.lock();
        let result = registry.devices.iter().find(|d| d.id == id).cloned();
        drop(registry);
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, RegistryError>> + Send {
        let result = self.lock().devices.clone();
        async { Ok(result) }
    }

    fn update(
        &self,
        id: DeviceId,
        attributes: DeviceAttributes,
    ) -> impl Future<Output = Result<Option<Device>, RegistryError>> + Send {
        let mut registry = self.lock();
        let result = registry.position(id).map(|index| {
            let slot = &mut registry.devices[index];
            slot.attributes = attributes;
            slot.clone()
        });
        drop(registry);
        async { Ok(result) }
    }

    fn delete(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, RegistryError>> + Send {
        let mut registry = self.lock();
        let result = registry
            .position(id)
            .map(|index| registry.devices.remove(index));
        drop(registry);
        async { Ok(result) }
    }
}
