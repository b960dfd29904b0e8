//! Mock device provider.

use std::sync::{Arc, PoisonError, RwLock};

use monika_app::ports::DeviceProvider;
use monika_domain::device::Device;
use monika_domain::error::MonikaError;
use monika_domain::kind::DeviceType;

/// Produces `count` bare devices of one type, named `Mock Device {n}`.
pub struct MockProvider {
    device_type: DeviceType,
    count: usize,
    devices: RwLock<Vec<Arc<Device>>>,
}

impl MockProvider {
    #[must_use]
    pub fn new(device_type: DeviceType, count: usize) -> Self {
        Self {
            device_type,
            count,
            devices: RwLock::new(Vec::new()),
        }
    }
}

impl DeviceProvider for MockProvider {
    fn device_type(&self) -> DeviceType {
        self.device_type
    }

    async fn fetch_devices(&self) -> Result<(), MonikaError> {
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        if devices.is_empty() {
            devices.extend((0..self.count).map(|n| {
                Arc::new(Device::new(
                    n.to_string(),
                    self.device_type,
                    format!("Mock Device {n}"),
                ))
            }));
            tracing::info!(count = devices.len(), device_type = %self.device_type, "mock devices created");
        }
        Ok(())
    }

    fn devices(&self) -> Vec<Arc<Device>> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_create_requested_number_of_devices() {
        let provider = MockProvider::new(DeviceType::GenericDummy, 3);

        provider.fetch_devices().await.unwrap();

        let devices = provider.devices();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[2].id(), "2");
        assert_eq!(devices[2].name(), "Mock Device 2");
        assert_eq!(devices[0].kind(), DeviceType::GenericDummy);
    }

    #[tokio::test]
    async fn should_return_same_instances_on_every_call() {
        let provider = MockProvider::new(DeviceType::GenericDummy, 2);
        provider.fetch_devices().await.unwrap();

        let first = provider.devices();
        let second = provider.devices();

        assert!(Arc::ptr_eq(&first[0], &second[0]));
        assert!(Arc::ptr_eq(&first[1], &second[1]));
    }

    #[tokio::test]
    async fn should_not_duplicate_devices_when_fetched_twice() {
        let provider = MockProvider::new(DeviceType::RiedelFusion, 2);
        provider.fetch_devices().await.unwrap();
        provider.fetch_devices().await.unwrap();
        assert_eq!(provider.devices().len(), 2);
    }

    #[test]
    fn should_be_empty_before_fetch() {
        let provider = MockProvider::new(DeviceType::GenericDummy, 2);
        assert!(provider.devices().is_empty());
        assert_eq!(provider.device_type(), DeviceType::GenericDummy);
    }
}
