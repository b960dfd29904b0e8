//! Device provider port — where a driver's devices come from.

use std::future::Future;
use std::sync::Arc;

use monika_domain::device::Device;
use monika_domain::error::MonikaError;
use monika_domain::kind::DeviceType;

/// Source of the devices a driver is responsible for (an inventory system,
/// a static list, a simulator).
pub trait DeviceProvider {
    /// The single device class the whole driver handles.
    fn device_type(&self) -> DeviceType;

    /// Populate the device list. Called once at startup, before
    /// [`devices`](Self::devices).
    fn fetch_devices(&self) -> impl Future<Output = Result<(), MonikaError>> + Send;

    /// The fetched devices. A second call returns the same `Arc`s.
    fn devices(&self) -> Vec<Arc<Device>>;
}

impl<T: DeviceProvider + Send + Sync> DeviceProvider for Arc<T> {
    fn device_type(&self) -> DeviceType {
        (**self).device_type()
    }

    fn fetch_devices(&self) -> impl Future<Output = Result<(), MonikaError>> + Send {
        (**self).fetch_devices()
    }

    fn devices(&self) -> Vec<Arc<Device>> {
        (**self).devices()
    }
}
