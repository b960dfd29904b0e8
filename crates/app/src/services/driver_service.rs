//! Driver service — lookups and control dispatch over the provider's devices.
//!
//! Controls arrive already parsed into their closed vocabulary; whether the
//! addressed entity actually registered a handler is only known once
//! [`fire_action`](monika_domain::device::Device::fire_action) runs.

use std::sync::Arc;

use monika_domain::control::{DeviceControl, IoletControl, ModuleControl};
use monika_domain::device::Device;
use monika_domain::error::{MonikaError, NotFoundError};
use monika_domain::iolet::Iolet;
use monika_domain::kind::{DeviceType, IoletType, ModuleType};
use monika_domain::module::Module;

use crate::ports::DeviceProvider;

/// Application service answering read and control requests for one driver.
pub struct DriverService<P> {
    provider: P,
    devices: Vec<Arc<Device>>,
}

impl<P: DeviceProvider> DriverService<P> {
    /// Create a service over the devices `provider` has already fetched.
    pub fn new(provider: P) -> Self {
        let devices = provider.devices();
        Self { provider, devices }
    }

    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        self.provider.device_type()
    }

    #[must_use]
    pub fn devices(&self) -> &[Arc<Device>] {
        &self.devices
    }

    /// Look up a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] when no device has that id.
    pub fn device(&self, device_id: &str) -> Result<Arc<Device>, MonikaError> {
        self.devices
            .iter()
            .find(|device| device.id().as_str() == device_id)
            .cloned()
            .ok_or_else(|| not_found("Device", device_id))
    }

    /// All modules of a device, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] for an unknown device.
    pub fn modules(&self, device_id: &str) -> Result<Vec<Arc<Module>>, MonikaError> {
        Ok(self.device(device_id)?.modules())
    }

    /// Modules of a device filtered by type.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] for an unknown device.
    pub fn modules_by_type(
        &self,
        device_id: &str,
        kind: ModuleType,
    ) -> Result<Vec<Arc<Module>>, MonikaError> {
        Ok(self.device(device_id)?.modules_by_type(kind))
    }

    /// Look up a module inside a device.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] when either the device or the module
    /// is unknown.
    pub fn module(&self, device_id: &str, module_id: &str) -> Result<Arc<Module>, MonikaError> {
        self.device(device_id)?
            .module(module_id)
            .ok_or_else(|| not_found("Module", module_id))
    }

    /// All iolets of a module, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] when the device or module is unknown.
    pub fn iolets(&self, device_id: &str, module_id: &str) -> Result<Vec<Arc<Iolet>>, MonikaError> {
        Ok(self.module(device_id, module_id)?.iolets())
    }

    /// Iolets of a module filtered by type.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] when the device or module is unknown.
    pub fn iolets_by_type(
        &self,
        device_id: &str,
        module_id: &str,
        kind: IoletType,
    ) -> Result<Vec<Arc<Iolet>>, MonikaError> {
        Ok(self.module(device_id, module_id)?.iolets_by_type(kind))
    }

    /// Look up an iolet.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] when any level of the path is unknown.
    pub fn iolet(
        &self,
        device_id: &str,
        module_id: &str,
        iolet_id: &str,
    ) -> Result<Arc<Iolet>, MonikaError> {
        self.module(device_id, module_id)?
            .iolet(iolet_id)
            .ok_or_else(|| not_found("IOlet", iolet_id))
    }

    /// Fire a device control.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] for an unknown device and
    /// [`MonikaError::Dispatch`] when the device has no handler for `control`.
    #[tracing::instrument(skip(self))]
    pub fn run_device_control(
        &self,
        device_id: &str,
        control: DeviceControl,
    ) -> Result<(), MonikaError> {
        let device = self.device(device_id)?;
        dispatched(device.fire_action(control))
    }

    /// Fire a module control.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] for an unknown device or module and
    /// [`MonikaError::Dispatch`] when the module has no handler for `control`.
    #[tracing::instrument(skip(self))]
    pub fn run_module_control(
        &self,
        device_id: &str,
        module_id: &str,
        control: ModuleControl,
    ) -> Result<(), MonikaError> {
        let module = self.module(device_id, module_id)?;
        dispatched(module.fire_action(control))
    }

    /// Fire an iolet control.
    ///
    /// # Errors
    ///
    /// Returns [`MonikaError::NotFound`] when any level of the path is unknown
    /// and [`MonikaError::Dispatch`] when the iolet has no handler for `control`.
    #[tracing::instrument(skip(self))]
    pub fn run_iolet_control(
        &self,
        device_id: &str,
        module_id: &str,
        iolet_id: &str,
        control: IoletControl,
    ) -> Result<(), MonikaError> {
        let iolet = self.iolet(device_id, module_id, iolet_id)?;
        dispatched(iolet.fire_action(control))
    }
}

fn not_found(entity: &'static str, id: &str) -> MonikaError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

fn dispatched(result: Result<(), MonikaError>) -> Result<(), MonikaError> {
    match &result {
        Ok(()) => tracing::info!("control dispatched"),
        Err(err) => tracing::warn!(error = %err, "control rejected"),
    }
    result
}
