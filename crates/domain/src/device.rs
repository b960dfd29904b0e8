//! Device — a piece of equipment exposed through the gateway.
//!
//! A device owns an ordered list of [`Module`]s, each owning an ordered list
//! of [`Iolet`](crate::iolet::Iolet)s. Every level tracks whether it changed
//! since the last [`Device::updated`] walk.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::action::ActionTable;
use crate::change::ChangeFlag;
use crate::control::DeviceControl;
use crate::error::MonikaError;
use crate::id::DeviceId;
use crate::kind::{DeviceType, ModuleType};
use crate::module::Module;
use crate::status::DeviceStatus;
use crate::sync::{read, write};
use crate::update::DeviceUpdate;

/// A device managed by a driver.
#[derive(Debug)]
pub struct Device {
    id: DeviceId,
    kind: DeviceType,
    name: RwLock<String>,
    status: AtomicU8,
    endpoint: RwLock<ControlEndpoint>,
    actions: ActionTable<DeviceControl, Device>,
    module_types: RwLock<Vec<ModuleType>>,
    modules: RwLock<Vec<Arc<Module>>>,
    changed: ChangeFlag,
}

/// Where the driver reaches the physical device. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ControlEndpoint {
    ip: Option<String>,
    port: Option<u16>,
}

/// Read-only description of a device, as served by the REST surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(rename = "deviceId")]
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub kind: DeviceType,
    pub name: String,
    pub status: DeviceStatus,
    #[serde(rename = "controlIP", skip_serializing_if = "Option::is_none")]
    pub control_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_port: Option<u16>,
    pub controls: Vec<DeviceControl>,
    pub module_types: Vec<ModuleType>,
}

impl Device {
    #[must_use]
    pub fn new(id: impl Into<DeviceId>, kind: DeviceType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: RwLock::new(name.into()),
            status: AtomicU8::new(0),
            endpoint: RwLock::new(ControlEndpoint::default()),
            actions: ActionTable::default(),
            module_types: RwLock::new(Vec::new()),
            modules: RwLock::new(Vec::new()),
            changed: ChangeFlag::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> DeviceType {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> String {
        read(&self.name).clone()
    }

    /// Rename the device. Empty names and the current name are ignored.
    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        let mut current = write(&self.name);
        if name.is_empty() || *current == name {
            return;
        }
        *current = name;
        self.changed.mark();
    }

    #[must_use]
    pub fn status(&self) -> DeviceStatus {
        DeviceStatus::from_bits_retain(self.status.load(Ordering::Acquire))
    }

    /// Replace the status. Returns whether anything changed.
    pub fn set_status(&self, status: DeviceStatus) -> bool {
        self.update_status(|current| *current = status)
    }

    /// Apply `f` to the current status atomically; dirty only on a real change.
    pub fn update_status(&self, mut f: impl FnMut(&mut DeviceStatus)) -> bool {
        let result = self
            .status
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let mut status = DeviceStatus::from_bits_retain(bits);
                f(&mut status);
                (status.bits() != bits).then_some(status.bits())
            });
        if result.is_ok() {
            self.changed.mark();
        }
        result.is_ok()
    }

    #[must_use]
    pub fn control_ip(&self) -> Option<String> {
        read(&self.endpoint).ip.clone()
    }

    pub fn set_control_ip(&self, ip: impl Into<String>) {
        write(&self.endpoint).ip = Some(ip.into());
    }

    #[must_use]
    pub fn control_port(&self) -> Option<u16> {
        read(&self.endpoint).port
    }

    pub fn set_control_port(&self, port: u16) {
        write(&self.endpoint).port = Some(port);
    }

    pub fn add_action<F>(&self, control: DeviceControl, action: F)
    where
        F: Fn(&Device) -> Result<(), MonikaError> + Send + Sync + 'static,
    {
        self.actions.register(control, action);
    }

    /// Execute the handler registered for `control`.
    ///
    /// # Errors
    ///
    /// Returns a dispatch error when no handler is registered, or the
    /// handler's own error.
    pub fn fire_action(&self, control: DeviceControl) -> Result<(), MonikaError> {
        self.actions.fire(control, self)
    }

    #[must_use]
    pub fn controls(&self) -> Vec<DeviceControl> {
        self.actions.controls()
    }

    /// Take ownership of `module`, appending it after the existing ones.
    pub fn add_module(&self, module: Module) -> Arc<Module> {
        let module = Arc::new(module);
        {
            let mut types = write(&self.module_types);
            if !types.contains(&module.kind()) {
                types.push(module.kind());
            }
        }
        write(&self.modules).push(Arc::clone(&module));
        module
    }

    /// Distinct module types present, in first-seen order.
    #[must_use]
    pub fn module_types(&self) -> Vec<ModuleType> {
        read(&self.module_types).clone()
    }

    #[must_use]
    pub fn modules(&self) -> Vec<Arc<Module>> {
        read(&self.modules).clone()
    }

    #[must_use]
    pub fn modules_by_type(&self, kind: ModuleType) -> Vec<Arc<Module>> {
        read(&self.modules)
            .iter()
            .filter(|module| module.kind() == kind)
            .cloned()
            .collect()
    }

    /// First module with the given id.
    #[must_use]
    pub fn module(&self, id: &str) -> Option<Arc<Module>> {
        read(&self.modules)
            .iter()
            .find(|module| module.id().as_str() == id)
            .cloned()
    }

    #[must_use]
    pub fn info(&self) -> DeviceInfo {
        let endpoint = read(&self.endpoint).clone();
        DeviceInfo {
            id: self.id.clone(),
            kind: self.kind,
            name: self.name(),
            status: self.status(),
            control_ip: endpoint.ip,
            control_port: endpoint.port,
            controls: self.controls(),
            module_types: self.module_types(),
        }
    }

    /// Consume the dirty flags of the whole subtree.
    ///
    /// Returns `None` when nothing changed anywhere below (and including)
    /// this device; otherwise a sparse update holding the changed modules,
    /// each holding its changed iolets, in registration order.
    pub fn updated(&self) -> Option<DeviceUpdate> {
        let modules: Vec<_> = self.modules().iter().filter_map(|m| m.updated()).collect();

        if !self.changed.take() && modules.is_empty() {
            return None;
        }
        Some(DeviceUpdate {
            id: self.id.clone(),
            kind: self.kind,
            name: self.name(),
            status: self.status(),
            modules,
        })
    }
}
