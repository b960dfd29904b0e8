//! Module — a functional sub-unit of a device that owns a set of iolets.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::action::ActionTable;
use crate::change::ChangeFlag;
use crate::control::ModuleControl;
use crate::error::MonikaError;
use crate::id::ModuleId;
use crate::iolet::Iolet;
use crate::kind::{IoletType, ModuleType};
use crate::status::ModuleStatus;
use crate::sync::{read, write};
use crate::update::ModuleUpdate;

/// A functional sub-unit. Exclusively owned by one [`Device`](crate::device::Device).
#[derive(Debug)]
pub struct Module {
    id: ModuleId,
    kind: ModuleType,
    name: RwLock<String>,
    status: AtomicU8,
    actions: ActionTable<ModuleControl, Module>,
    iolet_types: RwLock<Vec<IoletType>>,
    iolets: RwLock<Vec<Arc<Iolet>>>,
    changed: ChangeFlag,
}

/// Read-only description of a module, as served by the REST surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub id: ModuleId,
    #[serde(rename = "type")]
    pub kind: ModuleType,
    pub name: String,
    pub status: ModuleStatus,
    pub controls: Vec<ModuleControl>,
    pub iolet_types: Vec<IoletType>,
}

impl Module {
    #[must_use]
    pub fn new(id: impl Into<ModuleId>, kind: ModuleType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: RwLock::new(name.into()),
            status: AtomicU8::new(0),
            actions: ActionTable::default(),
            iolet_types: RwLock::new(Vec::new()),
            iolets: RwLock::new(Vec::new()),
            changed: ChangeFlag::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ModuleType {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> String {
        read(&self.name).clone()
    }

    /// Rename the module. Empty names and the current name are ignored.
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
    pub fn status(&self) -> ModuleStatus {
        ModuleStatus::from_bits_retain(self.status.load(Ordering::Acquire))
    }

    /// Replace the status. Returns whether anything changed.
    pub fn set_status(&self, status: ModuleStatus) -> bool {
        self.update_status(|current| *current = status)
    }

    /// Apply `f` to the current status atomically; dirty only on a real change.
    pub fn update_status(&self, mut f: impl FnMut(&mut ModuleStatus)) -> bool {
        let result = self
            .status
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let mut status = ModuleStatus::from_bits_retain(bits);
                f(&mut status);
                (status.bits() != bits).then_some(status.bits())
            });
        if result.is_ok() {
            self.changed.mark();
        }
        result.is_ok()
    }

    pub fn add_action<F>(&self, control: ModuleControl, action: F)
    where
        F: Fn(&Module) -> Result<(), MonikaError> + Send + Sync + 'static,
    {
        self.actions.register(control, action);
    }

    /// Execute the handler registered for `control`.
    ///
    /// # Errors
    ///
    /// Returns a dispatch error when no handler is registered, or the
    /// handler's own error.
    pub fn fire_action(&self, control: ModuleControl) -> Result<(), MonikaError> {
        self.actions.fire(control, self)
    }

    #[must_use]
    pub fn controls(&self) -> Vec<ModuleControl> {
        self.actions.controls()
    }

    /// Take ownership of `iolet`, appending it after the existing ones.
    pub fn add_iolet(&self, iolet: Iolet) -> Arc<Iolet> {
        let iolet = Arc::new(iolet);
        {
            let mut types = write(&self.iolet_types);
            if !types.contains(&iolet.kind()) {
                types.push(iolet.kind());
            }
        }
        write(&self.iolets).push(Arc::clone(&iolet));
        iolet
    }

    /// Distinct iolet types present, in first-seen order.
    #[must_use]
    pub fn iolet_types(&self) -> Vec<IoletType> {
        read(&self.iolet_types).clone()
    }

    #[must_use]
    pub fn iolets(&self) -> Vec<Arc<Iolet>> {
        read(&self.iolets).clone()
    }

    #[must_use]
    pub fn iolets_by_type(&self, kind: IoletType) -> Vec<Arc<Iolet>> {
        read(&self.iolets)
            .iter()
            .filter(|iolet| iolet.kind() == kind)
            .cloned()
            .collect()
    }

    /// First iolet with the given id.
    #[must_use]
    pub fn iolet(&self, id: &str) -> Option<Arc<Iolet>> {
        read(&self.iolets)
            .iter()
            .find(|iolet| iolet.id().as_str() == id)
            .cloned()
    }

    #[must_use]
    pub fn info(&self) -> ModuleInfo {
        ModuleInfo {
            id: self.id.clone(),
            kind: self.kind,
            name: self.name(),
            status: self.status(),
            controls: self.controls(),
            iolet_types: self.iolet_types(),
        }
    }

    /// Consume this module's and its iolets' dirty flags.
    ///
    /// Returns `Some` when the module itself changed or at least one iolet
    /// did; only the changed iolets are included, in registration order.
    pub fn updated(&self) -> Option<ModuleUpdate> {
        let iolets: Vec<_> = self.iolets().iter().filter_map(|io| io.updated()).collect();

        if !self.changed.take() && iolets.is_empty() {
            return None;
        }
        Some(ModuleUpdate {
            id: self.id.clone(),
            kind: self.kind,
            name: self.name(),
            status: self.status(),
            iolets,
        })
    }
}
