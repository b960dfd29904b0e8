//! IOlet — a single signal input/output port on a module.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

use crate::action::ActionTable;
use crate::change::ChangeFlag;
use crate::control::IoletControl;
use crate::error::MonikaError;
use crate::id::IoletId;
use crate::kind::IoletType;
use crate::status::IoletStatus;
use crate::sync::{read, write};
use crate::update::IoletUpdate;

/// A signal port. Exclusively owned by one [`Module`](crate::module::Module).
#[derive(Debug)]
pub struct Iolet {
    id: IoletId,
    kind: IoletType,
    name: RwLock<String>,
    status: AtomicU8,
    actions: ActionTable<IoletControl, Iolet>,
    changed: ChangeFlag,
}

/// Read-only description of an iolet, as served by the REST surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IoletInfo {
    pub id: IoletId,
    #[serde(rename = "type")]
    pub kind: IoletType,
    pub name: String,
    pub status: IoletStatus,
    pub controls: Vec<IoletControl>,
}

impl Iolet {
    /// Create an idle iolet (status zero, no controls, not dirty).
    #[must_use]
    pub fn new(id: impl Into<IoletId>, kind: IoletType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: RwLock::new(name.into()),
            status: AtomicU8::new(0),
            actions: ActionTable::default(),
            changed: ChangeFlag::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &IoletId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> IoletType {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> String {
        read(&self.name).clone()
    }

    /// Rename the iolet. Empty names and the current name are ignored.
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
    pub fn status(&self) -> IoletStatus {
        IoletStatus::from_bits_retain(self.status.load(Ordering::Acquire))
    }

    /// Replace the status. Returns whether anything changed.
    pub fn set_status(&self, status: IoletStatus) -> bool {
        self.update_status(|current| *current = status)
    }

    /// Apply `f` to the current status as one atomic read-modify-write.
    ///
    /// The iolet is only marked dirty when the resulting bits differ.
    pub fn update_status(&self, mut f: impl FnMut(&mut IoletStatus)) -> bool {
        let result = self
            .status
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let mut status = IoletStatus::from_bits_retain(bits);
                f(&mut status);
                (status.bits() != bits).then_some(status.bits())
            });
        if result.is_ok() {
            self.changed.mark();
        }
        result.is_ok()
    }

    /// Register or replace the handler for `control`.
    pub fn add_action<F>(&self, control: IoletControl, action: F)
    where
        F: Fn(&Iolet) -> Result<(), MonikaError> + Send + Sync + 'static,
    {
        self.actions.register(control, action);
    }

    /// Execute the handler registered for `control`.
    ///
    /// # Errors
    ///
    /// Returns a dispatch error when no handler is registered, or the
    /// handler's own error.
    pub fn fire_action(&self, control: IoletControl) -> Result<(), MonikaError> {
        self.actions.fire(control, self)
    }

    #[must_use]
    pub fn controls(&self) -> Vec<IoletControl> {
        self.actions.controls()
    }

    /// Snapshot for the REST surface. Does not consume the dirty flag.
    #[must_use]
    pub fn info(&self) -> IoletInfo {
        IoletInfo {
            id: self.id.clone(),
            kind: self.kind,
            name: self.name(),
            status: self.status(),
            controls: self.controls(),
        }
    }

    /// Consume the dirty flag; `Some` when the iolet changed since the last call.
    pub fn updated(&self) -> Option<IoletUpdate> {
        if !self.changed.take() {
            return None;
        }
        Some(IoletUpdate {
            id: self.id.clone(),
            kind: self.kind,
            name: self.name(),
            status: self.status(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;

    fn iolet() -> Iolet {
        Iolet::new("io1", IoletType::IpVideoIn, "Video In 1")
    }

    #[test]
    fn should_not_be_dirty_when_created() {
        assert!(iolet().updated().is_none());
    }

    #[test]
    fn should_report_change_once_when_status_changes() {
        let io = iolet();
        assert!(io.update_status(|s| s.set_running(true)));

        let update = io.updated().unwrap();
        assert_eq!(update.id, "io1");
        assert!(update.status.running());
        assert!(io.updated().is_none());
    }

    #[test]
    fn should_not_dirty_when_status_is_unchanged() {
        let io = iolet();
        assert!(!io.update_status(|s| s.set_running(false)));
        assert!(!io.set_status(IoletStatus::default()));
        assert!(io.updated().is_none());
    }

    #[test]
    fn should_not_dirty_when_name_is_empty_or_equal() {
        let io = iolet();
        io.set_name("");
        io.set_name("Video In 1");
        assert!(io.updated().is_none());
        assert_eq!(io.name(), "Video In 1");
    }

    #[test]
    fn should_dirty_when_name_changes() {
        let io = iolet();
        io.set_name("Camera 3");
        assert_eq!(io.updated().unwrap().name, "Camera 3");
    }

    #[test]
    fn should_pass_itself_to_the_action() {
        let io = iolet();
        io.add_action(IoletControl::Start, |iolet| {
            iolet.update_status(|s| {
                s.set_running(true);
                s.set_receiving(true);
            });
            Ok(())
        });

        io.fire_action(IoletControl::Start).unwrap();

        let status = io.updated().unwrap().status;
        assert!(status.running());
        assert!(status.receiving());
    }

    #[test]
    fn should_fail_dispatch_for_valid_but_unregistered_control() {
        let io = iolet();
        let control: IoletControl = "START".parse().unwrap();

        let err = io.fire_action(control).unwrap_err();

        assert!(matches!(
            err,
            MonikaError::Dispatch(DispatchError::NoSuchAction { .. })
        ));
    }

    #[test]
    fn should_describe_itself_without_consuming_change() {
        let io = iolet();
        io.add_action(IoletControl::Stop, |_| Ok(()));
        io.update_status(|s| s.set_enabled(true));

        let info = io.info();

        assert_eq!(info.controls, vec![IoletControl::Stop]);
        assert!(info.status.enabled());
        assert!(io.updated().is_some());
    }
}
