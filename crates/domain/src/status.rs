//! Status bitsets for each entity class.
//!
//! Statuses are plain values: flipping a flag on a status never touches an
//! entity. Entities expose `set_status` / `update_status`, which compare the
//! result with the current value and only raise the dirty flag on a change.
//! All three serialize as their raw integer.

use serde::{Deserialize, Serialize};

/// Device-level flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceStatus(u8);

bitflags::bitflags! {
    impl DeviceStatus: u8 {
        const ONLINE = 1 << 0;
    }
}

impl DeviceStatus {
    #[must_use]
    pub fn online(self) -> bool {
        self.contains(Self::ONLINE)
    }

    pub fn set_online(&mut self, online: bool) {
        self.set(Self::ONLINE, online);
    }
}

/// Module-level flags. The zero value means "OK".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleStatus(u8);

bitflags::bitflags! {
    impl ModuleStatus: u8 {
        const NOK = 1 << 0;
    }
}

impl ModuleStatus {
    #[must_use]
    pub fn ok(self) -> bool {
        !self.contains(Self::NOK)
    }

    pub fn set_ok(&mut self, ok: bool) {
        self.set(Self::NOK, !ok);
    }
}

/// IOlet-level flags. The zero value means "OK, idle".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IoletStatus(u8);

bitflags::bitflags! {
    impl IoletStatus: u8 {
        const NOK = 1 << 0;
        const RUNNING = 1 << 1;
        const RECEIVING = 1 << 2;
        const SENDING = 1 << 3;
        const HIGH = 1 << 4;
        const ENABLED = 1 << 5;
    }
}

impl IoletStatus {
    #[must_use]
    pub fn ok(self) -> bool {
        !self.contains(Self::NOK)
    }

    pub fn set_ok(&mut self, ok: bool) {
        self.set(Self::NOK, !ok);
    }

    #[must_use]
    pub fn running(self) -> bool {
        self.contains(Self::RUNNING)
    }

    pub fn set_running(&mut self, running: bool) {
        self.set(Self::RUNNING, running);
    }

    #[must_use]
    pub fn receiving(self) -> bool {
        self.contains(Self::RECEIVING)
    }

    pub fn set_receiving(&mut self, receiving: bool) {
        self.set(Self::RECEIVING, receiving);
    }

    #[must_use]
    pub fn sending(self) -> bool {
        self.contains(Self::SENDING)
    }

    pub fn set_sending(&mut self, sending: bool) {
        self.set(Self::SENDING, sending);
    }

    /// GPIO level.
    #[must_use]
    pub fn high(self) -> bool {
        self.contains(Self::HIGH)
    }

    pub fn set_high(&mut self, high: bool) {
        self.set(Self::HIGH, high);
    }

    #[must_use]
    pub fn enabled(self) -> bool {
        self.contains(Self::ENABLED)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.set(Self::ENABLED, enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_iolet_status_to_ok_and_idle() {
        let status = IoletStatus::default();
        assert!(status.ok());
        assert!(!status.running());
        assert!(!status.receiving());
        assert!(!status.sending());
        assert!(!status.high());
        assert!(!status.enabled());
    }

    #[test]
    fn should_toggle_ok_idempotently() {
        let mut status = IoletStatus::default();
        status.set_ok(false);
        status.set_ok(false);
        assert!(!status.ok());
        status.set_ok(true);
        assert!(status.ok());
    }

    #[test]
    fn should_keep_other_flags_when_one_changes() {
        let mut status = IoletStatus::default();
        status.set_high(true);
        status.set_sending(true);
        status.set_ok(false);

        assert!(!status.ok());
        assert!(status.sending());
        assert!(status.high());

        status.set_high(false);
        assert!(status.sending());
        assert!(!status.high());
    }

    #[test]
    fn should_toggle_running_receiving_and_enabled() {
        let mut status = IoletStatus::default();
        status.set_running(true);
        status.set_receiving(true);
        status.set_enabled(true);
        assert!(status.running() && status.receiving() && status.enabled());
        status.set_running(false);
        assert!(!status.running());
        assert!(status.receiving());
    }

    #[test]
    fn should_treat_module_nok_bit_as_inverse_of_ok() {
        let mut status = ModuleStatus::default();
        assert!(status.ok());
        status.set_ok(false);
        assert_eq!(status.bits(), 1);
        status.set_ok(true);
        assert!(status.ok());
    }

    #[test]
    fn should_set_device_online() {
        let mut status = DeviceStatus::default();
        assert!(!status.online());
        status.set_online(true);
        assert!(status.online());
        status.set_online(false);
        assert!(!status.online());
    }

    #[test]
    fn should_serialize_as_raw_bits() {
        let mut status = IoletStatus::default();
        status.set_running(true);
        status.set_receiving(true);
        assert_eq!(serde_json::to_string(&status).unwrap(), "6");
        let parsed: IoletStatus = serde_json::from_str("6").unwrap();
        assert_eq!(parsed, status);
    }
}
