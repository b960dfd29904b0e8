//! Control vocabularies — the commands an entity may advertise.
//!
//! Parsing a control string is the first, static stage of dispatch: it only
//! answers "is this a command the protocol knows". Whether a particular
//! entity instance can execute it is decided later by its action table.

wire_enum!(
    /// Commands addressed to a whole device.
    DeviceControl("device control", InvalidControl) {
        Boot => "BOOT",
        Reboot => "REBOOT",
        Shutdown => "SHUTDOWN",
    }
);

wire_enum!(
    /// Commands addressed to a module.
    ModuleControl("module control", InvalidControl) {
        Start => "START",
        Stop => "STOP",
        Restart => "RESTART",
    }
);

wire_enum!(
    /// Commands addressed to a single iolet.
    IoletControl("iolet control", InvalidControl) {
        Start => "START",
        Stop => "STOP",
        Restart => "RESTART",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn should_accept_every_device_control() {
        assert_eq!("BOOT".parse::<DeviceControl>(), Ok(DeviceControl::Boot));
        assert_eq!("REBOOT".parse::<DeviceControl>(), Ok(DeviceControl::Reboot));
        assert_eq!(
            "SHUTDOWN".parse::<DeviceControl>(),
            Ok(DeviceControl::Shutdown)
        );
    }

    #[test]
    fn should_reject_lowercase_control() {
        let err = "start".parse::<IoletControl>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidControl { .. }));
    }

    #[test]
    fn should_reject_device_control_on_module_vocabulary() {
        assert!("BOOT".parse::<ModuleControl>().is_err());
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let json = serde_json::to_string(&IoletControl::Restart).unwrap();
        assert_eq!(json, "\"RESTART\"");
        let parsed: IoletControl = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, IoletControl::Restart);
    }
}
