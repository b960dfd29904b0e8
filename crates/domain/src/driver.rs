//! Driver registration handshake payload.

use serde::Serialize;

use crate::kind::DeviceType;

/// Announces (or withdraws) a driver to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRegistration {
    pub device_type: DeviceType,
    /// Port the driver's REST surface listens on.
    pub port: u16,
    /// Free-form site or rack description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
}

impl DriverRegistration {
    #[must_use]
    pub fn new(device_type: DeviceType, port: u16) -> Self {
        Self {
            device_type,
            port,
            location: String::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}
