//! Faults — what checkers detect and what the gateway is told about.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{DeviceId, IoletId, ModuleId};
use crate::kind::{DeviceType, IoletType, ModuleType};

/// How bad a fault is. Larger is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const LOWEST: Self = Self(1);
    pub const MID: Self = Self(5);
    pub const HIGHEST: Self = Self(10);

    #[must_use]
    pub const fn new(level: u8) -> Self {
        Self(level)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A fault a checker believes an entity currently has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultCandidate {
    pub severity: Severity,
    pub message: String,
}

impl FaultCandidate {
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Identifier the gateway assigned to a reported error.
///
/// Gateways in the field answer with either a number or a string; both are
/// kept as their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RemoteErrorId(String);

impl RemoteErrorId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RemoteErrorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// A fault the gateway acknowledged and that has not been withdrawn yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveFault {
    pub remote_id: RemoteErrorId,
    pub severity: Severity,
    pub message: String,
}

/// Payload announcing a fault to the gateway.
///
/// Carries the full ancestor context so the gateway can attribute the fault
/// without holding any device state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub device_id: DeviceId,
    pub device_type: DeviceType,
    pub device_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<ModuleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_type: Option<ModuleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(rename = "ioletId", skip_serializing_if = "Option::is_none")]
    pub iolet_id: Option<IoletId>,
    #[serde(rename = "ioletType", skip_serializing_if = "Option::is_none")]
    pub iolet_type: Option<IoletType>,
    #[serde(rename = "ioletName", skip_serializing_if = "Option::is_none")]
    pub iolet_name: Option<String>,
    pub severity: Severity,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_order_named_severities() {
        assert!(Severity::LOWEST < Severity::MID);
        assert!(Severity::MID < Severity::HIGHEST);
        assert!(Severity::new(5) > Severity::new(1));
    }

    #[test]
    fn should_accept_numeric_remote_error_id() {
        let id: RemoteErrorId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn should_accept_string_remote_error_id() {
        let id: RemoteErrorId = serde_json::from_str("\"err-7\"").unwrap();
        assert_eq!(id, RemoteErrorId::new("err-7"));
    }

    #[test]
    fn should_omit_missing_ancestors_when_serializing_device_report() {
        let report = ErrorReport {
            device_id: "d1".into(),
            device_type: DeviceType::GenericDummy,
            device_name: "Dummy".to_string(),
            module_id: None,
            module_type: None,
            module_name: None,
            iolet_id: None,
            iolet_type: None,
            iolet_name: None,
            severity: Severity::MID,
            message: "offline".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "deviceId": "d1",
                "deviceType": "GENERIC_DUMMY",
                "deviceName": "Dummy",
                "severity": 5,
                "message": "offline"
            })
        );
    }

    #[test]
    fn should_include_iolet_context_when_present() {
        let report = ErrorReport {
            device_id: "d1".into(),
            device_type: DeviceType::GenericDummy,
            device_name: "Dummy".to_string(),
            module_id: Some("m1".into()),
            module_type: Some(ModuleType::Av),
            module_name: Some("Video".to_string()),
            iolet_id: Some("io1".into()),
            iolet_type: Some(IoletType::IpVideoIn),
            iolet_name: Some("In 1".to_string()),
            severity: Severity::HIGHEST,
            message: "IOlet In 1 stopped!".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["moduleType"], "AV");
        assert_eq!(json["ioletId"], "io1");
        assert_eq!(json["ioletType"], "IP-VIDEO-IN");
    }
}
