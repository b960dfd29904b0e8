//! Sparse change snapshots produced by the `updated()` walk.
//!
//! Every level repeats its own id, type, name and status so an update is
//! self-describing, but only carries the children that changed.

use serde::{Deserialize, Serialize};

use crate::id::{DeviceId, IoletId, ModuleId};
use crate::kind::{DeviceType, IoletType, ModuleType};
use crate::status::{DeviceStatus, IoletStatus, ModuleStatus};

/// A changed iolet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoletUpdate {
    pub id: IoletId,
    #[serde(rename = "type")]
    pub kind: IoletType,
    pub name: String,
    pub status: IoletStatus,
}

/// A module that changed itself or has changed iolets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleUpdate {
    pub id: ModuleId,
    #[serde(rename = "type")]
    pub kind: ModuleType,
    pub name: String,
    pub status: ModuleStatus,
    pub iolets: Vec<IoletUpdate>,
}

/// A device that changed itself or has changed descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    #[serde(rename = "deviceId")]
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub kind: DeviceType,
    pub name: String,
    pub status: DeviceStatus,
    pub modules: Vec<ModuleUpdate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_with_gateway_field_names() {
        let update = DeviceUpdate {
            id: DeviceId::new("d1"),
            kind: DeviceType::GenericDummy,
            name: "Dummy".to_string(),
            status: DeviceStatus::ONLINE,
            modules: vec![ModuleUpdate {
                id: ModuleId::new("m1"),
                kind: ModuleType::Av,
                name: "Video".to_string(),
                status: ModuleStatus::default(),
                iolets: vec![IoletUpdate {
                    id: IoletId::new("io1"),
                    kind: IoletType::IpVideoIn,
                    name: "In 1".to_string(),
                    status: IoletStatus::RUNNING,
                }],
            }],
        };

        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "deviceId": "d1",
                "type": "GENERIC_DUMMY",
                "name": "Dummy",
                "status": 1,
                "modules": [{
                    "id": "m1",
                    "type": "AV",
                    "name": "Video",
                    "status": 0,
                    "iolets": [{
                        "id": "io1",
                        "type": "IP-VIDEO-IN",
                        "name": "In 1",
                        "status": 2
                    }]
                }]
            })
        );
    }
}
