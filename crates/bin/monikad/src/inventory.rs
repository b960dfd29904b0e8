//! Provider selection: NetBox when configured, simulated devices otherwise.

use std::sync::Arc;

use monika_adapter_mock::MockProvider;
use monika_adapter_netbox_reqwest::{NetboxError, NetboxProvider};
use monika_app::ports::DeviceProvider;
use monika_domain::device::Device;
use monika_domain::error::MonikaError;
use monika_domain::kind::DeviceType;

use crate::config::Config;

pub enum Inventory {
    Mock(MockProvider),
    Netbox(NetboxProvider),
}

impl Inventory {
    /// # Errors
    ///
    /// Returns [`NetboxError`] if the NetBox client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, NetboxError> {
        match config.netbox_settings() {
            Some(settings) => Ok(Self::Netbox(NetboxProvider::new(settings)?)),
            None => Ok(Self::Mock(MockProvider::new(
                config.mock.device_type,
                config.mock.devices,
            ))),
        }
    }

    #[must_use]
    pub fn source(&self) -> &'static str {
        match self {
            Self::Mock(_) => "mock",
            Self::Netbox(_) => "netbox",
        }
    }
}

impl DeviceProvider for Inventory {
    fn device_type(&self) -> DeviceType {
        match self {
            Self::Mock(provider) => provider.device_type(),
            Self::Netbox(provider) => provider.device_type(),
        }
    }

    async fn fetch_devices(&self) -> Result<(), MonikaError> {
        match self {
            Self::Mock(provider) => provider.fetch_devices().await,
            Self::Netbox(provider) => provider.fetch_devices().await,
        }
    }

    fn devices(&self) -> Vec<Arc<Device>> {
        match self {
            Self::Mock(provider) => provider.devices(),
            Self::Netbox(provider) => provider.devices(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_mock_devices_without_netbox_url() {
        let inventory = Inventory::from_config(&Config::default()).unwrap();
        assert_eq!(inventory.source(), "mock");
        assert_eq!(inventory.device_type(), DeviceType::GenericDummy);
    }

    #[test]
    fn should_use_netbox_when_url_is_set() {
        let mut config = Config::default();
        config.netbox.url = "https://netbox.local".to_string();
        config.netbox.device_type_id = 4;
        config.netbox.device_type = DeviceType::RiedelFusion;

        let inventory = Inventory::from_config(&config).unwrap();

        assert_eq!(inventory.source(), "netbox");
        assert_eq!(inventory.device_type(), DeviceType::RiedelFusion);
    }
}
