//! NetBox-backed device provider.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use url::Url;

use monika_app::ports::DeviceProvider;
use monika_domain::device::Device;
use monika_domain::error::MonikaError;
use monika_domain::kind::DeviceType;

use crate::error::NetboxError;

/// Where to look and what to look for.
#[derive(Debug, Clone)]
pub struct NetboxSettings {
    /// Base URL of the NetBox instance.
    pub url: String,
    /// API token, sent as `Authorization: TOKEN <token>`.
    pub token: String,
    /// Device type the driver serves.
    pub device_type: DeviceType,
    /// NetBox id of the device type to list.
    pub device_type_id: u32,
    /// Control port recorded on every device, if the hardware uses a fixed one.
    pub control_port: Option<u16>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// One page of `api/dcim/devices/`.
#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    next: Option<String>,
    results: Vec<NetboxDevice>,
}

#[derive(Deserialize)]
struct NetboxDevice {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    primary_ip: Option<PrimaryIp>,
}

#[derive(Deserialize)]
struct PrimaryIp {
    /// CIDR notation, e.g. `10.0.0.5/24`.
    address: String,
}

impl NetboxDevice {
    fn control_ip(&self) -> Option<&str> {
        let address = self.primary_ip.as_ref()?.address.as_str();
        address.split('/').next().filter(|ip| !ip.is_empty())
    }

    fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("NetBox device {}", self.id),
        }
    }
}

/// Lists the devices of one NetBox device type.
///
/// Devices are identified by their NetBox id. Fetching again adds devices
/// that appeared since and refreshes control IPs, but never replaces the
/// `Arc`s handed out before.
pub struct NetboxProvider {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    device_type: DeviceType,
    device_type_id: u32,
    control_port: Option<u16>,
    devices: RwLock<Vec<Arc<Device>>>,
}

impl NetboxProvider {
    /// Build a provider whose every request gives up after `settings.timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`NetboxError`] if the URL is unusable or the HTTP client
    /// cannot be built.
    pub fn new(settings: NetboxSettings) -> Result<Self, NetboxError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("monika/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base_url = Url::parse(&settings.url)?;
        if base_url.cannot_be_a_base() {
            return Err(NetboxError::NotABase(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            token: settings.token,
            device_type: settings.device_type,
            device_type_id: settings.device_type_id,
            control_port: settings.control_port,
            devices: RwLock::new(Vec::new()),
        })
    }

    fn first_page(&self) -> Result<Url, NetboxError> {
        let mut url = self.base_url.join("api/dcim/devices/")?;
        url.query_pairs_mut()
            .append_pair("device_type_id", &self.device_type_id.to_string());
        Ok(url)
    }

    async fn fetch_page(&self, url: Url) -> Result<Page, NetboxError> {
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("TOKEN {}", self.token))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetboxError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    async fn list(&self) -> Result<Vec<NetboxDevice>, NetboxError> {
        let mut url = self.first_page()?;
        let mut found = Vec::new();
        loop {
            let page = self.fetch_page(url.clone()).await?;
            found.extend(page.results);
            let Some(next) = page.next else {
                break;
            };
            let next = Url::parse(&next)?;
            if next == url {
                tracing::warn!(%url, "netbox pagination points back to the same page");
                break;
            }
            url = next;
        }
        Ok(found)
    }
}

impl DeviceProvider for NetboxProvider {
    fn device_type(&self) -> DeviceType {
        self.device_type
    }

    async fn fetch_devices(&self) -> Result<(), MonikaError> {
        let listed = self.list().await?;

        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        let mut skipped = 0usize;
        for entry in &listed {
            let Some(ip) = entry.control_ip() else {
                skipped += 1;
                continue;
            };
            let id = entry.id.to_string();
            if let Some(known) = devices.iter().find(|d| d.id().as_str() == id) {
                known.set_control_ip(ip);
                continue;
            }
            let device = Device::new(id, self.device_type, entry.display_name());
            device.set_control_ip(ip);
            if let Some(port) = self.control_port {
                device.set_control_port(port);
            }
            devices.push(Arc::new(device));
        }

        tracing::info!(
            listed = listed.len(),
            skipped,
            devices = devices.len(),
            device_type = %self.device_type,
            "netbox devices fetched"
        );
        Ok(())
    }

    fn devices(&self) -> Vec<Arc<Device>> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str) -> NetboxSettings {
        NetboxSettings {
            url: url.to_string(),
            token: "secret".to_string(),
            device_type: DeviceType::RiedelFusion,
            device_type_id: 7,
            control_port: None,
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn should_query_devices_of_configured_type() {
        let provider = NetboxProvider::new(settings("https://netbox.local/prefix")).unwrap();
        assert_eq!(
            provider.first_page().unwrap().as_str(),
            "https://netbox.local/prefix/api/dcim/devices/?device_type_id=7"
        );
    }

    #[test]
    fn should_reject_unparsable_url() {
        let Err(err) = NetboxProvider::new(settings("not a url")) else {
            panic!("expected an invalid url error");
        };
        assert!(matches!(err, NetboxError::InvalidUrl(_)));
    }

    #[test]
    fn should_strip_prefix_length_from_primary_ip() {
        let device: NetboxDevice = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "fusion-3",
            "primary_ip": {"family": 4, "address": "10.0.0.5/24"}
        }))
        .unwrap();
        assert_eq!(device.control_ip(), Some("10.0.0.5"));
    }

    #[test]
    fn should_have_no_control_ip_without_primary_ip() {
        let device: NetboxDevice =
            serde_json::from_value(serde_json::json!({"id": 3, "name": "x", "primary_ip": null}))
                .unwrap();
        assert_eq!(device.control_ip(), None);
    }

    #[test]
    fn should_fall_back_to_id_when_name_missing() {
        let device: NetboxDevice =
            serde_json::from_value(serde_json::json!({"id": 12, "name": null})).unwrap();
        assert_eq!(device.display_name(), "NetBox device 12");
    }
}
