//! HTTP client for the monika gateway.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use monika_app::ports::{DriverRegistry, ErrorSink, UpdateSink};
use monika_domain::driver::DriverRegistration;
use monika_domain::error::MonikaError;
use monika_domain::fault::{ErrorReport, RemoteErrorId};
use monika_domain::update::DeviceUpdate;

use crate::error::GatewayError;

/// Body of `POST /api/notify/error`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorCreated {
    error_id: RemoteErrorId,
}

/// Talks to one gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    /// Build a client whose every request gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if `base_url` is not a usable URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("monika/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an already configured [`reqwest::Client`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if `base_url` is not a usable URL.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, GatewayError> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::NotABase(base_url.to_string()));
        }
        // Endpoints are joined relative to the base; keep its last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        endpoint: &str,
        expected: StatusCode,
    ) -> Result<Response, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        if status != expected {
            return Err(GatewayError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                expected: expected.as_u16(),
            });
        }
        Ok(response)
    }

    async fn post_expecting<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<Response, GatewayError> {
        let url = self.url(path)?;
        tracing::debug!(%url, "POST");
        self.send(self.http.post(url).json(body), path, expected)
            .await
    }

    async fn connect_driver(&self, registration: &DriverRegistration) -> Result<(), GatewayError> {
        self.post_expecting("driver/connect", registration, StatusCode::CREATED)
            .await?;
        Ok(())
    }

    async fn disconnect_driver(
        &self,
        registration: &DriverRegistration,
    ) -> Result<(), GatewayError> {
        self.post_expecting("driver/disconnect", registration, StatusCode::OK)
            .await?;
        Ok(())
    }

    async fn post_update(&self, update: &DeviceUpdate) -> Result<(), GatewayError> {
        self.post_expecting("api/notify/update", update, StatusCode::OK)
            .await?;
        Ok(())
    }

    async fn post_error(&self, report: &ErrorReport) -> Result<RemoteErrorId, GatewayError> {
        let response = self
            .post_expecting("api/notify/error", report, StatusCode::CREATED)
            .await?;
        let created: ErrorCreated = response.json().await?;
        Ok(created.error_id)
    }

    async fn remove_error(&self, id: &RemoteErrorId) -> Result<(), GatewayError> {
        let mut url = self.url("api/notify/error")?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::NotABase(self.base_url.to_string()))?
            .push(id.as_str());
        tracing::debug!(%url, "DELETE");
        self.send(self.http.delete(url), "api/notify/error", StatusCode::OK)
            .await?;
        Ok(())
    }
}

impl DriverRegistry for GatewayClient {
    async fn connect(&self, registration: &DriverRegistration) -> Result<(), MonikaError> {
        Ok(self.connect_driver(registration).await?)
    }

    async fn disconnect(&self, registration: &DriverRegistration) -> Result<(), MonikaError> {
        Ok(self.disconnect_driver(registration).await?)
    }
}

impl UpdateSink for GatewayClient {
    async fn publish_update(&self, update: &DeviceUpdate) -> Result<(), MonikaError> {
        Ok(self.post_update(update).await?)
    }
}

impl ErrorSink for GatewayClient {
    async fn report_error(&self, report: &ErrorReport) -> Result<RemoteErrorId, MonikaError> {
        Ok(self.post_error(report).await?)
    }

    async fn delete_error(&self, id: &RemoteErrorId) -> Result<(), MonikaError> {
        Ok(self.remove_error(id).await?)
    }
}
