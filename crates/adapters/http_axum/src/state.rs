//! Shared application state for axum handlers.

use std::sync::Arc;

use monika_app::ports::DeviceProvider;
use monika_app::services::driver_service::DriverService;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the provider itself does not need to
/// be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<P> {
    /// Lookups and control dispatch.
    pub driver: Arc<DriverService<P>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
        }
    }
}

impl<P> AppState<P>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    /// Create a new application state from the driver service.
    pub fn new(driver: DriverService<P>) -> Self {
        Self::from_arc(Arc::new(driver))
    }

    /// Create a new application state from a pre-wrapped service.
    #[must_use]
    pub fn from_arc(driver: Arc<DriverService<P>>) -> Self {
        Self { driver }
    }
}
