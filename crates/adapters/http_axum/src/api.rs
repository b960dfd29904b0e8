//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod iolets;
#[allow(clippy::missing_errors_doc)]
pub mod modules;

use axum::Router;
use axum::routing::{get, post};

use monika_app::ports::DeviceProvider;

use crate::state::AppState;

/// Build the `/devices` routes.
///
/// Path segments mirror the hierarchy; the module and iolet type segments
/// are validated but lookups go by id.
pub fn routes<P>() -> Router<AppState<P>>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    Router::new()
        // Devices
        .route("/devices", get(devices::list::<P>))
        .route("/devices/{device_id}", get(devices::get::<P>))
        .route("/devices/{device_id}/{control}", post(devices::control::<P>))
        // Modules
        .route("/devices/{device_id}/modules", get(modules::list::<P>))
        .route(
            "/devices/{device_id}/modules/{module_type}",
            get(modules::list_by_type::<P>),
        )
        .route(
            "/devices/{device_id}/modules/{module_type}/{module_id}",
            get(modules::get::<P>),
        )
        .route(
            "/devices/{device_id}/modules/{module_type}/{module_id}/{control}",
            post(modules::control::<P>),
        )
        // IOlets
        .route(
            "/devices/{device_id}/modules/{module_type}/{module_id}/iolets",
            get(iolets::list::<P>),
        )
        .route(
            "/devices/{device_id}/modules/{module_type}/{module_id}/iolets/{iolet_type}",
            get(iolets::list_by_type::<P>),
        )
        .route(
            "/devices/{device_id}/modules/{module_type}/{module_id}/iolets/{iolet_type}/{iolet_id}",
            get(iolets::get::<P>),
        )
        .route(
            "/devices/{device_id}/modules/{module_type}/{module_id}/iolets/{iolet_type}/{iolet_id}/{control}",
            post(iolets::control::<P>),
        )
}
