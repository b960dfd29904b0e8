//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use monika_app::ports::DeviceProvider;
use monika_domain::control::DeviceControl;
use monika_domain::device::DeviceInfo;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /devices`
pub async fn list<P>(State(state): State<AppState<P>>) -> Json<Vec<DeviceInfo>>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    Json(state.driver.devices().iter().map(|d| d.info()).collect())
}

/// `GET /devices/{device_id}`
pub async fn get<P>(
    State(state): State<AppState<P>>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceInfo>, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    let device = state.driver.device(&device_id)?;
    Ok(Json(device.info()))
}

/// `POST /devices/{device_id}/{control}`
pub async fn control<P>(
    State(state): State<AppState<P>>,
    Path((device_id, control)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    let control: DeviceControl = control.parse()?;
    state.driver.run_device_control(&device_id, control)?;
    Ok(StatusCode::OK)
}
