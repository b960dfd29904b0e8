//! JSON REST handlers for iolets.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use monika_app::ports::DeviceProvider;
use monika_domain::control::IoletControl;
use monika_domain::iolet::IoletInfo;
use monika_domain::kind::{IoletType, ModuleType};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ModulePath {
    pub device_id: String,
    pub module_type: String,
    pub module_id: String,
}

#[derive(Deserialize)]
pub struct IoletTypePath {
    pub device_id: String,
    pub module_type: String,
    pub module_id: String,
    pub iolet_type: String,
}

#[derive(Deserialize)]
pub struct IoletPath {
    pub device_id: String,
    pub module_type: String,
    pub module_id: String,
    pub iolet_type: String,
    pub iolet_id: String,
}

#[derive(Deserialize)]
pub struct IoletControlPath {
    pub device_id: String,
    pub module_type: String,
    pub module_id: String,
    pub iolet_type: String,
    pub iolet_id: String,
    pub control: String,
}

/// `GET .../modules/{module_type}/{module_id}/iolets`
pub async fn list<P>(
    State(state): State<AppState<P>>,
    Path(path): Path<ModulePath>,
) -> Result<Json<Vec<IoletInfo>>, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    path.module_type.parse::<ModuleType>()?;
    let iolets = state.driver.iolets(&path.device_id, &path.module_id)?;
    Ok(Json(iolets.iter().map(|i| i.info()).collect()))
}

/// `GET .../iolets/{iolet_type}`
pub async fn list_by_type<P>(
    State(state): State<AppState<P>>,
    Path(path): Path<IoletTypePath>,
) -> Result<Json<Vec<IoletInfo>>, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    path.module_type.parse::<ModuleType>()?;
    let iolet_type: IoletType = path.iolet_type.parse()?;
    let iolets = state
        .driver
        .iolets_by_type(&path.device_id, &path.module_id, iolet_type)?;
    Ok(Json(iolets.iter().map(|i| i.info()).collect()))
}

/// `GET .../iolets/{iolet_type}/{iolet_id}`
pub async fn get<P>(
    State(state): State<AppState<P>>,
    Path(path): Path<IoletPath>,
) -> Result<Json<IoletInfo>, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    path.module_type.parse::<ModuleType>()?;
    path.iolet_type.parse::<IoletType>()?;
    let iolet = state
        .driver
        .iolet(&path.device_id, &path.module_id, &path.iolet_id)?;
    Ok(Json(iolet.info()))
}

/// `POST .../iolets/{iolet_type}/{iolet_id}/{control}`
pub async fn control<P>(
    State(state): State<AppState<P>>,
    Path(path): Path<IoletControlPath>,
) -> Result<StatusCode, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    path.module_type.parse::<ModuleType>()?;
    path.iolet_type.parse::<IoletType>()?;
    let control: IoletControl = path.control.parse()?;
    state.driver.run_iolet_control(
        &path.device_id,
        &path.module_id,
        &path.iolet_id,
        control,
    )?;
    Ok(StatusCode::OK)
}
