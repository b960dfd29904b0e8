//! JSON REST handlers for modules.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use monika_app::ports::DeviceProvider;
use monika_domain::control::ModuleControl;
use monika_domain::kind::ModuleType;
use monika_domain::module::ModuleInfo;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ModulePath {
    pub device_id: String,
    pub module_type: String,
    pub module_id: String,
}

#[derive(Deserialize)]
pub struct ModuleControlPath {
    pub device_id: String,
    pub module_type: String,
    pub module_id: String,
    pub control: String,
}

/// `GET /devices/{device_id}/modules`
pub async fn list<P>(
    State(state): State<AppState<P>>,
    Path(device_id): Path<String>,
) -> Result<Json<Vec<ModuleInfo>>, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    let modules = state.driver.modules(&device_id)?;
    Ok(Json(modules.iter().map(|m| m.info()).collect()))
}

/// `GET /devices/{device_id}/modules/{module_type}`
pub async fn list_by_type<P>(
    State(state): State<AppState<P>>,
    Path((device_id, module_type)): Path<(String, String)>,
) -> Result<Json<Vec<ModuleInfo>>, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    let module_type: ModuleType = module_type.parse()?;
    let modules = state.driver.modules_by_type(&device_id, module_type)?;
    Ok(Json(modules.iter().map(|m| m.info()).collect()))
}

/// `GET /devices/{device_id}/modules/{module_type}/{module_id}`
pub async fn get<P>(
    State(state): State<AppState<P>>,
    Path(path): Path<ModulePath>,
) -> Result<Json<ModuleInfo>, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    path.module_type.parse::<ModuleType>()?;
    let module = state.driver.module(&path.device_id, &path.module_id)?;
    Ok(Json(module.info()))
}

/// `POST /devices/{device_id}/modules/{module_type}/{module_id}/{control}`
pub async fn control<P>(
    State(state): State<AppState<P>>,
    Path(path): Path<ModuleControlPath>,
) -> Result<StatusCode, ApiError>
where
    P: DeviceProvider + Send + Sync + 'static,
{
    path.module_type.parse::<ModuleType>()?;
    let control: ModuleControl = path.control.parse()?;
    state
        .driver
        .run_module_control(&path.device_id, &path.module_id, control)?;
    Ok(StatusCode::OK)
}
