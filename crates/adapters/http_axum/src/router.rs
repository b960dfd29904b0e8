//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use monika_app::ports::DeviceProvider;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves the device routes and a `/health` probe, with a [`TraceLayer`]
/// that logs each HTTP request/response at the `DEBUG` level.
pub fn build<P>(state: AppState<P>) -> Router
where
    P: DeviceProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
