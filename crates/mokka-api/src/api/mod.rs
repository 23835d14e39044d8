//! JSON REST handlers.

pub mod device;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Routes of the device resource.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/device/settings",
            get(device::get_settings).put(device::put_settings),
        )
        .route(
            "/device/status",
            get(device::get_status).put(device::put_status),
        )
        .route("/device/job", post(device::create_job))
}
