//! JSON REST handlers for the device resource.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use mokka_core::{CreateDeviceJob, DeviceJob, DeviceSettings, DeviceStatus, EditDeviceStatus};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /device/settings`
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<DeviceSettings>, ApiError> {
    Ok(Json(state.settings.load().await?))
}

/// `PUT /device/settings`
///
/// Replaces the whole settings record and echoes what was persisted.
pub async fn put_settings(
    State(state): State<AppState>,
    Json(new_settings): Json<DeviceSettings>,
) -> Result<Json<DeviceSettings>, ApiError> {
    state.settings.save(&new_settings).await?;
    Ok(Json(state.settings.load().await?))
}

/// `GET /device/status`
pub async fn get_status(State(state): State<AppState>) -> Result<Json<DeviceStatus>, ApiError> {
    Ok(Json(state.machine.status().await?))
}

/// `PUT /device/status`
///
/// Requests a runtime state change. The change is applied through the
/// actuation path and, for power-on, completes in the background, so the
/// response is `202 Accepted` with the requested state echoed back.
pub async fn put_status(
    State(state): State<AppState>,
    Json(edit): Json<EditDeviceStatus>,
) -> Result<(StatusCode, Json<EditDeviceStatus>), ApiError> {
    state
        .machine
        .set_runtime_state(edit.coffee_machine_runtime_state)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(edit)))
}

/// `POST /device/job`
///
/// Starts a brew job and returns the job record merged from the request and
/// the current settings snapshot.
pub async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateDeviceJob>,
) -> Result<(StatusCode, Json<DeviceJob>), ApiError> {
    state.machine.start_job(&request).await?;

    let settings = state.settings.load().await?;
    let job = DeviceJob::assemble(
        state.next_job_id(),
        chrono::Utc::now().timestamp_millis(),
        &request,
        &settings,
    );
    Ok((StatusCode::CREATED, Json(job)))
}
