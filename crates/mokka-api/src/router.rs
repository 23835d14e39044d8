//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use mokka_hardware::CoffeeMachine;
    use mokka_hardware::config::{MachineConfig, ReleaseConfig, SamplingConfig};
    use mokka_hardware::devices::{AnyDacBus, AnyPinController};
    use mokka_hardware::mock::{MockDacBus, MockPinController, MockPinHandle};
    use mokka_storage::SettingsStore;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::ServiceExt;

    struct Fixture {
        router: Router,
        pins: MockPinHandle,
        layout: mokka_hardware::config::PinLayout,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let (pins, pin_handle) = MockPinController::new();
        let (dac, _dac_handle) = MockDacBus::new();
        let config = MachineConfig {
            sampling: SamplingConfig::default().samples_per_line(1).check_cycles(1),
            release: ReleaseConfig::default()
                .poll_interval(Duration::from_secs(2))
                .timeout(Duration::from_secs(45)),
            ..MachineConfig::default()
        };
        let layout = config.layout;
        let machine = CoffeeMachine::new(
            AnyPinController::Mock(pins),
            AnyDacBus::Mock(dac),
            config,
        );

        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::new(dir.path().join("settings.json"));

        Fixture {
            router: build(AppState::new(machine, settings)),
            pins: pin_handle,
            layout,
            _dir: dir,
        }
    }

    impl Fixture {
        fn make_ready(&self) {
            self.pins.set_levels(&[
                (self.layout.inputs.one_dose, true),
                (self.layout.inputs.two_doses, true),
            ]);
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let fx = fixture();
        let response = fx.router.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_settings_initialize_unconfigured() {
        let fx = fixture();
        let response = fx.router.oneshot(get("/device/settings")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["coffee_machine_id"], -1);
        assert_eq!(body["price"], -1);
    }

    #[tokio::test]
    async fn test_put_settings_persists_whole_record() {
        let fx = fixture();
        let payload = json!({
            "coffee_machine_id": 7,
            "coffee_product_id": 3,
            "price": 250
        });

        let response = fx
            .router
            .clone()
            .oneshot(with_json("PUT", "/device/settings", payload.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, payload);

        let response = fx.router.oneshot(get("/device/settings")).await.unwrap();
        assert_eq!(body_json(response).await, payload);
    }

    #[tokio::test]
    async fn test_status_of_ready_machine() {
        let fx = fixture();
        fx.make_ready();

        let response = fx.router.oneshot(get("/device/status")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["device_ready"], true);
        assert_eq!(body["coffee_machine_runtime_state"], 1);
        assert_eq!(body["water_tank_ready"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_job_returns_merged_record() {
        let fx = fixture();
        fx.make_ready();

        // Configure settings first so the job record carries them.
        fx.router
            .clone()
            .oneshot(with_json(
                "PUT",
                "/device/settings",
                json!({"coffee_machine_id": 7, "coffee_product_id": 3, "price": 250}),
            ))
            .await
            .unwrap();

        let response = fx
            .router
            .oneshot(with_json(
                "POST",
                "/device/job",
                json!({"coffee_strength_in_percent": 60, "water_in_percent": 80, "doses": 1}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["coffee_machine_id"], 7);
        assert_eq!(body["price"], 250);
        assert_eq!(body["doses"], 1);
        assert_eq!(body["square_date"], Value::Null);
    }

    #[tokio::test]
    async fn test_create_job_with_bad_doses_is_bad_request() {
        let fx = fixture();

        let response = fx
            .router
            .oneshot(with_json(
                "POST",
                "/device/job",
                json!({"coffee_strength_in_percent": 60, "water_in_percent": 80, "doses": 3}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains('3'));
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_device_is_conflict() {
        let fx = fixture();
        // LEDs stay dark: the job's deferred release holds the gate.

        let response = fx
            .router
            .clone()
            .oneshot(with_json(
                "POST",
                "/device/job",
                json!({"coffee_strength_in_percent": 60, "water_in_percent": 80, "doses": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = fx.router.oneshot(get("/device/status")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_status_is_accepted() {
        let fx = fixture();

        let response = fx
            .router
            .oneshot(with_json(
                "PUT",
                "/device/status",
                json!({"coffee_machine_runtime_state": 1}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = body_json(response).await;
        assert_eq!(body["coffee_machine_runtime_state"], 1);
    }

    #[tokio::test]
    async fn test_put_status_rejects_startup() {
        let fx = fixture();

        let response = fx
            .router
            .oneshot(with_json(
                "PUT",
                "/device/status",
                json!({"coffee_machine_runtime_state": 3}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
