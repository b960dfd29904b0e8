//! End-to-end tests for the full monikad stack.
//!
//! Each test wires the mock provider, the simulated devices, the real driver
//! service and the real axum router, and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`; no TCP port is bound. The pipeline tests
//! additionally drive the update worker against a wiremock gateway.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use monika_adapter_gateway_reqwest::GatewayClient;
use monika_adapter_http_axum::router;
use monika_adapter_http_axum::state::AppState;
use monika_adapter_mock::{MockDevice, MockProvider, MockSettings, iolet_stopped_checker};
use monika_app::ports::DeviceProvider;
use monika_app::reconciler::ErrorReconciler;
use monika_app::services::driver_service::DriverService;
use monika_app::update_worker::{self, Processed, UpdateReceiver, UpdateWorker};
use monika_domain::kind::DeviceType;

struct Driver {
    app: axum::Router,
    mocks: Vec<MockDevice>,
    changes: UpdateReceiver,
}

/// Build a fully-wired router over two mock devices.
async fn driver() -> Driver {
    let provider = MockProvider::new(DeviceType::GenericDummy, 2);
    provider.fetch_devices().await.unwrap();

    let (queue, changes) = update_worker::channel();
    let settings = MockSettings {
        generic_modules: 1,
        iolets_per_module: 4,
        ..MockSettings::default()
    };
    let mocks = provider
        .devices()
        .into_iter()
        .map(|device| MockDevice::attach(device, queue.clone(), settings))
        .collect();

    let app = router::build(AppState::new(DriverService::new(provider)));
    Driver {
        app,
        mocks,
        changes,
    }
}

async fn send(app: &axum::Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn gateway() -> (MockServer, Arc<GatewayClient>) {
    let server = MockServer::start().await;
    let client = GatewayClient::new(&server.uri(), Duration::from_secs(2)).unwrap();
    (server, Arc::new(client))
}

// ---------------------------------------------------------------------------
// Read surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let driver = driver().await;
    let resp = driver
        .app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_list_every_mock_device() {
    let driver = driver().await;

    let (status, body) = send(&driver.app, Method::GET, "/devices").await;

    assert_eq!(status, StatusCode::OK);
    let devices = body.as_array().unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0]["deviceId"], "0");
    assert_eq!(devices[1]["name"], "Mock Device 1");
    assert_eq!(devices[0]["controls"], json!(["BOOT", "SHUTDOWN", "REBOOT"]));
    assert_eq!(devices[0]["moduleTypes"], json!(["AV"]));
}

#[tokio::test]
async fn should_list_modules_of_a_device() {
    let driver = driver().await;

    let (status, body) = send(&driver.app, Method::GET, "/devices/1/modules").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|module| module["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Video Module", "Audio Module", "Mock Module 0"]);
}

#[tokio::test]
async fn should_filter_iolets_by_type() {
    let driver = driver().await;

    let (status, body) = send(
        &driver.app,
        Method::GET,
        "/devices/0/modules/AV/2/iolets/IP-AUDIO-OUT",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let iolets = body.as_array().unwrap();
    assert_eq!(iolets.len(), 4);
    assert_eq!(iolets[0]["name"], "Audio Output 1");
    assert_eq!(iolets[0]["controls"], json!(["START", "STOP"]));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_device() {
    let driver = driver().await;

    let (status, body) = send(&driver.app, Method::GET, "/devices/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Device 42 not found");
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_boot_device_and_enqueue_it() {
    let mut driver = driver().await;

    let (status, _) = send(&driver.app, Method::POST, "/devices/0/BOOT").await;

    assert_eq!(status, StatusCode::OK);
    assert!(driver.mocks[0].device().status().online());
    let queued = driver.changes.try_recv().unwrap();
    assert_eq!(queued.id().as_str(), "0");
}

#[tokio::test]
async fn should_reject_control_outside_vocabulary() {
    let mut driver = driver().await;

    let (status, _) = send(&driver.app, Method::POST, "/devices/0/EXPLODE").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(driver.changes.try_recv().is_err());
}

#[tokio::test]
async fn should_reject_control_without_registered_action() {
    let driver = driver().await;

    let (status, body) = send(&driver.app, Method::POST, "/devices/0/modules/AV/1/RESTART").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no such action defined: RESTART");
}

#[tokio::test]
async fn should_start_iolet_through_full_path() {
    let driver = driver().await;

    let (status, _) = send(
        &driver.app,
        Method::POST,
        "/devices/1/modules/AV/3/iolets/IP-VIDEO-OUT/1/START",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &driver.app,
        Method::GET,
        "/devices/1/modules/AV/3/iolets/IP-VIDEO-OUT/1",
    )
    .await;
    assert_eq!(body["name"], "Video Out 1");
    assert_eq!(body["status"], 6);
}

// ---------------------------------------------------------------------------
// Update pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_publish_update_after_control() {
    let mut driver = driver().await;
    let (server, client) = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/notify/update"))
        .and(body_partial_json(json!({"deviceId": "0", "status": 1})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let mut worker = UpdateWorker::new(ErrorReconciler::new(Arc::clone(&client)), client);

    send(&driver.app, Method::POST, "/devices/0/BOOT").await;
    let device = driver.changes.try_recv().unwrap();
    let processed = worker.process(&device).await;

    assert!(matches!(
        processed,
        Processed::Updated {
            published: true,
            ..
        }
    ));
    assert_eq!(worker.process(&device).await, Processed::Unchanged);
}

#[tokio::test]
async fn should_report_then_clear_stopped_iolet() {
    let mut driver = driver().await;
    let (server, client) = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/notify/update"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/notify/error"))
        .and(body_partial_json(json!({
            "deviceId": "0",
            "moduleId": "1",
            "ioletId": "1",
            "message": "IOlet Video Input 1 stopped!"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"errorId": 7})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/notify/error/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut reconciler = ErrorReconciler::new(Arc::clone(&client));
    reconciler.set_iolet_checker(iolet_stopped_checker);
    let mut worker = UpdateWorker::new(reconciler, client);

    let iolet = "/devices/0/modules/AV/1/iolets/IP-VIDEO-IN/1";
    for control in ["START", "STOP", "START"] {
        let (status, _) = send(&driver.app, Method::POST, &format!("{iolet}/{control}")).await;
        assert_eq!(status, StatusCode::OK);
        let device = driver.changes.try_recv().unwrap();
        worker.process(&device).await;
    }

    assert_eq!(worker.reconciler().live_faults(), 0);
}

#[tokio::test]
async fn should_keep_publishing_when_error_report_fails() {
    let driver = driver().await;
    let (server, client) = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/notify/update"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/notify/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut reconciler = ErrorReconciler::new(Arc::clone(&client));
    reconciler.set_iolet_checker(iolet_stopped_checker);
    let mut worker = UpdateWorker::new(reconciler, client);

    let device = driver.mocks[0].device();
    let iolet = device.module("2").unwrap().iolet("3").unwrap();
    iolet.update_status(|status| status.set_enabled(true));
    let processed = worker.process(device).await;

    let Processed::Updated { faults, published } = processed else {
        panic!("expected an update, got {processed:?}");
    };
    assert!(published);
    assert_eq!(faults.failed, 1);
    assert_eq!(worker.reconciler().live_faults(), 0);
}
