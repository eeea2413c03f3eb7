mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_app;
use common::detector::ScriptedDetector;
use common::http::{request, response_json};

#[tokio::test]
async fn it_health_live_and_ready() {
    let app = spawn_test_app(vec![Box::new(ScriptedDetector::no_faces())]);

    let live = request(&app.app, Method::GET, "/health/live", None).await;
    assert_eq!(live.status(), StatusCode::OK);

    let ready = request(&app.app, Method::GET, "/health/ready", None).await;
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn it_health_reports_detector_pool() {
    let app = spawn_test_app(vec![Box::new(ScriptedDetector::no_faces())]);

    let resp = request(&app.app, Method::GET, "/health", None).await;
    let (status, _, body) = response_json(resp).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["detector"]["pool_size"], 1);
    assert_eq!(body["detector"]["closed"], false);
}

#[tokio::test]
async fn it_ready_degrades_after_pool_close() {
    let app = spawn_test_app(vec![Box::new(ScriptedDetector::no_faces())]);

    app.state.detector_pool().close().await;

    let ready = request(&app.app, Method::GET, "/health/ready", None).await;
    assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);
}
