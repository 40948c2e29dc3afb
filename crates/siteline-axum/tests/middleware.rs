use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::routing::{any, get};
use axum::{middleware, Json, Router};
use serial_test::serial;
use siteline_core::{
    BeaconRequest, PartialOptions, Siteline, SitelineOptions, Transport, TransportError,
};
use std::env;
use std::io;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

const VALID_KEY: &str = "siteline_secret_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const ENV_VARS: [&str; 3] = ["SITELINE_WEBSITE_KEY", "SITELINE_ENDPOINT", "SITELINE_DEBUG"];

struct RecordingTransport {
    bodies: mpsc::UnboundedSender<serde_json::Value>,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post(
        &self,
        request: BeaconRequest,
        _cancel: CancellationToken,
    ) -> Result<u16, TransportError> {
        let _ = self.bodies.send(request.body_json()?);
        Ok(200)
    }
}

/// Replace the shared client with one that records request bodies
fn install_recording_client() -> mpsc::UnboundedReceiver<serde_json::Value> {
    siteline_axum::reset();
    let (tx, rx) = mpsc::unbounded_channel();
    let options = SitelineOptions::new(VALID_KEY)
        .sdk("siteline-axum")
        .integration_type("axum");
    let client =
        Siteline::with_transport(options, Arc::new(RecordingTransport { bodies: tx })).unwrap();
    siteline_axum::init_with(client);
    rx
}

fn app() -> Router {
    Router::new()
        .route("/test", any(|| async { "ok" }))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Not found"}))) }),
        )
        .route("/created", get(|| async { (StatusCode::CREATED, "Hello World") }))
        .route("/redirect", get(|| async { Redirect::temporary("https://redirect.com") }))
        .layer(middleware::from_fn(siteline_axum::track_pageview))
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", "example.com")
        .header("user-agent", "Mozilla/5.0")
        .header("referer", "https://referrer.com")
        .header("x-forwarded-for", "192.168.1.1")
        .body(Body::empty())
        .unwrap()
}

struct EnvGuard(Vec<(&'static str, Option<String>)>);

impl EnvGuard {
    fn clear() -> Self {
        let saved = ENV_VARS.iter().map(|name| (*name, env::var(name).ok())).collect();
        for name in ENV_VARS {
            env::remove_var(name);
        }
        siteline_axum::reset();
        Self(saved)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in &self.0 {
            match value {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
        }
        siteline_axum::reset();
    }
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
#[serial]
async fn test_tracks_request_metadata() {
    let _env = EnvGuard::clear();
    let mut bodies = install_recording_client();

    let response = app().oneshot(get_request("/test?q=1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = bodies.recv().await.unwrap();
    assert_eq!(body["url"], "http://example.com/test?q=1");
    assert_eq!(body["method"], "GET");
    assert_eq!(body["status"], 200);
    assert_eq!(body["userAgent"], "Mozilla/5.0");
    assert_eq!(body["ref"], "https://referrer.com");
    assert_eq!(body["ip"], "192.168.1.1");
    assert_eq!(body["integration_type"], "axum");
    assert!(body["duration"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
#[serial]
async fn test_preserves_handler_responses() {
    let _env = EnvGuard::clear();
    let mut bodies = install_recording_client();

    let response = app().oneshot(get_request("/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json, serde_json::json!({"error": "Not found"}));
    assert_eq!(bodies.recv().await.unwrap()["status"], 404);

    let response = app().oneshot(get_request("/created")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Hello World");
    assert_eq!(bodies.recv().await.unwrap()["status"], 201);

    let response = app().oneshot(get_request("/redirect")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(bodies.recv().await.unwrap()["status"], 307);
}

#[tokio::test]
#[serial]
async fn test_handles_missing_headers_and_methods() {
    let _env = EnvGuard::clear();
    let mut bodies = install_recording_client();

    for method in ["GET", "POST", "PUT", "DELETE", "PATCH"] {
        let request = Request::builder()
            .method(method)
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = bodies.recv().await.unwrap();
        assert_eq!(body["method"], method);
        assert!(body["userAgent"].is_null());
        assert!(body["ref"].is_null());
        assert!(body["ip"].is_null());
    }
}

#[tokio::test]
#[serial]
async fn test_missing_key_warns_and_serves() {
    let _env = EnvGuard::clear();
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let response = app().oneshot(get_request("/test")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(siteline_axum::is_initialized());
    assert!(siteline_axum::client().is_none());
    assert!(logs
        .contents()
        .contains("[Siteline] Missing websiteKey in config or environment"));
}

#[tokio::test]
#[serial]
async fn test_invalid_key_warns_and_serves() {
    let _env = EnvGuard::clear();
    let logs = CapturedLogs::default();
    let _guard = logs.install();

    let client = siteline_axum::init(PartialOptions {
        website_key: Some("siteline_secret_abc".to_string()),
        ..Default::default()
    });

    assert!(client.is_none());
    assert!(logs
        .contents()
        .contains("[Siteline] Failed to initialize: Invalid websiteKey format"));

    let response = app().oneshot(get_request("/test")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
#[serial]
fn test_initializes_from_environment() {
    let _env = EnvGuard::clear();
    env::set_var("SITELINE_WEBSITE_KEY", VALID_KEY);
    env::set_var("SITELINE_DEBUG", "true");

    let client = siteline_axum::init(PartialOptions::default()).unwrap();

    assert!(client.is_debug());
    assert_eq!(client.config().sdk(), "siteline-axum");
    assert_eq!(client.config().integration_type(), "axum");
}

#[test]
#[serial]
fn test_explicit_config_preferred_over_environment() {
    let _env = EnvGuard::clear();
    env::set_var(
        "SITELINE_WEBSITE_KEY",
        format!("gptrends_secret_{}", "z".repeat(32)),
    );

    let client = siteline_axum::init(PartialOptions {
        website_key: Some(VALID_KEY.to_string()),
        endpoint: Some("https://custom.example.com/intake".to_string()),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(client.config().website_key(), VALID_KEY);
    assert_eq!(
        client.config().endpoint().as_str(),
        "https://custom.example.com/intake"
    );
}

#[test]
#[serial]
fn test_repeated_initialization_is_noop() {
    let _env = EnvGuard::clear();

    let first = siteline_axum::init(PartialOptions {
        website_key: Some(VALID_KEY.to_string()),
        ..Default::default()
    })
    .unwrap();
    assert!(!first.is_debug());

    let second = siteline_axum::init(PartialOptions {
        website_key: Some(VALID_KEY.to_string()),
        debug: Some(true),
        ..Default::default()
    })
    .unwrap();
    assert!(!second.is_debug());

    siteline_axum::reset();
    assert!(!siteline_axum::is_initialized());

    let third = siteline_axum::init(PartialOptions {
        website_key: Some(VALID_KEY.to_string()),
        debug: Some(true),
        ..Default::default()
    })
    .unwrap();
    assert!(third.is_debug());
}

#[tokio::test]
#[serial]
async fn test_track_with_explicit_client() {
    let _env = EnvGuard::clear();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = Siteline::with_transport(
        SitelineOptions::new(VALID_KEY),
        Arc::new(RecordingTransport { bodies: tx }),
    )
    .unwrap();

    let app = Router::new()
        .route("/", get(|| async { "home".into_response() }))
        .layer(middleware::from_fn(move |req: Request<Body>, next: middleware::Next| {
            let client = client.clone();
            async move { siteline_axum::track_with(&client, req, next).await }
        }));

    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(rx.recv().await.unwrap()["url"], "http://example.com/");
    assert!(!siteline_axum::is_initialized());
}
