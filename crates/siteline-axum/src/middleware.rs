//! Pageview tracking middleware

use axum::extract::{ConnectInfo, Request};
use axum::http::{header, HeaderMap, Uri};
use axum::middleware::Next;
use axum::response::Response;
use siteline_core::{PageviewData, PartialOptions, Siteline};
use std::net::SocketAddr;
use tokio::time::Instant;

use crate::global;
use crate::ip::client_ip;

/// Request details captured before the handler consumes the request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMetadata {
    pub url: String,
    pub method: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
}

impl RequestMetadata {
    pub fn from_request(request: &Request) -> Self {
        let headers = request.headers();
        let ip = client_ip(headers).or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        Self {
            url: absolute_url(request.uri(), headers),
            method: request.method().as_str().to_string(),
            user_agent: header_string(headers, header::USER_AGENT.as_str()),
            referer: header_string(headers, header::REFERER.as_str()),
            ip,
        }
    }

    pub fn into_pageview(self, status: u16, duration_ms: f64) -> PageviewData {
        PageviewData {
            url: self.url,
            method: self.method,
            status: i64::from(status),
            duration: duration_ms,
            user_agent: self.user_agent,
            referer: self.referer,
            ip: self.ip,
        }
    }
}

/// Track every request that passes through
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
///
/// siteline_axum::init(Default::default());
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "hello" }))
///     .layer(middleware::from_fn(siteline_axum::track_pageview));
/// ```
///
/// Without a prior [`init`](crate::init) call, the shared client is built
/// from the environment on the first request. The response from the inner
/// service is returned untouched.
pub async fn track_pageview(request: Request, next: Next) -> Response {
    let Some(client) = global::init(PartialOptions::default()) else {
        return next.run(request).await;
    };

    track_with(&client, request, next).await
}

/// Same as [`track_pageview`], with an explicit client
pub async fn track_with(client: &Siteline, request: Request, next: Next) -> Response {
    let metadata = RequestMetadata::from_request(&request);
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    client.track(metadata.into_pageview(response.status().as_u16(), duration_ms));

    response
}

/// Rebuild `scheme://host/path?query` for origin-form request targets
fn absolute_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let host = first_value(headers, "x-forwarded-host")
        .or_else(|| header_string(headers, header::HOST.as_str()));
    let Some(host) = host else {
        return uri.to_string();
    };

    let scheme = first_value(headers, "x-forwarded-proto").unwrap_or_else(|| "http".to_string());
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    format!("{}://{}{}", scheme, host, path)
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Leftmost entry of a comma-separated proxy header
fn first_value(headers: &HeaderMap, name: &str) -> Option<String> {
    header_string(headers, name)
        .and_then(|value| value.split(',').next().map(|v| v.trim().to_string()))
        .filter(|value| !value.is_empty())
}
