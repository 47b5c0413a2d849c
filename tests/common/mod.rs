use activity_roster::activity::ActivityRegistry;
use activity_roster::config::key_from_secret;
use activity_roster::credentials::{CredentialStore, Credentials};
use activity_roster::http_server::build_router;
use activity_roster::state::AppState;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use std::path::Path;
use std::sync::Arc;

pub fn app_with_store(store: Arc<dyn CredentialStore>, static_dir: &Path) -> Router {
    let state = AppState::new(
        ActivityRegistry::seeded(),
        store,
        key_from_secret("test-secret"),
    );
    build_router(state, static_dir)
}

pub fn app() -> Router {
    app_with_store(
        Arc::new(Credentials::from_pairs([
            ("teacher1", "pw1"),
            ("teacher2", "pw2"),
        ])),
        Path::new("static"),
    )
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn json_request(
    method: &str,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

/// `name=value` part of the response's session cookie, if one was set.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("session="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}
