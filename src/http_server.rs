//! HTTP server implementation using Axum.

use crate::activity::{Activities, ActivityRegistry};
use crate::config::ServerConfig;
use crate::credentials::JsonFileStore;
use crate::error::ApiError;
use crate::session::{AuthError, AuthStatus, Session};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// Request/Response types
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

type Handled = Result<Json<MessageResponse>, ApiError>;
type HandledWithSession = Result<(SignedCookieJar, Json<MessageResponse>), ApiError>;

/// Build the application router. Static assets are served from `static_dir`.
pub fn build_router(state: AppState, static_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/activities", get(list_activities))
        .route("/activities/:activity_name/signup", post(signup))
        .route("/activities/:activity_name/unregister", delete(unregister))
        .route("/auth/status", get(auth_status))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        // Health check
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until Ctrl-C or SIGTERM.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = AppState::new(
        ActivityRegistry::seeded(),
        Arc::new(JsonFileStore::new(config.teachers_file.clone())),
        config.signing_key(),
    );
    if !config.teachers_file.exists() {
        warn!(
            "Teacher credential file {} does not exist; logins will fail",
            config.teachers_file.display()
        );
    }
    let app = build_router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn root() -> Redirect {
    Redirect::temporary("/static/index.html")
}

async fn list_activities(State(state): State<AppState>) -> Json<Activities> {
    Json(state.registry.list().await)
}

async fn auth_status(jar: SignedCookieJar) -> Json<AuthStatus> {
    Json(Session::from_jar(&jar).status())
}

async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(req): Json<LoginRequest>,
) -> HandledWithSession {
    let mut session = Session::from_jar(&jar);
    match state
        .authorizer
        .authenticate(&mut session, &req.username, &req.password)
        .await
    {
        Ok(()) => {}
        Err(AuthError::InvalidCredentials) => {
            warn!("Rejected login for {}", req.username);
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    }

    info!("Teacher logged in: {}", req.username);
    Ok((
        session.save(jar),
        MessageResponse::new(format!("Logged in as {}", req.username)),
    ))
}

async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Json<MessageResponse>) {
    let mut session = Session::from_jar(&jar);
    if let Some(username) = &session.username {
        info!("Teacher logged out: {}", username);
    }
    session.logout();
    (session.save(jar), MessageResponse::new("Logged out"))
}

async fn signup(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Handled {
    Session::from_jar(&jar).require_admin()?;

    state.registry.enroll(&activity_name, &query.email).await?;
    info!("Signed up {} for {}", query.email, activity_name);
    Ok(MessageResponse::new(format!(
        "Signed up {} for {}",
        query.email, activity_name
    )))
}

async fn unregister(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Handled {
    Session::from_jar(&jar).require_admin()?;

    state.registry.unenroll(&activity_name, &query.email).await?;
    info!("Unregistered {} from {}", query.email, activity_name);
    Ok(MessageResponse::new(format!(
        "Unregistered {} from {}",
        query.email, activity_name
    )))
}
