//! HTTP API
//!
//! Each block-volume route turns its path parameters (and body, where the
//! operation takes one) into a gluster-block argument vector, runs it, and
//! forwards the CLI's JSON verbatim. Any command failure becomes a 500 with
//! the error envelope; the CLI output is never partially returned.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Response,
    routing::get,
    Router,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::{RequestBodyLimitLayer, ResponseBody};

use crate::common::{
    auth_middleware, request_tracing_middleware, AuthState, Config, Error, Result,
};
use crate::executor::CommandRunner;
use crate::server::command::{
    create_args, delete_args, info_args, list_args, modify_args, version_args,
    CreateBlockVolumeRequest, DeleteBlockVolumeRequest, ModifyBlockVolumeRequest,
};
use crate::server::response::{send_error, send_success};

/// Shared state for HTTP handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub cli_path: Arc<str>,
    pub runner: Arc<dyn CommandRunner>,
}

impl AppState {
    pub fn new(cli_path: impl Into<Arc<str>>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            cli_path: cli_path.into(),
            runner,
        }
    }

    /// Run the CLI and shape the outcome into a response
    async fn run_cli(&self, args: Vec<String>) -> Response {
        match self.runner.run(&self.cli_path, &args).await {
            Ok(out) => send_success(StatusCode::OK, out),
            Err(e) => send_error(StatusCode::INTERNAL_SERVER_ERROR, Some(&Error::Exec(e))),
        }
    }
}

/// Decode a JSON request body
pub fn unmarshal_request<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Like [`unmarshal_request`], but an empty body yields `T::default()`
fn unmarshal_optional<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    unmarshal_request(body)
}

fn bad_request(err: Error) -> Response {
    tracing::debug!(error = %err, "Rejecting malformed request");
    send_error(StatusCode::BAD_REQUEST, Some(&err))
}

async fn ping() -> Response {
    send_success(StatusCode::NO_CONTENT, Bytes::new())
}

async fn version(State(state): State<AppState>) -> Response {
    state.run_cli(version_args()).await
}

async fn block_volume_list(
    State(state): State<AppState>,
    Path(host_volume): Path<String>,
) -> Response {
    state.run_cli(list_args(&host_volume)).await
}

async fn block_volume_info(
    State(state): State<AppState>,
    Path((host_volume, block_name)): Path<(String, String)>,
) -> Response {
    state.run_cli(info_args(&host_volume, &block_name)).await
}

async fn block_volume_create(
    State(state): State<AppState>,
    Path((host_volume, block_name)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let req: CreateBlockVolumeRequest = match unmarshal_request(&body) {
        Ok(req) => req,
        Err(e) => return bad_request(e),
    };
    state
        .run_cli(create_args(&host_volume, &block_name, &req))
        .await
}

async fn block_volume_delete(
    State(state): State<AppState>,
    Path((host_volume, block_name)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let req: DeleteBlockVolumeRequest = match unmarshal_optional(&body) {
        Ok(req) => req,
        Err(e) => return bad_request(e),
    };
    state
        .run_cli(delete_args(&host_volume, &block_name, &req))
        .await
}

async fn block_volume_modify(
    State(state): State<AppState>,
    Path((host_volume, block_name)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let args = unmarshal_request::<ModifyBlockVolumeRequest>(&body)
        .and_then(|req| modify_args(&host_volume, &block_name, &req));
    match args {
        Ok(args) => state.run_cli(args).await,
        Err(e) => bad_request(e),
    }
}

/// Re-emit a 413 from the body limit (or a body extractor) in the error
/// envelope
async fn payload_too_large_envelope(response: Response<ResponseBody<Body>>) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response.map(Body::new);
    }
    send_error(
        StatusCode::PAYLOAD_TOO_LARGE,
        Some(&Error::InvalidRequest("request body too large".to_string())),
    )
}

/// Block-volume and service routes, without middleware
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/v1/version", get(version))
        .route("/v1/blockvolumes/:hostvolume", get(block_volume_list))
        .route(
            "/v1/blockvolumes/:hostvolume/:blockname",
            get(block_volume_info)
                .post(block_volume_create)
                .put(block_volume_modify)
                .delete(block_volume_delete),
        )
        .with_state(state)
}

/// Creates the full router: routes, body limit, auth and request tracing.
pub fn create_router(config: &Config, runner: Arc<dyn CommandRunner>) -> Router {
    let state = AppState::new(config.cli_path.as_str(), runner);
    let auth = AuthState::new(config.auth.clone());

    api_routes(state).layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_tracing_middleware))
            .layer(middleware::from_fn_with_state(auth, auth_middleware))
            .layer(middleware::map_response(payload_too_large_envelope))
            .layer(RequestBodyLimitLayer::new(config.body_limit)),
    )
}
