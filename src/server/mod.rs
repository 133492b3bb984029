//! REST server: routes, response shaping and CLI argument building

pub mod command;
pub mod http;
pub mod response;
#[allow(clippy::module_inception)]
pub mod server;

pub use http::{api_routes, create_router, unmarshal_request, AppState};
pub use response::{send_error, send_success, ErrorResponse, JSON_CONTENT_TYPE};
pub use server::RestServer;
