//! Common utilities and types shared across gluster-block-rest

pub mod auth;
pub mod auth_middleware;
pub mod config;
pub mod error;
pub mod hash;
pub mod tracing_middleware;

pub use auth::{sign_request, AuthResult, Claims, TokenVerifier, DEFAULT_TOKEN_TTL};
pub use auth_middleware::{auth_middleware, is_public_path, AuthState};
pub use config::{AuthConfig, Config, TlsConfig};
pub use error::{Error, ErrorKind, ExecError, ExecErrorKind, Result, UNSET_EXIT_STATUS};
pub use hash::{generate_qsh, request_qsh};
pub use tracing_middleware::{generate_request_id, request_tracing_middleware, REQUEST_ID_HEADER};
