//! Request integrity hashing
//!
//! The query-string hash ("qsh") binds a signed token to one request: it is
//! the SHA-256 of `METHOD&path`, hex encoded. Signers embed it in the token,
//! the server recomputes it from the request it actually received.

use sha2::{Digest, Sha256};

/// Compute the query-string hash for a method and URL path
pub fn generate_qsh(method: &str, path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"&");
    hasher.update(path.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the query-string hash of an inbound request (query excluded)
pub fn request_qsh<B>(request: &axum::http::Request<B>) -> String {
    generate_qsh(request.method().as_str(), request.uri().path())
}
