//! # gluster-block-rest
//!
//! A REST API for the `gluster-block` command-line tool:
//! - Each route is translated into one CLI invocation (`--json` mode)
//! - CLI output is relayed verbatim; failures use a fixed JSON envelope
//!   carrying the CLI's exit status
//! - Optional JWT authentication bound to each request by a query-string
//!   hash (qsh)
//!
//! ## Routes
//!
//! ```text
//! GET    /ping                                  204, no body
//! GET    /v1/version                            gluster-block version
//! GET    /v1/blockvolumes/{hostvolume}          gluster-block list
//! GET    /v1/blockvolumes/{hostvolume}/{block}  gluster-block info
//! POST   /v1/blockvolumes/{hostvolume}/{block}  gluster-block create
//! PUT    /v1/blockvolumes/{hostvolume}/{block}  gluster-block modify
//! DELETE /v1/blockvolumes/{hostvolume}/{block}  gluster-block delete
//! ```
//!
//! ## Usage
//!
//! ### Start the daemon
//! ```bash
//! glusterblockrestd --addr 0.0.0.0:8081 --config /etc/gluster-block-rest.toml
//! ```
//!
//! ### Use the CLI
//! ```bash
//! gluster-block-rest --url http://localhost:8081 info vol1 block1
//! gluster-block-rest create vol1 block1 --hosts 10.0.0.1,10.0.0.2 --size 1GiB --ha 2
//! gluster-block-rest delete vol1 block1 --force
//! ```
//!
//! Errors look like `{"code": 2, "error": "block block1 doesn't exist"}`.

pub mod client;
pub mod common;
pub mod executor;
pub mod server;

// Re-export commonly used types
pub use common::{Config, Error, Result};
pub use server::RestServer;

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
