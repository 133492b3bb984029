//! Argument vectors for the gluster-block CLI
//!
//! One builder per subcommand. Every vector ends with `--json` so the CLI
//! answers in machine-readable form. Identifiers are forwarded as given;
//! the CLI is the authority on what is valid.

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

pub const JSON_FLAG: &str = "--json";

/// Body of a create request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBlockVolumeRequest {
    /// Target portal hosts, in order
    pub hosts: Vec<String>,
    /// Size in CLI syntax (`1GiB`, `512MiB`, bytes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// High-availability count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ha: Option<u32>,
    #[serde(default)]
    pub auth_enabled: bool,
    #[serde(default)]
    pub full_prealloc: bool,
    /// Existing backing file to use instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    /// Ring buffer size in MiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ring_buffer: Option<u32>,
    /// Logical block size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_size: Option<u32>,
    /// Command timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io_timeout: Option<u32>,
}

/// Body of a delete request. An empty body means all defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBlockVolumeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlink_storage: Option<bool>,
    #[serde(default)]
    pub force: bool,
}

/// Body of a modify request: either an auth toggle or a resize
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyBlockVolumeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub force: bool,
}

/// Compound `hostvolume/blockname` identifier
pub fn block_id(host_volume: &str, block_name: &str) -> String {
    format!("{}/{}", host_volume, block_name)
}

pub fn info_args(host_volume: &str, block_name: &str) -> Vec<String> {
    vec![
        "info".to_string(),
        block_id(host_volume, block_name),
        JSON_FLAG.to_string(),
    ]
}

pub fn list_args(host_volume: &str) -> Vec<String> {
    vec![
        "list".to_string(),
        host_volume.to_string(),
        JSON_FLAG.to_string(),
    ]
}

pub fn version_args() -> Vec<String> {
    vec!["version".to_string(), JSON_FLAG.to_string()]
}

pub fn create_args(
    host_volume: &str,
    block_name: &str,
    req: &CreateBlockVolumeRequest,
) -> Vec<String> {
    let mut args = vec!["create".to_string(), block_id(host_volume, block_name)];

    if let Some(ha) = req.ha {
        args.extend(["ha".to_string(), ha.to_string()]);
    }
    if req.auth_enabled {
        args.extend(["auth".to_string(), "enable".to_string()]);
    }
    if req.full_prealloc {
        args.extend(["prealloc".to_string(), "full".to_string()]);
    }
    if let Some(storage) = &req.storage {
        args.extend(["storage".to_string(), storage.clone()]);
    }
    if let Some(ring_buffer) = req.ring_buffer {
        args.extend(["ring-buffer".to_string(), ring_buffer.to_string()]);
    }
    if let Some(block_size) = req.block_size {
        args.extend(["block-size".to_string(), block_size.to_string()]);
    }
    if let Some(io_timeout) = req.io_timeout {
        args.extend(["io-timeout".to_string(), io_timeout.to_string()]);
    }

    args.push(req.hosts.join(","));
    if let Some(size) = &req.size {
        args.push(size.clone());
    }
    args.push(JSON_FLAG.to_string());
    args
}

pub fn delete_args(
    host_volume: &str,
    block_name: &str,
    req: &DeleteBlockVolumeRequest,
) -> Vec<String> {
    let mut args = vec!["delete".to_string(), block_id(host_volume, block_name)];

    if let Some(unlink) = req.unlink_storage {
        let value = if unlink { "yes" } else { "no" };
        args.extend(["unlink-storage".to_string(), value.to_string()]);
    }
    if req.force {
        args.push("force".to_string());
    }
    args.push(JSON_FLAG.to_string());
    args
}

/// Build a modify invocation. Exactly one of `auth_enabled` and `size`
/// must be set; the CLI accepts one change per call.
pub fn modify_args(
    host_volume: &str,
    block_name: &str,
    req: &ModifyBlockVolumeRequest,
) -> Result<Vec<String>> {
    let mut args = vec!["modify".to_string(), block_id(host_volume, block_name)];

    match (req.auth_enabled, &req.size) {
        (Some(enabled), None) => {
            let value = if enabled { "enable" } else { "disable" };
            args.extend(["auth".to_string(), value.to_string()]);
        }
        (None, Some(size)) => {
            args.extend(["size".to_string(), size.clone()]);
            if req.force {
                args.push("force".to_string());
            }
        }
        (Some(_), Some(_)) => {
            return Err(Error::InvalidRequest(
                "auth_enabled and size cannot be modified together".into(),
            ))
        }
        (None, None) => {
            return Err(Error::InvalidRequest(
                "one of auth_enabled or size is required".into(),
            ))
        }
    }

    args.push(JSON_FLAG.to_string());
    Ok(args)
}
