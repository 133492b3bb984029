//! HTTP client for the REST API
//!
//! Every request is signed with a fresh qsh-bound token when credentials
//! are configured. Success bodies are returned as parsed JSON; error
//! bodies are decoded back into [`Error::Api`].

use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::common::{sign_request, Error, Result, DEFAULT_TOKEN_TTL};
use crate::server::command::{
    CreateBlockVolumeRequest, DeleteBlockVolumeRequest, ModifyBlockVolumeRequest,
};
use crate::server::ErrorResponse;

/// Issuer and shared secret used to sign requests
#[derive(Debug, Clone)]
pub struct Credentials {
    pub issuer: String,
    pub secret: String,
}

pub struct BlockClient {
    base_url: String,
    credentials: Option<Credentials>,
    token_ttl: Duration,
    http: reqwest::Client,
}

impl BlockClient {
    pub fn new(base_url: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            token_ttl: DEFAULT_TOKEN_TTL,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Authorization header value for one request, if signing is enabled
    pub fn authorization(&self, method: &Method, path: &str) -> Result<Option<String>> {
        let Some(creds) = &self.credentials else {
            return Ok(None);
        };
        let token = sign_request(
            &creds.issuer,
            &creds.secret,
            method.as_str(),
            path,
            self.token_ttl,
        )
        .map_err(|e| Error::Other(e.to_string()))?;
        Ok(Some(format!("Bearer {}", token)))
    }

    /// Base URL with `segments` appended, each one percent-encoded
    fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidRequest(format!("invalid server URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidRequest(format!("invalid server URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Value> {
        let url = self.url_for(segments)?;
        // The server hashes the path exactly as it arrives on the wire
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(auth) = self.authorization(&method, url.path())? {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(method = %method, url = %url, "Sending request");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_slice(&bytes)?);
        }

        Err(api_error(status, &bytes))
    }

    pub async fn ping(&self) -> Result<()> {
        self.send::<()>(Method::GET, &["ping"], None)
            .await
            .map(|_| ())
    }

    pub async fn version(&self) -> Result<Value> {
        self.send::<()>(Method::GET, &["v1", "version"], None)
            .await
    }

    pub async fn list(&self, host_volume: &str) -> Result<Value> {
        self.send::<()>(Method::GET, &["v1", "blockvolumes", host_volume], None)
            .await
    }

    pub async fn info(&self, host_volume: &str, block_name: &str) -> Result<Value> {
        self.send::<()>(Method::GET, &block_segments(host_volume, block_name), None)
            .await
    }

    pub async fn create(
        &self,
        host_volume: &str,
        block_name: &str,
        req: &CreateBlockVolumeRequest,
    ) -> Result<Value> {
        self.send(
            Method::POST,
            &block_segments(host_volume, block_name),
            Some(req),
        )
        .await
    }

    pub async fn delete(
        &self,
        host_volume: &str,
        block_name: &str,
        req: &DeleteBlockVolumeRequest,
    ) -> Result<Value> {
        self.send(
            Method::DELETE,
            &block_segments(host_volume, block_name),
            Some(req),
        )
        .await
    }

    pub async fn modify(
        &self,
        host_volume: &str,
        block_name: &str,
        req: &ModifyBlockVolumeRequest,
    ) -> Result<Value> {
        self.send(
            Method::PUT,
            &block_segments(host_volume, block_name),
            Some(req),
        )
        .await
    }
}

fn block_segments<'a>(host_volume: &'a str, block_name: &'a str) -> [&'a str; 4] {
    ["v1", "blockvolumes", host_volume, block_name]
}

/// Turn a non-2xx response into an error, keeping the server's envelope
/// when it sent one
fn api_error(status: StatusCode, body: &[u8]) -> Error {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(resp) => Error::Api {
            status: status.as_u16(),
            code: resp.code,
            message: resp.error,
        },
        Err(_) => Error::Api {
            status: status.as_u16(),
            code: -1,
            message: String::from_utf8_lossy(body).trim().to_string(),
        },
    }
}
