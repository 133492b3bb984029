//! REST daemon

use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::common::{Config, Error, Result};
use crate::executor::{CommandRunner, ProcessRunner};
use crate::server::http::create_router;
use crate::VERSION;

pub struct RestServer {
    config: Config,
    runner: Arc<dyn CommandRunner>,
}

impl RestServer {
    pub fn new(config: Config) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    pub fn with_runner(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub async fn serve(self) -> Result<()> {
        tracing::info!("Starting gluster-block REST server v{}", VERSION);
        tracing::info!("  HTTP API: {}", self.config.addr);
        tracing::info!("  CLI: {}", self.config.cli_path);
        tracing::info!("  TLS: {}", self.config.tls.enabled);
        tracing::info!("  Auth: {}", self.config.auth.enabled);

        let router = create_router(&self.config, self.runner.clone());
        let app = router.into_make_service_with_connect_info::<SocketAddr>();

        if self.config.tls.enabled {
            let (cert, key) = match (&self.config.tls.cert_file, &self.config.tls.key_file) {
                (Some(cert), Some(key)) => (cert, key),
                _ => {
                    return Err(Error::InvalidConfig(
                        "tls.enabled requires tls.cert_file and tls.key_file".into(),
                    ))
                }
            };
            let tls = RustlsConfig::from_pem_file(cert, key).await?;

            tracing::info!("✓ Server ready (https)");
            axum_server::bind_rustls(self.config.addr, tls)
                .serve(app)
                .await?;
        } else {
            let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

            tracing::info!("✓ Server ready (http)");
            axum::serve(listener, app).await?;
        }

        Ok(())
    }
}
