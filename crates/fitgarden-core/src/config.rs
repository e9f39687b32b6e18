// ── Runtime backend configuration ──
//
// Describes *how* to reach the FitGarden backend. Carries the resolved
// token and connection tuning, but never touches disk — the CLI/TUI build
// a `BackendConfig` from their config layer and hand it in.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use fitgarden_api::transport::{TlsMode, TransportConfig};
use fitgarden_api::{Anonymous, ApiClient, SessionProvider, StaticToken};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default — the production backend carries
    /// a real certificate.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (staging backends with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for connecting to the backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend root URL (e.g., `https://api.fitgarden.com.br`).
    pub url: Url,
    /// Session token, if the deployment requires one.
    pub token: Option<SecretString>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl BackendConfig {
    /// Translate to the transport layer's config.
    fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// The session provider for this configuration.
    fn session(&self) -> Arc<dyn SessionProvider> {
        match &self.token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(Anonymous),
        }
    }

    /// Build an [`ApiClient`] for this backend.
    pub fn build_client(&self) -> Result<ApiClient, CoreError> {
        ApiClient::new(self.url.clone(), self.session(), &self.transport())
            .map_err(CoreError::from)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080"
                .parse()
                .expect("static default URL"),
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
