// Backend HTTP client
//
// Wraps `reqwest::Client` with FitGarden-specific URL construction, bearer
// auth from the injected SessionProvider, and error-body handling. All
// endpoint families (bookings, catalog) are implemented as inherent methods
// in separate files to keep this module focused on transport mechanics.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ErroResponse;
use crate::session::SessionProvider;
use crate::transport::TransportConfig;

/// Raw HTTP client for the FitGarden backend.
///
/// Handles URL construction under the backend root, attaches the session
/// bearer token to every request, and translates error responses
/// (`{"mensagem": "..."}` bodies, 401s) into typed [`Error`] values.
/// Successful responses are returned as deserialized payloads.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `https://api.fitgarden.com.br`).
    pub fn new(
        base_url: Url,
        session: Arc<dyn SessionProvider>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            http,
            base_url,
            session,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path under the backend root.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    /// Build a paginated list URL: `{base}/{path}?page=N&pageSize=M` plus
    /// any extra query pairs.
    pub(crate) fn list_url(&self, path: &str, page: u32, page_size: u32, extra: &[(&str, &str)]) -> Url {
        let mut url = self.api_url(path);
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("pageSize", &page_size.to_string());
        }
        url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Apply the session token to a request builder.
    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a GET request and parse the response body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .apply_auth(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Send a POST request with a JSON body and parse the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .apply_auth(self.http.post(url).json(body))
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Send a PUT request with a JSON body and parse the response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self
            .apply_auth(self.http.put(url).json(body))
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Send a DELETE request and parse the response.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {}", url);
        let resp = self
            .apply_auth(self.http.delete(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_response(resp).await
    }

    /// Map the response status, then deserialize the body.
    ///
    /// 401 becomes [`Error::SessionExpired`]; any other non-2xx status is
    /// reported with the backend's `mensagem` when the body carries one.
    async fn parse_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErroResponse>(&body)
                .ok()
                .and_then(|e| e.mensagem)
                .unwrap_or_else(|| preview(&body));
            return Err(Error::Backend {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// First 200 characters of a body, for error messages.
fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
