//! Traced OData HTTP client
//!
//! Wraps `reqwest::Client`: every request runs inside an `outgoing_http` span
//! carrying method, URL and response status.

use std::time::Duration;

use async_trait::async_trait;
use odata_core::{normalize_response, QueryResult};
use serde::de::DeserializeOwned;
use table_query::{EntityPolicy, TableState};
use tracing::{debug, instrument, warn, Instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::source::PageSource;

// Upper bound on how much of an error body ends up in `ClientError::Server`.
const MAX_ERROR_BODY: usize = 512;

#[derive(Clone, Debug)]
pub struct ODataClient {
    inner: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl ODataClient {
    /// # Errors
    /// Returns `ClientError::InvalidUrl` if `base_url` is not an absolute
    /// hierarchical URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url, ClientConfig::default().timeout)
    }

    /// # Errors
    /// See [`ODataClient::new`].
    pub fn from_config(cfg: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), &cfg.base_url, cfg.timeout)
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS, default headers).
    ///
    /// # Errors
    /// See [`ODataClient::new`].
    pub fn with_client(
        inner: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_owned()));
        }
        Ok(Self {
            inner,
            base,
            timeout,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/{entity_path}?{query}`. `query` must already be encoded.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidUrl` for an empty entity path.
    pub fn entity_url(&self, entity_path: &str, query: &str) -> Result<Url, ClientError> {
        let segments: Vec<&str> = entity_path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(ClientError::InvalidUrl(format!(
                "empty entity path under {}",
                self.base
            )));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, ClientError> {
        let span = tracing::info_span!(
            "outgoing_http",
            http.method = "GET",
            http.url = %url,
            otel.kind = "client",
            http.status_code = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        async {
            let response = self
                .inner
                .get(url)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| {
                    tracing::Span::current().record("error", true);
                    ClientError::network(e.to_string())
                })?;

            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());
            if status.is_client_error() || status.is_server_error() {
                tracing::Span::current().record("error", true);
            }
            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Fetch one page and normalize it into a [`QueryResult`].
    ///
    /// # Errors
    /// `Network` on transport failure, `Server` for non-2xx statuses,
    /// `Decode` when the body is not JSON.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        entity_path: &str,
        query: &str,
    ) -> Result<QueryResult<T>, ClientError> {
        let envelope = self.fetch_envelope(entity_path, query).await?;
        Ok(normalize_response(envelope))
    }

    /// Translate `state` under `policy` and fetch the resulting page.
    ///
    /// # Errors
    /// `Query` when the state cannot be translated, otherwise as
    /// [`ODataClient::fetch_page`].
    pub async fn query_table<T: DeserializeOwned>(
        &self,
        entity_path: &str,
        state: &TableState,
        policy: &EntityPolicy,
        search_term: Option<&str>,
    ) -> Result<QueryResult<T>, ClientError> {
        let query = table_query::build_query(state, policy, search_term)?;
        self.fetch_page(entity_path, &query).await
    }
}

#[async_trait]
impl PageSource for ODataClient {
    #[instrument(name = "odata_client.fetch", skip_all, fields(entity = %entity_path))]
    async fn fetch_envelope(
        &self,
        entity_path: &str,
        query: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.entity_url(entity_path, query)?;
        let response = self.get(url).await?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;

        if !status.is_success() {
            let mut message: String = String::from_utf8_lossy(&body)
                .trim()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            if message.is_empty() {
                message = status.canonical_reason().unwrap_or_default().to_owned();
            }
            warn!(status = status.as_u16(), "OData request failed");
            return Err(ClientError::server(status.as_u16(), message));
        }

        debug!(bytes = body.len(), "OData page received");
        serde_json::from_slice(&body).map_err(|e| ClientError::decode(e.to_string()))
    }
}
