use async_trait::async_trait;

use crate::error::ClientError;

/// Transport-agnostic port for fetching one OData collection page.
///
/// Returns the raw response envelope; decoding into items is left to
/// `odata_core::normalize_response` so the port stays object-safe.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_envelope(
        &self,
        entity_path: &str,
        query: &str,
    ) -> Result<serde_json::Value, ClientError>;
}
