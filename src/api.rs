use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::state::data::{CatalogQuery, ClothingItem, UploadReceipt};

/// Failures crossing the HTTP boundary.
///
/// Payloads are plain strings so the error stays `Clone` and can ride
/// inside application messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Transport failure: connect, timeout, or body transfer
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status
    #[error("server returned status {0}")]
    Server(u16),
    /// The body did not decode as the expected JSON shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The remote collection and ingestion endpoints, behind a trait so the
/// screens can be exercised against a stub.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Fetch the catalog snapshot matching `query`.
    async fn fetch_closet(&self, query: &CatalogQuery) -> Result<Vec<ClothingItem>, ApiError>;

    /// Transmit one image to the ingestion endpoint.
    async fn upload_image(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ApiError>;

    /// Fetch raw bytes from a fully resolved URL (item thumbnails).
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// HTTP client for the wardrobe backend.
#[derive(Debug, Clone)]
pub struct ClosetApi {
    client: Client,
    base_url: String,
}

impl ClosetApi {
    /// Create a client against the given base URL.
    ///
    /// Requests are bounded by a 30 second timeout; expiry surfaces as a
    /// `Network` error rather than an indefinite hang.
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        log::info!("catalog endpoint: {base_url}");

        Self { client, base_url }
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Map a response into the expected JSON shape, folding the status and
    /// decode failures into the error taxonomy.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Server(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl CatalogGateway for ClosetApi {
    async fn fetch_closet(&self, query: &CatalogQuery) -> Result<Vec<ClothingItem>, ApiError> {
        let url = self.build_url("closet");
        log::debug!("GET {url} {:?}", query.params());

        let response = self
            .client
            .get(&url)
            .query(&query.params())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn upload_image(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ApiError> {
        let url = self.build_url("upload");
        log::debug!("POST {url} ({filename}, {} bytes)", bytes.len());

        let part = multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("image/jpeg")
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Server(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_cleanly() {
        let api = ClosetApi::new("http://127.0.0.1:8000/".to_string());
        assert_eq!(api.build_url("/closet"), "http://127.0.0.1:8000/closet");

        let api = ClosetApi::new("http://127.0.0.1:8000".to_string());
        assert_eq!(api.build_url("upload"), "http://127.0.0.1:8000/upload");
    }
}
