//! HTTP client for the upstream collection API.

use serde_json::Value;

/// Errors from talking to the collection API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("collection API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        source: reqwest::Error,
    },
}

/// A raw upstream response, as the proxy passes it through.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Client for the museum's collection API.
#[derive(Debug, Clone)]
pub struct CollectionClient {
    base_url: String,
    http: reqwest::Client,
}

impl CollectionClient {
    /// Create a client for an upstream origin such as
    /// `https://www.webumenia.sk/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path (and optional query) under the upstream
    /// origin.
    pub fn endpoint(&self, path_and_query: &str) -> String {
        format!("{}/{}", self.base_url, path_and_query.trim_start_matches('/'))
    }

    /// Fetch a resource without interpreting it, for proxy passthrough.
    /// Non-success statuses are returned as-is, not as errors.
    pub async fn fetch_raw(&self, path_and_query: &str) -> Result<UpstreamResponse, ApiError> {
        let url = self.endpoint(path_and_query);
        tracing::debug!("fetching upstream {url}");

        let response = self.http.get(&url).send().await.map_err(|source| {
            ApiError::Request {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Request { url, source })?
            .to_vec();

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    /// Fetch and decode a JSON resource. Non-success statuses are errors
    /// here, unlike in [`fetch_raw`].
    pub async fn fetch_json(&self, path_and_query: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(path_and_query);
        tracing::debug!("fetching upstream {url}");

        let response = self.http.get(&url).send().await.map_err(|source| {
            ApiError::Request {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ApiError::Json { url, source })
    }

    /// Fetch one artwork record by id.
    pub async fn fetch_artwork(&self, id: &str) -> Result<Value, ApiError> {
        self.fetch_json(&format!("items/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_with_a_single_slash() {
        let client = CollectionClient::new("https://www.webumenia.sk/api/");

        assert_eq!(client.base_url(), "https://www.webumenia.sk/api");
        assert_eq!(
            client.endpoint("/items/123"),
            "https://www.webumenia.sk/api/items/123"
        );
        assert_eq!(
            client.endpoint("items?q=zima&page=2"),
            "https://www.webumenia.sk/api/items?q=zima&page=2"
        );
    }
}
