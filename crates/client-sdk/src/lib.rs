use anyhow::{Context, Result, anyhow};
use common::{ContentResponse, HealthStatus};
use reqwest::{Client, Url};
use viewer_core::FetchOutcome;

#[derive(Clone)]
pub struct ViewerClient {
    http: Client,
    server_base_url: String,
}

impl ViewerClient {
    pub fn new(server_base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_base_url: server_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn server_base_url(&self) -> &str {
        &self.server_base_url
    }

    /// `{base}/api/config/{key}` with `key` encoded as a single path segment,
    /// so `/`, `?` and `#` inside a key never change which route is hit.
    pub fn content_url(&self, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.server_base_url)
            .with_context(|| format!("invalid server url: {}", self.server_base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("server url cannot carry a path: {}", self.server_base_url))?
            .pop_if_empty()
            .extend(["api", "config", key]);
        Ok(url)
    }

    /// Fetches the content payload for `key`.
    ///
    /// Error statuses are not treated as failures here: the 404 and 500
    /// bodies are regular `ContentResponse::Error` payloads. Only transport
    /// problems and undecodable bodies produce `Err`.
    pub async fn fetch_content(&self, key: impl AsRef<str>) -> Result<ContentResponse> {
        let key = key.as_ref();
        let url = self.content_url(key)?;

        self.http
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to GET file key={key}"))?
            .json::<ContentResponse>()
            .await
            .with_context(|| format!("failed to decode content response for key={key}"))
    }

    /// Like [`fetch_content`](Self::fetch_content) but folds transport errors
    /// into [`FetchOutcome::TransportFailure`].
    pub async fn load(&self, key: impl AsRef<str>) -> FetchOutcome {
        match self.fetch_content(key).await {
            Ok(response) => FetchOutcome::from(response),
            Err(_) => FetchOutcome::TransportFailure,
        }
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.server_base_url);

        self.http
            .get(url)
            .send()
            .await
            .context("failed to contact server")?
            .error_for_status()
            .context("server reported unhealthy status")?
            .json::<HealthStatus>()
            .await
            .context("failed to decode health response")
    }
}
