use crate::config::BackendSettings;
use crate::services::ClientError;
use console_core::observability::{TracedClientExt, TracedRequest};
use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP plumbing shared by the backend clients: base URL, bearer token,
/// timeout and trace propagation.
#[derive(Clone)]
pub struct BackendHttp {
    client: Client,
    base_url: Url,
    api_token: Option<Secret<String>>,
}

impl BackendHttp {
    pub fn new(settings: &BackendSettings) -> Result<Self, ClientError> {
        let base_url = Url::parse(&settings.url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", settings.url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(settings.url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_token: settings.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended with percent-encoded path `segments`.
    pub fn endpoint<I>(&self, segments: I) -> Result<Url, ClientError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let request = self
            .client
            .traced_get(url.as_str())
            .header("accept", "application/json");
        let response = self.send(request, "GET", &url).await?;

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to read backend response body");
            ClientError::Request(e)
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(url = %url, error = %e, "Malformed backend response");
            ClientError::Parse(e.to_string())
        })
    }

    pub async fn post_empty(&self, url: Url) -> Result<(), ClientError> {
        let request = self.client.traced_post(url.as_str());
        self.send(request, "POST", &url).await.map(|_| ())
    }

    pub async fn delete_empty(&self, url: Url) -> Result<(), ClientError> {
        let request = self.client.traced_delete(url.as_str());
        self.send(request, "DELETE", &url).await.map(|_| ())
    }

    async fn send(
        &self,
        request: TracedRequest,
        method: &'static str,
        url: &Url,
    ) -> Result<Response, ClientError> {
        let request = match &self.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!(method, url = %url, error = %e, "Backend request failed");
            ClientError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(method, url = %url, status = status.as_u16(), "Backend rejected request");
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}
