use reqwest::{header::HeaderMap, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: Url,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ApiClientConfig {
    pub fn try_from_url(url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(url)?;
        Ok(Self::new(base_url))
    }

    /// Relative paths are joined onto `base_url`, so it always ends with a slash.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            base_url,
            timeout: None,
            user_agent: format!("garuda-dashboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: ApiClientConfig,
}

impl HttpClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Request)?;

        Ok(Self { client, config })
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.config.base_url.join(path).map_err(ApiError::from)
    }

    /// Builds `<base>/<path>/<segment>` with `segment` percent-encoded as a
    /// single path segment.
    pub fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, ApiError> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::CannotBeABase(self.config.base_url.to_string()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::GET, path, Option::<&()>::None)
            .await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(Method::POST, path, Some(body)).await
    }

    /// Posts a JSON body and only checks the response status.
    pub async fn post(&self, path: &str, body: &(impl Serialize + ?Sized)) -> Result<StatusCode, ApiError> {
        let url = self.url(path)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::Request)?;
        let status = response.status();
        if status.is_success() {
            Ok(status)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".into());
            Err(ApiError::HttpStatus { status, body })
        }
    }

    pub async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let mut builder = self.client.request(method, url);
        if let Some(payload) = body {
            builder = builder.json(payload);
        }

        let response = builder.send().await.map_err(ApiError::Request)?;
        Self::hydrate_response(response).await
    }

    async fn hydrate_response<T>(response: reqwest::Response) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(ApiError::Request)?;

        if !status.is_success() {
            return Err(ApiError::HttpStatus { status, body });
        }

        let data = serde_json::from_str(&body)
            .map_err(|source| ApiError::Deserialize { source, body })?;

        Ok(ApiResponse {
            data,
            status,
            headers,
        })
    }
}

#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("base URL cannot carry path segments: {0}")]
    CannotBeABase(String),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("failed to deserialize response: {source}")]
    Deserialize {
        source: serde_json::Error,
        body: String,
    },
}

impl ApiError {
    /// True when the server answered with a non-success status.
    pub fn is_http_status(&self) -> bool {
        matches!(self, ApiError::HttpStatus { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::{json, Value};
    use tokio;

    #[test]
    fn base_url_gains_trailing_slash() {
        let config = ApiClientConfig::try_from_url("https://example.com/api").unwrap();
        assert_eq!(config.base_url.as_str(), "https://example.com/api/");

        let client = HttpClient::new(config).unwrap();
        assert_eq!(
            client.url("settings").unwrap().as_str(),
            "https://example.com/api/settings"
        );
    }

    #[test]
    fn segment_is_percent_encoded() {
        let config = ApiClientConfig::try_from_url("https://example.com").unwrap();
        let client = HttpClient::new(config).unwrap();
        let url = client
            .url_with_segment("files/download/", "my file?.json")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/files/download/my%20file%3F.json"
        );
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(503).body("maintenance");
        });

        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        let client = HttpClient::new(config).unwrap();
        let err = client.get_json::<Value>("broken").await.unwrap_err();
        assert!(err.is_http_status());
        match err {
            ApiError::HttpStatus { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_a_deserialize_error() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/text");
            then.status(200).body("pong");
        });

        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        let client = HttpClient::new(config).unwrap();
        let err = client.get_json::<Value>("text").await.unwrap_err();
        assert!(matches!(err, ApiError::Deserialize { ref body, .. } if body == "pong"));
    }

    #[tokio::test]
    async fn post_checks_status_only() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/echo").json_body(json!({ "a": 1 }));
            then.status(204);
        });

        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        let client = HttpClient::new(config).unwrap();
        let status = client.post("echo", &json!({ "a": 1 })).await.unwrap();
        assert_eq!(status.as_u16(), 204);
        mock.assert();
    }
}
