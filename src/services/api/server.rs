use super::http::{ApiClientConfig, ApiError, HttpClient};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct ServerClient {
    http: Arc<HttpClient>,
}

impl ServerClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: Arc::new(HttpClient::new(config)?),
        })
    }

    pub async fn ping(&self) -> Result<PingReport, ApiError> {
        let response = self.http.get_json::<PingReport>("ping").await?;
        Ok(response.data)
    }

    pub async fn list_files(&self) -> Result<Vec<FileDescriptor>, ApiError> {
        let response = self.http.get_json::<Vec<FileDescriptor>>("files").await?;
        Ok(response.data)
    }

    /// Returns whatever JSON the server answers with; its shape is not fixed.
    pub async fn delete_file(&self, name: &str) -> Result<Value, ApiError> {
        let payload = json!({ "name": name });
        let response = self
            .http
            .post_json::<Value, _>("files/delete", &payload)
            .await?;
        Ok(response.data)
    }

    pub fn download_url(&self, name: &str) -> Result<Url, ApiError> {
        self.http.url_with_segment("files/download/", name)
    }

    pub async fn fetch_settings(&self) -> Result<SettingsRecord, ApiError> {
        let response = self.http.get_json::<SettingsRecord>("settings").await?;
        Ok(response.data)
    }

    pub async fn save_settings(&self, settings: &SettingsRecord) -> Result<(), ApiError> {
        self.http.post("settings", settings).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PingReport {
    #[serde(default)]
    pub latency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
}

/// Remote server settings. A field is `None` when the operator typed text
/// with no integer in it; it then travels as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SettingsRecord {
    pub max_file_size: Option<i64>,
    pub fetch_time: Option<i64>,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            max_file_size: Some(10),
            fetch_time: Some(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use tokio;

    fn client_for(server: &MockServer) -> ServerClient {
        let config = ApiClientConfig::try_from_url(&server.url("/")).unwrap();
        ServerClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn pings_server() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/ping");
            then.status(200).json_body(json!({ "latency": "42ms" }));
        });

        let report = client_for(&server).ping().await.unwrap();
        assert_eq!(report.latency.as_deref(), Some("42ms"));
    }

    #[tokio::test]
    async fn ping_without_latency() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/ping");
            then.status(200).json_body(json!({}));
        });

        let report = client_for(&server).ping().await.unwrap();
        assert!(report.latency.is_none());
    }

    #[tokio::test]
    async fn lists_files_in_server_order() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/files");
            then.status(200).json_body(json!([
                { "id": "2", "name": "b.json" },
                { "id": "1", "name": "a.json" }
            ]));
        });

        let files = client_for(&server).list_files().await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "b.json");
        assert_eq!(files[1].id, "1");
    }

    #[tokio::test]
    async fn deletes_file_by_name() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/files/delete")
                .json_body(json!({ "name": "a.json" }));
            then.status(200).json_body(json!({ "deleted": "a.json" }));
        });

        let result = client_for(&server).delete_file("a.json").await.unwrap();
        assert_eq!(result["deleted"], "a.json");
        mock.assert();
    }

    #[tokio::test]
    async fn fetches_settings() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(GET).path("/settings");
            then.status(200)
                .json_body(json!({ "max_file_size": 25, "fetch_time": 60 }));
        });

        let settings = client_for(&server).fetch_settings().await.unwrap();
        assert_eq!(settings.max_file_size, Some(25));
        assert_eq!(settings.fetch_time, Some(60));
    }

    #[tokio::test]
    async fn saves_exact_settings_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/settings")
                .json_body(json!({ "max_file_size": 5, "fetch_time": 20 }));
            then.status(200).json_body(json!({ "ok": true }));
        });

        let settings = SettingsRecord {
            max_file_size: Some(5),
            fetch_time: Some(20),
        };
        client_for(&server).save_settings(&settings).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn missing_setting_is_sent_as_null() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/settings")
                .json_body(json!({ "max_file_size": null, "fetch_time": 20 }));
            then.status(200);
        });

        let settings = SettingsRecord {
            max_file_size: None,
            fetch_time: Some(20),
        };
        client_for(&server).save_settings(&settings).await.unwrap();
        mock.assert();
    }

    #[test]
    fn builds_download_url() {
        let config = ApiClientConfig::try_from_url("https://garuda.example.com").unwrap();
        let client = ServerClient::new(config).unwrap();
        let url = client.download_url("a.json").unwrap();
        assert_eq!(url.as_str(), "https://garuda.example.com/files/download/a.json");
    }
}
