use crate::cli::Cli;
use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub application_name: String,
    pub server_name: String,
    pub base_url: String,
    /// Absent means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub dark_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_name: "Garuda Server Dashboard".to_string(),
            server_name: "Main Server".to_string(),
            base_url: "https://garuda.pitmtech.com".to_string(),
            request_timeout_secs: None,
            dark_mode: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppConfig {
    pub fn load(cli: &Cli) -> Result<Self, AppConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("application_name", defaults.application_name.clone())?
            .set_default("server_name", defaults.server_name.clone())?
            .set_default("base_url", defaults.base_url.clone())?
            .set_default("dark_mode", defaults.dark_mode)?;

        if let Some(profile) = &cli.profile {
            let profile_file_name = format!("garuda-dashboard.{profile}.toml");
            if let Some(path) = Self::config_dir_file(&profile_file_name) {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        if let Some(config_path) = &cli.config {
            builder = builder.add_source(File::from(config_path.clone()).required(true));
        } else if let Some(path) = Self::config_dir_file("garuda-dashboard.toml") {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("GARUDA").separator("__"));

        let built = builder.build()?;
        Ok(built.try_deserialize::<AppConfig>()?)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn config_dir_file(file_name: &str) -> Option<PathBuf> {
        ProjectDirs::from("com", "PitmTech", "GarudaDashboard")
            .map(|dirs| dirs.config_dir().join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn explicit_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!(
            "garuda-dashboard-test-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "base_url = \"http://localhost:8080\"").unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();
        drop(file);

        let cli = Cli::parse_from(["garuda-dashboard", "--config", path.to_str().unwrap()]);
        let config = AppConfig::load(&cli).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.server_name, "Main Server");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let cli = Cli::parse_from([
            "garuda-dashboard",
            "--config",
            "/nonexistent/garuda-dashboard.toml",
        ]);
        assert!(AppConfig::load(&cli).is_err());
    }
}
