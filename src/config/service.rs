use std::time::Duration;
use std::{env, fs};

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::cache::authenticator::CachingAuthenticator;
use crate::config::settings::SettingsConfig;
use crate::sources::provider::ClientCredentialsProvider;
use crate::sources::router::StaticRouter;
use crate::utils::constants::DEFAULT_AUTH_URL;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub credentials: CredentialsConfig,
}

/// ================================
/// Client credentials
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    pub client_id: ConfigValue,
    pub client_secret: ConfigValue,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
}

/// Where a credential value comes from
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum ConfigValue {
    Literal(String),
    FromEnv {
        from_env: String,
    },
    FromFile {
        path: String,
    },
}

impl ConfigValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            ConfigValue::Literal(value) => Ok(value.to_owned()),
            ConfigValue::FromEnv { from_env } => {
                env::var(from_env).with_context(|| format!("env var '{}' is not set", from_env))
            }
            ConfigValue::FromFile { path } => fs::read_to_string(path)
                .map(|content| content.trim().to_string())
                .with_context(|| format!("cannot read '{}'", path)),
        }
    }
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_owned()
}

impl ServiceConfig {
    /// HTTP client for the token endpoint, with the configured timeout.
    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_millis(self.settings.http_timeout_ms()))
            .build()
            .map_err(|e| anyhow!("failed to build HTTP client: {}", e))
    }

    /// Wire provider, router and cache from this configuration.
    pub fn build_authenticator(&self) -> Result<CachingAuthenticator<ClientCredentialsProvider>> {
        let client_id = self
            .credentials
            .client_id
            .resolve()
            .context("credentials.client_id")?;
        let client_secret = self
            .credentials
            .client_secret
            .resolve()
            .context("credentials.client_secret")?;
        let router = StaticRouter::new(self.credentials.auth_url.as_str());
        let provider = ClientCredentialsProvider::new(client_id, client_secret, self.http_client()?, router);
        Ok(CachingAuthenticator::new(provider))
    }
}
