use std::{fs, path::Path};

use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator::validate_service_config;
use crate::config::service::ServiceConfig;
use crate::config::settings::LoggingConfig;

/// Load and validate config from YAML file
pub fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow!("cannot read config '{}': {}", path.display(), e))?;

    let expanded = expand_env_vars(&content);
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let mut service_config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }

    debug!("validation config ...");
    validate_service_config(&service_config)
        .map_err(|issues| anyhow!("config is not valid: {}", issues.join("; ")))?;

    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with values from the environment.
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("static regex");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::service::ConfigValue;
    use crate::config::settings::LogFormat;
    use crate::utils::constants::{DEFAULT_AUTH_URL, DEFAULT_HTTP_TIMEOUT_MS};

    #[test]
    fn minimal_config_gets_defaults() {
        let config = parse_config(
            r#"
credentials:
  client_id: my-client
  client_secret: my-secret
"#,
        )
        .unwrap();

        assert_eq!(config.credentials.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.settings.http_timeout_ms(), DEFAULT_HTTP_TIMEOUT_MS);
        let logging = config.settings.logging.unwrap();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Compact);
        assert_eq!(config.credentials.client_id.resolve().unwrap(), "my-client");
    }

    #[test]
    fn env_placeholders_expand_with_defaults() {
        std::env::set_var("TRANSLATOR_AUTH_TEST_CLIENT_ID", "from-env");
        let expanded = expand_env_vars(
            "id: ${TRANSLATOR_AUTH_TEST_CLIENT_ID}, secret: ${TRANSLATOR_AUTH_TEST_UNSET:fallback}",
        );
        assert_eq!(expanded, "id: from-env, secret: fallback");
    }

    #[test]
    fn secret_can_come_from_file() {
        let mut secret = tempfile::NamedTempFile::new().unwrap();
        writeln!(secret, "file-secret").unwrap();

        let yaml = format!(
            r#"
settings:
  http_timeout_ms: 1500
  logging:
    level: debug
    format: json
credentials:
  client_id: my-client
  client_secret:
    path: {}
"#,
            secret.path().display()
        );
        let config = parse_config(&yaml).unwrap();

        assert!(matches!(config.credentials.client_secret, ConfigValue::FromFile { .. }));
        assert_eq!(config.credentials.client_secret.resolve().unwrap(), "file-secret");
        assert_eq!(config.settings.http_timeout_ms(), 1500);
    }

    #[test]
    fn file_to_config_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "credentials:\n  client_id: ${{TRANSLATOR_AUTH_TEST_ID:expanded-id}}\n  \
             client_secret: s\n  auth_url: http://127.0.0.1:9/token\n"
        )
        .unwrap();

        let config = file_to_config(file.path()).unwrap();
        assert_eq!(config.credentials.client_id.resolve().unwrap(), "expanded-id");
        assert_eq!(config.credentials.auth_url, "http://127.0.0.1:9/token");
    }

    #[tokio::test]
    async fn from_env_secret_builds_an_empty_cache() {
        std::env::set_var("TRANSLATOR_AUTH_TEST_SECRET", "env-secret");
        let config = parse_config(
            "credentials:\n  client_id: my-client\n  client_secret:\n    from_env: TRANSLATOR_AUTH_TEST_SECRET\n",
        )
        .unwrap();

        assert_eq!(config.credentials.client_secret.resolve().unwrap(), "env-secret");
        let authenticator = config.build_authenticator().unwrap();
        assert!(authenticator.cached_credential().await.is_none());
    }

    #[test]
    fn missing_env_secret_fails_to_build() {
        let config = parse_config(
            "credentials:\n  client_id: my-client\n  client_secret:\n    from_env: TRANSLATOR_AUTH_TEST_NEVER_SET\n",
        )
        .unwrap();

        let err = config.build_authenticator().unwrap_err();
        assert!(format!("{:#}", err).contains("TRANSLATOR_AUTH_TEST_NEVER_SET"), "{:#}", err);
    }

    #[test]
    #[should_panic(expected = "config is not valid")]
    fn empty_client_id_is_rejected() {
        parse_config("credentials:\n  client_id: ''\n  client_secret: s\n").unwrap();
    }
}
