//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Literal credentials must be non-empty, env/file references must name something
//! - The auth URL must be http(s)

use tracing::{error, info};

use crate::config::service::{ConfigValue, CredentialsConfig, ServiceConfig};
use crate::config::settings::SettingsConfig;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_credentials(&cfg.credentials, &mut errors);

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        for e in &errors {
            error!("config error: {}", e);
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.http_timeout_ms == Some(0) {
        errors.push("settings.http_timeout_ms must be greater than 0".to_string());
    }

    if let Some(logging) = &settings.logging {
        let level = logging.level.to_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            errors.push(format!("settings.logging.level '{}' is not a known level", logging.level));
        }
    }
}

fn validate_credentials(credentials: &CredentialsConfig, errors: &mut Vec<String>) {
    validate_value("credentials.client_id", &credentials.client_id, errors);
    validate_value("credentials.client_secret", &credentials.client_secret, errors);

    let url = credentials.auth_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!(
            "credentials.auth_url '{}' must be an http(s) URL",
            credentials.auth_url
        ));
    }
}

fn validate_value(field: &str, value: &ConfigValue, errors: &mut Vec<String>) {
    match value {
        ConfigValue::Literal(v) if v.trim().is_empty() => {
            errors.push(format!("{} must not be empty", field));
        }
        ConfigValue::FromEnv { from_env } if from_env.trim().is_empty() => {
            errors.push(format!("{}.from_env must name an environment variable", field));
        }
        ConfigValue::FromFile { path } if path.trim().is_empty() => {
            errors.push(format!("{}.path must not be empty", field));
        }
        _ => {}
    }
}
