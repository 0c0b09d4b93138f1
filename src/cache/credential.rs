use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tokio::time::Instant;

use crate::errors::ProviderError;
use crate::helpers::time::{get_instant, now_utc, safety_margin};
use crate::utils::constants::BEARER_PREFIX;

/// Token endpoint response body
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    // a missing field surfaces as a parse error, not a decode error
    #[serde(default)]
    pub expires_in: ExpiresIn,
}

/// Granted lifetime as sent by the server: a decimal string, or a bare integer.
/// Anything else (negative or fractional numbers, null, objects) lands in `Other`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExpiresIn {
    Text(String),
    Seconds(u64),
    Other(serde_json::Value),
}

impl Default for ExpiresIn {
    fn default() -> Self {
        ExpiresIn::Text(String::new())
    }
}

impl ExpiresIn {
    pub fn seconds(&self) -> Result<u64, ProviderError> {
        match self {
            ExpiresIn::Seconds(seconds) => Ok(*seconds),
            ExpiresIn::Text(raw) => raw.parse::<u64>().map_err(|e| ProviderError::Parse {
                value: raw.clone(),
                reason: e.to_string(),
            }),
            ExpiresIn::Other(value) => Err(ProviderError::Parse {
                value: value.to_string(),
                reason: "not a non-negative integer number of seconds".to_owned(),
            }),
        }
    }
}

/// A bearer credential and its lifetime.
///
/// `expires_at` is always `fetched_at + expires_in`. Both are monotonic instants;
/// `issued_at` is the wall-clock fetch time, kept for logs and metrics only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub token_type: String,
    pub scope: String,
    pub expires_in: Duration,
    pub fetched_at: Instant,
    pub expires_at: Instant,
    pub issued_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(
        token: impl Into<String>,
        token_type: impl Into<String>,
        scope: impl Into<String>,
        expires_in: Duration,
        fetched_at: Instant,
    ) -> Result<Self, ProviderError> {
        let expires_at = fetched_at
            .checked_add(expires_in)
            .ok_or_else(|| ProviderError::Parse {
                value: expires_in.as_secs().to_string(),
                reason: "lifetime out of range".to_owned(),
            })?;

        Ok(Self {
            token: token.into(),
            token_type: token_type.into(),
            scope: scope.into(),
            expires_in,
            fetched_at,
            expires_at,
            issued_at: now_utc(),
        })
    }

    /// Build a credential from a token endpoint response received at `fetched_at`.
    pub fn from_response(
        response: TokenResponse,
        fetched_at: Instant,
    ) -> Result<Self, ProviderError> {
        let seconds = response.expires_in.seconds()?;
        Self::new(
            response.access_token,
            response.token_type,
            response.scope,
            Duration::from_secs(seconds),
            fetched_at,
        )
    }

    /// True once `now` is within the safety margin of `expires_at`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.checked_add(safety_margin())
            .map_or(true, |deadline| deadline >= self.expires_at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(get_instant())
    }

    /// Value for the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        format!("{}{}", BEARER_PREFIX, self.token)
    }

    /// Wall-clock estimate of the expiry, for logs and metrics.
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        TimeDelta::from_std(self.expires_in)
            .ok()
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
