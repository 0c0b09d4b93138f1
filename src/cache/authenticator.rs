use std::future::Future;
use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use reqwest::Request;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::cache::credential::Credential;
use crate::errors::AuthenticationError;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::sources::provider::CredentialProvider;

/// Stamps outbound requests with a credential.
pub trait Authenticator: Send + Sync {
    /// Add `Authorization: Bearer <token>`. On error the request is left untouched
    /// and must not be sent.
    fn authenticate(
        &self,
        request: &mut Request,
    ) -> impl Future<Output = Result<(), AuthenticationError>> + Send;
}

/// Single-slot credential cache in front of a [`CredentialProvider`].
///
/// The slot mutex is held for the whole check-and-refresh sequence, so at most one
/// refresh is in flight per cache, and callers queued behind a refresh see its
/// result instead of starting another one. Clones share the same slot.
#[derive(Debug)]
pub struct CachingAuthenticator<P> {
    slot: Arc<Mutex<Option<Credential>>>,
    provider: Arc<P>,
}

impl<P> Clone for CachingAuthenticator<P> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            provider: self.provider.clone(),
        }
    }
}

impl<P: CredentialProvider> CachingAuthenticator<P> {
    /// New cache with an empty slot. The first caller triggers the fetch.
    pub fn new(provider: P) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            provider: Arc::new(provider),
        }
    }

    /// Authorization header value (`Bearer <token>`), refreshing first if the
    /// cached credential is missing or inside the safety margin.
    pub async fn get_token(&self) -> Result<String, AuthenticationError> {
        let metrics = get_metrics().await;
        let mut slot = self.slot.lock().await;

        if let Some(credential) = slot.as_ref().filter(|credential| !credential.is_expired()) {
            metrics.cache_hits.inc();
            debug!(expires_at = %credential.expires_at_utc(), "using cached credential");
            return Ok(credential.authorization_value());
        }

        // The slot is empty or holds an expired credential; nothing valid is lost below.
        let start = get_instant();
        metrics.refresh_requests.inc();
        let refreshed = self.provider.refresh_credential().await;
        metrics.refresh_duration.observe(start.elapsed().as_secs_f64());

        match refreshed {
            Ok(credential) => {
                info!(
                    token_type = %credential.token_type,
                    expires_in = credential.expires_in.as_secs(),
                    expires_at = %credential.expires_at_utc(),
                    "credential refreshed"
                );
                metrics.credential_expiry_unix.set(credential.expires_at_utc().timestamp());
                let value = credential.authorization_value();
                *slot = Some(credential);
                Ok(value)
            }
            Err(err) => {
                error!(reason = err.reason(), error = %err, "credential refresh failed");
                metrics.refresh_failures.with_label_values(&[err.reason()]).inc();
                *slot = None;
                Err(AuthenticationError::from(err))
            }
        }
    }

    /// Same as [`Authenticator::authenticate`], for a bare header map.
    pub async fn authenticate_headers(
        &self,
        headers: &mut HeaderMap,
    ) -> Result<(), AuthenticationError> {
        let token = self.get_token().await?;
        let mut value = HeaderValue::from_str(&token)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// Current slot contents, without refreshing.
    pub async fn cached_credential(&self) -> Option<Credential> {
        self.slot.lock().await.clone()
    }
}

impl<P: CredentialProvider> Authenticator for CachingAuthenticator<P> {
    async fn authenticate(&self, request: &mut Request) -> Result<(), AuthenticationError> {
        self.authenticate_headers(request.headers_mut()).await
    }
}
