use std::fmt;
use std::future::Future;
use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, warn};

use crate::cache::credential::{Credential, TokenResponse};
use crate::errors::ProviderError;
use crate::helpers::time::get_instant;
use crate::sources::router::{Router, StaticRouter};
use crate::utils::constants::{
    ERROR_BODY_SNIPPET_CHARS, GRANT_TYPE_CLIENT_CREDENTIALS, TRANSLATOR_SCOPE,
};

/// Fetches a fresh credential. One call, one exchange; no caching, no retries.
pub trait CredentialProvider: Send + Sync {
    fn refresh_credential(
        &self,
    ) -> impl Future<Output = Result<Credential, ProviderError>> + Send;
}

impl<P: CredentialProvider> CredentialProvider for Arc<P> {
    fn refresh_credential(
        &self,
    ) -> impl Future<Output = Result<Credential, ProviderError>> + Send {
        (**self).refresh_credential()
    }
}

/// Client-credentials exchange against the Translator token endpoint.
#[derive(Clone)]
pub struct ClientCredentialsProvider<R = StaticRouter> {
    client_id: String,
    client_secret: String,
    client: Client,
    router: R,
}

impl<R: Router> ClientCredentialsProvider<R> {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        client: Client,
        router: R,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            client,
            router,
        }
    }

    fn form(&self) -> [(&str, &str); 4] {
        [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", TRANSLATOR_SCOPE),
            ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
        ]
    }
}

impl<R: Router> CredentialProvider for ClientCredentialsProvider<R> {
    async fn refresh_credential(&self) -> Result<Credential, ProviderError> {
        let url = self.router.auth_url();
        debug!(url, client_id = %self.client_id, "requesting credential");

        let response = self
            .client
            .post(url)
            .form(&self.form())
            .send()
            .await
            .map_err(|e| {
                warn!(url, error = %e, "token endpoint unreachable");
                ProviderError::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(ProviderError::HttpBody)?;
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status,
                body: body.chars().take(ERROR_BODY_SNIPPET_CHARS).collect(),
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        Credential::from_response(token, get_instant())
    }
}

impl<R> fmt::Debug for ClientCredentialsProvider<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialsProvider")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish_non_exhaustive()
    }
}
