// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::{Client, Method, Request, Url};

use crate::cache::credential::Credential;
use crate::errors::ProviderError;
use crate::helpers::time::get_instant;
use crate::sources::provider::CredentialProvider;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// An outbound translation request waiting to be stamped.
pub fn outbound_request() -> Request {
    Request::new(
        Method::GET,
        Url::parse("http://api.microsofttranslator.com/V2/Http.svc/Translate?text=hola&to=en").unwrap(),
    )
}

/// What the fake provider does on its next call.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// issue `token-<call number>` valid for the given seconds
    Issue(u64),
    /// issue a fixed token value
    Token(&'static str, u64),
    Fail,
}

/// Scripted provider that counts calls and tracks how many run at once.
/// Once the script is exhausted every call issues a one-hour credential.
pub struct FakeProvider {
    script: Mutex<VecDeque<Outcome>>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn scripted(script: Vec<Outcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl CredentialProvider for FakeProvider {
    async fn refresh_credential(&self) -> Result<Credential, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let outcome = self.script.lock().unwrap().pop_front().unwrap_or(Outcome::Issue(3600));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match outcome {
            Outcome::Issue(lifetime) => Credential::new(
                format!("token-{}", call),
                "jwt",
                crate::utils::constants::TRANSLATOR_SCOPE,
                Duration::from_secs(lifetime),
                get_instant(),
            ),
            Outcome::Token(token, lifetime) => {
                Credential::new(token, "jwt", "", Duration::from_secs(lifetime), get_instant())
            }
            Outcome::Fail => Err(ProviderError::HttpStatus {
                status: http::StatusCode::SERVICE_UNAVAILABLE,
                body: "token service unavailable".to_owned(),
            }),
        }
    }
}
