//! # Translator Auth Library
//!
//! Fetches a client-credentials bearer token for the Microsoft Translator API,
//! keeps it in a single-slot cache, refreshes it when it is absent or about
//! to expire, and stamps it onto outbound requests.
//!
//! Modules:
//! - `config` — service configuration, loading and validation
//! - `cache` — credential type and the caching authenticator
//! - `sources` — credential providers and auth endpoint routing
//! - `errors` — provider and authentication error taxonomy
//! - `observability` — prometheus metrics for refreshes and cache hits

pub mod cache;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::authenticator::{Authenticator, CachingAuthenticator};
pub use crate::cache::credential::Credential;
pub use crate::errors::{AuthenticationError, ProviderError};
pub use crate::sources::provider::{ClientCredentialsProvider, CredentialProvider};
pub use crate::sources::router::{Router, StaticRouter};
