//! Shared constants and invariants

/// A credential this close to its expiry is treated as already expired.
pub const SAFETY_MARGIN_SECS: u64 = 10;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

// Client-credentials exchange
pub const TRANSLATOR_SCOPE: &str = "http://api.microsofttranslator.com";
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const DEFAULT_AUTH_URL: &str = "https://datamarket.accesscontrol.windows.net/v2/OAuth2-13";

pub const BEARER_PREFIX: &str = "Bearer ";

// Upper bound on how much of an error response body is kept in errors and logs
pub const ERROR_BODY_SNIPPET_CHARS: usize = 256;
