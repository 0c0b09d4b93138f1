use crate::utils::constants::DEFAULT_AUTH_URL;

/// Supplies the token endpoint URL.
pub trait Router: Send + Sync {
    fn auth_url(&self) -> &str;
}

/// Router with a fixed, configured auth URL.
#[derive(Debug, Clone)]
pub struct StaticRouter {
    auth_url: String,
}

impl StaticRouter {
    pub fn new(auth_url: impl Into<String>) -> Self {
        Self { auth_url: auth_url.into() }
    }
}

impl Default for StaticRouter {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_URL)
    }
}

impl Router for StaticRouter {
    fn auth_url(&self) -> &str {
        &self.auth_url
    }
}
