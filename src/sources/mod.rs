//! Sources module
//!
//! Credential providers and the routing seam that tells them where the
//! token endpoint lives.

pub mod provider;
pub mod router;
