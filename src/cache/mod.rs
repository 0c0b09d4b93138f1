pub mod authenticator;
pub mod credential;
