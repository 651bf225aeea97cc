//! Credential handling.

pub mod credentials;

pub use credentials::{ExposeSecret, ProviderCredentials, SecretString};
