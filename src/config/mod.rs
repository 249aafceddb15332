//! Configuration types for the HAL API client.
//!
//! This module provides the configuration used to construct an
//! [`HttpClient`](crate::clients::HttpClient) and an
//! [`ApiManager`](crate::hal::ApiManager).
//!
//! # Overview
//!
//! - [`HalConfig`]: The configuration struct holding all client settings
//! - [`HalConfigBuilder`]: A builder for constructing [`HalConfig`] instances
//! - [`ApiBaseUrl`]: The validated entry point of the API
//! - [`AccessToken`]: A bearer token with masked debug output
//!
//! Credential acquisition is left to the caller: obtain a token however your
//! deployment does it and hand it to the builder.
//!
//! # Example
//!
//! ```rust
//! use hal_api::{HalConfig, ApiBaseUrl, AccessToken};
//!
//! let config = HalConfig::builder()
//!     .base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
//!     .access_token(AccessToken::new("token").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{AccessToken, ApiBaseUrl};

use std::collections::HashMap;

use crate::error::ConfigError;

/// Configuration for the HAL API client.
///
/// # Thread Safety
///
/// `HalConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use hal_api::{HalConfig, ApiBaseUrl};
///
/// let config = HalConfig::builder()
///     .base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
///     .user_agent_prefix("deploy-bot/2.1")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.user_agent_prefix(), Some("deploy-bot/2.1"));
/// ```
#[derive(Clone, Debug)]
pub struct HalConfig {
    base_url: ApiBaseUrl,
    access_token: Option<AccessToken>,
    user_agent_prefix: Option<String>,
    default_headers: HashMap<String, String>,
}

impl HalConfig {
    /// Creates a new builder for constructing a `HalConfig`.
    #[must_use]
    pub fn builder() -> HalConfigBuilder {
        HalConfigBuilder::new()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &ApiBaseUrl {
        &self.base_url
    }

    /// Returns the access token, if configured.
    #[must_use]
    pub const fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns extra headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }
}

// Verify HalConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HalConfig>();
};

/// Builder for constructing [`HalConfig`] instances.
///
/// `base_url` is required. Everything else is optional.
#[derive(Debug, Default)]
pub struct HalConfigBuilder {
    base_url: Option<ApiBaseUrl>,
    access_token: Option<AccessToken>,
    user_agent_prefix: Option<String>,
    default_headers: HashMap<String, String>,
}

impl HalConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: ApiBaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the bearer token used for the `Authorization` header.
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Builds the [`HalConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set,
    /// or [`ConfigError::InvalidHeader`] if a default header cannot be sent.
    pub fn build(self) -> Result<HalConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        for (name, value) in &self.default_headers {
            let valid_name = !name.is_empty()
                && name
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
            let valid_value = value.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b));
            if !valid_name || !valid_value {
                return Err(ConfigError::InvalidHeader { name: name.clone() });
            }
        }

        Ok(HalConfig {
            base_url,
            access_token: self.access_token,
            user_agent_prefix: self.user_agent_prefix,
            default_headers: self.default_headers,
        })
    }
}
