//! # HAL API Rust Client
//!
//! A generic client for HAL+JSON hypermedia APIs. Responses describe
//! themselves with `_type`, `_links`, and `_embedded`; this crate turns them
//! into a navigable resource graph at runtime, with no schema known ahead of
//! time.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`HalConfig`] and [`HalConfigBuilder`]
//! - Validated newtypes for the base URL and bearer token
//! - An async HTTP transport with a pluggable [`Transport`] seam
//! - Document inflation into typed resources, link-only resources, or lazy
//!   paginated collections
//! - Member resolution by name: attributes, timestamps, link traversal,
//!   embedded relations, foreign keys, and create operations
//! - A runtime [`TypeRegistry`] of identity-stable type tags
//!
//! ## Quick Start
//!
//! ```rust
//! use hal_api::{AccessToken, ApiBaseUrl, HalConfig};
//!
//! // Create configuration using the builder pattern
//! let config = HalConfig::builder()
//!     .base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
//!     .access_token(AccessToken::new("your-access-token").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Navigating Resources
//!
//! ```rust,ignore
//! use hal_api::{ApiManager, Member};
//! use hal_api::clients::QueryParams;
//!
//! let manager = ApiManager::connect(config).await?;
//!
//! // Fetch by type and id: GET /apps/12
//! let app = manager
//!     .fetch_type("app", 12, QueryParams::new())
//!     .await?
//!     .into_resource()?;
//!
//! // Members are resolved by name
//! let created_at = app.timestamp("created_at")?;
//! let account_id = app.foreign_key("account_id")?;
//!
//! match app.get("handle")? {
//!     Member::Attribute(handle) => println!("{handle}"),
//!     other => println!("{}", other.kind()),
//! }
//! ```
//!
//! ## Pagination
//!
//! Collection pages are consumed lazily. The next page is requested only
//! after the current one is exhausted, with the original request's headers
//! and query parameters:
//!
//! ```rust,ignore
//! let mut operations = app
//!     .link("operations")?
//!     .fetch()
//!     .await?
//!     .into_collection()?;
//!
//! while let Some(operation) = operations.next().await {
//!     println!("{:?}", operation?.attribute("status"));
//! }
//! ```
//!
//! ## Creating Resources
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! // POST to the `backups` link relation
//! let backup = database
//!     .create_operation("create_backup")?
//!     .call(json!({"type": "manual"}))
//!     .await?;
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events and installs
//! no subscriber. Requests and page continuations log at `debug`, type
//! synthesis at `trace`, and deprecation notices from the server at `warn`.
//!
//! ## Design Principles
//!
//! - **No global state**: The type registry is owned by the manager
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: Managers, resources, and configuration are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Immutable snapshots**: A resource never refreshes; fetch again instead

pub mod clients;
pub mod config;
pub mod error;
pub mod hal;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, ApiBaseUrl, HalConfig, HalConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, QueryParams, RequestRecord, Transport,
};

// Re-export hypermedia types
pub use hal::{
    ApiManager, CreateOperation, Embedded, HalError, Inflated, LinkOperation, Member, Resource,
    ResourcePager, ResourceType, TypeRegistry,
};
