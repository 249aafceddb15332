//! Hypermedia navigation: inflation, member resolution, and pagination.
//!
//! Responses from a HAL+JSON API describe themselves. This module turns them
//! into a navigable graph without any client-side schema:
//!
//! - [`ApiManager`]: Fetches, creates, and inflates; the root of navigation
//! - [`Inflated`]: The classification of a document (resource, collection,
//!   link-only resource, or empty)
//! - [`Resource`]: A snapshot of one document, with [`Resource::get`]
//!   resolving members by name into a [`Member`]
//! - [`ResourcePager`]: A lazy sequence that follows `next` links
//! - [`TypeRegistry`] and [`ResourceType`]: Runtime type tags keyed by
//!   normalized type name
//! - [`inflect`]: The word inflection used for type and relation names
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_api::{ApiBaseUrl, ApiManager, HalConfig};
//! use hal_api::clients::QueryParams;
//!
//! let config = HalConfig::builder()
//!     .base_url(ApiBaseUrl::new("https://api.example.com")?)
//!     .build()?;
//! let manager = ApiManager::connect(config).await?;
//!
//! let root = manager.root().await?;
//! let mut apps = root.link("apps")?.fetch().await?.into_collection()?;
//!
//! while let Some(app) = apps.next().await {
//!     let app = app?;
//!     println!("{} {}", app.type_name(), app.href().unwrap_or_default());
//! }
//! ```

mod errors;
mod inflate;
pub mod inflect;
mod manager;
mod pager;
mod registry;
mod resource;

#[cfg(test)]
mod testing;

pub use errors::HalError;
pub use inflate::Inflated;
pub use manager::ApiManager;
pub use pager::ResourcePager;
pub use registry::{normalize_type_name, ResourceType, TypeRegistry};
pub use resource::{CreateOperation, Embedded, LinkOperation, Member, Resource};
