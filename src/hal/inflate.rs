//! Document classification.
//!
//! A hypermedia document is classified by the first of these keys it
//! carries:
//!
//! 1. `_type`: a single typed [`Resource`]
//! 2. `_embedded`: a collection page, consumed through a [`ResourcePager`]
//! 3. `_links`: a link-only resource (the API root, or any link envelope)
//!
//! Anything else fails with [`HalError::UnknownResourceInflation`].

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::RequestRecord;
use crate::hal::errors::HalError;
use crate::hal::manager::ManagerInner;
use crate::hal::pager::ResourcePager;
use crate::hal::resource::Resource;

/// The result of inflating a document.
#[derive(Debug)]
pub enum Inflated {
    /// A single resource with a `_type`.
    Resource(Resource),
    /// A lazily paginated sequence of resources.
    Collection(ResourcePager),
    /// A resource exposing only links (no `_type`, no `_embedded`).
    Links(Resource),
    /// A `204 No Content` or empty-bodied response.
    Empty,
}

impl Inflated {
    /// Returns a short name for this shape.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Resource(_) => "resource",
            Self::Collection(_) => "collection",
            Self::Links(_) => "links",
            Self::Empty => "empty",
        }
    }

    /// Returns `true` for [`Inflated::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Unwraps a typed or link-only resource.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::UnexpectedShape`] for collections and empty
    /// responses.
    pub fn into_resource(self) -> Result<Resource, HalError> {
        match self {
            Self::Resource(resource) | Self::Links(resource) => Ok(resource),
            other => Err(HalError::UnexpectedShape {
                expected: "resource",
                found: other.shape(),
            }),
        }
    }

    /// Unwraps a collection.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::UnexpectedShape`] for anything but a collection.
    pub fn into_collection(self) -> Result<ResourcePager, HalError> {
        match self {
            Self::Collection(pager) => Ok(pager),
            other => Err(HalError::UnexpectedShape {
                expected: "collection",
                found: other.shape(),
            }),
        }
    }
}

/// Classifies a top-level document.
///
/// `origin` is the request that produced the document; a collection page
/// replays its headers and query parameters when following `next` links.
pub(crate) fn inflate_document(
    manager: &Arc<ManagerInner>,
    document: Value,
    origin: Option<&RequestRecord>,
) -> Result<Inflated, HalError> {
    let map = match document {
        Value::Object(map) => map,
        other => return Err(HalError::UnknownResourceInflation { document: other }),
    };

    if map.contains_key("_type") {
        tracing::debug!("Inflating typed resource");
        return inflate_typed(manager, map).map(Inflated::Resource);
    }

    if map.contains_key("_embedded") {
        tracing::debug!("Inflating collection page");
        return Ok(Inflated::Collection(ResourcePager::new(
            manager, map, origin,
        )));
    }

    if map.contains_key("_links") {
        tracing::debug!("Inflating link-only resource");
        return Ok(Inflated::Links(Resource::from_document(
            None,
            map,
            Arc::downgrade(manager),
        )));
    }

    Err(HalError::UnknownResourceInflation {
        document: Value::Object(map),
    })
}

/// Classifies one element of a collection page or embedded relation.
///
/// Elements are never collections themselves: a `_type` makes a typed
/// resource, `_links` alone a link-only one.
pub(crate) fn inflate_element(
    manager: &Arc<ManagerInner>,
    element: Value,
) -> Result<Resource, HalError> {
    match element {
        Value::Object(map) if map.contains_key("_type") => inflate_typed(manager, map),
        Value::Object(map) if map.contains_key("_links") => Ok(Resource::from_document(
            None,
            map,
            Arc::downgrade(manager),
        )),
        other => Err(HalError::UnknownResourceInflation { document: other }),
    }
}

fn inflate_typed(manager: &Arc<ManagerInner>, map: Map<String, Value>) -> Result<Resource, HalError> {
    let Some(wire_name) = map.get("_type").and_then(Value::as_str) else {
        return Err(HalError::UnknownResourceInflation {
            document: Value::Object(map),
        });
    };

    let resource_type = manager.registry().resolve(wire_name);
    Ok(Resource::from_document(
        Some(resource_type),
        map,
        Arc::downgrade(manager),
    ))
}
