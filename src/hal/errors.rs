//! Error types for hypermedia inflation and navigation.
//!
//! Every failure is local to the operation that triggered it: an inflation,
//! a member lookup, or a transport call. Nothing is swallowed or retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_api::hal::HalError;
//!
//! match app.get("vhost_id") {
//!     Ok(member) => println!("{member:?}"),
//!     Err(HalError::UnknownAttribute { resource_type, name }) => {
//!         println!("{resource_type} has no member {name}");
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::clients::HttpError;

/// Error type for hypermedia operations.
#[derive(Debug, Error)]
pub enum HalError {
    /// A document matched none of the known hypermedia shapes: it has no
    /// `_type`, no `_embedded`, and no `_links`.
    #[error("Attempt to inflate resource data failed: {document}")]
    UnknownResourceInflation {
        /// The offending document.
        document: Value,
    },

    /// An embedded relation held something other than an object or array.
    #[error("Unknown embedded resource: {relation} for type: {kind}")]
    UnknownEmbeddedResourceType {
        /// The relation name under `_embedded`.
        relation: String,
        /// The JSON kind that was found (e.g., "string").
        kind: &'static str,
    },

    /// Member resolution exhausted every strategy.
    #[error("{resource_type} object has no attribute {name}")]
    UnknownAttribute {
        /// The normalized type name of the resource.
        resource_type: String,
        /// The requested member.
        name: String,
    },

    /// A `*_at` attribute could not be parsed as an ISO-8601 timestamp.
    #[error("Invalid timestamp in {name}: {value} ({reason})")]
    InvalidTimestamp {
        /// The attribute name.
        name: String,
        /// The raw attribute value.
        value: Value,
        /// The parser's explanation.
        reason: String,
    },

    /// An inflated value had a different shape than the caller asked for.
    #[error("Expected {expected} but the response inflated to {found}")]
    UnexpectedShape {
        /// The shape the caller requested.
        expected: &'static str,
        /// The shape that was produced.
        found: &'static str,
    },

    /// A URL built from a type path or link could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// The parser's explanation.
        reason: String,
    },

    /// The [`ApiManager`](crate::hal::ApiManager) a resource was inflated by
    /// has been dropped, so the resource can no longer navigate.
    #[error("The API manager for this resource has been dropped")]
    ManagerUnavailable,

    /// A transport error, propagated unchanged.
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Returns a short name for the kind of a JSON value.
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
