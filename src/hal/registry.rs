//! Runtime registry of resource types.
//!
//! Hypermedia documents name their own type (`"_type": "ssh_certificate"`).
//! The registry turns those wire names into [`ResourceType`] descriptors,
//! creating each descriptor the first time its normalized name is seen and
//! handing back the same descriptor on every later lookup. Two descriptors
//! from the same registry compare equal exactly when they are the same
//! allocation.
//!
//! # Example
//!
//! ```rust
//! use hal_api::hal::TypeRegistry;
//!
//! let registry = TypeRegistry::new();
//! let a = registry.resolve("ssh_certificates");
//! let b = registry.resolve("ssh_certificate");
//!
//! assert_eq!(a, b);
//! assert_eq!(a.name(), "SshCertificate");
//! assert_eq!(a.api_path(), "/ssh_certificates/{}");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use crate::hal::inflect::{camelize, pluralize, singularize, underscore};

#[derive(Debug)]
struct TypeInfo {
    name: String,
    api_path: String,
}

/// A lightweight, identity-stable type tag for inflated resources.
///
/// Cloning is cheap. Equality is reference equality: descriptors resolved
/// from the same [`TypeRegistry`] for the same normalized name are equal.
#[derive(Clone)]
pub struct ResourceType(Arc<TypeInfo>);

impl ResourceType {
    fn new(name: String) -> Self {
        let api_path = format!("/{}/{{}}", pluralize(&underscore(&name)));
        Self(Arc::new(TypeInfo { name, api_path }))
    }

    /// Returns the normalized type name (e.g., `SshCertificate`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the path template with one `{}` slot for an identifier
    /// (e.g., `/ssh_certificates/{}`).
    #[must_use]
    pub fn api_path(&self) -> &str {
        &self.0.api_path
    }

    /// Fills the identifier slot of [`api_path`](Self::api_path).
    #[must_use]
    pub fn path_for(&self, id: impl fmt::Display) -> String {
        self.0.api_path.replacen("{}", &id.to_string(), 1)
    }

    /// Returns `true` if both descriptors are the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ResourceType {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ResourceType {}

impl Hash for ResourceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceType").field(&self.0.name).finish()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Normalizes a wire type name: camel-cases each underscore-delimited
/// segment and singularizes the result.
///
/// ```rust
/// use hal_api::hal::normalize_type_name;
///
/// assert_eq!(normalize_type_name("ssh_certificates"), "SshCertificate");
/// assert_eq!(normalize_type_name("app"), "App");
/// ```
#[must_use]
pub fn normalize_type_name(wire_name: &str) -> String {
    singularize(&camelize(wire_name))
}

/// Maps normalized type names to their [`ResourceType`] descriptors.
///
/// Entries are created on first lookup and live as long as the registry.
/// An [`ApiManager`](crate::hal::ApiManager) owns one for its whole
/// lifetime; several managers may share one through an `Arc`.
///
/// # Thread Safety
///
/// Lookups take a read lock. Inserts take the write lock and re-check the
/// map, so concurrent first use of a name yields a single descriptor.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, ResourceType>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a wire type name to its descriptor, creating it on first use.
    pub fn resolve(&self, wire_name: &str) -> ResourceType {
        let name = normalize_type_name(wire_name);

        if let Some(existing) = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name)
        {
            return existing.clone();
        }

        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        types
            .entry(name)
            .or_insert_with_key(|name| {
                tracing::trace!("Synthesizing resource type {}", name);
                ResourceType::new(name.clone())
            })
            .clone()
    }

    /// Returns the descriptor for a normalized name without creating one.
    #[must_use]
    pub fn get(&self, normalized_name: &str) -> Option<ResourceType> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(normalized_name)
            .cloned()
    }

    /// Returns the number of synthesized types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no type has been synthesized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Verify TypeRegistry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TypeRegistry>();
    assert_send_sync::<ResourceType>();
};
