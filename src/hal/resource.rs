//! Inflated resources and the member-resolution protocol.
//!
//! A [`Resource`] is an immutable snapshot of one document. Its members are
//! not known ahead of time, so [`Resource::get`] resolves a name against the
//! document in a fixed order, stopping at the first match:
//!
//! 1. A stored attribute. `_type` yields the [`ResourceType`]; names ending
//!    in `_at` are parsed as timestamps.
//! 2. A link relation, yielding a [`LinkOperation`].
//! 3. An embedded relation, inflated on first access and cached.
//! 4. `<relation>_id`, when the relation's href ends in a numeric segment.
//! 5. `create_<singular>`, when a `<plural>` link relation exists.
//!
//! Anything else is [`HalError::UnknownAttribute`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_api::hal::Member;
//!
//! let app = manager.fetch_type("app", 12, QueryParams::new()).await?.into_resource()?;
//!
//! let created = app.timestamp("created_at")?;
//! let account_id = app.foreign_key("account_id")?;
//! let operations = app.link("operations")?.fetch().await?;
//!
//! if let Member::Attribute(handle) = app.get("handle")? {
//!     println!("{handle} created {created} in account {account_id}");
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::clients::QueryParams;
use crate::hal::errors::{json_kind, HalError};
use crate::hal::inflate::{inflate_element, Inflated};
use crate::hal::inflect::pluralize;
use crate::hal::manager::ManagerInner;
use crate::hal::registry::ResourceType;

/// Type name reported for resources without a `_type`.
const FALLBACK_TYPE_NAME: &str = "Resource";

/// Returns the `href` of a relation in a `_links` map.
pub(crate) fn link_href<'a>(links: &'a Map<String, Value>, relation: &str) -> Option<&'a str> {
    links.get(relation)?.get("href")?.as_str()
}

struct ResourceData {
    resource_type: Option<ResourceType>,
    attributes: Map<String, Value>,
    links: Map<String, Value>,
    embedded: Map<String, Value>,
    embedded_cache: RwLock<HashMap<String, Embedded>>,
    manager: Weak<ManagerInner>,
}

/// A navigable view over one inflated document.
///
/// Cloning is cheap and yields a handle to the same snapshot; use
/// [`Resource::ptr_eq`] to test identity. A resource keeps only a weak
/// reference to the [`ApiManager`](crate::hal::ApiManager) that inflated
/// it, so navigation fails with [`HalError::ManagerUnavailable`] once every
/// manager handle has been dropped.
#[derive(Clone)]
pub struct Resource(Arc<ResourceData>);

impl Resource {
    pub(crate) fn from_document(
        resource_type: Option<ResourceType>,
        mut document: Map<String, Value>,
        manager: Weak<ManagerInner>,
    ) -> Self {
        let links = match document.remove("_links") {
            Some(Value::Object(links)) => links,
            _ => Map::new(),
        };
        let embedded = match document.remove("_embedded") {
            Some(Value::Object(embedded)) => embedded,
            _ => Map::new(),
        };

        Self(Arc::new(ResourceData {
            resource_type,
            attributes: document,
            links,
            embedded,
            embedded_cache: RwLock::new(HashMap::new()),
            manager,
        }))
    }

    /// Returns the resource's type, or `None` for a link-only resource.
    #[must_use]
    pub fn resource_type(&self) -> Option<&ResourceType> {
        self.0.resource_type.as_ref()
    }

    /// Returns the normalized type name, or `"Resource"` for a link-only
    /// resource.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.0
            .resource_type
            .as_ref()
            .map_or(FALLBACK_TYPE_NAME, ResourceType::name)
    }

    /// Returns the path template of the resource's type.
    #[must_use]
    pub fn api_path(&self) -> Option<&str> {
        self.0.resource_type.as_ref().map(ResourceType::api_path)
    }

    /// Returns the stored attributes (everything but `_links` and `_embedded`).
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0.attributes
    }

    /// Returns a raw stored attribute without any interpretation.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.0.attributes.get(name)
    }

    /// Returns the href of a link relation.
    #[must_use]
    pub fn link_href(&self, relation: &str) -> Option<&str> {
        link_href(&self.0.links, relation)
    }

    /// Returns the `self` link, if present.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.link_href("self")
    }

    /// Returns the names of all link relations, in document order.
    pub fn link_relations(&self) -> impl Iterator<Item = &str> {
        self.0.links.keys().map(String::as_str)
    }

    /// Returns the names of all embedded relations, in document order.
    pub fn embedded_relations(&self) -> impl Iterator<Item = &str> {
        self.0.embedded.keys().map(String::as_str)
    }

    /// Returns `true` if both handles refer to the same snapshot.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the document this resource was inflated from: attributes plus
    /// the raw `_links` and `_embedded` maps.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut document = self.0.attributes.clone();
        document.insert("_links".to_string(), Value::Object(self.0.links.clone()));
        document.insert(
            "_embedded".to_string(),
            Value::Object(self.0.embedded.clone()),
        );
        Value::Object(document)
    }

    /// Resolves a member by name.
    ///
    /// # Errors
    ///
    /// - [`HalError::InvalidTimestamp`] if a `*_at` attribute does not parse
    /// - [`HalError::UnknownEmbeddedResourceType`] or
    ///   [`HalError::UnknownResourceInflation`] if an embedded relation
    ///   cannot be inflated
    /// - [`HalError::ManagerUnavailable`] if an embedded relation must be
    ///   inflated after the manager was dropped
    /// - [`HalError::UnknownAttribute`] if no strategy matches
    pub fn get(&self, name: &str) -> Result<Member, HalError> {
        if let Some(value) = self.0.attributes.get(name) {
            return self.resolve_attribute(name, value);
        }

        if let Some(href) = self.link_href(name) {
            return Ok(Member::Link(LinkOperation {
                href: href.to_string(),
                manager: Weak::clone(&self.0.manager),
            }));
        }

        if self.0.embedded.contains_key(name) {
            return self.resolve_embedded(name).map(Member::Embedded);
        }

        if let Some(id) = name
            .strip_suffix("_id")
            .and_then(|relation| self.link_href(relation))
            .and_then(trailing_id)
        {
            return Ok(Member::ForeignKey(id));
        }

        if let Some(singular) = name.strip_prefix("create_") {
            let relation = pluralize(singular).to_lowercase();
            if let Some(href) = self.link_href(&relation) {
                return Ok(Member::Create(CreateOperation {
                    href: href.to_string(),
                    manager: Weak::clone(&self.0.manager),
                }));
            }
        }

        Err(HalError::UnknownAttribute {
            resource_type: self.type_name().to_string(),
            name: name.to_string(),
        })
    }

    /// Resolves a `*_at` member to a timestamp.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`get`](Self::get), or
    /// [`HalError::UnexpectedShape`] if the member is not a timestamp.
    pub fn timestamp(&self, name: &str) -> Result<DateTime<Utc>, HalError> {
        match self.get(name)? {
            Member::Timestamp(instant) => Ok(instant),
            other => Err(other.unexpected("timestamp")),
        }
    }

    /// Resolves a link relation to its navigation operation.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`get`](Self::get), or
    /// [`HalError::UnexpectedShape`] if the member is not a link.
    pub fn link(&self, name: &str) -> Result<LinkOperation, HalError> {
        match self.get(name)? {
            Member::Link(operation) => Ok(operation),
            other => Err(other.unexpected("link")),
        }
    }

    /// Resolves an embedded relation.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`get`](Self::get), or
    /// [`HalError::UnexpectedShape`] if the member is not embedded.
    pub fn embedded(&self, name: &str) -> Result<Embedded, HalError> {
        match self.get(name)? {
            Member::Embedded(embedded) => Ok(embedded),
            other => Err(other.unexpected("embedded")),
        }
    }

    /// Resolves a `<relation>_id` member.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`get`](Self::get), or
    /// [`HalError::UnexpectedShape`] if the member is not a foreign key.
    pub fn foreign_key(&self, name: &str) -> Result<u64, HalError> {
        match self.get(name)? {
            Member::ForeignKey(id) => Ok(id),
            other => Err(other.unexpected("foreign key")),
        }
    }

    /// Resolves a `create_<singular>` member.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`get`](Self::get), or
    /// [`HalError::UnexpectedShape`] if the member is not a create operation.
    pub fn create_operation(&self, name: &str) -> Result<CreateOperation, HalError> {
        match self.get(name)? {
            Member::Create(operation) => Ok(operation),
            other => Err(other.unexpected("create operation")),
        }
    }

    fn resolve_attribute(&self, name: &str, value: &Value) -> Result<Member, HalError> {
        if name == "_type" {
            if let Some(resource_type) = &self.0.resource_type {
                return Ok(Member::Type(resource_type.clone()));
            }
        }

        if name.ends_with("_at") {
            return match value {
                Value::Null => Ok(Member::Attribute(Value::Null)),
                Value::String(raw) => {
                    parse_timestamp(raw)
                        .map(Member::Timestamp)
                        .map_err(|reason| HalError::InvalidTimestamp {
                            name: name.to_string(),
                            value: value.clone(),
                            reason,
                        })
                }
                other => Err(HalError::InvalidTimestamp {
                    name: name.to_string(),
                    value: other.clone(),
                    reason: format!("expected a string, found {}", json_kind(other)),
                }),
            };
        }

        Ok(Member::Attribute(value.clone()))
    }

    fn resolve_embedded(&self, name: &str) -> Result<Embedded, HalError> {
        if let Some(cached) = self
            .0
            .embedded_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(cached.clone());
        }

        let raw = self.0.embedded.get(name).cloned().unwrap_or(Value::Null);
        let inflated = match raw {
            Value::Object(document) => {
                let manager = self.manager()?;
                Embedded::One(inflate_element(&manager, Value::Object(document))?)
            }
            Value::Array(items) => {
                let manager = self.manager()?;
                let resources = items
                    .into_iter()
                    .map(|item| inflate_element(&manager, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Embedded::Many(resources)
            }
            other => {
                return Err(HalError::UnknownEmbeddedResourceType {
                    relation: name.to_string(),
                    kind: json_kind(&other),
                })
            }
        };

        // First writer wins so every caller observes the same snapshot
        let mut cache = self
            .0
            .embedded_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(name.to_string()).or_insert(inflated).clone())
    }

    fn manager(&self) -> Result<Arc<ManagerInner>, HalError> {
        self.0.manager.upgrade().ok_or(HalError::ManagerUnavailable)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("type", &self.type_name())
            .field("attributes", &self.0.attributes)
            .field("links", &self.0.links.keys().collect::<Vec<_>>())
            .field("embedded", &self.0.embedded.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Parses an ISO-8601 timestamp. A trailing `Z` is a zero UTC offset; a
/// timestamp without any offset is taken as UTC, and a bare date is
/// midnight UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => Ok(instant.with_timezone(&Utc)),
        Err(rfc_error) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(NaiveDateTime::from))
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_error.to_string()),
    }
}

/// Extracts a numeric identifier from the last path segment of an href.
fn trailing_id(href: &str) -> Option<u64> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let segment = path.rsplit('/').next()?;
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// The outcome of resolving a member name on a [`Resource`].
#[derive(Clone, Debug)]
pub enum Member {
    /// A stored attribute, returned as-is.
    Attribute(Value),
    /// The resource's own type (the `_type` member).
    Type(ResourceType),
    /// A parsed `*_at` attribute.
    Timestamp(DateTime<Utc>),
    /// A navigable link relation.
    Link(LinkOperation),
    /// An inflated embedded relation.
    Embedded(Embedded),
    /// A numeric id taken from a link relation's href.
    ForeignKey(u64),
    /// A create operation against a collection link.
    Create(CreateOperation),
}

impl Member {
    /// Returns a short name for this kind of member.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Attribute(_) => "attribute",
            Self::Type(_) => "type",
            Self::Timestamp(_) => "timestamp",
            Self::Link(_) => "link",
            Self::Embedded(_) => "embedded",
            Self::ForeignKey(_) => "foreign key",
            Self::Create(_) => "create operation",
        }
    }

    const fn unexpected(&self, expected: &'static str) -> HalError {
        HalError::UnexpectedShape {
            expected,
            found: self.kind(),
        }
    }
}

/// An inflated embedded relation.
#[derive(Clone, Debug)]
pub enum Embedded {
    /// The relation held a single sub-document.
    One(Resource),
    /// The relation held an array of sub-documents, in array order.
    Many(Vec<Resource>),
}

impl Embedded {
    /// Returns the single resource, if this relation held an object.
    #[must_use]
    pub const fn as_one(&self) -> Option<&Resource> {
        match self {
            Self::One(resource) => Some(resource),
            Self::Many(_) => None,
        }
    }

    /// Returns the resources as a slice, whichever form the relation held.
    #[must_use]
    pub fn as_slice(&self) -> &[Resource] {
        match self {
            Self::One(resource) => std::slice::from_ref(resource),
            Self::Many(resources) => resources,
        }
    }
}

/// Follows a link relation. Every call issues a fresh `GET`.
#[derive(Clone)]
pub struct LinkOperation {
    href: String,
    manager: Weak<ManagerInner>,
}

impl LinkOperation {
    /// Returns the link target.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Fetches the link target without query parameters.
    ///
    /// # Errors
    ///
    /// See [`fetch_with`](Self::fetch_with).
    pub async fn fetch(&self) -> Result<Inflated, HalError> {
        self.fetch_with(QueryParams::new()).await
    }

    /// Fetches the link target with query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::ManagerUnavailable`] if the manager was dropped,
    /// [`HalError::Http`] if the request fails, or an inflation error.
    pub async fn fetch_with(&self, params: QueryParams) -> Result<Inflated, HalError> {
        let manager = self.manager.upgrade().ok_or(HalError::ManagerUnavailable)?;
        manager.fetch(&self.href, params).await
    }
}

impl fmt::Debug for LinkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkOperation")
            .field("href", &self.href)
            .finish_non_exhaustive()
    }
}

/// Creates a resource by `POST`ing fields to a collection link.
#[derive(Clone)]
pub struct CreateOperation {
    href: String,
    manager: Weak<ManagerInner>,
}

impl CreateOperation {
    /// Returns the collection the operation posts to.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Posts `fields` as the JSON request body and inflates the response.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::ManagerUnavailable`] if the manager was dropped,
    /// [`HalError::Http`] if the request fails, or an inflation error.
    pub async fn call(&self, fields: Value) -> Result<Inflated, HalError> {
        let manager = self.manager.upgrade().ok_or(HalError::ManagerUnavailable)?;
        manager.create(&self.href, &fields).await
    }
}

impl fmt::Debug for CreateOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateOperation")
            .field("href", &self.href)
            .finish_non_exhaustive()
    }
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
    assert_send_sync::<Member>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::testing::{manager_with, ok};
    use chrono::TimeZone;
    use serde_json::json;

    fn app_document() -> Value {
        json!({
            "_type": "app",
            "id": 12,
            "handle": "web",
            "created_at": "2024-01-01T00:00:00Z",
            "deleted_at": null,
            "_links": {
                "self": {"href": "https://api.example.com/apps/12"},
                "account": {"href": "https://api.example.com/accounts/42"},
                "stack": {"href": "https://api.example.com/stacks/shared"},
                "backups": {"href": "https://api.example.com/apps/12/backups"}
            },
            "_embedded": {
                "current_configuration": {"_type": "configuration", "id": 3},
                "services": [
                    {"_type": "service", "id": 1},
                    {"_type": "service", "id": 2}
                ],
                "broken": "nope"
            }
        })
    }

    #[test]
    fn test_attribute_returned_unchanged() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        assert!(matches!(app.get("handle").unwrap(), Member::Attribute(v) if v == json!("web")));
        assert!(matches!(app.get("id").unwrap(), Member::Attribute(v) if v == json!(12)));
    }

    #[test]
    fn test_type_member_is_descriptor() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let Member::Type(kind) = app.get("_type").unwrap() else {
            panic!("expected a type member");
        };
        assert_eq!(kind, manager.resource_type("apps"));
    }

    #[test]
    fn test_timestamp_with_z_suffix_is_utc() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let created = app.timestamp("created_at").unwrap();
        assert_eq!(created, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_timestamp_with_offset_and_naive_forms() {
        assert_eq!(
            parse_timestamp("2024-01-01T02:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2024-01-01T00:00:00.250").unwrap().timestamp_millis(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp_millis() + 250
        );
    }

    #[test]
    fn test_date_only_timestamp_is_midnight_utc() {
        assert_eq!(
            parse_timestamp("2024-01-01").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2024-03-05 06:07:08").unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 6, 7, 8).unwrap()
        );
        assert!(parse_timestamp("2024-13-01").is_err());

        let (manager, _) = manager_with(vec![]);
        let release = manager
            .inflate(json!({"_type": "release", "released_at": "2024-01-01"}))
            .unwrap()
            .into_resource()
            .unwrap();
        assert_eq!(
            release.timestamp("released_at").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_relation_names_in_document_order() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        assert_eq!(
            app.link_relations().collect::<Vec<_>>(),
            ["self", "account", "stack", "backups"]
        );
        assert_eq!(
            app.embedded_relations().collect::<Vec<_>>(),
            ["current_configuration", "services", "broken"]
        );
    }

    #[test]
    fn test_null_timestamp_is_plain_attribute() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        assert!(matches!(app.get("deleted_at").unwrap(), Member::Attribute(Value::Null)));
    }

    #[test]
    fn test_invalid_timestamp_fails() {
        let (manager, _) = manager_with(vec![]);
        let resource = manager
            .inflate(json!({"_type": "app", "updated_at": "yesterday", "built_at": 5}))
            .unwrap()
            .into_resource()
            .unwrap();

        assert!(matches!(
            resource.get("updated_at").unwrap_err(),
            HalError::InvalidTimestamp { ref name, .. } if name == "updated_at"
        ));
        assert!(matches!(
            resource.get("built_at").unwrap_err(),
            HalError::InvalidTimestamp { .. }
        ));
    }

    #[test]
    fn test_link_member_carries_href() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let account = app.link("account").unwrap();
        assert_eq!(account.href(), "https://api.example.com/accounts/42");
        assert_eq!(app.href(), Some("https://api.example.com/apps/12"));
    }

    #[test]
    fn test_embedded_object_is_cached() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let first = app.embedded("current_configuration").unwrap();
        let second = app.embedded("current_configuration").unwrap();

        let (Some(a), Some(b)) = (first.as_one(), second.as_one()) else {
            panic!("expected single embedded resources");
        };
        assert!(a.ptr_eq(b));
        assert_eq!(a.type_name(), "Configuration");
    }

    #[test]
    fn test_embedded_array_preserves_order_and_identity() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let first = app.embedded("services").unwrap();
        let second = app.embedded("services").unwrap();

        let ids: Vec<_> = first
            .as_slice()
            .iter()
            .map(|s| s.attribute("id").cloned().unwrap())
            .collect();
        assert_eq!(ids, vec![json!(1), json!(2)]);
        assert!(first.as_slice()[0].ptr_eq(&second.as_slice()[0]));
    }

    #[test]
    fn test_embedded_scalar_fails() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let error = app.get("broken").unwrap_err();
        assert!(matches!(
            error,
            HalError::UnknownEmbeddedResourceType { ref relation, kind: "string" } if relation == "broken"
        ));
    }

    #[test]
    fn test_foreign_key_from_numeric_link() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        assert_eq!(app.foreign_key("account_id").unwrap(), 42);
    }

    #[test]
    fn test_foreign_key_non_numeric_falls_through() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let error = app.get("stack_id").unwrap_err();
        assert!(matches!(
            error,
            HalError::UnknownAttribute { ref resource_type, ref name }
                if resource_type == "App" && name == "stack_id"
        ));
    }

    #[test]
    fn test_create_member_targets_plural_link() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let create = app.create_operation("create_backup").unwrap();
        assert_eq!(create.href(), "https://api.example.com/apps/12/backups");
        assert!(app.get("create_widget").is_err());
    }

    #[test]
    fn test_create_member_uses_irregular_plural() {
        let (manager, _) = manager_with(vec![]);
        let dataset = manager
            .inflate(json!({
                "_type": "dataset",
                "_links": {"analyses": {"href": "https://api.example.com/datasets/4/analyses"}}
            }))
            .unwrap()
            .into_resource()
            .unwrap();

        let create = dataset.create_operation("create_analysis").unwrap();
        assert_eq!(create.href(), "https://api.example.com/datasets/4/analyses");
    }

    #[test]
    fn test_stored_attribute_shadows_link() {
        let (manager, _) = manager_with(vec![]);
        let resource = manager
            .inflate(json!({
                "_type": "app",
                "account": "inline",
                "_links": {"account": {"href": "https://api.example.com/accounts/1"}}
            }))
            .unwrap()
            .into_resource()
            .unwrap();

        assert!(matches!(resource.get("account").unwrap(), Member::Attribute(_)));
    }

    #[test]
    fn test_typed_accessor_reports_mismatch() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let error = app.link("handle").unwrap_err();
        assert!(matches!(
            error,
            HalError::UnexpectedShape {
                expected: "link",
                found: "attribute"
            }
        ));
    }

    #[test]
    fn test_to_value_contains_raw_parts() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let value = app.to_value();
        assert_eq!(value["handle"], json!("web"));
        assert_eq!(
            value["_links"]["account"]["href"],
            json!("https://api.example.com/accounts/42")
        );
        assert_eq!(value["_embedded"]["broken"], json!("nope"));
        assert_eq!(serde_json::to_value(&app).unwrap(), value);
    }

    #[test]
    fn test_api_path_from_type() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();
        assert_eq!(app.api_path(), Some("/apps/{}"));
    }

    #[test]
    fn test_trailing_id_rules() {
        assert_eq!(trailing_id("https://api.example.com/accounts/42"), Some(42));
        assert_eq!(trailing_id("/accounts/42?expand=true"), Some(42));
        assert_eq!(trailing_id("https://api.example.com/accounts/"), None);
        assert_eq!(trailing_id("https://api.example.com/accounts/4a"), None);
        assert_eq!(trailing_id("https://api.example.com/accounts/-1"), None);
        assert_eq!(trailing_id("/accounts/99999999999999999999999"), None);
    }

    #[tokio::test]
    async fn test_link_operation_fetches_each_call() {
        let account = json!({"_type": "account", "id": 42});
        let (manager, transport) = manager_with(vec![ok(account.clone()), ok(account)]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();

        let link = app.link("account").unwrap();
        let first = link.fetch().await.unwrap().into_resource().unwrap();
        let second = link.fetch().await.unwrap().into_resource().unwrap();

        assert!(!first.ptr_eq(&second));
        assert_eq!(transport.calls().len(), 2);
        assert_eq!(transport.calls()[0].url, "https://api.example.com/accounts/42");
    }

    #[tokio::test]
    async fn test_navigation_after_manager_dropped_fails() {
        let (manager, _) = manager_with(vec![]);
        let app = manager.inflate(app_document()).unwrap().into_resource().unwrap();
        let link = app.link("account").unwrap();
        drop(manager);

        assert!(matches!(
            link.fetch().await.unwrap_err(),
            HalError::ManagerUnavailable
        ));
        assert!(matches!(
            app.get("services").unwrap_err(),
            HalError::ManagerUnavailable
        ));
    }
}
