//! The entry point for navigating a hypermedia API.
//!
//! [`ApiManager`] combines a [`Transport`], a [`TypeRegistry`], and the
//! inflation rules into one handle. Every [`Resource`] it produces keeps a
//! weak reference back to it for further navigation.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;
use url::Url;

use crate::clients::{HttpClient, HttpResponse, QueryParams, Transport};
use crate::config::HalConfig;
use crate::hal::errors::HalError;
use crate::hal::inflate::{inflate_document, Inflated};
use crate::hal::registry::{ResourceType, TypeRegistry};
use crate::hal::resource::{Member, Resource};

/// State shared by an [`ApiManager`] and its clones.
#[derive(Debug)]
pub(crate) struct ManagerInner {
    config: HalConfig,
    transport: Arc<dyn Transport>,
    registry: Arc<TypeRegistry>,
    root: OnceCell<Resource>,
}

impl ManagerInner {
    pub(crate) fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Resolves an href against the base URL. Absolute hrefs are returned
    /// unchanged.
    pub(crate) fn resolve_href(&self, href: &str) -> Result<Url, HalError> {
        self.config
            .base_url()
            .join(href)
            .map_err(|e| HalError::InvalidUrl {
                url: href.to_string(),
                reason: e.to_string(),
            })
    }

    pub(crate) async fn fetch(
        self: &Arc<Self>,
        href: &str,
        params: QueryParams,
    ) -> Result<Inflated, HalError> {
        let url = self.resolve_href(href)?;
        let response = self
            .transport
            .get(url.as_str(), &HashMap::new(), &params)
            .await?;
        self.inflate_response(response)
    }

    pub(crate) async fn create(
        self: &Arc<Self>,
        href: &str,
        fields: &Value,
    ) -> Result<Inflated, HalError> {
        let url = self.resolve_href(href)?;
        let response = self
            .transport
            .post(url.as_str(), &HashMap::new(), fields)
            .await?;
        self.inflate_response(response)
    }

    fn inflate_response(self: &Arc<Self>, response: HttpResponse) -> Result<Inflated, HalError> {
        if response.is_empty() {
            tracing::debug!(
                "Empty response ({}) from {}",
                response.code,
                response.request.url
            );
            return Ok(Inflated::Empty);
        }

        let HttpResponse { body, request, .. } = response;
        inflate_document(self, body, Some(&request))
    }
}

/// A navigable client for one hypermedia API.
///
/// Cloning is cheap; clones share the transport, the type registry, and the
/// cached root resource.
///
/// # Thread Safety
///
/// `ApiManager` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use hal_api::{ApiBaseUrl, AccessToken, ApiManager, HalConfig};
/// use hal_api::clients::QueryParams;
/// use serde_json::json;
///
/// let config = HalConfig::builder()
///     .base_url(ApiBaseUrl::new("https://api.example.com")?)
///     .access_token(AccessToken::new(token)?)
///     .build()?;
///
/// let manager = ApiManager::connect(config).await?;
///
/// // Typed fetch by id
/// let database = manager
///     .fetch_type("database", 7, QueryParams::new())
///     .await?
///     .into_resource()?;
///
/// // Synthesized create against the `backups` link relation
/// let backup = database
///     .create_operation("create_backup")?
///     .call(json!({"type": "manual"}))
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct ApiManager {
    inner: Arc<ManagerInner>,
}

// Verify ApiManager is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiManager>();
};

impl ApiManager {
    /// Creates a manager backed by an [`HttpClient`] built from `config`.
    ///
    /// The root resource is fetched on first use.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Http`] if the HTTP client cannot be created.
    pub fn new(config: HalConfig) -> Result<Self, HalError> {
        let client = HttpClient::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(client)))
    }

    /// Creates a manager backed by a custom [`Transport`].
    #[must_use]
    pub fn with_transport(config: HalConfig, transport: Arc<dyn Transport>) -> Self {
        Self::from_parts(config, transport, Arc::new(TypeRegistry::new()))
    }

    /// Creates a manager that shares an existing [`TypeRegistry`].
    ///
    /// Managers sharing a registry produce identical [`ResourceType`]s for
    /// the same type name.
    #[must_use]
    pub fn from_parts(
        config: HalConfig,
        transport: Arc<dyn Transport>,
        registry: Arc<TypeRegistry>,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                config,
                transport,
                registry,
                root: OnceCell::new(),
            }),
        }
    }

    /// Creates a manager and fetches the root resource immediately.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Http`] if the client cannot be created or the
    /// root cannot be fetched, or an inflation error if the root is not a
    /// resource.
    pub async fn connect(config: HalConfig) -> Result<Self, HalError> {
        let manager = Self::new(config)?;
        manager.root().await?;
        Ok(manager)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HalConfig {
        &self.inner.config
    }

    /// Returns the type registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.inner.registry
    }

    /// Resolves a wire type name through the registry.
    pub fn resource_type(&self, wire_name: &str) -> ResourceType {
        self.inner.registry.resolve(wire_name)
    }

    /// Returns the root resource, fetching the base URL on first call.
    ///
    /// The root is cached for the lifetime of the manager. A failed fetch is
    /// not cached; the next call tries again.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Http`] if the fetch fails, or
    /// [`HalError::UnexpectedShape`] if the base URL serves a collection or
    /// an empty response.
    pub async fn root(&self) -> Result<Resource, HalError> {
        self.inner
            .root
            .get_or_try_init(|| async {
                let base = self.inner.config.base_url().to_string();
                self.inner
                    .fetch(&base, QueryParams::new())
                    .await?
                    .into_resource()
            })
            .await
            .cloned()
    }

    /// Resolves a member on the root resource.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::UnknownAttribute`] naming `ApiManager` if the root
    /// has no such member, or any error of [`root`](Self::root) and
    /// [`Resource::get`].
    pub async fn member(&self, name: &str) -> Result<Member, HalError> {
        self.root()
            .await?
            .get(name)
            .map_err(|error| match error {
                HalError::UnknownAttribute { name, .. } => HalError::UnknownAttribute {
                    resource_type: "ApiManager".to_string(),
                    name,
                },
                other => other,
            })
    }

    /// Fetches a URL and inflates the response.
    ///
    /// Relative URLs are resolved against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Http`] on transport failures (including any
    /// non-2xx status), or an inflation error.
    pub async fn fetch(&self, url: &str, params: QueryParams) -> Result<Inflated, HalError> {
        self.inner.fetch(url, params).await
    }

    /// Fetches a resource by type and id, using the type's path template.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::InvalidUrl`] if the URL cannot be built, or any
    /// error of [`fetch`](Self::fetch).
    pub async fn fetch_by_id(
        &self,
        resource_type: &ResourceType,
        id: u64,
        params: QueryParams,
    ) -> Result<Inflated, HalError> {
        let path = resource_type.path_for(id);
        let url = self.inner.resolve_href(&path)?;
        self.inner.fetch(url.as_str(), params).await
    }

    /// Fetches a resource by wire type name and id.
    ///
    /// `fetch_type("ssh_certificates", 3, ..)` requests
    /// `<base>/ssh_certificates/3`.
    ///
    /// # Errors
    ///
    /// See [`fetch_by_id`](Self::fetch_by_id).
    pub async fn fetch_type(
        &self,
        type_name: &str,
        id: u64,
        params: QueryParams,
    ) -> Result<Inflated, HalError> {
        let resource_type = self.resource_type(type_name);
        self.fetch_by_id(&resource_type, id, params).await
    }

    /// Posts `fields` to a URL and inflates the response.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Http`] on transport failures, or an inflation
    /// error.
    pub async fn create(&self, url: &str, fields: Value) -> Result<Inflated, HalError> {
        self.inner.create(url, &fields).await
    }

    /// Inflates a document that was obtained elsewhere.
    ///
    /// Collections inflated this way follow `next` links without replaying
    /// any request headers or parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::UnknownResourceInflation`] if the document matches
    /// no known shape.
    pub fn inflate(&self, document: Value) -> Result<Inflated, HalError> {
        inflate_document(&self.inner, document, None)
    }

    #[cfg(test)]
    pub(crate) const fn inner(&self) -> &Arc<ManagerInner> {
        &self.inner
    }
}
