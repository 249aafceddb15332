//! Lazy pagination over collection pages.
//!
//! A collection page lists its elements under `_embedded` and may point at
//! the following page with a `next` link. [`ResourcePager`] yields the
//! elements one at a time and only requests the next page once the current
//! one is exhausted.
//!
//! Continuation requests reuse the headers of the request that produced the
//! current page. Their query parameters start from that request's parameters
//! and are overlaid with the `next` href's own, so a `page=2` in the link
//! replaces `page=1` while a `per_page=50` sent with the first request
//! survives.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak};

use serde_json::{Map, Value};

use crate::clients::{QueryParams, RequestRecord};
use crate::hal::errors::{json_kind, HalError};
use crate::hal::inflate::inflate_element;
use crate::hal::manager::ManagerInner;
use crate::hal::resource::{link_href, Resource};

/// A forward-only, single-pass sequence of resources spanning one or more
/// collection pages.
///
/// Pull elements with [`next`](Self::next) or drain them with
/// [`collect_all`](Self::collect_all). Once the last page is exhausted, or
/// once an error has been yielded, every further call to `next` returns
/// `None`. Re-reading a collection requires a fresh fetch.
///
/// # Example
///
/// ```rust,ignore
/// let mut apps = manager
///     .fetch("https://api.example.com/apps", QueryParams::new())
///     .await?
///     .into_collection()?;
///
/// while let Some(app) = apps.next().await {
///     let app = app?;
///     println!("{}", app.type_name());
/// }
/// ```
#[derive(Debug)]
pub struct ResourcePager {
    manager: Weak<ManagerInner>,
    pending: VecDeque<Result<Value, HalError>>,
    next_href: Option<String>,
    headers: HashMap<String, String>,
    query: QueryParams,
    pages_fetched: usize,
    finished: bool,
}

impl ResourcePager {
    pub(crate) fn new(
        manager: &Arc<ManagerInner>,
        page: Map<String, Value>,
        origin: Option<&RequestRecord>,
    ) -> Self {
        let mut pager = Self {
            manager: Arc::downgrade(manager),
            pending: VecDeque::new(),
            next_href: None,
            headers: HashMap::new(),
            query: QueryParams::new(),
            pages_fetched: 0,
            finished: false,
        };
        if let Some(record) = origin {
            pager.remember_request(record);
        }
        pager.load_page(page);
        pager
    }

    /// Returns the number of pages loaded so far, the first included.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Returns `true` once the sequence can yield nothing more.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Yields the next resource, fetching the next page when the current
    /// one is exhausted.
    ///
    /// Returns `None` when the sequence is exhausted. An error ends the
    /// sequence: it is yielded once and every later call returns `None`.
    pub async fn next(&mut self) -> Option<Result<Resource, HalError>> {
        loop {
            if self.finished {
                return None;
            }

            if let Some(element) = self.pending.pop_front() {
                let result = element.and_then(|document| {
                    let manager = self.manager()?;
                    inflate_element(&manager, document)
                });
                if result.is_err() {
                    self.finish();
                }
                return Some(result);
            }

            let Some(href) = self.next_href.take() else {
                self.finish();
                return None;
            };

            if let Err(error) = self.fetch_page(&href).await {
                self.finish();
                return Some(Err(error));
            }
        }
    }

    /// Drains the sequence into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first error the sequence yields.
    pub async fn collect_all(mut self) -> Result<Vec<Resource>, HalError> {
        let mut resources = Vec::new();
        while let Some(resource) = self.next().await {
            resources.push(resource?);
        }
        Ok(resources)
    }

    async fn fetch_page(&mut self, href: &str) -> Result<(), HalError> {
        let manager = self.manager()?;
        let url = manager.resolve_href(href)?;

        let mut query = self.query.clone();
        query.merge(QueryParams::from_url(&url));
        let mut target = url;
        target.set_query(None);

        tracing::debug!(
            "Following next page {} (page {})",
            target,
            self.pages_fetched + 1
        );

        let response = manager
            .transport()
            .get(target.as_str(), &self.headers, &query)
            .await?;
        self.remember_request(&response.request);

        match response.body {
            // Typed documents inflate as single resources, never as pages
            Value::Object(page) if page.contains_key("_type") => {
                return Err(HalError::UnexpectedShape {
                    expected: "collection",
                    found: "resource",
                });
            }
            Value::Object(page) => self.load_page(page),
            Value::Null => self.pages_fetched += 1,
            other => return Err(HalError::UnknownResourceInflation { document: other }),
        }
        Ok(())
    }

    fn remember_request(&mut self, record: &RequestRecord) {
        self.headers.clone_from(&record.headers);
        self.query = record.query.clone();
    }

    fn load_page(&mut self, mut page: Map<String, Value>) {
        self.pages_fetched += 1;

        match page.remove("_embedded") {
            Some(Value::Object(relations)) => {
                for (relation, value) in relations {
                    match value {
                        Value::Array(items) => self.pending.extend(items.into_iter().map(Ok)),
                        Value::Object(element) => {
                            self.pending.push_back(Ok(Value::Object(element)));
                        }
                        other => self
                            .pending
                            .push_back(Err(HalError::UnknownEmbeddedResourceType {
                                relation,
                                kind: json_kind(&other),
                            })),
                    }
                }
            }
            Some(other) => self
                .pending
                .push_back(Err(HalError::UnknownEmbeddedResourceType {
                    relation: "_embedded".to_string(),
                    kind: json_kind(&other),
                })),
            None => {}
        }

        self.next_href = page
            .get("_links")
            .and_then(Value::as_object)
            .and_then(|links| link_href(links, "next"))
            .map(String::from);
    }

    fn finish(&mut self) {
        self.finished = true;
        self.pending.clear();
        self.next_href = None;
    }

    fn manager(&self) -> Result<Arc<ManagerInner>, HalError> {
        self.manager.upgrade().ok_or(HalError::ManagerUnavailable)
    }
}

// Verify ResourcePager can move between threads at compile time
const _: fn() = || {
    const fn assert_send<T: Send>() {}
    assert_send::<ResourcePager>();
};
