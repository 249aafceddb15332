//! HTTP transport for hypermedia API communication.
//!
//! This module provides the transport layer the navigation core is built on:
//! it performs authenticated `GET`/`POST` requests, parses JSON bodies, and
//! records the effective request so paginated sequences can replay it.
//!
//! # Overview
//!
//! - [`Transport`]: The object-safe seam consumed by [`ApiManager`](crate::hal::ApiManager)
//! - [`HttpClient`]: The `reqwest`-backed [`Transport`] implementation
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response, with its [`RequestRecord`]
//! - [`QueryParams`]: Ordered, multi-valued query parameters
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST)
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_api::{HalConfig, ApiBaseUrl};
//! use hal_api::clients::{HttpClient, HttpRequest, HttpMethod};
//!
//! let config = HalConfig::builder()
//!     .base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = HttpClient::new(&config)?;
//! let request = HttpRequest::builder(HttpMethod::Get, "https://api.example.com/apps")
//!     .query_param("per_page", "50")
//!     .build()
//!     .unwrap();
//!
//! let response = client.request(request).await?;
//! println!("sent: {}", response.request.full_url());
//! ```
//!
//! # Failure Behavior
//!
//! Any status outside 2xx becomes [`HttpError::Response`]. There is no retry
//! or backoff; callers decide what to do with a failed request.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod query;
mod transport;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, RequestRecord};
pub use query::QueryParams;
pub use transport::Transport;
