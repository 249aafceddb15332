//! The transport seam between the hypermedia core and HTTP.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::clients::errors::HttpError;
use crate::clients::http_response::HttpResponse;
use crate::clients::query::QueryParams;

/// Issues requests on behalf of an [`ApiManager`](crate::hal::ApiManager).
///
/// Both operations must fail with [`HttpError`] when the response status is
/// outside the 2xx range; the core never inspects status codes itself and
/// never retries. The returned [`HttpResponse`] must carry a
/// [`RequestRecord`](crate::clients::RequestRecord) describing the headers
/// and query parameters that were actually sent, since pagination replays
/// them.
///
/// [`HttpClient`](crate::clients::HttpClient) is the production
/// implementation. Tests and embedders can supply their own.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends a `GET` request.
    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        query: &QueryParams,
    ) -> Result<HttpResponse, HttpError>;

    /// Sends a `POST` request with a JSON body.
    async fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError>;
}
