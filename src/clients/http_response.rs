//! HTTP response types for the HAL API client.
//!
//! Besides status, headers, and body, every [`HttpResponse`] carries a
//! [`RequestRecord`] describing the request that produced it. Pagination
//! relies on that record: continuation requests reuse its headers and
//! start from its query parameters.

use std::collections::HashMap;

use url::Url;

use crate::clients::http_request::HttpMethod;
use crate::clients::query::QueryParams;

/// The effective request behind a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestRecord {
    /// The HTTP method that was used.
    pub method: HttpMethod,
    /// The request URL with its query string removed.
    pub url: Url,
    /// Every header that was sent, defaults included.
    pub headers: HashMap<String, String>,
    /// The query parameters that were sent.
    pub query: QueryParams,
}

impl RequestRecord {
    /// Returns the URL as it went over the wire, query string included.
    #[must_use]
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.to_pairs());
        }
        url
    }
}

/// An HTTP response from the API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lower-cased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body. `Null` when the body was empty, and
    /// `{"raw_body": <text>}` when the body was not JSON.
    pub body: serde_json::Value,
    /// The request that produced this response.
    pub request: RequestRecord,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
        request: RequestRecord,
    ) -> Self {
        Self {
            code,
            headers,
            body,
            request,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` for `204 No Content` or an empty body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.code == 204 || matches!(self.body, serde_json::Value::Null)
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the deprecation notice carried by `Deprecation` or `Sunset`.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("deprecation").or_else(|| self.header("sunset"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> RequestRecord {
        RequestRecord {
            method: HttpMethod::Get,
            url: Url::parse("https://api.example.com/apps").unwrap(),
            headers: HashMap::new(),
            query: QueryParams::new(),
        }
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), json!({}), record());
            assert!(
                response.is_ok(),
                "Expected is_ok() to be true for code {code}"
            );
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [400, 404, 422, 500, 503] {
            let response = HttpResponse::new(code, HashMap::new(), json!({}), record());
            assert!(!response.is_ok());
        }
    }

    #[test]
    fn test_is_empty_for_no_content_and_null_body() {
        let no_content = HttpResponse::new(204, HashMap::new(), json!({}), record());
        assert!(no_content.is_empty());

        let null_body = HttpResponse::new(200, HashMap::new(), serde_json::Value::Null, record());
        assert!(null_body.is_empty());

        let document = HttpResponse::new(200, HashMap::new(), json!({}), record());
        assert!(!document.is_empty());
    }

    #[test]
    fn test_request_id_extraction() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc-123-xyz".to_string()]);

        let response = HttpResponse::new(200, headers, json!({}), record());
        assert_eq!(response.request_id(), Some("abc-123-xyz"));
        assert_eq!(response.header("X-Request-Id"), Some("abc-123-xyz"));
    }

    #[test]
    fn test_deprecation_reason_prefers_deprecation_header() {
        let mut headers = HashMap::new();
        headers.insert("sunset".to_string(), vec!["Sat, 01 Nov 2025".to_string()]);
        let response = HttpResponse::new(200, headers.clone(), json!({}), record());
        assert_eq!(response.deprecation_reason(), Some("Sat, 01 Nov 2025"));

        headers.insert("deprecation".to_string(), vec!["true".to_string()]);
        let response = HttpResponse::new(200, headers, json!({}), record());
        assert_eq!(response.deprecation_reason(), Some("true"));
    }

    #[test]
    fn test_full_url_reattaches_query() {
        let mut rec = record();
        rec.query.insert("page", "2");
        assert_eq!(
            rec.full_url().as_str(),
            "https://api.example.com/apps?page=2"
        );
        assert_eq!(record().full_url().as_str(), "https://api.example.com/apps");
    }
}
