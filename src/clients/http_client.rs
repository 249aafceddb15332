//! HTTP client for hypermedia API communication.
//!
//! This module provides the [`HttpClient`] type, the default [`Transport`]
//! implementation backed by `reqwest`.

use std::collections::HashMap;

use async_trait::async_trait;
use url::Url;

use crate::clients::errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::{HttpResponse, RequestRecord};
use crate::clients::query::QueryParams;
use crate::clients::transport::Transport;
use crate::config::HalConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to a hypermedia API.
///
/// The client handles:
/// - Default headers including `User-Agent`, `Accept`, `Content-Type`, and `Authorization`
/// - Merging query strings embedded in `href`s with explicit parameters
/// - Recording the effective request on every response
/// - Mapping non-2xx responses to [`HttpError::Response`]
///
/// Requests are never retried.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use hal_api::{HalConfig, ApiBaseUrl};
/// use hal_api::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let config = HalConfig::builder()
///     .base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "https://api.example.com/apps")
///     .build()
///     .unwrap();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: &HalConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}HAL API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        if let Some(token) = config.access_token() {
            default_headers.insert("Authorization".to_string(), token.authorization_value());
        }

        for (key, value) in config.default_headers() {
            merge_header(&mut default_headers, key, value);
        }

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails or the URL is not absolute (`InvalidRequest`)
    /// - Network error occurs, including while reading the body (`Network`)
    /// - Non-2xx response received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut url =
            Url::parse(&request.url).map_err(|e| InvalidHttpRequestError::InvalidUrl {
                url: request.url.clone(),
                reason: e.to_string(),
            })?;

        // Query strings inside hrefs are lifted out so the record is complete
        let mut query = QueryParams::from_url(&url);
        query.merge(request.query);
        url.set_query(None);
        url.set_fragment(None);

        let mut headers = self.default_headers.clone();
        for (key, value) in &request.extra_headers {
            merge_header(&mut headers, key, value);
        }

        tracing::debug!("{} {}", request.http_method, url);

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if !query.is_empty() {
            req_builder = req_builder.query(&query.to_pairs());
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        // Bodies that are not JSON are kept verbatim under `raw_body`
        let body = if body_text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body_text)
                .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
        };

        let record = RequestRecord {
            method: request.http_method,
            url,
            headers,
            query,
        };
        let response = HttpResponse::new(code, res_headers, body, record);

        if let Some(reason) = response.deprecation_reason() {
            tracing::warn!(
                "Deprecated request to {}, received notice: {}",
                response.request.url,
                reason
            );
        }

        if response.is_ok() {
            return Ok(response);
        }

        Err(HttpError::Response(HttpResponseError {
            code,
            message: Self::serialize_error(&response),
            error_reference: response.request_id().map(String::from),
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Serializes an error response to a compact JSON message.
    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        for key in ["errors", "error", "message", "raw_body"] {
            if let Some(value) = response.body.get(key) {
                error_body.insert(key.to_string(), value.clone());
            }
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        if error_body.is_empty() {
            return format!("HTTP {} from {}", response.code, response.request.url);
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Inserts a header, replacing any existing header with the same name
/// regardless of case.
fn merge_header(headers: &mut HashMap<String, String>, key: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
    headers.insert(key.to_string(), value.to_string());
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        query: &QueryParams,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, url)
            .extra_headers(headers.clone())
            .query(query.clone())
            .build()?;
        self.request(request).await
    }

    async fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, url)
            .extra_headers(headers.clone())
            .body(body.clone())
            .build()?;
        self.request(request).await
    }
}
