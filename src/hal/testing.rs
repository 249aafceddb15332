//! A scripted in-memory transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::clients::{
    HttpError, HttpMethod, HttpResponse, HttpResponseError, QueryParams, RequestRecord, Transport,
};
use crate::config::{ApiBaseUrl, HalConfig};
use crate::hal::manager::ApiManager;

/// One request seen by [`RecordingTransport`].
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub method: HttpMethod,
    /// The URL as passed in.
    pub url: String,
    /// The headers passed in by the caller.
    pub headers: HashMap<String, String>,
    /// The headers after defaults were applied.
    pub sent_headers: HashMap<String, String>,
    pub query: QueryParams,
    pub body: Option<Value>,
}

/// Replies to requests in order from a script of `(status, body)` pairs and
/// records every call.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    script: Mutex<VecDeque<(u16, Value)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingTransport {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &HashMap<String, String>,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> Result<HttpResponse, HttpError> {
        let mut sent_headers = HashMap::from([(
            "Accept".to_string(),
            "application/json".to_string(),
        )]);
        sent_headers.extend(headers.clone());

        let mut parsed = Url::parse(url).unwrap();
        let mut effective_query = QueryParams::from_url(&parsed);
        effective_query.merge(query.clone());
        parsed.set_query(None);

        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            headers: headers.clone(),
            sent_headers: sent_headers.clone(),
            query: effective_query.clone(),
            body: body.cloned(),
        });

        let (code, body) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((404, serde_json::json!({"error": "unscripted request"})));

        let record = RequestRecord {
            method,
            url: parsed,
            headers: sent_headers,
            query: effective_query,
        };
        let response = HttpResponse::new(code, HashMap::new(), body, record);

        if response.is_ok() {
            Ok(response)
        } else {
            Err(HttpError::Response(HttpResponseError {
                code,
                message: response.body.to_string(),
                error_reference: None,
            }))
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        query: &QueryParams,
    ) -> Result<HttpResponse, HttpError> {
        self.respond(HttpMethod::Get, url, headers, query, None)
    }

    async fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &Value,
    ) -> Result<HttpResponse, HttpError> {
        self.respond(HttpMethod::Post, url, headers, &QueryParams::new(), Some(body))
    }
}

pub const fn ok(body: Value) -> (u16, Value) {
    (200, body)
}

pub const fn status(code: u16, body: Value) -> (u16, Value) {
    (code, body)
}

/// Builds a manager for `https://api.example.com` backed by a scripted
/// transport.
pub fn manager_with(script: Vec<(u16, Value)>) -> (ApiManager, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport {
        script: Mutex::new(script.into()),
        calls: Mutex::new(Vec::new()),
    });
    let config = HalConfig::builder()
        .base_url(ApiBaseUrl::new("https://api.example.com").unwrap())
        .build()
        .unwrap();
    let manager = ApiManager::with_transport(config, transport.clone());
    (manager, transport)
}
