//! In-memory stand-in for the deSEC API, used by the unit tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};

use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::{AccountClient, Client, TransportError};

pub(crate) const BASE: &str = "https://desec.test/api/v1/";
const BASE_PATH: &str = "/api/v1/";

/// Parses an RFC 3339 timestamp.
pub(crate) fn time(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

struct Route {
    method: Method,
    path: String,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    timeout: bool,
}

/// Serves canned responses by method and path, recording every request.
#[derive(Clone, Default)]
pub(crate) struct FakeServer {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl FakeServer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers `method path` (relative to the API root) with `status` and `body`.
    pub(crate) fn route(&self, method: Method, path: &str, status: StatusCode, body: &str) -> &Self {
        self.route_with_headers(method, path, status, &[], body)
    }

    pub(crate) fn route_with_headers(
        &self,
        method: Method,
        path: &str,
        status: StatusCode,
        headers: &[(&'static str, &str)],
        body: &str,
    ) -> &Self {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            header_map.append(
                HeaderName::from_static(*name),
                HeaderValue::from_str(value).unwrap(),
            );
        }

        self.routes.lock().unwrap().push(Route {
            method,
            path: format!("{BASE_PATH}{path}"),
            status,
            headers: header_map,
            body: body.as_bytes().to_vec(),
            timeout: false,
        });
        self
    }

    /// Makes every request to `method path` run into its deadline.
    pub(crate) fn time_out(&self, method: Method, path: &str) -> &Self {
        self.routes.lock().unwrap().push(Route {
            method,
            path: format!("{BASE_PATH}{path}"),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            timeout: true,
        });
        self
    }

    pub(crate) fn client(&self) -> Client {
        Client::builder()
            .endpoint(&BASE.parse().unwrap())
            .token("token")
            .transport(self.clone())
            .build()
            .unwrap()
    }

    pub(crate) fn account_client(&self) -> AccountClient {
        Client::builder()
            .endpoint(&BASE.parse().unwrap())
            .transport(self.clone())
            .build_account()
            .unwrap()
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    /// The JSON body of the last request.
    pub(crate) fn last_body(&self) -> serde_json::Value {
        let body = self.last_request().body.expect("request had no body");
        serde_json::from_slice(&body).unwrap()
    }
}

impl Transport for FakeServer {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let routes = self.routes.lock().unwrap();
        let path = request.url.path();

        let Some(route) = routes
            .iter()
            .find(|r| r.path == path && r.method == request.method)
        else {
            let (status, body) = if routes.iter().any(|r| r.path == path) {
                (StatusCode::METHOD_NOT_ALLOWED, "invalid method")
            } else {
                (StatusCode::NOT_FOUND, r#"{"detail":"Not found."}"#)
            };
            return Ok(HttpResponse {
                status,
                headers: HeaderMap::new(),
                body: body.as_bytes().to_vec(),
            });
        };

        if route.timeout {
            return Err(TransportError::Timeout("operation timed out".into()));
        }

        Ok(HttpResponse {
            status: route.status,
            headers: route.headers.clone(),
            body: route.body.clone(),
        })
    }
}
