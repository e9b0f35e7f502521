//! Shared HTTP client for the workflow backend.
//!
//! One [`ApiClient`] is built from a [`ClientConfig`] and a credential store
//! and handed by reference to every endpoint group. Before each request the
//! client looks up the bearer token in the store and, if one is present,
//! sets `Authorization: Bearer <token>`. An absent token is not an error.

mod error;

pub use error::ApiError;

use std::fmt;
use std::sync::Arc;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use http::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Instrument, debug, info_span, warn};
use url::Url;

use crate::auth::CredentialStore;
use crate::config::{ClientConfig, CredentialPolicy};

/// A decoded response from a 2xx answer.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Method, path, query and body of one endpoint call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path segments below the base URL; each is percent-encoded on its own.
    pub segments: Vec<String>,
    pub query: Option<Value>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: None,
            body: None,
        }
    }

    pub fn get(segments: &[&str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub fn post(segments: &[&str]) -> Self {
        Self::new(Method::POST, segments)
    }

    pub fn put(segments: &[&str]) -> Self {
        Self::new(Method::PUT, segments)
    }

    pub fn delete(segments: &[&str]) -> Self {
        Self::new(Method::DELETE, segments)
    }

    pub fn with_query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self, ApiError> {
        let value = serde_json::to_value(query).map_err(|e| ApiError::Encode(e.to_string()))?;
        match value {
            Value::Object(ref map) if map.is_empty() => {}
            Value::Null => {}
            Value::Object(_) => self.query = Some(value),
            other => {
                return Err(ApiError::Encode(format!(
                    "query parameters must be an object, got {}",
                    other
                )));
            }
        }
        Ok(self)
    }

    pub fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Path as it appears on the wire, before percent-encoding.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// HTTP client bound to one backend base URL and one credential store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
    credential_policy: CredentialPolicy,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("credential_policy", &self.credential_policy)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build the client. JSON content type is the default for every request.
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers)
            .user_agent(config.user_agent.as_str())
            .cookie_store(config.with_credentials);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(ApiError::from_reqwest)?;

        Ok(Self {
            http,
            base_url: config.base_url,
            credentials,
            credential_policy: config.credential_policy,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a list of path segments.
    pub fn endpoint(&self, segments: &[String]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::InvalidUrl(format!("{} cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Bearer header value for the stored token, if any.
    fn authorization(&self) -> Result<Option<HeaderValue>, ApiError> {
        let token = match self.credentials.token() {
            Ok(token) => token,
            Err(err) => match self.credential_policy {
                CredentialPolicy::FailClosed => return Err(ApiError::Credential(err)),
                CredentialPolicy::FailOpen => {
                    warn!("Credential lookup failed, sending unauthenticated: {}", err);
                    None
                }
            },
        };

        let Some(token) = token else {
            return Ok(None);
        };

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Ok(Some(value))
            }
            Err(e) => match self.credential_policy {
                CredentialPolicy::FailClosed => Err(ApiError::Encode(format!(
                    "stored token is not a valid header value: {}",
                    e
                ))),
                CredentialPolicy::FailOpen => {
                    warn!("Stored token is not a valid header value, sending unauthenticated");
                    Ok(None)
                }
            },
        }
    }

    /// Build the outgoing request without sending it.
    pub fn prepare(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Request, ApiError> {
        let url = self.endpoint(&descriptor.segments)?;
        let mut builder = self.http.request(descriptor.method.clone(), url);

        if let Some(query) = &descriptor.query {
            builder = builder.query(query);
        }

        if let Some(body) = &descriptor.body {
            builder = builder.json(body);
        }

        if let Some(auth) = self.authorization()? {
            builder = builder.header(AUTHORIZATION, auth);
        }

        builder.build().map_err(ApiError::from_reqwest)
    }

    /// Send one request and decode the 2xx body as `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<ApiResponse<T>, ApiError> {
        let request = self.prepare(&descriptor)?;

        let span = info_span!(
            "api.request",
            http.method = %descriptor.method,
            url = %request.url()
        );

        debug!(
            "{} {} (authenticated: {})",
            descriptor.method,
            descriptor.path(),
            request.headers().contains_key(AUTHORIZATION)
        );

        let response = self
            .http
            .execute(request)
            .instrument(span)
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(ApiError::from_reqwest)?;

        if !status.is_success() {
            debug!("{} {} -> {}", descriptor.method, descriptor.path(), status);
            return Err(ApiError::Status {
                status,
                body: parse_body(&bytes),
            });
        }

        let data = decode_body(&bytes).map_err(|message| ApiError::Decode { status, message })?;

        Ok(ApiResponse {
            status,
            headers,
            data,
        })
    }

    /// `GET` an arbitrary path below the base URL.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(RequestDescriptor::get(segments)).await
    }

    /// `POST` a JSON body to an arbitrary path.
    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(RequestDescriptor::post(segments).with_body(body)?)
            .await
    }

    /// `PUT` a JSON body to an arbitrary path.
    pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<ApiResponse<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(RequestDescriptor::put(segments).with_body(body)?)
            .await
    }

    /// `DELETE` an arbitrary path.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(RequestDescriptor::delete(segments)).await
    }
}

/// Error bodies: JSON if it parses, else the raw text.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        // 204s and empty 200s: accept as `null`, or as an empty object for
        // structs whose fields are all optional.
        return serde_json::from_value(Value::Null)
            .or_else(|_| serde_json::from_value(Value::Object(Default::default())))
            .map_err(|e| e.to_string());
    }
    serde_json::from_slice(bytes).map_err(|e| e.to_string())
}
