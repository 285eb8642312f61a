//! A reqwest-backed host client that runs registered exchange hooks.
//!
//! `LoggedClient` is the concrete [`HookRegistry`] shipped with the crate:
//! request hooks run before the request is built, and for each registered
//! response/error pair exactly one side runs once the exchange settles.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Method};
use thiserror::Error;
use tracing::debug;

use crate::content::Body;
use crate::exchange::{ErrorDetails, ExchangeRequest, ExchangeResponse, Headers};
use crate::interceptor::{ErrorHook, HookRegistry, RequestHook, ResponseHook};

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Errors returned by [`LoggedClient::execute`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request method is not a valid HTTP method token.
    #[error("invalid HTTP method: {method}")]
    InvalidMethod {
        /// The rejected method string.
        method: String,
    },

    /// Network-level failure (DNS, connect, TLS, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The requested URL.
        url: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a 4xx or 5xx status.
    #[error("request to {url} failed with status {}", .response.status)]
    Status {
        /// The requested URL.
        url: String,
        /// The full error response.
        response: Box<ExchangeResponse>,
    },
}

impl ClientError {
    /// Creates a transport error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// HTTP status of the error response, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { response, .. } => Some(response.status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Build(_) | Self::InvalidMethod { .. } => None,
        }
    }
}

impl ErrorDetails for ClientError {
    fn code(&self) -> Option<&str> {
        Some(match self {
            Self::Build(_) => "ERR_REQUEST",
            Self::InvalidMethod { .. } => "ERR_BAD_OPTION_VALUE",
            Self::Transport { source, .. } => transport_code(source),
            Self::Status { response, .. } if response.status < 500 => "ERR_BAD_REQUEST",
            Self::Status { .. } => "ERR_BAD_RESPONSE",
        })
    }

    fn response(&self) -> Option<&ExchangeResponse> {
        match self {
            Self::Status { response, .. } => Some(response),
            Self::Build(_) | Self::InvalidMethod { .. } | Self::Transport { .. } => None,
        }
    }
}

fn transport_code(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "ETIMEDOUT"
    } else if error.is_connect() {
        "ERR_NETWORK"
    } else if error.is_decode() || error.is_body() {
        "ERR_BAD_RESPONSE"
    } else {
        "ERR_REQUEST"
    }
}

/// HTTP client that runs exchange hooks around every request.
///
/// Create it once and reuse it; the inner reqwest client pools connections.
#[derive(Clone)]
pub struct LoggedClient {
    client: Client,
    request_hooks: Vec<Arc<dyn RequestHook>>,
    response_hooks: Vec<(Arc<dyn ResponseHook>, Arc<dyn ErrorHook>)>,
    error_for_status: bool,
}

impl std::fmt::Debug for LoggedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggedClient")
            .field("request_hooks", &self.request_hooks.len())
            .field("response_hooks", &self.response_hooks.len())
            .field("error_for_status", &self.error_for_status)
            .finish_non_exhaustive()
    }
}

impl LoggedClient {
    /// Creates a client with the default timeouts (30s connect, 5min read).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if reqwest cannot build the client.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if reqwest cannot build the client.
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(default_user_agent())
            .gzip(true)
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self::from_client(client))
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            request_hooks: Vec::new(),
            response_hooks: Vec::new(),
            error_for_status: true,
        }
    }

    /// Whether 4xx/5xx responses are returned as [`ClientError::Status`] (default `true`).
    #[must_use]
    pub fn error_for_status(mut self, enabled: bool) -> Self {
        self.error_for_status = enabled;
        self
    }

    /// Starts a request with an arbitrary method.
    #[must_use]
    pub fn request(&self, method: impl Into<String>, url: impl Into<String>) -> ExchangeRequest {
        ExchangeRequest::new(method, url)
    }

    #[must_use]
    pub fn get(&self, url: impl Into<String>) -> ExchangeRequest {
        ExchangeRequest::get(url)
    }

    /// Starts a POST request with a JSON body.
    #[must_use]
    pub fn post_json(&self, url: impl Into<String>, value: serde_json::Value) -> ExchangeRequest {
        ExchangeRequest::post(url).json(value)
    }

    /// Sends `request`, running the registered hooks.
    ///
    /// Hook outcomes never change the result: the response or the original
    /// error is returned as produced by the transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the method is invalid, the transport fails,
    /// or (with `error_for_status`) the server answers with 4xx/5xx.
    pub async fn execute(
        &self,
        mut request: ExchangeRequest,
    ) -> Result<ExchangeResponse, ClientError> {
        for hook in &self.request_hooks {
            hook.before_request(&mut request).await;
        }

        match self.send(&request).await {
            Ok(response) => {
                for (on_response, _) in &self.response_hooks {
                    on_response.after_response(&request, &response).await;
                }
                Ok(response)
            }
            Err(error) => {
                for (_, on_error) in &self.response_hooks {
                    on_error.after_error(&request, &error).await;
                }
                Err(error)
            }
        }
    }

    async fn send(&self, request: &ExchangeRequest) -> Result<ExchangeResponse, ClientError> {
        let method = Method::from_bytes(request.method.to_uppercase().as_bytes()).map_err(|_| {
            ClientError::InvalidMethod {
                method: request.method.clone(),
            }
        })?;

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            Body::Empty => builder,
            Body::Text(text) => builder.body(text.clone()),
            Body::Json(value) => builder.json(value),
        };

        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::transport(&request.url, source))?;
        let status = response.status();
        let headers = collect_headers(response.headers());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let text = response
            .text()
            .await
            .map_err(|source| ClientError::transport(&request.url, source))?;
        debug!(url = %request.url, status = status.as_u16(), bytes = text.len(), "response received");

        let exchange = ExchangeResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: Body::from_payload(text, content_type.as_deref()),
        };

        if self.error_for_status && (status.is_client_error() || status.is_server_error()) {
            return Err(ClientError::Status {
                url: request.url.clone(),
                response: Box::new(exchange),
            });
        }
        Ok(exchange)
    }
}

impl HookRegistry for LoggedClient {
    fn register_request_hook(&mut self, hook: Arc<dyn RequestHook>) {
        self.request_hooks.push(hook);
    }

    fn register_response_hooks(
        &mut self,
        on_response: Arc<dyn ResponseHook>,
        on_error: Arc<dyn ErrorHook>,
    ) {
        self.response_hooks.push((on_response, on_error));
    }
}

fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("exchange-log/{version}")
}

/// Flattens a header map, joining repeated values with `", "`.
fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match headers.get_mut(name.as_str()) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                headers.insert(name.as_str().to_string(), value);
            }
        }
    }
    headers
}
