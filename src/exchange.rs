//! Plain-data descriptions of one HTTP exchange.
//!
//! The host client owns an [`ExchangeRequest`] for the whole lifetime of an
//! exchange. The request hook stamps an [`ExchangeContext`] onto it, and the
//! paired response or error hook reads that context back, so no state is shared
//! between concurrent exchanges.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::content::Body;

/// Header map with one entry per name; repeated headers are joined with `", "`.
pub type Headers = BTreeMap<String, String>;

/// Per-exchange logging overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeOptions {
    /// Suppresses every log artifact for the exchange.
    pub skip_log: bool,
    /// Replaces the path derived from the URL in file names.
    pub log_as: Option<String>,
}

/// Bookkeeping attached by the request hook and read by the paired hook.
#[derive(Debug, Clone)]
pub struct ExchangeContext {
    /// Sanitized exchange path used in file names.
    pub path: String,
    /// Capture time in seconds since the Unix epoch.
    pub ts: u64,
    /// Sanitized host identifier.
    pub host: String,
    /// When the request hook ran; `None` for contexts built after the fact.
    pub started_at: Option<Instant>,
}

impl ExchangeContext {
    /// Milliseconds since the request hook ran, if it did.
    #[must_use]
    pub fn elapsed_ms(&self) -> Option<u64> {
        self.started_at
            .map(|started| u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX))
    }
}

/// Current time in whole seconds since the Unix epoch.
pub(crate) fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// An outgoing request as seen by the hooks.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Body,
    pub options: ExchangeOptions,
    context: Option<ExchangeContext>,
}

impl ExchangeRequest {
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Headers::new(),
            body: Body::Empty,
            options: ExchangeOptions::default(),
            context: None,
        }
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    /// Adds a header. Names are stored lowercased.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and a matching `content-type` header.
    #[must_use]
    pub fn json(self, value: Value) -> Self {
        self.header("content-type", "application/json")
            .body(Body::Json(value))
    }

    /// Disables logging for this exchange.
    #[must_use]
    pub fn skip_log(mut self) -> Self {
        self.options.skip_log = true;
        self
    }

    /// Names this exchange `alias` in file names instead of its URL path.
    #[must_use]
    pub fn log_as(mut self, alias: impl Into<String>) -> Self {
        self.options.log_as = Some(alias.into());
        self
    }

    /// Bookkeeping stamped by the request hook, if it ran and logging is enabled.
    #[must_use]
    pub fn context(&self) -> Option<&ExchangeContext> {
        self.context.as_ref()
    }

    pub(crate) fn set_context(&mut self, context: ExchangeContext) {
        self.context = Some(context);
    }
}

/// A completed response as seen by the hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub body: Body,
}

impl ExchangeResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Body>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: Headers::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    /// Adds a header. Names are stored lowercased.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// The `content-type` header, matched case-insensitively.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }
}

/// What the error hook needs to know about a failed exchange.
///
/// The `Display` output is logged as the error message.
pub trait ErrorDetails: fmt::Display + Send + Sync {
    /// Short machine-readable error code, if the failure has one.
    fn code(&self) -> Option<&str>;

    /// Partial response received before the failure, if any.
    fn response(&self) -> Option<&ExchangeResponse> {
        None
    }
}
