//! Exchange Log Library
//!
//! This library records every HTTP exchange made through an instrumented
//! client as a set of files on disk: one for the request, one or two for the
//! response, one for a failure.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`interceptor`] - Request/response/error hooks and the `attach` factory
//! - [`client`] - reqwest-backed host client that runs registered hooks
//! - [`naming`] - Sanitization and artifact file naming
//! - [`content`] - Body classification and size formatting
//! - [`writer`] - Best-effort file writes
//! - [`config`] - Logger configuration and host resolution
//! - [`exchange`] - Plain-data request/response/error types

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod content;
pub mod exchange;
pub mod interceptor;
pub mod naming;
pub mod writer;

// Re-export commonly used types
pub use client::{CONNECT_TIMEOUT_SECS, ClientError, LoggedClient, READ_TIMEOUT_SECS};
pub use config::{DEFAULT_LOG_DIR, LoggerConfig, resolve_host};
pub use content::{Body, ContentExt, data_size, detect_ext, format_size};
pub use exchange::{
    ErrorDetails, ExchangeContext, ExchangeOptions, ExchangeRequest, ExchangeResponse, Headers,
};
pub use interceptor::{
    ErrorHook, ExchangeLogger, HookRegistry, Interceptors, RequestHook, ResponseHook,
    ResponseLogOutcome, attach, create_interceptors,
};
pub use naming::{
    ExchangeKind, FilenameParams, NamingFn, build_log_path, default_filename, path_from_url,
    sanitize,
};
pub use writer::{LogError, WriteOutcome};
