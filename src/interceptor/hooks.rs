//! Hook traits, the registration seam, and the factory that wires them up.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use super::logger::{ExchangeLogger, ResponseLogOutcome};
use crate::config::LoggerConfig;
use crate::exchange::{ErrorDetails, ExchangeRequest, ExchangeResponse};
use crate::writer::WriteOutcome;

/// Called before a request is sent. May attach bookkeeping to the request.
#[async_trait]
pub trait RequestHook: Send + Sync {
    async fn before_request(&self, request: &mut ExchangeRequest) -> WriteOutcome;
}

/// Called after a response is received for a request that went through the
/// request hooks.
#[async_trait]
pub trait ResponseHook: Send + Sync {
    async fn after_response(
        &self,
        request: &ExchangeRequest,
        response: &ExchangeResponse,
    ) -> ResponseLogOutcome;
}

/// Called when an exchange fails. Observes the failure; the host client still
/// returns the original error to its caller.
#[async_trait]
pub trait ErrorHook: Send + Sync {
    async fn after_error(&self, request: &ExchangeRequest, error: &dyn ErrorDetails)
    -> WriteOutcome;
}

#[async_trait]
impl RequestHook for ExchangeLogger {
    async fn before_request(&self, request: &mut ExchangeRequest) -> WriteOutcome {
        self.log_request(request).await
    }
}

#[async_trait]
impl ResponseHook for ExchangeLogger {
    async fn after_response(
        &self,
        request: &ExchangeRequest,
        response: &ExchangeResponse,
    ) -> ResponseLogOutcome {
        self.log_response(request, response).await
    }
}

#[async_trait]
impl ErrorHook for ExchangeLogger {
    async fn after_error(
        &self,
        request: &ExchangeRequest,
        error: &dyn ErrorDetails,
    ) -> WriteOutcome {
        self.log_error(request, error).await
    }
}

/// Hook registration API of a host HTTP client.
///
/// Response and error hooks are registered as a pair: exactly one of them runs
/// for each exchange that went through the request hooks.
pub trait HookRegistry {
    fn register_request_hook(&mut self, hook: Arc<dyn RequestHook>);

    fn register_response_hooks(
        &mut self,
        on_response: Arc<dyn ResponseHook>,
        on_error: Arc<dyn ErrorHook>,
    );
}

/// The three hooks produced by [`create_interceptors`], plus the log directory.
#[derive(Clone)]
pub struct Interceptors {
    pub request: Arc<dyn RequestHook>,
    pub response: Arc<dyn ResponseHook>,
    pub error: Arc<dyn ErrorHook>,
    pub dir: PathBuf,
}

impl fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptors")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

/// Builds the request, response, and error hooks over one shared [`ExchangeLogger`].
#[must_use]
pub fn create_interceptors(config: LoggerConfig) -> Interceptors {
    let logger = Arc::new(ExchangeLogger::new(config));
    let dir = logger.dir().to_path_buf();
    Interceptors {
        request: Arc::clone(&logger) as Arc<dyn RequestHook>,
        response: Arc::clone(&logger) as Arc<dyn ResponseHook>,
        error: logger as Arc<dyn ErrorHook>,
        dir,
    }
}

/// Registers logging hooks with `registry` and returns them for inspection.
pub fn attach<R>(registry: &mut R, config: LoggerConfig) -> Interceptors
where
    R: HookRegistry + ?Sized,
{
    let interceptors = create_interceptors(config);
    registry.register_request_hook(Arc::clone(&interceptors.request));
    registry.register_response_hooks(
        Arc::clone(&interceptors.response),
        Arc::clone(&interceptors.error),
    );
    interceptors
}
