//! The per-phase logging operations behind the hooks.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, trace, warn};

use super::documents::{ErrorLog, RequestLog, ResponseLog};
use crate::config::{LoggerConfig, resolve_host};
use crate::content::{ContentExt, data_size, detect_ext, format_size};
use crate::exchange::{
    ErrorDetails, ExchangeContext, ExchangeRequest, ExchangeResponse, epoch_secs,
};
use crate::naming::{
    ExchangeKind, FilenameParams, NamingFn, build_log_path, default_filename, path_from_url,
    response_data_path, sanitize,
};
use crate::writer::{WriteOutcome, write_json, write_log};

const RESPONSE_FALLBACK_PATH: &str = "response";
const ERROR_FALLBACK_PATH: &str = "error";

/// Outcomes of the response hook: the metadata file and the body file.
#[derive(Debug)]
pub struct ResponseLogOutcome {
    pub metadata: WriteOutcome,
    pub body: WriteOutcome,
}

impl ResponseLogOutcome {
    fn skipped() -> Self {
        Self {
            metadata: WriteOutcome::Skipped,
            body: WriteOutcome::Skipped,
        }
    }
}

/// Writes request, response, and error artifacts for HTTP exchanges.
///
/// One logger serves any number of concurrent exchanges: it holds only its
/// configuration, and all per-exchange state travels on the
/// [`ExchangeRequest`].
pub struct ExchangeLogger {
    dir: PathBuf,
    naming: Arc<dyn NamingFn>,
    host: String,
}

impl ExchangeLogger {
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        let host = resolve_host(config.host.as_deref());
        let naming = config
            .naming
            .unwrap_or_else(|| Arc::new(default_filename) as Arc<dyn NamingFn>);
        Self {
            dir: config.dir,
            naming,
            host,
        }
    }

    /// Base directory of every artifact.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sanitized host identifier used in file names.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    fn artifact_path(
        &self,
        context: &ExchangeContext,
        url: &str,
        kind: ExchangeKind,
        ext: ContentExt,
    ) -> PathBuf {
        let params = FilenameParams {
            ts: context.ts,
            host: context.host.clone(),
            url: url.to_string(),
            path: context.path.clone(),
            kind,
            ext,
        };
        build_log_path(&self.dir, self.naming.as_ref(), &params)
    }

    /// Context stamped by the request hook, or one built now with `fallback_path`.
    fn context_or_fallback(&self, request: &ExchangeRequest, fallback_path: &str) -> ExchangeContext {
        request.context().cloned().unwrap_or_else(|| ExchangeContext {
            path: fallback_path.to_string(),
            ts: epoch_secs(),
            host: self.host.clone(),
            started_at: None,
        })
    }

    /// Logs an outgoing request and stamps its [`ExchangeContext`].
    ///
    /// The exchange path is the first of: the sanitized `log_as` alias, the
    /// path of a context stamped by an earlier pass, the sanitized URL path.
    /// With `skip_log` set nothing is written and no context is stamped. The
    /// method, URL, headers, and body are left untouched.
    pub async fn log_request(&self, request: &mut ExchangeRequest) -> WriteOutcome {
        if request.options.skip_log {
            return WriteOutcome::Skipped;
        }

        let path = request
            .options
            .log_as
            .as_deref()
            .map(sanitize)
            .filter(|alias| !alias.is_empty())
            .or_else(|| request.context().map(|context| context.path.clone()))
            .unwrap_or_else(|| path_from_url(&request.url));
        let context = ExchangeContext {
            path,
            ts: epoch_secs(),
            host: self.host.clone(),
            started_at: Some(Instant::now()),
        };

        let file = self.artifact_path(&context, &request.url, ExchangeKind::Request, ContentExt::Json);
        let method = request.method.to_uppercase();
        let document = RequestLog {
            url: &request.url,
            method: method.clone(),
            headers: &request.headers,
            body: &request.body,
        };
        let outcome = write_json(&file, &document).await;

        let size = format_size(data_size(&request.body) as u64);
        trace!(
            path = %context.path,
            file = %file.display(),
            size = %size,
            "[->] {} {} ({}) -> {}",
            method,
            context.path,
            size,
            file.display()
        );

        request.set_context(context);
        outcome
    }

    /// Logs a completed response.
    ///
    /// Always writes the `res`/`json` metadata file. A body classified as html
    /// or text is also written raw under its own extension; a json body is
    /// written next to the metadata as `_res_data.json`.
    pub async fn log_response(
        &self,
        request: &ExchangeRequest,
        response: &ExchangeResponse,
    ) -> ResponseLogOutcome {
        if request.options.skip_log {
            return ResponseLogOutcome::skipped();
        }

        let context = self.context_or_fallback(request, RESPONSE_FALLBACK_PATH);
        let duration = context.elapsed_ms();
        let ext = detect_ext(&response.body, response.content_type());

        let meta_path =
            self.artifact_path(&context, &request.url, ExchangeKind::Response, ContentExt::Json);
        let document = ResponseLog {
            status: response.status,
            status_text: &response.status_text,
            headers: &response.headers,
            duration,
        };
        let metadata = write_json(&meta_path, &document).await;

        let body = if ext != ContentExt::Json {
            let body_path = self.artifact_path(&context, &request.url, ExchangeKind::Response, ext);
            write_log(&body_path, &response.body.to_log_string()).await
        } else if response.body.is_falsy() {
            WriteOutcome::Skipped
        } else if let Some(data_path) = response_data_path(&meta_path) {
            write_log(&data_path, &response.body.to_log_string()).await
        } else {
            warn!(
                file = %meta_path.display(),
                "response metadata name lacks the _res.json suffix, body not written"
            );
            WriteOutcome::Skipped
        };

        let size = format_size(data_size(&response.body) as u64);
        info!(
            path = %context.path,
            status = response.status,
            size = %size,
            duration_ms = duration,
            "[<-] {} {} {} ({}) {} ms",
            context.path,
            response.status,
            ext,
            size,
            display_duration(duration)
        );

        ResponseLogOutcome { metadata, body }
    }

    /// Logs a failed exchange. The error itself is only read.
    pub async fn log_error(
        &self,
        request: &ExchangeRequest,
        failure: &dyn ErrorDetails,
    ) -> WriteOutcome {
        if request.options.skip_log {
            return WriteOutcome::Skipped;
        }

        let context = self.context_or_fallback(request, ERROR_FALLBACK_PATH);
        let duration = context.elapsed_ms();
        let response = failure.response();
        let message = failure.to_string();

        let file = self.artifact_path(&context, &request.url, ExchangeKind::Error, ContentExt::Json);
        let document = ErrorLog {
            message: message.clone(),
            code: failure.code(),
            status: response.map(|r| r.status),
            status_text: response.map(|r| r.status_text.as_str()),
            headers: response.map(|r| &r.headers),
            duration,
            data: response.map(|r| &r.body),
        };
        let outcome = write_json(&file, &document).await;

        let status = response.map_or_else(|| "-".to_string(), |r| r.status.to_string());
        let size = format_size(response.map_or(0, |r| data_size(&r.body)) as u64);
        error!(
            error = %message,
            path = %context.path,
            file = %file.display(),
            duration_ms = duration,
            "[x] {} {} {} ({}) {} ms",
            context.path,
            status,
            ContentExt::Json,
            size,
            display_duration(duration)
        );

        outcome
    }

    /// Logs `error` and hands it back unchanged as `Err`.
    ///
    /// # Errors
    ///
    /// Always returns `Err(error)`; logging never replaces or suppresses it.
    pub async fn on_error<T, E: ErrorDetails>(
        &self,
        request: &ExchangeRequest,
        error: E,
    ) -> Result<T, E> {
        self.log_error(request, &error).await;
        Err(error)
    }
}

fn display_duration(duration: Option<u64>) -> String {
    duration.map_or_else(|| "-".to_string(), |ms| ms.to_string())
}
