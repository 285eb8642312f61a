//! Request/response/error hooks that persist each HTTP exchange to disk.
//!
//! # Lifecycle
//!
//! Each exchange passes through the request hook and then exactly one of the
//! response or error hooks:
//!
//! ```text
//! initial -> request-logged -> response-logged | error-logged
//! ```
//!
//! Retries at the HTTP client level are new exchanges.
//!
//! # Example
//!
//! ```no_run
//! use exchange_log::{ExchangeRequest, LoggedClient, LoggerConfig, attach};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = LoggedClient::new()?;
//! let hooks = attach(&mut client, LoggerConfig::new("./http-logs"));
//! let response = client
//!     .execute(ExchangeRequest::get("https://api.example.com/v1/player?id=1"))
//!     .await?;
//! println!("{} logged under {}", response.status, hooks.dir.display());
//! # Ok(())
//! # }
//! ```

mod documents;
mod hooks;
mod logger;

pub use hooks::{
    ErrorHook, HookRegistry, Interceptors, RequestHook, ResponseHook, attach, create_interceptors,
};
pub use logger::{ExchangeLogger, ResponseLogOutcome};
