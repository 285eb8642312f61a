//! Naming of log artifacts.
//!
//! - [`sanitize`](sanitize::sanitize) and [`path_from_url`](sanitize::path_from_url)
//!   turn URLs and host names into `[a-z0-9_]` fragments.
//! - [`build_log_path`] combines a log directory, a [`NamingFn`], and
//!   [`FilenameParams`] into the path of one artifact.
//!
//! Every artifact path is a pure function of the directory, the naming function,
//! and the parameters. No uniqueness, locking, or atomic rename is applied.

mod filename;
mod sanitize;

pub use filename::{
    ExchangeKind, FilenameParams, NamingFn, build_log_path, default_filename,
    response_data_path,
};
pub use sanitize::{path_from_url, sanitize};
