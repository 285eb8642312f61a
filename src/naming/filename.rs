//! Log file naming: the pluggable naming function and path assembly.

use std::ffi::OsString;
use std::fmt;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

use crate::content::ContentExt;

const RESPONSE_META_SUFFIX: &str = "_res.json";
const RESPONSE_DATA_SUFFIX: &str = "_res_data.json";

/// Phase of an exchange that produced a log artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeKind {
    /// Outgoing request metadata.
    Request,
    /// Completed response metadata or body.
    Response,
    /// Failed exchange.
    Error,
}

impl ExchangeKind {
    /// Short tag used in file names (`req`, `res`, `err`).
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Request => "req",
            Self::Response => "res",
            Self::Error => "err",
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Everything a naming function may use to name a log artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameParams {
    /// Capture time in seconds since the Unix epoch.
    pub ts: u64,
    /// Sanitized host identifier.
    pub host: String,
    /// Full request URL, unsanitized.
    pub url: String,
    /// Sanitized exchange path.
    pub path: String,
    /// Phase tag.
    pub kind: ExchangeKind,
    /// Content extension of the artifact.
    pub ext: ContentExt,
}

/// Maps [`FilenameParams`] to a file name relative to the log directory.
///
/// Implementations must be deterministic for identical inputs. Nothing checks
/// uniqueness: two exchanges that map to the same name overwrite each other.
/// The returned name may contain nested directory segments.
pub trait NamingFn: Send + Sync {
    /// Returns the file name for `params`.
    fn file_name(&self, params: &FilenameParams) -> String;
}

impl<F> NamingFn for F
where
    F: Fn(&FilenameParams) -> String + Send + Sync,
{
    fn file_name(&self, params: &FilenameParams) -> String {
        self(params)
    }
}

/// Default naming: `{ts}_{host}_{path}_{kind}.{ext}`.
#[must_use]
pub fn default_filename(params: &FilenameParams) -> String {
    format!(
        "{}_{}_{}_{}.{}",
        params.ts,
        params.host,
        params.path,
        params.kind.tag(),
        params.ext.as_str()
    )
}

/// Joins `dir` and the name produced by `naming` with the platform separator.
///
/// The returned name is used verbatim; no validation of its shape happens here.
#[must_use]
pub fn build_log_path(dir: &Path, naming: &dyn NamingFn, params: &FilenameParams) -> PathBuf {
    let name = naming.file_name(params);
    let mut joined = OsString::from(dir.as_os_str());
    joined.push(MAIN_SEPARATOR_STR);
    joined.push(name);
    PathBuf::from(joined)
}

/// Derives the JSON response body path from the response metadata path.
///
/// Replaces the `_res.json` suffix produced by [`default_filename`] with
/// `_res_data.json`. Returns `None` when the metadata path does not carry that
/// suffix, which happens with naming functions that use a different layout.
#[must_use]
pub fn response_data_path(meta_path: &Path) -> Option<PathBuf> {
    let raw = meta_path.to_str()?;
    let stem = raw.strip_suffix(RESPONSE_META_SUFFIX)?;
    Some(PathBuf::from(format!("{stem}{RESPONSE_DATA_SUFFIX}")))
}
