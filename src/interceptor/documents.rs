//! JSON documents persisted for each exchange phase.

use serde::Serialize;

use crate::content::Body;
use crate::exchange::Headers;

/// Contents of a `_req.json` file.
#[derive(Debug, Serialize)]
pub(crate) struct RequestLog<'a> {
    pub url: &'a str,
    pub method: String,
    pub headers: &'a Headers,
    pub body: &'a Body,
}

/// Contents of a `_res.json` file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponseLog<'a> {
    pub status: u16,
    pub status_text: &'a str,
    pub headers: &'a Headers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// Contents of an `_err.json` file.
///
/// Fields without a value serialize as `null` so every error log has the same keys.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorLog<'a> {
    pub message: String,
    pub code: Option<&'a str>,
    pub status: Option<u16>,
    pub status_text: Option<&'a str>,
    pub headers: Option<&'a Headers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub data: Option<&'a Body>,
}
