//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use exchange_log::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Send one HTTP request and record the exchange on disk.
///
/// Request, response, and error artifacts are written under the log
/// directory (`--dir`, else `EXCHANGE_LOG_DIR`, else `./http-logs`).
#[derive(Parser, Debug)]
#[command(name = "exchange-log")]
#[command(author, version, about)]
pub struct Args {
    /// URL to request
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Request body; sent as JSON when it parses as JSON
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// Request header as `name:value` (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Directory for log artifacts
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Name used in file names instead of the URL path
    #[arg(long)]
    pub log_as: Option<String>,

    /// Send the request without writing any artifacts
    #[arg(long)]
    pub no_log: bool,

    /// HTTP connect timeout in seconds
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS)]
    pub connect_timeout: u64,

    /// HTTP read timeout in seconds
    #[arg(long, default_value_t = READ_TIMEOUT_SECS)]
    pub read_timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parses a `name:value` header argument.
fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected name:value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header name is empty in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
