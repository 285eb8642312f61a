//! CLI entry point for the exchange-log tool.

use anyhow::{Context, Result};
use clap::Parser;
use exchange_log::{Body, ExchangeRequest, LoggedClient, LoggerConfig, attach};
use serde_json::Value;
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let mut config = LoggerConfig::from_env();
    if let Some(dir) = &args.dir {
        config.dir.clone_from(dir);
    }

    let mut client = LoggedClient::with_timeouts(args.connect_timeout, args.read_timeout)
        .context("failed to create HTTP client")?;
    let hooks = attach(&mut client, config);

    let request = build_request(&args);
    let response = client
        .execute(request)
        .await
        .with_context(|| format!("{} {} failed", args.method.to_uppercase(), args.url))?;

    info!(status = response.status, "Request complete");
    println!("{} {}", response.status, response.status_text);
    if !args.no_log {
        println!("logs: {}", hooks.dir.display());
    }

    Ok(())
}

fn build_request(args: &Args) -> ExchangeRequest {
    let mut request = ExchangeRequest::new(args.method.as_str(), args.url.as_str());
    for (name, value) in &args.headers {
        request = request.header(name, value.as_str());
    }
    if let Some(data) = &args.data {
        request = match serde_json::from_str::<Value>(data) {
            Ok(value) if !request.headers.contains_key("content-type") => request.json(value),
            Ok(value) => request.body(Body::Json(value)),
            Err(_) => request.body(data.as_str()),
        };
    }
    if let Some(alias) = &args.log_as {
        request = request.log_as(alias.as_str());
    }
    if args.no_log {
        request = request.skip_log();
    }
    request
}
