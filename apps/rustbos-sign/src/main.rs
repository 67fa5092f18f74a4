//! rustbos-sign - sign and issue Baidu Object Storage requests from the shell.
//!
//! # Usage
//!
//! ```text
//! rustbos-sign sign PUT /bos_test.txt --query acl --header x-bce-acl:public-read
//! rustbos-sign get /bos_test.txt > bos_test.txt
//! rustbos-sign head /bos_test.txt
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BOS_ACCESS_KEY` | *(required)* | BCE access key id |
//! | `BOS_SECRET_KEY` | *(required)* | BCE secret access key |
//! | `BOS_BUCKET` | *(required)* | Target bucket |
//! | `BOS_REGION` | *(required)* | Bucket region, e.g. `gz` |
//! | `BOS_ENDPOINT_DOMAIN` | `bcebos.com` | Service domain |
//! | `BOS_SCHEME` | `https` | URL scheme used to reach the service |
//! | `BOS_ENDPOINT_URL` | *(unset)* | Base URL to send requests to instead of the bucket host |
//! | `BOS_CONNECT_TIMEOUT` | `10` | Connect timeout in seconds |
//! | `BOS_EXPIRES_IN` | `1800` | Default token validity in seconds |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use rustbos_client::{BosClient, RequestOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rustbos-sign", version)]
#[command(about = "Sign and issue Baidu Object Storage requests", long_about = None)]
struct Args {
    /// Log level filter, used when RUST_LOG is unset (falls back to LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the Authorization token for a request
    Sign {
        /// HTTP method, e.g. GET or PUT
        #[arg(value_parser = parse_method)]
        method: Method,

        /// Object path, e.g. /bos_test.txt
        path: String,

        /// Query parameter as key=value, or a bare key for a flag
        #[arg(long = "query", short = 'q', value_parser = parse_query)]
        queries: Vec<(String, Option<String>)>,

        /// Request header as Name:value
        #[arg(long = "header", short = 'H', value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Additional header name to bind into the signature
        #[arg(long = "sign-header")]
        sign_headers: Vec<String>,

        /// Token validity in seconds
        #[arg(long)]
        expires_in: Option<u64>,

        /// Print every header of the prepared request, not just the token
        #[arg(long)]
        all_headers: bool,
    },
    /// Download an object and write it to stdout
    Get {
        /// Object path
        path: String,
    },
    /// Print the metadata headers of an object as JSON
    Head {
        /// Object path
        path: String,
    },
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the given log level.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn parse_method(value: &str) -> Result<Method, String> {
    Method::from_bytes(value.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid HTTP method: {value}"))
}

fn parse_query(value: &str) -> Result<(String, Option<String>), String> {
    let (key, value) = match value.split_once('=') {
        Some((key, value)) => (key, Some(value.to_owned())),
        None => (value, None),
    };
    if key.is_empty() {
        return Err("query parameter name must not be empty".to_owned());
    }
    Ok((key.to_owned(), value))
}

fn parse_header(value: &str) -> Result<(String, String), String> {
    let (name, value) = value
        .split_once(':')
        .ok_or_else(|| format!("expected Name:value, got {value}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("header name must not be empty".to_owned());
    }
    Ok((name.to_owned(), value.trim().to_owned()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args
        .log_level
        .clone()
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| "warn".to_owned());
    init_tracing(&log_level)?;

    let client = BosClient::from_env().context("failed to load BOS configuration")?;
    debug!(
        bucket = %client.config().bucket,
        region = %client.config().region,
        "loaded BOS configuration"
    );

    match args.command {
        Command::Sign {
            method,
            path,
            queries,
            headers,
            sign_headers,
            expires_in,
            all_headers,
        } => {
            let mut options = RequestOptions::new();
            for (key, value) in queries {
                options.query.set(key, value);
            }
            for (name, value) in headers {
                options = options.header(name, value);
            }
            for name in sign_headers {
                options = options.sign_header(name);
            }
            if let Some(seconds) = expires_in {
                options = options.expires_in(seconds);
            }

            let prepared = client
                .prepare(&method, &path, &options)
                .with_context(|| format!("failed to sign {method} {path}"))?;
            if all_headers {
                println!("{} {}", prepared.method, prepared.url);
                for (name, value) in prepared.headers.iter() {
                    println!("{name}: {value}");
                }
            } else {
                let token = prepared
                    .headers
                    .get("Authorization")
                    .context("prepared request carries no Authorization header")?;
                println!("{token}");
            }
        }
        Command::Get { path } => {
            let body = client
                .get_object(&path, RequestOptions::new())
                .await
                .with_context(|| format!("failed to get {path}"))?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&body)?;
            stdout.flush()?;
        }
        Command::Head { path } => {
            let headers = client
                .get_object_meta(&path, RequestOptions::new())
                .await
                .with_context(|| format!("failed to read metadata of {path}"))?;
            println!("{}", serde_json::to_string_pretty(&headers)?);
        }
    }

    Ok(())
}
