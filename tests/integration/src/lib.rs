//! Live integration tests for the RustBOS client.
//!
//! These tests talk to a real BOS bucket described by the `BOS_*` environment
//! variables (see `rustbos_client::BosConfig::from_env`). They are marked
//! `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! BOS_ACCESS_KEY=... BOS_SECRET_KEY=... BOS_BUCKET=... BOS_REGION=gz \
//!     cargo test -p rustbos-integration -- --ignored
//! ```
//!
//! Every test works under its own random key prefix and removes what it
//! created, so tests can run concurrently against a shared bucket.

use std::sync::Once;

use rustbos_client::{BosClient, RequestOptions};
use tracing::warn;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Create a client for the bucket named by the environment.
#[must_use]
pub fn bos_client() -> BosClient {
    init_tracing();
    BosClient::from_env().unwrap_or_else(|e| panic!("failed to create BOS client: {e}"))
}

/// Generate a unique key prefix for a test, ending with `/`.
#[must_use]
pub fn test_prefix(name: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("rustbos-test-{name}-{id}/")
}

/// Delete every object under `prefix`, ignoring failures.
pub async fn cleanup_prefix(client: &BosClient, prefix: &str) {
    let listing = match client
        .list_objects(RequestOptions::new().query("prefix", prefix))
        .await
    {
        Ok(listing) => listing,
        Err(e) => {
            warn!(prefix, error = %e, "failed to list objects for cleanup");
            return;
        }
    };

    let keys = object_keys(&listing);
    if keys.is_empty() {
        return;
    }
    if let Err(e) = client.delete_objects(&keys, RequestOptions::new()).await {
        warn!(prefix, error = %e, "failed to delete objects during cleanup");
    }
}

/// Keys of the objects in a `list_objects` response.
#[must_use]
pub fn object_keys(listing: &serde_json::Value) -> Vec<String> {
    listing["contents"]
        .as_array()
        .map(|contents| {
            contents
                .iter()
                .filter_map(|object| object["key"].as_str().map(ToOwned::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

mod test_acl;
mod test_error;
mod test_list;
mod test_object;
mod test_signing;
