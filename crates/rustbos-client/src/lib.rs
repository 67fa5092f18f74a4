//! Async client for Baidu Object Storage (BOS).
//!
//! Every request is addressed to the bucket's virtual host, completed with
//! `Date`, `Content-Length` and `Content-MD5` headers, and signed with a
//! `bce-auth-v1` token from [`rustbos_auth`].
//!
//! # Usage
//!
//! ```no_run
//! use rustbos_client::{Acl, BosClient, RequestOptions};
//!
//! # async fn example() -> Result<(), rustbos_client::BosError> {
//! let client = BosClient::from_env()?;
//!
//! client
//!     .put_object("/reports/2026.txt", "quarterly numbers", RequestOptions::new())
//!     .await?;
//! client
//!     .put_object_acl("/reports/2026.txt", Acl::PublicRead, RequestOptions::new())
//!     .await?;
//!
//! let listing = client
//!     .list_objects(RequestOptions::new().query("prefix", "reports/"))
//!     .await?;
//! println!("{listing}");
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`acl`] - Canned object ACLs
//! - [`client`] - The async [`BosClient`] and its object operations
//! - [`config`] - Client configuration loaded from the environment
//! - [`error`] - Client errors and mapping of BOS error responses
//! - [`request`] - Request options and pure request preparation
//! - [`response`] - Response shapes and header collection

pub mod acl;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;

pub use acl::Acl;
pub use client::BosClient;
pub use config::BosConfig;
pub use error::{BosError, BosResult};
pub use request::{PreparedRequest, RequestOptions, prepare_request};
pub use response::{HeaderEntry, Response, ResponseHeaders, ReturnFormat};
pub use rustbos_auth::{Headers, QueryParams, SignOptions};
