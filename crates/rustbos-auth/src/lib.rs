//! BCE request authentication (`bce-auth-v1`) for Baidu Object Storage.
//!
//! This crate derives the time-bounded `Authorization` token that BOS expects
//! on every request, and verifies such tokens on the receiving side.
//!
//! # Overview
//!
//! Signing is a pure pipeline: select the headers to bind, build a canonical
//! request from the method, URI, query and those headers, derive a signing key
//! scoped to the access key, timestamp and expiry, sign the canonical request
//! and assemble the token:
//!
//! ```text
//! bce-auth-v1/{accessKey}/{timestamp}/{expiresIn}/{signedHeaders}/{signature}
//! ```
//!
//! # Usage
//!
//! ```rust
//! use rustbos_auth::{Authorizer, Credential, Headers, QueryParams, SignOptions};
//!
//! let authorizer = Authorizer::new(Credential::new("AK", "SK"));
//!
//! let mut headers = Headers::new();
//! headers.insert("Host", "bucket.gz.bcebos.com");
//! headers.insert("Content-Length", "0");
//!
//! let token = authorizer.authorize(
//!     "GET",
//!     "/bos_test.txt",
//!     &QueryParams::new(),
//!     &headers,
//!     &SignOptions::new(),
//! );
//! assert!(token.starts_with("bce-auth-v1/AK/"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical URI, query string, headers and request
//! - [`credentials`] - Credential type, credential provider trait and in-memory implementation
//! - [`error`] - Verification error types
//! - [`selector`] - Selection of the headers bound into a signature
//! - [`signer`] - Signing key derivation, signature and token assembly
//! - [`types`] - Case-insensitive headers and ordered query parameters
//! - [`verify`] - Server-side token verification

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod selector;
pub mod signer;
pub mod types;
pub mod verify;

pub use credentials::{Credential, CredentialProvider, StaticCredentialProvider};
pub use error::AuthError;
pub use signer::{Authorizer, DEFAULT_EXPIRES_IN_SECONDS, SignOptions};
pub use types::{Headers, QueryParams};
pub use verify::{AuthResult, verify_authorization};
