//! Async BOS object client.
//!
//! [`BosClient`] prepares and signs each request with [`prepare_request`],
//! sends it over a shared [`reqwest::Client`] and maps the outcome into the
//! caller's chosen shape or a [`crate::BosError`].

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use http::{HeaderMap, Method};
use rustbos_auth::{Authorizer, QueryParams};
use serde::Serialize;
use tracing::{debug, warn};

use crate::acl::Acl;
use crate::config::BosConfig;
use crate::error::{BosResult, map_error_response};
use crate::request::{PreparedRequest, RequestOptions, prepare_request};
use crate::response::{Response, ResponseHeaders};

/// Body of a multi-object delete request.
#[derive(Debug, Serialize)]
struct DeleteObjectsRequest<'a> {
    objects: Vec<DeleteObjectKey<'a>>,
}

#[derive(Debug, Serialize)]
struct DeleteObjectKey<'a> {
    key: &'a str,
}

/// Async client for the objects of one BOS bucket.
///
/// Cloning is cheap; clones share the HTTP connection pool and the signer.
///
/// # Examples
///
/// ```no_run
/// use rustbos_client::{BosClient, RequestOptions};
///
/// # async fn example() -> Result<(), rustbos_client::BosError> {
/// let client = BosClient::from_env()?;
/// client
///     .put_object("/notes/hello.txt", "hello bos", RequestOptions::new())
///     .await?;
/// let body = client
///     .get_object("/notes/hello.txt", RequestOptions::new())
///     .await?;
/// assert_eq!(&body[..], b"hello bos");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BosClient {
    config: Arc<BosConfig>,
    authorizer: Arc<Authorizer>,
    http: reqwest::Client,
}

impl BosClient {
    /// Create a client with an HTTP connection pool honoring the configured
    /// connect timeout.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BosError::Config`] if a required field is missing, or
    /// [`crate::BosError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: BosConfig) -> BosResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Self::with_http_client(config, http)
    }

    /// Create a client from `BOS_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`BosConfig::from_env`] and [`BosClient::new`].
    pub fn from_env() -> BosResult<Self> {
        Self::new(BosConfig::from_env()?)
    }

    /// Create a client that sends requests through an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BosError::Config`] if a required field is missing.
    pub fn with_http_client(config: BosConfig, http: reqwest::Client) -> BosResult<Self> {
        config.validate()?;
        let authorizer = Arc::new(config.authorizer());
        Ok(Self {
            config: Arc::new(config),
            authorizer,
            http,
        })
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &BosConfig {
        &self.config
    }

    /// The signer used for every request.
    #[must_use]
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Prepare and sign a request stamped with the current time, without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BosError::InvalidPath`] if `path` has a `.` or `..` segment.
    pub fn prepare(
        &self,
        method: &Method,
        path: &str,
        options: &RequestOptions,
    ) -> BosResult<PreparedRequest> {
        prepare_request(
            &self.config,
            &self.authorizer,
            method,
            path,
            options,
            Utc::now(),
        )
    }

    /// Send an arbitrary request and shape the response per
    /// [`RequestOptions::return_format`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::BosError::InvalidPath`] for paths with `.` or `..`
    /// segments, [`crate::BosError::Api`] or [`crate::BosError::UnexpectedStatus`] for
    /// non-success responses, [`crate::BosError::Transport`] when no response
    /// was received and [`crate::BosError::Json`] when a JSON body cannot be decoded.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> BosResult<Response> {
        let format = options.return_format;
        let (headers, body) = self.execute(method, path, &options).await?;
        Response::shape(format, &headers, body)
    }

    /// Download an object.
    pub async fn get_object(&self, path: &str, options: RequestOptions) -> BosResult<Bytes> {
        let (_, body) = self.execute(Method::GET, path, &options).await?;
        Ok(body)
    }

    /// Fetch the metadata headers of an object.
    pub async fn get_object_meta(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> BosResult<ResponseHeaders> {
        self.execute_for_headers(Method::HEAD, path, &options).await
    }

    /// Upload an object, replacing any existing object at `path`.
    pub async fn put_object(
        &self,
        path: &str,
        content: impl Into<Bytes>,
        options: RequestOptions,
    ) -> BosResult<ResponseHeaders> {
        let options = options.body(content);
        self.execute_for_headers(Method::PUT, path, &options).await
    }

    /// Copy `source` to `dest` within the configured bucket.
    pub async fn copy_object(
        &self,
        source: &str,
        dest: &str,
        options: RequestOptions,
    ) -> BosResult<serde_json::Value> {
        let copy_source = format!("/{}/{}", self.config.bucket, source.trim_start_matches('/'));
        let options = options.header("x-bce-copy-source", copy_source);
        self.execute_for_json(Method::PUT, dest, &options).await
    }

    /// Have BOS fetch the remote `source` URL and store it at `path`.
    pub async fn fetch_object(
        &self,
        path: &str,
        source: &str,
        options: RequestOptions,
    ) -> BosResult<serde_json::Value> {
        let options = options
            .query_flag("fetch")
            .header("x-bce-fetch-source", source);
        self.execute_for_json(Method::POST, path, &options).await
    }

    /// Append `content` to an appendable object, creating it if needed.
    ///
    /// Pass an `offset` query parameter in `options` to append to an existing object.
    pub async fn append_object(
        &self,
        path: &str,
        content: impl Into<Bytes>,
        options: RequestOptions,
    ) -> BosResult<ResponseHeaders> {
        let options = options.query_flag("append").body(content);
        self.execute_for_headers(Method::POST, path, &options).await
    }

    /// Delete an object.
    pub async fn delete_object(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> BosResult<ResponseHeaders> {
        self.execute_for_headers(Method::DELETE, path, &options).await
    }

    /// Delete several objects in one request.
    pub async fn delete_objects<S: AsRef<str>>(
        &self,
        paths: &[S],
        options: RequestOptions,
    ) -> BosResult<ResponseHeaders> {
        let request = DeleteObjectsRequest {
            objects: paths
                .iter()
                .map(|path| DeleteObjectKey {
                    key: path.as_ref().trim_start_matches('/'),
                })
                .collect(),
        };
        let body = serde_json::to_vec(&request)?;
        let options = options.query_flag("delete").body(body);
        self.execute_for_headers(Method::POST, "/", &options).await
    }

    /// Read the ACL of an object. Any caller query parameters are discarded.
    pub async fn get_object_acl(
        &self,
        path: &str,
        mut options: RequestOptions,
    ) -> BosResult<serde_json::Value> {
        options.query = QueryParams::new();
        options.query.insert_flag("acl");
        self.execute_for_json(Method::GET, path, &options).await
    }

    /// Set a canned ACL on an object.
    pub async fn put_object_acl(
        &self,
        path: &str,
        acl: Acl,
        options: RequestOptions,
    ) -> BosResult<ResponseHeaders> {
        let options = options.header("x-bce-acl", acl.as_str()).query_flag("acl");
        self.execute_for_headers(Method::PUT, path, &options).await
    }

    /// Remove the object ACL so the object inherits the bucket ACL.
    pub async fn delete_object_acl(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> BosResult<ResponseHeaders> {
        let options = options.query_flag("acl");
        self.execute_for_headers(Method::DELETE, path, &options).await
    }

    /// Read the ACL of the configured bucket.
    pub async fn get_bucket_acl(&self, options: RequestOptions) -> BosResult<serde_json::Value> {
        let options = options.query_flag("acl");
        self.execute_for_json(Method::GET, "/", &options).await
    }

    /// List objects in the bucket. Filter with `prefix`, `marker`, `maxKeys`
    /// or `delimiter` query parameters.
    pub async fn list_objects(&self, options: RequestOptions) -> BosResult<serde_json::Value> {
        self.execute_for_json(Method::GET, "/", &options).await
    }

    async fn execute_for_headers(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> BosResult<ResponseHeaders> {
        let (headers, _) = self.execute(method, path, options).await?;
        Ok(ResponseHeaders::from_header_map(&headers))
    }

    async fn execute_for_json(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> BosResult<serde_json::Value> {
        let (_, body) = self.execute(method, path, options).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> BosResult<(HeaderMap, Bytes)> {
        let PreparedRequest {
            method,
            url,
            headers,
            body,
        } = self.prepare(&method, path, options)?;

        let mut builder = self.http.request(method.clone(), url.as_str());
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = map_error_response(status, &body);
            warn!(
                method = %method,
                url,
                status = status.as_u16(),
                code = err.code(),
                request_id = err.request_id(),
                "BOS request failed"
            );
            return Err(err);
        }

        debug!(
            method = %method,
            url,
            status = status.as_u16(),
            body_len = body.len(),
            "BOS request succeeded"
        );
        Ok((response_headers, body))
    }
}
