//! Error mapping integration tests.

#[cfg(test)]
mod tests {
    use rustbos_client::{BosClient, BosError, RequestOptions};

    use crate::{bos_client, test_prefix};

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_map_missing_key_to_api_error() {
        let client = bos_client();
        let key = format!("{}missing.txt", test_prefix("missing"));

        let err = client
            .get_object_acl(&key, RequestOptions::new())
            .await
            .expect_err("missing object");
        assert_eq!(err.code(), Some("NoSuchKey"));
        assert_eq!(err.status(), Some(404));
        assert!(err.request_id().is_some());
    }

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_reject_wrong_secret() {
        let mut config = bos_client().config().clone();
        config.secret_key = "definitely-not-the-secret".to_owned();
        let client = BosClient::new(config).expect("client");

        let err = client
            .list_objects(RequestOptions::new().query("maxKeys", "1"))
            .await
            .expect_err("bad signature");
        assert!(
            matches!(err, BosError::Api { status: 403, .. }),
            "unexpected error: {err:?}"
        );
        assert_eq!(err.code(), Some("SignatureDoesNotMatch"));
    }
}
