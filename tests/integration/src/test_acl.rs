//! Object and bucket ACL integration tests.

#[cfg(test)]
mod tests {
    use rustbos_client::{Acl, RequestOptions};

    use crate::{bos_client, cleanup_prefix, test_prefix};

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_read_bucket_acl() {
        let client = bos_client();

        let acl = client
            .get_bucket_acl(RequestOptions::new())
            .await
            .expect("get_bucket_acl");
        let grants = acl["accessControlList"]
            .as_array()
            .expect("accessControlList array");
        assert!(!grants.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_put_get_and_delete_object_acl() {
        let client = bos_client();
        let prefix = test_prefix("acl");
        let key = format!("{prefix}bos_test.txt");

        client
            .put_object(&key, "bos test", RequestOptions::new())
            .await
            .expect("put_object");

        client
            .put_object_acl(&key, Acl::PublicRead, RequestOptions::new())
            .await
            .expect("put_object_acl");

        let acl = client
            .get_object_acl(&key, RequestOptions::new())
            .await
            .expect("get_object_acl");
        assert_eq!(acl["accessControlList"][0]["permission"][0], "READ");

        client
            .delete_object_acl(&key, RequestOptions::new())
            .await
            .expect("delete_object_acl");

        let err = client
            .get_object_acl(&key, RequestOptions::new())
            .await
            .expect_err("object ACL should be gone");
        assert_eq!(err.code(), Some("ObjectAclNotExists"));

        cleanup_prefix(&client, &prefix).await;
    }
}
