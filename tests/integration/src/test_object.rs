//! Object CRUD integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use rustbos_client::RequestOptions;

    use crate::{bos_client, cleanup_prefix, test_prefix};

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_put_and_get_object() {
        let client = bos_client();
        let prefix = test_prefix("putget");
        let key = format!("{prefix}bos_test.txt");

        client
            .put_object(&key, "bos test", RequestOptions::new())
            .await
            .expect("put_object");

        let body = client
            .get_object(&key, RequestOptions::new())
            .await
            .expect("get_object");
        assert_eq!(body, Bytes::from_static(b"bos test"));

        cleanup_prefix(&client, &prefix).await;
    }

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_get_range_and_explicitly_signed_header() {
        let client = bos_client();
        let prefix = test_prefix("range");
        let key = format!("{prefix}bos_test.txt");

        client
            .put_object(&key, "bos test", RequestOptions::new())
            .await
            .expect("put_object");

        let part = client
            .get_object(&key, RequestOptions::new().header("Range", "bytes=0-2"))
            .await
            .expect("ranged get_object");
        assert_eq!(part, Bytes::from_static(b"bos"));

        let content = client
            .get_object(
                &key,
                RequestOptions::new()
                    .header("Author", "Thomas")
                    .sign_header("Author"),
            )
            .await
            .expect("get_object with explicit signed header");
        assert_eq!(content, Bytes::from_static(b"bos test"));

        cleanup_prefix(&client, &prefix).await;
    }

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_read_object_meta() {
        let client = bos_client();
        let prefix = test_prefix("meta");
        let key = format!("{prefix}bos_test.txt");

        client
            .put_object(
                &key,
                "bos test",
                RequestOptions::new().header("x-bce-meta-owner", "thomas"),
            )
            .await
            .expect("put_object");

        let meta = client
            .get_object_meta(&key, RequestOptions::new())
            .await
            .expect("get_object_meta");
        assert_eq!(meta.first("Content-Length"), Some("8"));
        assert_eq!(meta.first("x-bce-meta-owner"), Some("thomas"));

        cleanup_prefix(&client, &prefix).await;
    }

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_copy_object() {
        let client = bos_client();
        let prefix = test_prefix("copy");
        let source = format!("{prefix}source.txt");
        let dest = format!("{prefix}dest.txt");

        client
            .put_object(&source, "copy me", RequestOptions::new())
            .await
            .expect("put_object");

        let result = client
            .copy_object(&source, &dest, RequestOptions::new())
            .await
            .expect("copy_object");
        assert!(result.get("eTag").is_some(), "unexpected copy result: {result}");

        let body = client
            .get_object(&dest, RequestOptions::new())
            .await
            .expect("get copied object");
        assert_eq!(body, Bytes::from_static(b"copy me"));

        cleanup_prefix(&client, &prefix).await;
    }

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_append_object() {
        let client = bos_client();
        let prefix = test_prefix("append");
        let key = format!("{prefix}append.txt");

        client
            .append_object(&key, "bos test", RequestOptions::new())
            .await
            .expect("first append_object");
        assert_eq!(
            client
                .get_object(&key, RequestOptions::new())
                .await
                .expect("get_object"),
            Bytes::from_static(b"bos test")
        );

        client
            .append_object(&key, ".", RequestOptions::new().query("offset", "8"))
            .await
            .expect("second append_object");
        assert_eq!(
            client
                .get_object(&key, RequestOptions::new())
                .await
                .expect("get_object"),
            Bytes::from_static(b"bos test.")
        );

        cleanup_prefix(&client, &prefix).await;
    }

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_fetch_remote_object() {
        let client = bos_client();
        let prefix = test_prefix("fetch");
        let key = format!("{prefix}fetched.html");

        client
            .fetch_object(&key, "https://www.baidu.com", RequestOptions::new())
            .await
            .expect("fetch_object");

        let meta = client
            .get_object_meta(&key, RequestOptions::new())
            .await
            .expect("get_object_meta");
        assert!(meta.get("content-length").is_some());

        cleanup_prefix(&client, &prefix).await;
    }

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_delete_object() {
        let client = bos_client();
        let prefix = test_prefix("delete");
        let key = format!("{prefix}gone.txt");

        client
            .put_object(&key, "bos test", RequestOptions::new())
            .await
            .expect("put_object");
        client
            .delete_object(&key, RequestOptions::new())
            .await
            .expect("delete_object");

        let err = client
            .get_object(&key, RequestOptions::new())
            .await
            .expect_err("object should be gone");
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_delete_multiple_objects() {
        let client = bos_client();
        let prefix = test_prefix("multidelete");
        let keys = [
            format!("{prefix}a.txt"),
            format!("{prefix}b.txt"),
            format!("{prefix}nested/c.txt"),
        ];

        for key in &keys {
            client
                .put_object(key, "bos test", RequestOptions::new())
                .await
                .expect("put_object");
        }

        let with_slash: Vec<String> = keys.iter().map(|key| format!("/{key}")).collect();
        client
            .delete_objects(&with_slash, RequestOptions::new())
            .await
            .expect("delete_objects");

        for key in &keys {
            let err = client
                .get_object_meta(key, RequestOptions::new())
                .await
                .expect_err("object should be gone");
            assert_eq!(err.status(), Some(404), "{key} still exists");
        }
    }
}
