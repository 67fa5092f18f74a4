//! Listing integration tests.

#[cfg(test)]
mod tests {
    use rustbos_client::RequestOptions;

    use crate::{bos_client, cleanup_prefix, object_keys, test_prefix};

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_list_with_prefix_and_delimiter() {
        let client = bos_client();
        let prefix = test_prefix("list");
        let top = format!("{prefix}bos_test.txt");
        let nested = format!("{prefix}bos_test/bos_test10.txt");

        for key in [&top, &nested] {
            client
                .put_object(key, "bos test", RequestOptions::new())
                .await
                .expect("put_object");
        }

        let all = client
            .list_objects(RequestOptions::new().query("prefix", prefix.as_str()))
            .await
            .expect("list_objects");
        let keys = object_keys(&all);
        assert!(keys.contains(&top));
        assert!(keys.contains(&nested));

        let shallow = client
            .list_objects(
                RequestOptions::new()
                    .query("prefix", prefix.as_str())
                    .query("delimiter", "/"),
            )
            .await
            .expect("list_objects with delimiter");
        let keys = object_keys(&shallow);
        assert!(keys.contains(&top));
        assert!(!keys.contains(&nested));

        let sub = client
            .list_objects(RequestOptions::new().query("prefix", format!("{prefix}bos_test/")))
            .await
            .expect("list_objects with nested prefix");
        let keys = object_keys(&sub);
        assert!(!keys.contains(&top));
        assert!(keys.contains(&nested));

        cleanup_prefix(&client, &prefix).await;
    }
}
