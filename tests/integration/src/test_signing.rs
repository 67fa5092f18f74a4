//! Requests signed directly with `rustbos-auth` and sent over plain reqwest.

#[cfg(test)]
mod tests {
    use rustbos_auth::{Authorizer, Headers, QueryParams, SignOptions};
    use rustbos_client::BosConfig;

    use crate::bos_client;

    #[tokio::test]
    #[ignore = "requires BOS credentials"]
    async fn test_should_accept_manually_signed_request() {
        let config: BosConfig = bos_client().config().clone();
        let authorizer = Authorizer::new(config.credential());

        let mut query = QueryParams::new();
        query.insert("maxKeys", "1");

        let mut headers = Headers::new();
        headers.insert("Host", config.host());
        headers.insert("Content-Length", "0");

        let token = authorizer.authorize("GET", "/", &query, &headers, &SignOptions::new());

        let url = format!("{}/?{}", config.base_url(), query.to_query_string());
        let mut request = reqwest::Client::new().get(url);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }
        let response = request
            .header("Authorization", token)
            .send()
            .await
            .expect("send signed request");

        assert!(
            response.status().is_success(),
            "unexpected status {}",
            response.status()
        );
        let listing: serde_json::Value = response.json().await.expect("listing JSON");
        assert!(listing.get("contents").is_some());
    }
}
