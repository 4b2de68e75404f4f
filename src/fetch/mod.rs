//! HTTP retrieval of remote CSV sources.

mod basic;
mod cache_bust;
mod client;

pub use basic::BasicClient;
pub use cache_bust::CacheBust;
pub use client::HttpClient;

use anyhow::{Context, Result};

/// GETs `url` and returns the body, failing on non-success status codes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("Invalid URL '{url}'"))?,
    );

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refused_connection_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BasicClient::default();
        let result = fetch_bytes(&client, &format!("http://{addr}/speed_test_data.csv")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let client = BasicClient::new();
        let err = fetch_bytes(&client, "not a url").await.unwrap_err();
        assert!(err.to_string().contains("Invalid URL"));
    }
}
