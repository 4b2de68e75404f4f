use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use chrono::Utc;

/// An [`HttpClient`] wrapper that appends `v=<unix millis>` to every request
/// so static CSV files are never served from a stale cache.
pub struct CacheBust<C> {
    pub inner: C,
    pub param_name: String,
}

impl<C> CacheBust<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            param_name: "v".to_string(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for CacheBust<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let stamp = Utc::now().timestamp_millis().to_string();
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &stamp);
        self.inner.execute(req).await
    }
}
