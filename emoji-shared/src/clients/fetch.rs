use reqwest::Client;

/// Downloads a generator output so it can be re-hosted in object storage.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        tracing::debug!(url = %url, size = bytes.len(), "image downloaded");
        Ok(bytes.to_vec())
    }
}
