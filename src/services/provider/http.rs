use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};

use crate::services::provider::client::{
    ProviderClient, ProviderError, ProviderResponse, ProviderResult,
};

/// reqwest-backed provider client.
///
/// One `reqwest::Client` is shared by every request (it pools connections internally).
/// No retry: a failed round trip is reported to the caller once.
#[derive(Clone, Debug)]
pub struct HttpProviderClient {
    http: Client,
    base_url: String,
}

impl HttpProviderClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url).map_err(|_| ProviderError::InvalidUrl(base_url.clone()))?;

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read(res: reqwest::Response) -> ProviderResult<ProviderResponse> {
        let status = res.status().as_u16();
        let bytes = res.bytes().await?;
        Ok(ProviderResponse::from_bytes(status, &bytes))
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn get(&self, path: &str) -> ProviderResult<ProviderResponse> {
        let url = self.url(path);
        tracing::debug!(%url, "provider GET");

        let res = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::read(res).await
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> ProviderResult<ProviderResponse> {
        let url = self.url(path);
        tracing::debug!(%url, "provider POST");

        let res = self
            .http
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await?;

        Self::read(res).await
    }
}
