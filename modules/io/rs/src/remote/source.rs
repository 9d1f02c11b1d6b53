use derive_getters::Getters;
use eyre::{Result, WrapErr};
use readcov_core_rs::source::{ApiError, Cursor, Page, ReadSource, SourceLocus};
use reqwest::blocking::Client;

use super::config::RemoteConfig;
use super::wire::{self, SearchReadsRequest};

/// Issues one `reads/search` request per page. Failures are classified, never retried.
#[derive(Clone, Debug, Getters)]
pub struct RemoteReadSource {
    config: RemoteConfig,
    #[getter(skip)]
    client: Client,
    url: String,
}

impl RemoteReadSource {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(*config.timeout())
            .build()
            .wrap_err("Failed to build the HTTP client")?;
        let url = config.search_url();
        Ok(Self {
            config,
            client,
            url,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.url.clone())
        } else {
            ApiError::Upstream {
                status: err.status().map(|x| x.as_u16()),
                message: Some(err.to_string()),
            }
        }
    }
}

impl ReadSource for RemoteReadSource {
    fn fetch_page(&mut self, locus: &SourceLocus, cursor: Option<&Cursor>) -> Result<Page, ApiError> {
        let body = SearchReadsRequest::new(self.config.readset_ids(), locus, cursor);
        log::debug!("POST {} for {} (page token: {:?})", self.url, locus, body.page_token);

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = self.config.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|err| self.transport_error(err))?;
        let status = response.status().as_u16();
        let content = response.text().map_err(|err| self.transport_error(err))?;
        log::debug!("Response status {} ({} bytes)", status, content.len());

        wire::classify(status, &content, &self.url)
    }
}
