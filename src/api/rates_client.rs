// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::RatesDocument;

/// Default per-request timeout for rate endpoints
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Public endpoints tried in order; `{base}` is replaced by the base currency
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://api.exchangerate-api.com/v4/latest/{base}",
    "https://open.er-api.com/v6/latest/{base}",
];

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("{url} returned a malformed rates document: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Something that can produce a rates table keyed by currency code
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Rates for every currency the provider knows, relative to `base`
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>, ProviderError>;
}

#[derive(Clone)]
pub struct HttpRateProvider {
    client: Client,
    url_template: String,
}

impl HttpRateProvider {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self::with_timeout(url_template, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url_template: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            url_template: url_template.into(),
        }
    }

    /// Providers for the given templates, sharing one HTTP client
    pub fn from_templates<S: AsRef<str>>(templates: &[S], timeout: Duration) -> Vec<Self> {
        let client = build_client(timeout);

        templates
            .iter()
            .map(|t| Self {
                client: client.clone(),
                url_template: t.as_ref().to_string(),
            })
            .collect()
    }

    pub fn url_for(&self, base: &str) -> String {
        self.url_template.replace("{base}", base)
    }
}

fn build_client(timeout: Duration) -> Client {
    // Builder only fails when the TLS backend cannot initialize
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[async_trait::async_trait]
impl RateProvider for HttpRateProvider {
    fn name(&self) -> &str {
        &self.url_template
    }

    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>, ProviderError> {
        let url = self.url_for(base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ProviderError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status { url, status });
        }

        let text = response
            .text()
            .await
            .map_err(|source| ProviderError::Request {
                url: url.clone(),
                source,
            })?;

        let document: RatesDocument = serde_json::from_str(&text)
            .map_err(|source| ProviderError::Malformed { url, source })?;

        Ok(document.usable_rates())
    }
}
