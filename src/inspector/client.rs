//! HTTP client for the URL inspection endpoint
//!
//! This module handles the single request/response exchange per URL:
//! - Building the HTTP client with user agent and timeouts
//! - POSTing the JSON inspection request with a bearer token
//! - Classifying failures as transport, HTTP status or malformed body
//!
//! There is no retry here; a failed call is reported once and left to a
//! later run.

use crate::config::ApiConfig;
use crate::inspector::credential::CredentialProvider;
use crate::inspector::error::InspectionError;
use crate::inspector::wire::{parse_inspection_response, IndexInspection, InspectRequest};
use crate::InspectorError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Anything that can inspect one URL within a site
#[async_trait]
pub trait Inspector: Send + Sync {
    async fn inspect(&self, url: &str, site_url: &str)
        -> Result<IndexInspection, InspectionError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The API client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the inspection endpoint
pub struct InspectionClient {
    client: Client,
    endpoint: String,
    credentials: Box<dyn CredentialProvider>,
}

impl InspectionClient {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        credentials: Box<dyn CredentialProvider>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            credentials,
        }
    }

    /// Builds a client from the API configuration
    ///
    /// # Returns
    ///
    /// * `Err(InspectorError::Http)` - the HTTP client could not be built
    pub fn from_config(
        config: &ApiConfig,
        credentials: Box<dyn CredentialProvider>,
    ) -> Result<Self, InspectorError> {
        let client = build_http_client(config)?;
        Ok(Self::new(client, config.endpoint.clone(), credentials))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Inspects one URL with an explicit bearer token
    ///
    /// # Request Flow
    ///
    /// 1. POST `{inspectionUrl, siteUrl, languageCode}` with `Authorization: Bearer`
    /// 2. Non-2xx status → `ApiHttp` with the raw body, no parsing attempted
    /// 3. 2xx body without `inspectionResult` → `MalformedResponse`
    pub async fn inspect_with_token(
        &self,
        url: &str,
        site_url: &str,
        token: &str,
    ) -> Result<IndexInspection, InspectionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&InspectRequest::new(url, site_url))
            .send()
            .await
            .map_err(|e| InspectionError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| InspectionError::from_transport(&e))?;

        if !status.is_success() {
            tracing::debug!("Inspection of {} returned HTTP {}", url, status.as_u16());
            return Err(InspectionError::ApiHttp {
                status: status.as_u16(),
                body,
            });
        }

        parse_inspection_response(&body)
    }
}

#[async_trait]
impl Inspector for InspectionClient {
    async fn inspect(
        &self,
        url: &str,
        site_url: &str,
    ) -> Result<IndexInspection, InspectionError> {
        let token = self.credentials.token()?;
        self.inspect_with_token(url, site_url, &token).await
    }
}
