// src/services/client.rs

//! Tracking API client service.
//!
//! Fetches tracking payloads for a single package from the Anjun Express
//! endpoint and classifies transport failures for the refresh pipeline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, TrackingSnapshot};

/// Capability to fetch the current tracking payload for one package.
///
/// The refresh pipeline depends on this seam instead of the concrete
/// client so tests can script responses without a network.
#[async_trait]
pub trait TrackingSource: Send + Sync {
    async fn fetch(&self) -> Result<TrackingSnapshot>;
}

/// HTTP client bound to one tracking number.
pub struct TrackingApiClient {
    tracking_number: String,
    url: String,
    client: Client,
}

impl TrackingApiClient {
    /// Create a client for the given tracking number.
    pub fn new(api: &ApiConfig, tracking_number: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&api.user_agent)
            .timeout(Duration::from_secs(api.timeout_secs))
            .default_headers(browser_headers())
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            tracking_number: tracking_number.into(),
            url: tracking_url(api),
            client,
        })
    }

    /// The tracking number this client queries for.
    pub fn tracking_number(&self) -> &str {
        &self.tracking_number
    }

    /// Fetch the current tracking payload.
    ///
    /// A 404 means the provider does not know the tracking number. Other
    /// non-success statuses, timeouts and transport failures classify as
    /// communication errors; an undecodable body as an API error.
    pub async fn fetch_tracking(&self) -> Result<TrackingSnapshot> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("trackingNumber", self.tracking_number.as_str())])
            .send()
            .await
            .map_err(classify_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::TrackingNotFound);
        }

        let response = response.error_for_status().map_err(classify_error)?;
        response
            .json::<TrackingSnapshot>()
            .await
            .map_err(classify_error)
    }
}

#[async_trait]
impl TrackingSource for TrackingApiClient {
    async fn fetch(&self) -> Result<TrackingSnapshot> {
        self.fetch_tracking().await
    }
}

/// Full lookup URL for the configured endpoint.
fn tracking_url(api: &ApiConfig) -> String {
    format!("{}{}", api.base_url, api.endpoint)
}

/// Map a transport failure onto the error taxonomy.
fn classify_error(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::communication(format!("Timeout fetching tracking information: {error}"))
    } else if error.is_connect() || error.is_request() || error.is_status() {
        AppError::communication(format!("Error fetching tracking information: {error}"))
    } else if error.is_decode() {
        AppError::api(format!("Undecodable tracking response: {error}"))
    } else {
        AppError::api(format!("Unexpected tracking client failure: {error}"))
    }
}

/// Headers the provider's website sends, minus the User-Agent which the
/// client builder sets. The endpoint rejects requests that look too
/// little like its own frontend.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(
        header::ORIGIN,
        HeaderValue::from_static("https://anjunexpress.com.br"),
    );
    headers.insert(
        HeaderName::from_static("priority"),
        HeaderValue::from_static("u=1, i"),
    );
    headers.insert(
        header::REFERER,
        HeaderValue::from_static("https://anjunexpress.com.br/"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-site"),
    );
    headers
}
