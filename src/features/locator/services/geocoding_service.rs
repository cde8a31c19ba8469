use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use crate::core::config::GeocoderConfig;
use crate::core::error::{AppError, Result};
use crate::features::locator::models::{AddressComponents, GpsCoordinate};

/// Looks up address components for a coordinate
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, coordinate: GpsCoordinate) -> Result<AddressComponents>;
}

/// Nominatim `/reverse` response structure
#[derive(Debug, Deserialize)]
pub struct NominatimReverseResponse {
    pub display_name: Option<String>,
    pub address: Option<HashMap<String, serde_json::Value>>,
    /// Set instead of `address` when nothing is found at the position
    pub error: Option<String>,
}

impl NominatimReverseResponse {
    /// String-valued address fields; empty when the lookup found nothing
    pub fn into_components(self) -> AddressComponents {
        if let Some(error) = &self.error {
            tracing::warn!("Nominatim found no address: {}", error);
        }

        self.address
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect()
    }
}

/// Reverse geocoding against a Nominatim instance
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    fn reverse_url(&self, coordinate: GpsCoordinate) -> String {
        format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}&addressdetails=1&accept-language={}",
            self.base_url,
            coordinate.lat,
            coordinate.lon,
            urlencoding::encode(&self.language)
        )
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coordinate: GpsCoordinate) -> Result<AddressComponents> {
        let url = self.reverse_url(coordinate);
        tracing::debug!("Reverse geocoding {} -> {}", coordinate.display(), url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Nominatim request failed: {:?}", e);
            AppError::Geocoding(format!("Nominatim request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Geocoding(format!(
                "Nominatim returned status: {}",
                status
            )));
        }

        let body: NominatimReverseResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Nominatim response: {:?}", e);
            AppError::Geocoding(format!("Failed to parse Nominatim response: {}", e))
        })?;

        if let Some(name) = &body.display_name {
            tracing::info!("Resolved {} to {}", coordinate.display(), name);
        }

        Ok(body.into_components())
    }
}
