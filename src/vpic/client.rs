//! VIN decode client

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::validate_vin;
use crate::vpic::{DecodeResponse, DecodedVehicle, VinError, VpicApi};

/// Anything that can turn a VIN into decoded attributes
#[async_trait]
pub trait VinLookup: Send + Sync {
    async fn decode(&self, vin: &str) -> Result<DecodedVehicle, VinError>;
}

/// HTTP client for the vPIC decode endpoint
#[derive(Debug, Clone)]
pub struct VpicClient {
    http: Client,
    base_url: Url,
}

impl VpicClient {
    pub fn new(config: &Config) -> Result<Self, VinError> {
        let http = config.http_client().map_err(|e| VinError::Config(e.to_string()))?;
        Self::with_client(http, &config.vpic_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, VinError> {
        let base_url = Url::parse(base_url).map_err(|e| VinError::Config(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(VinError::Config(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// Full decode URL for a VIN, with the VIN encoded as a path segment
    pub fn decode_url(&self, vin: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(VpicApi::DECODE_PATH.iter().copied())
                .push(vin);
        }
        url.query_pairs_mut().append_pair("format", VpicApi::FORMAT);
        url
    }
}

#[async_trait]
impl VinLookup for VpicClient {
    async fn decode(&self, vin: &str) -> Result<DecodedVehicle, VinError> {
        validate_vin(vin)?;

        let url = self.decode_url(vin);
        info!("Decoding VIN {}", vin);
        debug!("Decode request: {}", url);

        let response = self.http.get(url).send().await.map_err(VinError::Http)?;
        let status = response.status();
        if !status.is_success() {
            warn!("vPIC returned status {} for VIN {}", status, vin);
            return Err(VinError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(VinError::Http)?;
        let parsed: DecodeResponse = serde_json::from_str(&body).map_err(VinError::Parse)?;

        match parsed.results.into_iter().next() {
            Some(vehicle) => Ok(vehicle),
            None => {
                warn!(
                    "vPIC returned no results for VIN {}: {}",
                    vin,
                    parsed.message.as_deref().unwrap_or("no message")
                );
                Err(VinError::NoResults)
            }
        }
    }
}
