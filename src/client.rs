use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{
    endpoint::Nasa,
    error::ApiError,
    models::{
        earth::EarthImage,
        mars::{MarsRoverPhotos, RoverCamera},
        weather::MarsWeatherReport,
    },
};

/// Byte-level fetch primitive shared by the client and the photo downloader.
/// The downloader is generic over this seam so its invariants can be tested
/// without a network.
#[async_trait]
pub trait FetchBytes: Send + Sync + 'static {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// Client for the NASA public APIs, holding the API key and a shared
/// connection-reusing HTTP client. Stateless across calls otherwise.
pub struct NasaClient {
    http: reqwest::Client,
    api_key: String,
}

impl NasaClient {
    /// The sol the rover photo browser starts from.
    pub const DEFAULT_ROVER_SOL: u32 = 1000;

    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ApiError::InvalidConfiguration);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(concat!("nasa-api/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, api_key })
    }

    /// Reads the API key from the `NASA_KEY` environment variable.
    pub fn from_env() -> Result<Self, ApiError> {
        let api_key = std::env::var("NASA_KEY").map_err(|_| ApiError::InvalidConfiguration)?;
        Self::new(api_key)
    }

    pub async fn earth_image(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<EarthImage, ApiError> {
        self.get_json(Nasa::EarthImagery {
            latitude,
            longitude,
        })
        .await
    }

    /// Fetches the image an [`EarthImage`] points at. The image URL is
    /// pre-signed, so no `api_key` is appended.
    pub async fn earth_image_bytes(&self, image: &EarthImage) -> Result<Vec<u8>, ApiError> {
        fetch_bytes(&self.http, &image.url).await
    }

    pub async fn mars_rover_photos(
        &self,
        sol: u32,
        camera: Option<RoverCamera>,
    ) -> Result<MarsRoverPhotos, ApiError> {
        self.get_json(Nasa::MarsRoverPhotos { sol, camera }).await
    }

    pub async fn mars_weather(&self) -> Result<MarsWeatherReport, ApiError> {
        self.get_json(Nasa::MarsWeather).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Nasa) -> Result<T, ApiError> {
        let url = endpoint.url(&self.api_key);
        let body = fetch_bytes(&self.http, url.as_str()).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl FetchBytes for NasaClient {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        fetch_bytes(&self.http, url).await
    }
}

/// Issues a GET and validates the response: non-200 statuses and empty
/// bodies are errors, everything else is the raw body bytes. No retries.
pub(crate) async fn fetch_bytes(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, ApiError> {
    let response = http.get(url).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        tracing::warn!(%status, url, "unsuccessful response");
        return Err(ApiError::ResponseUnsuccessful(status.as_u16()));
    }

    let body = response.bytes().await?;
    if body.is_empty() {
        return Err(ApiError::NoDataReceived);
    }

    tracing::debug!(url, bytes = body.len(), "fetched");
    Ok(body.to_vec())
}
