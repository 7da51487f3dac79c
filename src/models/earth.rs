use serde::Deserialize;

/// Metadata for one Earth satellite image; `url` points at the image itself.
#[derive(Deserialize, Debug, Clone)]
pub struct EarthImage {
    pub date: String,
    pub url: String,
}
