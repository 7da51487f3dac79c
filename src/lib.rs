//! Typed async client for a handful of NASA public APIs: Earth satellite
//! imagery lookup, Mars rover photos and the InSight Mars weather service.
//!
//! [`NasaClient`] composes endpoint construction, the HTTP transport and
//! response decoding into one call per API. [`download::PhotoDownloader`]
//! handles the secondary pipeline of fetching rover image bytes for a grid
//! of visible photos, with per-key de-duplication and cancellation.

pub mod client;
pub mod download;
pub mod endpoint;
pub mod error;
pub mod models;

pub use client::{FetchBytes, NasaClient};
pub use error::ApiError;
