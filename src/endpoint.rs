use url::Url;

use crate::models::mars::RoverCamera;

const BASE_URL: &str = "https://api.nasa.gov";

/// The NASA API endpoints this crate talks to -> https://api.nasa.gov
#[derive(Debug, Clone, PartialEq)]
pub enum Nasa {
    /// Landsat imagery for a point on Earth.
    EarthImagery { latitude: f64, longitude: f64 },
    /// Photos taken by the Curiosity rover on a given sol.
    MarsRoverPhotos {
        sol: u32,
        camera: Option<RoverCamera>,
    },
    /// The InSight lander's weather service.
    MarsWeather,
}

impl Nasa {
    pub fn path(&self) -> &'static str {
        match self {
            Self::EarthImagery { .. } => "/planetary/earth/imagery/",
            Self::MarsRoverPhotos { .. } => "/mars-photos/api/v1/rovers/curiosity/photos/",
            Self::MarsWeather => "/insight_weather/",
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::EarthImagery {
                latitude,
                longitude,
            } => vec![
                ("lon", longitude.to_string()),
                ("lat", latitude.to_string()),
            ],
            Self::MarsRoverPhotos { sol, camera } => {
                let mut query = vec![("sol", sol.to_string())];
                if let Some(camera) = camera {
                    query.push(("camera", camera.as_str().to_owned()));
                }
                query
            }
            Self::MarsWeather => vec![
                ("ver", "1.0".to_owned()),
                ("feedtype", "json".to_owned()),
            ],
        }
    }

    /// Builds the full request URL, appending the shared `api_key` parameter.
    pub fn url(&self, api_key: &str) -> Url {
        let mut url = Url::parse(BASE_URL).expect("base URL is valid");
        url.set_path(self.path());
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in self.query() {
                pairs.append_pair(name, &value);
            }
            pairs.append_pair("api_key", api_key);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn earth_imagery_url() {
        let endpoint = Nasa::EarthImagery {
            latitude: 45.5,
            longitude: -122.25,
        };
        let url = endpoint.url("DEMO_KEY");

        assert_eq!(url.host_str(), Some("api.nasa.gov"));
        assert_eq!(url.path(), "/planetary/earth/imagery/");

        let params = query_map(&url);
        assert_eq!(params.len(), 3);
        assert_eq!(params["lat"], "45.5");
        assert_eq!(params["lon"], "-122.25");
        assert_eq!(params["api_key"], "DEMO_KEY");
    }

    #[test]
    fn rover_photos_url_without_camera() {
        let endpoint = Nasa::MarsRoverPhotos {
            sol: 1000,
            camera: None,
        };
        let url = endpoint.url("DEMO_KEY");

        assert_eq!(url.path(), "/mars-photos/api/v1/rovers/curiosity/photos/");

        let params = query_map(&url);
        assert_eq!(params.len(), 2);
        assert_eq!(params["sol"], "1000");
        assert_eq!(params["api_key"], "DEMO_KEY");
    }

    #[test]
    fn rover_photos_url_with_camera() {
        let endpoint = Nasa::MarsRoverPhotos {
            sol: 2490,
            camera: Some(RoverCamera::Rhaz),
        };
        let params = query_map(&endpoint.url("DEMO_KEY"));

        assert_eq!(params.len(), 3);
        assert_eq!(params["sol"], "2490");
        assert_eq!(params["camera"], "RHAZ");
    }

    #[test]
    fn mars_weather_url() {
        let url = Nasa::MarsWeather.url("DEMO_KEY");

        assert_eq!(url.path(), "/insight_weather/");

        let params = query_map(&url);
        assert_eq!(params.len(), 3);
        assert_eq!(params["ver"], "1.0");
        assert_eq!(params["feedtype"], "json");
        assert_eq!(params["api_key"], "DEMO_KEY");
    }
}
