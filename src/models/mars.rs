use serde::Deserialize;

/// Cameras carried by the Curiosity rover, usable as a photo filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoverCamera {
    Fhaz,
    Rhaz,
    Mast,
    Chemcam,
    Mahli,
    Mardi,
    Navcam,
}

impl RoverCamera {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fhaz => "FHAZ",
            Self::Rhaz => "RHAZ",
            Self::Mast => "MAST",
            Self::Chemcam => "CHEMCAM",
            Self::Mahli => "MAHLI",
            Self::Mardi => "MARDI",
            Self::Navcam => "NAVCAM",
        }
    }
}

/// Download lifecycle of a rover photo's image bytes. A photo only ever moves
/// out of `Placeholder`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageDownloadState {
    #[default]
    Placeholder,
    Downloaded,
    Failed,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarsRoverCamera {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarsRoverPhoto {
    pub id: i64,
    pub img_src: String,
    pub earth_date: String,
    pub camera: MarsRoverCamera,
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
    #[serde(skip)]
    pub state: ImageDownloadState,
}

impl MarsRoverPhoto {
    /// Attaches downloaded image bytes. Ignored once the photo has already
    /// resolved to `Downloaded` or `Failed`.
    pub fn mark_downloaded(&mut self, bytes: Vec<u8>) {
        if self.state != ImageDownloadState::Placeholder {
            return;
        }
        self.image = Some(bytes);
        self.state = ImageDownloadState::Downloaded;
    }

    /// Records a failed download. Ignored once resolved.
    pub fn mark_failed(&mut self) {
        if self.state != ImageDownloadState::Placeholder {
            return;
        }
        self.state = ImageDownloadState::Failed;
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarsRoverPhotos {
    pub photos: Vec<MarsRoverPhoto>,
}
