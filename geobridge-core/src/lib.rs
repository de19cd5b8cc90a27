#![doc = include_str!("../README.md")]
use serde::{Deserialize, Serialize};

pub mod bbox;
pub mod layer;
pub mod tiles;
pub mod view;

pub use bbox::{BoundingBox, Direction};
pub use layer::{Control, TileLayer, TileSource};
pub use view::{MapSettings, MapView, ViewportSize};

/// Longitude/latitude pair in EPSG:4326 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        LonLat { lon, lat }
    }

    /// Finite and inside the WGS84 value range.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl std::fmt::Display for LonLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

impl std::str::FromStr for LonLat {
    type Err = MapError;

    /// Parses `lon,lat`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MapError::InvalidCoordinate(s.to_owned());
        let (lon, lat) = s.split_once(',').ok_or_else(invalid)?;
        let lon = lon.trim().parse::<f64>().map_err(|_| invalid())?;
        let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        Ok(LonLat { lon, lat })
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MapError {
    #[error("map container name is empty")]
    MissingContainer,
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("unknown layer: {0}")]
    UnknownLayer(String),
}
