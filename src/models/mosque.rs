use serde::{Deserialize, Serialize};

use crate::error::{MosqueError, Result};
use crate::models::{AzanTimes, PrayerSchedule};

pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A point on the globe, longitude first.
///
/// Serialized as `[longitude, latitude]`, the order the geospatial documents
/// are stored in. Never swap the pair when converting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(MosqueError::validation(format!(
                "longitude {} is outside -180..180",
                longitude
            )));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(MosqueError::validation(format!(
                "latitude {} is outside -90..90",
                latitude
            )));
        }
        Ok(Self { longitude, latitude })
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = MosqueError;

    fn try_from(pair: [f64; 2]) -> Result<Self> {
        Coordinate::new(pair[0], pair[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.longitude, c.latitude]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosqueRecord {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Identity of the imam who registered the mosque.
    pub imam: String,
    pub coordinates: Coordinate,
    pub prayer_times: PrayerSchedule,
    #[serde(default)]
    pub azan_times: AzanTimes,
    #[serde(default)]
    pub photos: Vec<String>,
    pub verified: bool,
}

/// Editable part of a mosque, as submitted on create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMosque {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub imam: Option<String>,
    pub coordinates: Coordinate,
    pub prayer_times: PrayerSchedule,
    #[serde(default)]
    pub azan_times: AzanTimes,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl NewMosque {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MosqueError::validation("mosque name is required"));
        }
        if self.location.trim().is_empty() {
            return Err(MosqueError::validation("mosque location is required"));
        }
        if self.photos.iter().any(|p| p.trim().is_empty()) {
            return Err(MosqueError::validation("photo references must not be empty"));
        }
        Ok(())
    }
}
