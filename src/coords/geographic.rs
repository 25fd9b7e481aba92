//! Latitude/longitude positions tied to a datum.

use std::fmt;

use crate::datum::{self, DatumId};
use crate::error::GridError;

/// Mean earth radius used for great-circle distances (km).
const EARTH_RADIUS_KM: f64 = 6366.707;
const KM_PER_MILE: f64 = 1.609344;

/// A geodetic position: latitude and longitude in degrees, ellipsoidal
/// height in metres, on a named datum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeographicPosition {
    latitude: f64,
    longitude: f64,
    height: f64,
    datum: DatumId,
}

impl GeographicPosition {
    /// A position on WGS84 at zero height.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GridError> {
        Self::with_datum(latitude, longitude, 0.0, DatumId::Wgs84)
    }

    /// Latitude must lie in [-90, 90] and longitude in [-180, 180].
    pub fn with_datum(
        latitude: f64,
        longitude: f64,
        height: f64,
        datum: DatumId,
    ) -> Result<Self, GridError> {
        if !Self::is_valid_latitude(latitude) {
            return Err(GridError::InvalidArgument(format!(
                "Latitude ({latitude}) is invalid. Must be between -90.0 and 90.0 inclusive."
            )));
        }
        if !Self::is_valid_longitude(longitude) {
            return Err(GridError::InvalidArgument(format!(
                "Longitude ({longitude}) is invalid. Must be between -180.0 and 180.0 inclusive."
            )));
        }
        if !height.is_finite() {
            return Err(GridError::InvalidArgument(format!(
                "Height ({height}) must be finite."
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            height,
            datum,
        })
    }

    /// Build from radians produced by an inverse projection or ECEF
    /// conversion. Longitude is wrapped into (-180, 180].
    pub(crate) fn from_radians(lon: f64, lat: f64, height: f64, datum: DatumId) -> Self {
        let mut longitude = lon.to_degrees() % 360.0;
        if longitude > 180.0 {
            longitude -= 360.0;
        } else if longitude <= -180.0 {
            longitude += 360.0;
        }
        Self {
            latitude: lat.to_degrees().clamp(-90.0, 90.0),
            longitude,
            height,
            datum,
        }
    }

    pub fn is_valid_latitude(latitude: f64) -> bool {
        (-90.0..=90.0).contains(&latitude)
    }

    pub fn is_valid_longitude(longitude: f64) -> bool {
        (-180.0..=180.0).contains(&longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn datum(&self) -> DatumId {
        self.datum
    }

    /// (lon, lat) in radians, the order the projections take.
    pub fn to_radians(&self) -> (f64, f64) {
        (self.longitude.to_radians(), self.latitude.to_radians())
    }

    /// The same point expressed on another datum. Height is carried over.
    pub fn to_datum(&self, target: DatumId) -> Self {
        if self.datum == target {
            return *self;
        }
        let (lon, lat) = self.to_radians();
        let (lon, lat) = datum::transform(self.datum, target, lon, lat, self.height);
        Self::from_radians(lon, lat, self.height, target)
    }

    pub fn to_wgs84(&self) -> Self {
        self.to_datum(DatumId::Wgs84)
    }

    /// Great-circle distance in kilometres, on a sphere of radius 6366.707 km.
    ///
    /// Both positions are taken as they are; no datum shift is applied.
    pub fn distance_km(&self, other: &GeographicPosition) -> f64 {
        let (lon1, lat1) = self.to_radians();
        let (lon2, lat2) = other.to_radians();
        let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos();
        cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_KM
    }

    /// Great-circle distance in statute miles.
    pub fn distance_miles(&self, other: &GeographicPosition) -> f64 {
        self.distance_km(other) / KM_PER_MILE
    }
}

impl fmt::Display for GeographicPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
