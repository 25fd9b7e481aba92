//! Earth-centred, earth-fixed Cartesian coordinates.

use std::fmt;

use super::geographic::GeographicPosition;
use super::ToGeographic;
use crate::datum::DatumId;
use crate::error::GridError;

/// X, Y, Z in metres; the datum selects the ellipsoid used to convert
/// to and from geodetic coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EcefRef {
    x: f64,
    y: f64,
    z: f64,
    datum: DatumId,
}

impl EcefRef {
    /// A WGS84 ECEF point.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, GridError> {
        Self::with_datum(x, y, z, DatumId::Wgs84)
    }

    pub fn with_datum(x: f64, y: f64, z: f64, datum: DatumId) -> Result<Self, GridError> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(GridError::InvalidArgument(format!(
                "ECEF coordinates ({x}, {y}, {z}) must be finite"
            )));
        }
        Ok(Self { x, y, z, datum })
    }

    /// Convert on the position's own datum.
    pub fn from_geographic(position: &GeographicPosition) -> Self {
        let (lon, lat) = position.to_radians();
        let ellipsoid = position.datum().datum().ellipsoid();
        let (x, y, z) = ellipsoid.to_geocentric(lon, lat, position.height());
        Self {
            x,
            y,
            z,
            datum: position.datum(),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }
}

impl ToGeographic for EcefRef {
    fn to_geographic(&self) -> Result<GeographicPosition, GridError> {
        let ellipsoid = self.datum.datum().ellipsoid();
        let (lon, lat, height) = ellipsoid.to_geodetic(self.x, self.y, self.z);
        Ok(GeographicPosition::from_radians(lon, lat, height, self.datum))
    }

    fn datum(&self) -> DatumId {
        self.datum
    }
}

impl fmt::Display for EcefRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}
