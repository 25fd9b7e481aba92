//! Universal Transverse Mercator references on WGS84.
//!
//! Zones are 6° wide, numbered eastward from 180°W. Latitude bands are 8°
//! tall, lettered C..X northward from 80°S (skipping I and O), except X
//! which runs from 72°N to 84°N. Zone numbers follow the Norway and
//! Svalbard exceptions.

use std::fmt;

use super::geographic::GeographicPosition;
use super::ToGeographic;
use crate::datum::DatumId;
use crate::error::GridError;
use crate::proj::transverse_mercator::TransverseMercator;
use crate::proj::Projection;

pub const MIN_LATITUDE: f64 = -80.0;
pub const MAX_LATITUDE: f64 = 84.0;

const MAX_EASTING: f64 = 1_000_000.0;
const MAX_NORTHING: f64 = 10_000_000.0;

/// A UTM reference: zone, latitude band, easting and northing in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UtmRef {
    zone: u8,
    band: char,
    easting: f64,
    northing: f64,
}

impl UtmRef {
    /// Zone 1..=60, band C..=X without I/O, easting in [0, 1e6], northing
    /// in [0, 1e7].
    ///
    /// A valid easting does not make the reference well-formed: the usable
    /// easting range narrows with latitude and is not checked.
    pub fn new(zone: u8, band: char, easting: f64, northing: f64) -> Result<Self, GridError> {
        if !(1..=60).contains(&zone) {
            return Err(GridError::NotDefinedOnUtmGrid(format!(
                "Longitude zone ({zone}) is not defined on the UTM grid."
            )));
        }
        if !is_valid_band(band) {
            return Err(GridError::NotDefinedOnUtmGrid(format!(
                "Latitude zone ({band}) is not defined on the UTM grid."
            )));
        }
        if !(0.0..=MAX_EASTING).contains(&easting) {
            return Err(GridError::NotDefinedOnUtmGrid(format!(
                "Easting ({easting}) is not defined on the UTM grid."
            )));
        }
        if !(0.0..=MAX_NORTHING).contains(&northing) {
            return Err(GridError::NotDefinedOnUtmGrid(format!(
                "Northing ({northing}) is not defined on the UTM grid."
            )));
        }
        Ok(Self {
            zone,
            band,
            easting,
            northing,
        })
    }

    /// Project a position, shifting it onto WGS84 first.
    ///
    /// Fails with `NotDefinedOnUtmGrid` outside [-80°, 84°] latitude.
    pub fn from_geographic(position: &GeographicPosition) -> Result<Self, GridError> {
        let position = position.to_wgs84();
        let latitude = position.latitude();
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(GridError::NotDefinedOnUtmGrid(format!(
                "Latitude ({latitude}) falls outside the UTM grid."
            )));
        }

        let mut longitude = position.longitude();
        if longitude == 180.0 {
            longitude = -180.0;
        }

        let zone = longitude_zone(latitude, longitude);
        let band = latitude_band(latitude);
        let (easting, northing) = TransverseMercator::utm_zone(zone, latitude >= 0.0)
            .forward(longitude.to_radians(), latitude.to_radians())?;

        Self::new(zone, band, easting, northing)
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn band(&self) -> char {
        self.band
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Bands below N lie in the southern hemisphere.
    pub fn is_northern(&self) -> bool {
        self.band >= 'N'
    }
}

impl ToGeographic for UtmRef {
    fn to_geographic(&self) -> Result<GeographicPosition, GridError> {
        let (lon, lat) = TransverseMercator::utm_zone(self.zone, self.is_northern())
            .inverse(self.easting, self.northing)?;
        Ok(GeographicPosition::from_radians(lon, lat, 0.0, DatumId::Wgs84))
    }

    fn datum(&self) -> DatumId {
        DatumId::Wgs84
    }
}

impl fmt::Display for UtmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {} {}",
            self.zone,
            self.band,
            self.easting.trunc(),
            self.northing.trunc()
        )
    }
}

fn is_valid_band(band: char) -> bool {
    ('C'..='X').contains(&band) && band != 'I' && band != 'O'
}

/// Longitude zone for a position, including the Norway (32V) and Svalbard
/// (31X, 33X, 35X, 37X) exceptions. Longitude 180 falls in zone 1.
pub fn longitude_zone(latitude: f64, longitude: f64) -> u8 {
    let longitude = if longitude >= 180.0 { longitude - 360.0 } else { longitude };
    let mut zone = ((longitude + 180.0) / 6.0).floor() as u8 + 1;

    if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
        zone = 32;
    }

    if (72.0..84.0).contains(&latitude) {
        zone = match longitude {
            l if (0.0..9.0).contains(&l) => 31,
            l if (9.0..21.0).contains(&l) => 33,
            l if (21.0..33.0).contains(&l) => 35,
            l if (33.0..42.0).contains(&l) => 37,
            _ => zone,
        };
    }

    zone
}

/// Latitude band letter, or 'Z' outside [-80, 84].
pub fn latitude_band(latitude: f64) -> char {
    const BANDS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";

    if (72.0..=84.0).contains(&latitude) {
        return 'X';
    }
    if !(-80.0..72.0).contains(&latitude) {
        return 'Z';
    }
    let index = ((latitude + 80.0) / 8.0).floor() as usize;
    char::from(BANDS[index.min(BANDS.len() - 1)])
}
