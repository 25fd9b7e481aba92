//! Irish Grid (Ireland 1965 / Modified Airy).
//!
//! A single letter names each 100 km square, laid out like the second
//! letter of the British grid: 5×5, row-major from the north-west, no I.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use super::geographic::GeographicPosition;
use super::{square_letter, square_offset, ToGeographic};
use crate::datum::DatumId;
use crate::error::GridError;
use crate::proj::ellipsoid::EllipsoidId;
use crate::proj::transverse_mercator::TransverseMercator;
use crate::proj::Projection;

pub const IRISH_SCALE_FACTOR: f64 = 1.000_035;
pub const IRISH_ORIGIN_LATITUDE: f64 = 53.5;
pub const IRISH_ORIGIN_LONGITUDE: f64 = -8.0;
pub const IRISH_FALSE_EASTING: f64 = 200_000.0;
pub const IRISH_FALSE_NORTHING: f64 = 250_000.0;

const MAX_EASTING: f64 = 400_000.0;
const MAX_NORTHING: f64 = 500_000.0;

lazy_static! {
    static ref SIX_FIGURE: Regex = Regex::new(r"^([A-HJ-Z])(\d{3})(\d{3})$").unwrap();
}

/// An Irish Grid reference in metres. Always on Ireland 1965.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IrishRef {
    easting: f64,
    northing: f64,
}

impl IrishRef {
    /// Easting in [0, 400000), northing in [0, 500000].
    pub fn new(easting: f64, northing: f64) -> Result<Self, GridError> {
        if !(0.0..MAX_EASTING).contains(&easting) {
            return Err(GridError::InvalidArgument(format!(
                "Easting ({easting}) is invalid. \
                 Must be greater than or equal to 0.0 and less than {MAX_EASTING}."
            )));
        }
        if !(0.0..=MAX_NORTHING).contains(&northing) {
            return Err(GridError::InvalidArgument(format!(
                "Northing ({northing}) is invalid. \
                 Must be greater than or equal to 0.0 and less than or equal to {MAX_NORTHING}."
            )));
        }
        Ok(Self { easting, northing })
    }

    pub fn projection() -> Result<TransverseMercator<'static>, GridError> {
        Ok(TransverseMercator::new(
            EllipsoidId::ModifiedAiry.ellipsoid(),
            IRISH_ORIGIN_LONGITUDE.to_radians(),
            IRISH_ORIGIN_LATITUDE.to_radians(),
            IRISH_SCALE_FACTOR,
            IRISH_FALSE_EASTING,
            IRISH_FALSE_NORTHING,
        )?)
    }

    /// Project a position, shifting it onto Ireland 1965 first.
    pub fn from_geographic(position: &GeographicPosition) -> Result<Self, GridError> {
        let (lon, lat) = position.to_datum(DatumId::Ireland1965).to_radians();
        let (easting, northing) = Self::projection()?.forward(lon, lat)?;
        Self::new(easting, northing)
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Six-figure form such as "O158347". The northern edge
    /// (northing 500000) folds into the top row of squares.
    pub fn to_six_figure_string(&self) -> String {
        let hundred_km_e = (self.easting / 100_000.0).floor() as u32;
        let hundred_km_n = ((self.northing / 100_000.0).floor() as u32).min(4);
        let letter = square_letter(hundred_km_e, hundred_km_n);

        let (e, n) = super::hundred_metre_digits(
            self.easting - 100_000.0 * f64::from(hundred_km_e),
            self.northing - 100_000.0 * f64::from(hundred_km_n),
        );
        format!("{letter}{e}{n}")
    }
}

impl FromStr for IrishRef {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = SIX_FIGURE.captures(s).ok_or_else(|| {
            GridError::InvalidArgument(format!(
                "Grid reference ({s}) is invalid. Expected one letter and six digits, e.g. O158347."
            ))
        })?;

        let (square_e, square_n) = square_offset(caps[1].as_bytes()[0]);
        let easting = square_e + super::parse_hundreds(&caps[2])?;
        let northing = square_n + super::parse_hundreds(&caps[3])?;
        Self::new(easting, northing)
    }
}

impl ToGeographic for IrishRef {
    fn to_geographic(&self) -> Result<GeographicPosition, GridError> {
        let (lon, lat) = Self::projection()?.inverse(self.easting, self.northing)?;
        Ok(GeographicPosition::from_radians(lon, lat, 0.0, DatumId::Ireland1965))
    }

    fn datum(&self) -> DatumId {
        DatumId::Ireland1965
    }
}

impl fmt::Display for IrishRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.easting, self.northing)
    }
}
