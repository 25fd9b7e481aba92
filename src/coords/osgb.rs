//! Ordnance Survey National Grid of Great Britain (OSGB36 / Airy 1830).
//!
//! 100 km squares are named by two letters. The first picks a 500 km block
//! (S, T, N, O, H, J); the second picks the 100 km square within it from a
//! 5×5 table laid out row-major from the north-west corner, skipping I.

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

pub const OSGB_SCALE_FACTOR: f64 = 0.999_601_271_7;
pub const OSGB_ORIGIN_LATITUDE: f64 = 49.0;
pub const OSGB_ORIGIN_LONGITUDE: f64 = -2.0;
pub const OSGB_FALSE_EASTING: f64 = 400_000.0;
pub const OSGB_FALSE_NORTHING: f64 = -100_000.0;

const MAX_EASTING: f64 = 800_000.0;
const MAX_NORTHING: f64 = 1_400_000.0;

lazy_static! {
    static ref SIX_FIGURE: Regex = Regex::new(r"^([HJNOST])([A-HJ-Z])(\d{3})(\d{3})$").unwrap();
}

/// A British National Grid reference in metres. Always on OSGB36.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OsRef {
    easting: f64,
    northing: f64,
}

impl OsRef {
    /// Easting in [0, 800000), northing in [0, 1400000).
    pub fn new(easting: f64, northing: f64) -> Result<Self, GridError> {
        if !(0.0..MAX_EASTING).contains(&easting) {
            return Err(GridError::InvalidArgument(format!(
                "Easting ({easting}) is invalid. \
                 Must be greater than or equal to 0.0 and less than {MAX_EASTING}."
            )));
        }
        if !(0.0..MAX_NORTHING).contains(&northing) {
            return Err(GridError::InvalidArgument(format!(
                "Northing ({northing}) is invalid. \
                 Must be greater than or equal to 0.0 and less than {MAX_NORTHING}."
            )));
        }
        Ok(Self { easting, northing })
    }

    /// The National Grid projection on Airy 1830.
    pub fn projection() -> Result<TransverseMercator<'static>, GridError> {
        Ok(TransverseMercator::new(
            EllipsoidId::Airy1830.ellipsoid(),
            OSGB_ORIGIN_LONGITUDE.to_radians(),
            OSGB_ORIGIN_LATITUDE.to_radians(),
            OSGB_SCALE_FACTOR,
            OSGB_FALSE_EASTING,
            OSGB_FALSE_NORTHING,
        )?)
    }

    /// Project a position, shifting it onto OSGB36 first.
    pub fn from_geographic(position: &GeographicPosition) -> Result<Self, GridError> {
        let (lon, lat) = position.to_datum(DatumId::Osgb36).to_radians();
        let (easting, northing) = Self::projection()?.forward(lon, lat)?;
        Self::new(easting, northing)
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Six-figure form such as "TG514131": 100 m resolution, truncated.
    pub fn to_six_figure_string(&self) -> String {
        let hundred_km_e = (self.easting / 100_000.0).floor() as u32;
        let hundred_km_n = (self.northing / 100_000.0).floor() as u32;

        let first = match (hundred_km_n, hundred_km_e) {
            (0..=4, 0..=4) => 'S',
            (0..=4, _) => 'T',
            (5..=9, 0..=4) => 'N',
            (5..=9, _) => 'O',
            (_, 0..=4) => 'H',
            _ => 'J',
        };
        let second = square_letter(hundred_km_e % 5, hundred_km_n % 5);

        let (e, n) = super::hundred_metre_digits(
            self.easting - 100_000.0 * f64::from(hundred_km_e),
            self.northing - 100_000.0 * f64::from(hundred_km_n),
        );
        format!("{first}{second}{e}{n}")
    }
}

impl FromStr for OsRef {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = SIX_FIGURE.captures(s).ok_or_else(|| {
            GridError::InvalidArgument(format!(
                "Grid reference ({s}) is invalid. \
                 Expected two letters and six digits, e.g. TG514131."
            ))
        })?;

        let (mut easting, mut northing) = match &caps[1] {
            "H" => (0.0, 1_000_000.0),
            "J" => (500_000.0, 1_000_000.0),
            "N" => (0.0, 500_000.0),
            "O" => (500_000.0, 500_000.0),
            "T" => (500_000.0, 0.0),
            _ => (0.0, 0.0),
        };

        let (square_e, square_n) = square_offset(caps[2].as_bytes()[0]);
        easting += square_e + super::parse_hundreds(&caps[3])?;
        northing += square_n + super::parse_hundreds(&caps[4])?;

        Self::new(easting, northing)
    }
}

impl ToGeographic for OsRef {
    fn to_geographic(&self) -> Result<GeographicPosition, GridError> {
        let (lon, lat) = Self::projection()?.inverse(self.easting, self.northing)?;
        Ok(GeographicPosition::from_radians(lon, lat, 0.0, DatumId::Osgb36))
    }

    fn datum(&self) -> DatumId {
        DatumId::Osgb36
    }
}

impl fmt::Display for OsRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.easting, self.northing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_worked_example_from_osgb36() {
        // 52°39'27.2531"N 1°43'4.5177"E on OSGB36
        let lat = 52.0 + 39.0 / 60.0 + 27.2531 / 3600.0;
        let lon = 1.0 + 43.0 / 60.0 + 4.5177 / 3600.0;
        let p = GeographicPosition::with_datum(lat, lon, 0.0, DatumId::Osgb36).unwrap();
        let os = OsRef::from_geographic(&p).unwrap();
        assert_relative_eq!(os.easting(), 651_409.903, epsilon = 0.001);
        assert_relative_eq!(os.northing(), 313_177.270, epsilon = 0.001);
    }

    #[test]
    fn test_from_wgs84() {
        let p = GeographicPosition::new(52.65798, 1.71605).unwrap();
        let os = OsRef::from_geographic(&p).unwrap();
        assert_relative_eq!(os.easting(), 651_409.9, epsilon = 1.0);
        assert_relative_eq!(os.northing(), 313_177.3, epsilon = 1.0);
    }

    #[test]
    fn test_to_geographic_is_on_osgb36() {
        let os = OsRef::new(651_409.903, 313_177.270).unwrap();
        let p = os.to_geographic().unwrap();
        assert_eq!(p.datum(), DatumId::Osgb36);
        assert_relative_eq!(p.latitude(), 52.657_570_3, epsilon = 1e-7);
        assert_relative_eq!(p.longitude(), 1.717_921_6, epsilon = 1e-7);
    }

    #[test]
    fn test_bounds() {
        assert!(OsRef::new(-0.1, 0.0).is_err());
        assert!(OsRef::new(800_000.0, 0.0).is_err());
        assert!(OsRef::new(0.0, 1_400_000.0).is_err());
        assert!(OsRef::new(799_999.9, 1_399_999.9).is_ok());
    }

    #[test]
    fn test_outside_great_britain_fails() {
        let sydney = GeographicPosition::new(-33.86, 151.21).unwrap();
        assert!(OsRef::from_geographic(&sydney).is_err());
    }

    #[test]
    fn test_six_figure_string() {
        let os = OsRef::new(651_409.903, 313_177.270).unwrap();
        assert_eq!(os.to_six_figure_string(), "TG514131");
        assert_eq!(OsRef::new(12_345.0, 1_007_890.0).unwrap().to_six_figure_string(), "HV123078");
        assert_eq!(OsRef::new(400_000.0, 100_000.0).unwrap().to_six_figure_string(), "SU000000");
    }

    #[test]
    fn test_parse_six_figure() {
        let os: OsRef = "TG514131".parse().unwrap();
        assert_relative_eq!(os.easting(), 651_400.0);
        assert_relative_eq!(os.northing(), 313_100.0);

        let os: OsRef = "NN166712".parse().unwrap();
        assert_relative_eq!(os.easting(), 216_600.0);
        assert_relative_eq!(os.northing(), 771_200.0);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("TG51413".parse::<OsRef>().is_err());
        assert!("XG514131".parse::<OsRef>().is_err());
        assert!("TI514131".parse::<OsRef>().is_err());
        assert!("tg514131".parse::<OsRef>().is_err());
        // Outside the 800 km × 1400 km box
        assert!("JZ000000".parse::<OsRef>().is_err());
    }

    #[test]
    fn test_string_roundtrip() {
        for s in ["SV000000", "TQ300800", "NT250730", "HU450400", "SW999999"] {
            let os: OsRef = s.parse().unwrap();
            assert_eq!(os.to_six_figure_string(), s);
        }
    }

    #[test]
    fn test_display() {
        let os = OsRef::new(651_409.5, 313_177.0).unwrap();
        assert_eq!(os.to_string(), "(651409.5, 313177)");
    }
}
