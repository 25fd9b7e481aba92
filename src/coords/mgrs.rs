//! Military Grid Reference System, layered on UTM.
//!
//! A reference such as `31UDQ4825111932` is the UTM zone and band, two
//! letters naming the 100 km square, then equal-length easting and northing
//! digits within that square.
//!
//! Column letters cycle through three sets of eight (A-H, J-R, S-Z) as the
//! zone number advances. Row letters run A-V (no I/O) and repeat every
//! 2000 km of northing, offset by five rows in even-numbered zone sets. The
//! Bessel lettering used with older ellipsoids shifts rows by a further ten.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use strum::EnumIter;

use super::geographic::GeographicPosition;
use super::utm::UtmRef;
use super::ToGeographic;
use crate::datum::DatumId;
use crate::error::GridError;

const ROW_LETTERS: &[u8; 20] = b"ABCDEFGHJKLMNPQRSTUV";
const SQUARE: f64 = 100_000.0;
const ROW_CYCLE: f64 = 2_000_000.0;

lazy_static! {
    static ref MGRS: Regex = Regex::new(r"^(\d{1,2})([A-Z])([A-Z])([A-Z])(\d{2,10})$").unwrap();
}

/// Resolution of the easting/northing digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum MgrsPrecision {
    OneMetre,
    TenMetres,
    HundredMetres,
    OneKilometre,
    TenKilometres,
}

impl MgrsPrecision {
    pub fn metres(self) -> u32 {
        match self {
            Self::OneMetre => 1,
            Self::TenMetres => 10,
            Self::HundredMetres => 100,
            Self::OneKilometre => 1_000,
            Self::TenKilometres => 10_000,
        }
    }

    /// Digits written for each of easting and northing.
    pub fn digits(self) -> usize {
        match self {
            Self::OneMetre => 5,
            Self::TenMetres => 4,
            Self::HundredMetres => 3,
            Self::OneKilometre => 2,
            Self::TenKilometres => 1,
        }
    }

    fn from_digits(digits: usize) -> Option<Self> {
        match digits {
            5 => Some(Self::OneMetre),
            4 => Some(Self::TenMetres),
            3 => Some(Self::HundredMetres),
            2 => Some(Self::OneKilometre),
            1 => Some(Self::TenKilometres),
            _ => None,
        }
    }
}

/// Row-letter scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MgrsLettering {
    /// The "AA" pattern used with WGS84 and most modern ellipsoids.
    #[default]
    Standard,
    /// The "AL" pattern used with Bessel 1841 and the Clarke ellipsoids.
    Bessel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MgrsRef {
    zone: u8,
    band: char,
    easting_id: char,
    northing_id: char,
    easting: u32,
    northing: u32,
    precision: MgrsPrecision,
    lettering: MgrsLettering,
}

impl MgrsRef {
    /// Build from parts; `easting` and `northing` are metres within the
    /// 100 km square (0..=99999).
    pub fn new(
        zone: u8,
        band: char,
        easting_id: char,
        northing_id: char,
        easting: u32,
        northing: u32,
        precision: MgrsPrecision,
    ) -> Result<Self, GridError> {
        if !(1..=60).contains(&zone) {
            return Err(GridError::InvalidArgument(format!("Invalid UTM zone number ({zone})")));
        }
        if !('C'..='X').contains(&band) || band == 'I' || band == 'O' {
            return Err(GridError::InvalidArgument(format!("Invalid UTM zone letter ({band})")));
        }
        for (what, id) in [("easting", easting_id), ("northing", northing_id)] {
            if !id.is_ascii_uppercase() || id == 'I' || id == 'O' {
                return Err(GridError::InvalidArgument(format!("Invalid {what} ID ({id})")));
            }
        }
        if easting > 99_999 {
            return Err(GridError::InvalidArgument(format!("Invalid easting ({easting})")));
        }
        if northing > 99_999 {
            return Err(GridError::InvalidArgument(format!("Invalid northing ({northing})")));
        }
        Ok(Self {
            zone,
            band,
            easting_id,
            northing_id,
            easting,
            northing,
            precision,
            lettering: MgrsLettering::Standard,
        })
    }

    pub fn with_lettering(mut self, lettering: MgrsLettering) -> Self {
        self.lettering = lettering;
        self
    }

    /// Encode a UTM reference with the standard lettering at 1 m.
    pub fn from_utm(utm: &UtmRef) -> Result<Self, GridError> {
        Self::from_utm_with(utm, MgrsLettering::Standard)
    }

    /// Encode a UTM reference at 1 m. Easting and northing are rounded to
    /// the metre before the square letters are chosen.
    pub fn from_utm_with(utm: &UtmRef, lettering: MgrsLettering) -> Result<Self, GridError> {
        let zone = utm.zone();
        let set = zone_set(zone);
        let easting = utm.easting().round();
        let northing = utm.northing().round();

        let column = (easting / SQUARE).floor() as u32;
        if !(1..=8).contains(&column) {
            return Err(GridError::InvalidArgument(format!(
                "Easting ({easting}) lies outside the MGRS 100 km columns"
            )));
        }
        let mut e_id = column + 8 * ((set - 1) % 3);
        if e_id > 8 {
            e_id += 1;
        }
        if e_id > 14 {
            e_id += 1;
        }
        let easting_id = char::from(b'@' + e_id as u8);

        let mut n_id = ((northing % ROW_CYCLE) / SQUARE).floor() as u32;
        if set % 2 == 0 {
            n_id += 5;
        }
        if lettering == MgrsLettering::Bessel {
            n_id += 10;
        }
        let northing_id = char::from(ROW_LETTERS[(n_id % 20) as usize]);

        Ok(Self {
            zone,
            band: utm.band(),
            easting_id,
            northing_id,
            easting: (easting % SQUARE) as u32,
            northing: (northing % SQUARE) as u32,
            precision: MgrsPrecision::OneMetre,
            lettering,
        })
    }

    /// Project a position through UTM (WGS84).
    pub fn from_geographic(position: &GeographicPosition) -> Result<Self, GridError> {
        Self::from_utm(&UtmRef::from_geographic(position)?)
    }

    /// Parse with an explicit row lettering.
    pub fn parse_with(s: &str, lettering: MgrsLettering) -> Result<Self, GridError> {
        let invalid = || GridError::InvalidArgument(format!("Invalid MGRS reference ({s})"));
        let caps = MGRS.captures(s).ok_or_else(invalid)?;

        let zone: u8 = caps[1].parse().map_err(|_| invalid())?;
        let letter = |i: usize| char::from(caps[i].as_bytes()[0]);

        let digits = &caps[5];
        if digits.len() % 2 != 0 {
            return Err(invalid());
        }
        let half = digits.len() / 2;
        let precision = MgrsPrecision::from_digits(half).ok_or_else(invalid)?;
        let scale = precision.metres();
        let easting: u32 = digits[..half].parse().map_err(|_| invalid())?;
        let northing: u32 = digits[half..].parse().map_err(|_| invalid())?;

        Ok(Self::new(
            zone,
            letter(2),
            letter(3),
            letter(4),
            easting * scale,
            northing * scale,
            precision,
        )?
        .with_lettering(lettering))
    }

    /// Decode to UTM, resolving the 2000 km row ambiguity against the
    /// latitude band's minimum northing.
    pub fn to_utm(&self) -> Result<UtmRef, GridError> {
        let set = zone_set(self.zone);

        let mut e = u32::from(self.easting_id as u8 - b'A');
        if e >= 15 {
            e -= 1;
        }
        if e >= 9 {
            e -= 1;
        }
        if e / 8 != (set - 1) % 3 {
            return Err(GridError::InvalidArgument(format!(
                "Easting ID ({}) is not used in zone {}",
                self.easting_id, self.zone
            )));
        }
        let easting = (f64::from(self.easting) + f64::from(e % 8 + 1) * SQUARE) % 1_000_000.0;

        let row = ROW_LETTERS
            .iter()
            .position(|&c| char::from(c) == self.northing_id)
            .ok_or_else(|| {
                GridError::InvalidArgument(format!("Invalid northing ID ({})", self.northing_id))
            })?;

        let false_northing = match (self.lettering, set % 2 == 0) {
            (MgrsLettering::Standard, true) => 1_500_000.0,
            (MgrsLettering::Standard, false) => 0.0,
            (MgrsLettering::Bessel, true) => 500_000.0,
            (MgrsLettering::Bessel, false) => 1_000_000.0,
        };
        let mut grid_northing = (row as f64 * SQUARE + false_northing) % ROW_CYCLE;

        let min_northing = band_min_northing(self.band)?;
        grid_northing -= min_northing % ROW_CYCLE;
        if grid_northing < 0.0 {
            grid_northing += ROW_CYCLE;
        }
        let northing = min_northing + grid_northing + f64::from(self.northing);

        UtmRef::new(self.zone, self.band, easting, northing)
    }

    pub fn to_string_with_precision(&self, precision: MgrsPrecision) -> String {
        let scale = precision.metres();
        let width = precision.digits();
        format!(
            "{:02}{}{}{}{:0width$}{:0width$}",
            self.zone,
            self.band,
            self.easting_id,
            self.northing_id,
            self.easting / scale,
            self.northing / scale,
        )
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn band(&self) -> char {
        self.band
    }

    pub fn easting_id(&self) -> char {
        self.easting_id
    }

    pub fn northing_id(&self) -> char {
        self.northing_id
    }

    /// Metres east within the 100 km square.
    pub fn easting(&self) -> u32 {
        self.easting
    }

    /// Metres north within the 100 km square.
    pub fn northing(&self) -> u32 {
        self.northing
    }

    pub fn precision(&self) -> MgrsPrecision {
        self.precision
    }

    pub fn lettering(&self) -> MgrsLettering {
        self.lettering
    }

    pub fn is_bessel(&self) -> bool {
        self.lettering == MgrsLettering::Bessel
    }
}

/// Zone set 1..=6.
fn zone_set(zone: u8) -> u32 {
    (u32::from(zone) - 1) % 6 + 1
}

/// Smallest UTM northing that falls in a latitude band.
fn band_min_northing(band: char) -> Result<f64, GridError> {
    let min = match band {
        'C' => 1_100_000.0,
        'D' => 2_000_000.0,
        'E' => 2_800_000.0,
        'F' => 3_700_000.0,
        'G' => 4_600_000.0,
        'H' => 5_500_000.0,
        'J' => 6_400_000.0,
        'K' => 7_300_000.0,
        'L' => 8_200_000.0,
        'M' => 9_100_000.0,
        'N' => 0.0,
        'P' => 800_000.0,
        'Q' => 1_700_000.0,
        'R' => 2_600_000.0,
        'S' => 3_500_000.0,
        'T' => 4_400_000.0,
        'U' => 5_300_000.0,
        'V' => 6_200_000.0,
        'W' => 7_000_000.0,
        'X' => 7_900_000.0,
        _ => {
            return Err(GridError::NotDefinedOnUtmGrid(format!(
                "Latitude zone ({band}) is not defined on the UTM grid."
            )))
        }
    };
    Ok(min)
}

impl FromStr for MgrsRef {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, MgrsLettering::Standard)
    }
}

impl ToGeographic for MgrsRef {
    fn to_geographic(&self) -> Result<GeographicPosition, GridError> {
        self.to_utm()?.to_geographic()
    }

    fn datum(&self) -> DatumId {
        DatumId::Wgs84
    }
}

impl fmt::Display for MgrsRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_precision(self.precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_decode_eiffel_square() {
        let mgrs =
            MgrsRef::new(31, 'U', 'D', 'Q', 48_251, 11_932, MgrsPrecision::OneMetre).unwrap();
        let utm = mgrs.to_utm().unwrap();
        assert_eq!((utm.zone(), utm.band()), (31, 'U'));
        assert_relative_eq!(utm.easting(), 448_251.0);
        assert_relative_eq!(utm.northing(), 5_411_932.0);

        let p = mgrs.to_geographic().unwrap();
        assert_relative_eq!(p.latitude(), 48.858_194, epsilon = 1e-5);
        assert_relative_eq!(p.longitude(), 2.294_489, epsilon = 1e-5);
    }

    #[test]
    fn test_encode_eiffel_tower() {
        let utm = UtmRef::new(31, 'U', 448_251.898, 5_411_943.794).unwrap();
        let mgrs = MgrsRef::from_utm(&utm).unwrap();
        assert_eq!((mgrs.easting_id(), mgrs.northing_id()), ('D', 'Q'));
        assert_eq!((mgrs.easting(), mgrs.northing()), (48_252, 11_944));
        assert_eq!(mgrs.to_string(), "31UDQ4825211944");
    }

    #[test]
    fn test_precision_strings() {
        let mgrs: MgrsRef = "31UDQ4825111932".parse().unwrap();
        assert_eq!(mgrs.to_string_with_precision(MgrsPrecision::TenMetres), "31UDQ48251193");
        assert_eq!(mgrs.to_string_with_precision(MgrsPrecision::HundredMetres), "31UDQ482119");
        assert_eq!(mgrs.to_string_with_precision(MgrsPrecision::OneKilometre), "31UDQ4811");
        assert_eq!(mgrs.to_string_with_precision(MgrsPrecision::TenKilometres), "31UDQ41");
    }

    #[test]
    fn test_parse_precision_and_padding() {
        let mgrs: MgrsRef = "4QFJ1234".parse().unwrap();
        assert_eq!(mgrs.zone(), 4);
        assert_eq!(mgrs.precision(), MgrsPrecision::OneKilometre);
        assert_eq!((mgrs.easting(), mgrs.northing()), (12_000, 34_000));
        assert_eq!(mgrs.to_string(), "04QFJ1234");

        let mgrs: MgrsRef = "04QFJ0102".parse().unwrap();
        assert_eq!(mgrs.to_string(), "04QFJ0102");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for s in [
            "31UDQ482511193",  // odd digit count
            "31UDQ4",          // too few digits
            "31UDQ48251119321", // too many digits
            "31uDQ48251119",
            "31UIQ4825111932", // I is never a square letter
            "61UDQ4825111932",
            "31ADQ4825111932",
            "31UDQ4825111932 ",
        ] {
            assert!(s.parse::<MgrsRef>().is_err(), "{s}");
        }
    }

    #[test]
    fn test_new_validates() {
        use MgrsPrecision::OneMetre;
        assert!(MgrsRef::new(0, 'U', 'D', 'Q', 0, 0, OneMetre).is_err());
        assert!(MgrsRef::new(31, 'O', 'D', 'Q', 0, 0, OneMetre).is_err());
        assert!(MgrsRef::new(31, 'U', 'O', 'Q', 0, 0, OneMetre).is_err());
        assert!(MgrsRef::new(31, 'U', 'D', 'I', 0, 0, OneMetre).is_err());
        assert!(MgrsRef::new(31, 'U', 'D', 'Q', 100_000, 0, OneMetre).is_err());
        assert!(MgrsRef::new(31, 'U', 'D', 'Q', 0, 100_000, OneMetre).is_err());
        assert!(MgrsRef::new(31, 'U', 'D', 'Q', 99_999, 99_999, OneMetre).is_ok());
    }

    #[test]
    fn test_column_letter_must_match_zone_set() {
        // Zone 31 is set 1: columns A-H only
        let mgrs: MgrsRef = "31UKQ4825111932".parse().unwrap();
        assert!(mgrs.to_utm().is_err());
    }

    #[test]
    fn test_roundtrip_all_zone_sets() {
        // One point per zone set, both hemispheres
        for zone in 1..=6u8 {
            let lon = f64::from(zone) * 6.0 - 183.0 + 1.0;
            for lat in [-52.3, -9.0, 0.5, 38.7, 71.0] {
                let p = GeographicPosition::new(lat, lon).unwrap();
                let utm = UtmRef::from_geographic(&p).unwrap();
                let mgrs = MgrsRef::from_utm(&utm).unwrap();
                let back = mgrs.to_utm().unwrap();
                assert_eq!(back.zone(), utm.zone());
                assert_relative_eq!(back.easting(), utm.easting(), epsilon = 0.5);
                assert_relative_eq!(back.northing(), utm.northing(), epsilon = 0.5);
            }
        }
    }

    #[test]
    fn test_bessel_roundtrip() {
        for zone in [31u8, 32] {
            let utm = UtmRef::new(zone, 'U', 448_251.0, 5_411_932.0).unwrap();
            let standard = MgrsRef::from_utm(&utm).unwrap();
            let bessel = MgrsRef::from_utm_with(&utm, MgrsLettering::Bessel).unwrap();
            assert!(bessel.is_bessel());
            assert_ne!(standard.northing_id(), bessel.northing_id());
            assert_eq!(standard.easting_id(), bessel.easting_id());

            let back = bessel.to_utm().unwrap();
            assert_relative_eq!(back.northing(), 5_411_932.0);
            assert_relative_eq!(back.easting(), 448_251.0);

            let parsed = MgrsRef::parse_with(&bessel.to_string(), MgrsLettering::Bessel).unwrap();
            assert_eq!(parsed, bessel);
        }
    }

    #[test]
    fn test_reduced_precision_decodes_to_square_corner() {
        for precision in MgrsPrecision::iter() {
            let s = MgrsRef::from_str("31UDQ4825111932")
                .unwrap()
                .to_string_with_precision(precision);
            let utm = s.parse::<MgrsRef>().unwrap().to_utm().unwrap();
            let step = f64::from(precision.metres());
            assert!(utm.easting() <= 448_251.0 && 448_251.0 - utm.easting() < step);
            assert!(utm.northing() <= 5_411_932.0 && 5_411_932.0 - utm.northing() < step);
        }
    }
}
