//! Coordinate references: geographic, ECEF and the projected grids.
//!
//! Every reference type converts to a [`GeographicPosition`] on its own
//! datum; [`Coordinate`] closes the set so any reference can be handled
//! uniformly.

pub mod ecef;
pub mod geographic;
pub mod irish;
pub mod mgrs;
pub mod osgb;
pub mod utm;

use std::fmt;

use crate::datum::DatumId;
use crate::error::GridError;

pub use ecef::EcefRef;
pub use geographic::GeographicPosition;
pub use irish::IrishRef;
pub use mgrs::{MgrsPrecision, MgrsRef};
pub use osgb::OsRef;
pub use utm::UtmRef;

/// Conversion back to latitude/longitude.
pub trait ToGeographic {
    /// The equivalent position on [`ToGeographic::datum`].
    fn to_geographic(&self) -> Result<GeographicPosition, GridError>;

    /// The datum this reference is expressed on.
    fn datum(&self) -> DatumId;
}

/// Any supported coordinate reference.
#[derive(Clone, Debug, PartialEq)]
pub enum Coordinate {
    Geographic(GeographicPosition),
    Ecef(EcefRef),
    Osgb(OsRef),
    Irish(IrishRef),
    Utm(UtmRef),
    Mgrs(MgrsRef),
}

impl ToGeographic for Coordinate {
    fn to_geographic(&self) -> Result<GeographicPosition, GridError> {
        match self {
            Coordinate::Geographic(p) => Ok(*p),
            Coordinate::Ecef(c) => c.to_geographic(),
            Coordinate::Osgb(c) => c.to_geographic(),
            Coordinate::Irish(c) => c.to_geographic(),
            Coordinate::Utm(c) => c.to_geographic(),
            Coordinate::Mgrs(c) => c.to_geographic(),
        }
    }

    fn datum(&self) -> DatumId {
        match self {
            Coordinate::Geographic(p) => p.datum(),
            Coordinate::Ecef(c) => c.datum(),
            Coordinate::Osgb(c) => c.datum(),
            Coordinate::Irish(c) => c.datum(),
            Coordinate::Utm(c) => c.datum(),
            Coordinate::Mgrs(c) => c.datum(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Geographic(p) => p.fmt(f),
            Coordinate::Ecef(c) => c.fmt(f),
            Coordinate::Osgb(c) => c.fmt(f),
            Coordinate::Irish(c) => c.fmt(f),
            Coordinate::Utm(c) => c.fmt(f),
            Coordinate::Mgrs(c) => c.fmt(f),
        }
    }
}

macro_rules! impl_from_ref {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Coordinate {
                fn from(value: $ty) -> Self {
                    Coordinate::$variant(value)
                }
            }
        )*
    };
}

impl_from_ref! {
    GeographicPosition => Geographic,
    EcefRef => Ecef,
    OsRef => Osgb,
    IrishRef => Irish,
    UtmRef => Utm,
    MgrsRef => Mgrs,
}

// 100 km square lettering shared by the British and Irish grids.

/// Letter for column `col` (west to east) and row `row` (south to north)
/// of a 5×5 block.
fn square_letter(col: u32, row: u32) -> char {
    let mut index = 65 + (4 - row) * 5 + col;
    if index >= 73 {
        index += 1;
    }
    char::from_u32(index).unwrap_or('?')
}

/// (easting, northing) offset in metres of a square letter within its block.
fn square_offset(letter: u8) -> (f64, f64) {
    let mut ord = letter;
    if ord > b'I' {
        ord -= 1;
    }
    let index = f64::from(ord - b'A');
    ((index % 5.0) * 100_000.0, (4.0 - (index / 5.0).floor()) * 100_000.0)
}

/// Three-digit hundreds of metres within a 100 km square, truncated.
fn hundred_metre_digits(easting_offset: f64, northing_offset: f64) -> (String, String) {
    let digits = |offset: f64| format!("{:03}", ((offset / 100.0).floor() as u32).min(999));
    (digits(easting_offset), digits(northing_offset))
}

fn parse_hundreds(digits: &str) -> Result<f64, GridError> {
    digits
        .parse::<u32>()
        .map(|v| f64::from(v) * 100.0)
        .map_err(|e| GridError::InvalidArgument(format!("Digits ({digits}) are invalid: {e}")))
}
