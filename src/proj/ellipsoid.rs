//! Reference ellipsoids and the named ellipsoid catalog.
//!
//! An ellipsoid is fixed by its semi-major axis `a` plus either its semi-minor
//! axis `b` or its first eccentricity squared `e²`; the other is derived:
//!   b  = sqrt(a² · (1 - e²))
//!   e² = (a² - b²) / a²
//!   f  = (a - b) / a
//!
//! Named ellipsoids are built once, on first access, and handed out as
//! `&'static` references so every datum on the same ellipsoid shares it.

use std::fmt;

use lazy_static::lazy_static;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::debug;

use super::common::sin_squared;
use crate::error::GridError;

/// Reference ellipsoid parameters. Immutable once built.
#[derive(Debug, PartialEq)]
pub struct Ellipsoid {
    a: f64,
    b: f64,
    f: f64,
    e2: f64,
    ep2: f64,
    n: f64,
}

/// The second defining parameter of a catalog ellipsoid.
#[derive(Clone, Copy, Debug)]
enum Shape {
    SemiMinorAxis(f64),
    EccentricitySquared(f64),
}

impl Ellipsoid {
    /// Build an ellipsoid from `a` and at least one of `b` / `e²`.
    ///
    /// When both are given they are taken as-is; otherwise the missing one is
    /// derived from the other. Fails if neither is given or the result does
    /// not satisfy `a > b > 0`.
    pub fn new(
        semi_major_axis: f64,
        semi_minor_axis: Option<f64>,
        eccentricity_squared: Option<f64>,
    ) -> Result<Self, GridError> {
        let a = semi_major_axis;
        if !(a.is_finite() && a > 0.0) {
            return Err(GridError::InvalidArgument(format!(
                "Semi-major axis ({a}) must be finite and positive"
            )));
        }

        let ellipsoid = match (semi_minor_axis, eccentricity_squared) {
            (None, None) => {
                return Err(GridError::InvalidArgument(
                    "At least one of semi-minor axis and eccentricity squared must be defined"
                        .into(),
                ))
            }
            (Some(b), None) => Self::with_shape(a, Shape::SemiMinorAxis(b)),
            (None, Some(e2)) => Self::with_shape(a, Shape::EccentricitySquared(e2)),
            (Some(b), Some(e2)) => Self::from_parts(a, b, e2),
        };

        let e2 = ellipsoid.e2;
        if !(e2.is_finite() && e2 > 0.0 && e2 < 1.0) {
            return Err(GridError::InvalidArgument(format!(
                "Eccentricity squared ({e2}) must lie in (0, 1)"
            )));
        }

        if !(ellipsoid.b.is_finite() && ellipsoid.b > 0.0 && ellipsoid.b < a) {
            return Err(GridError::InvalidArgument(format!(
                "Semi-minor axis ({}) must satisfy 0 < b < a ({a})",
                ellipsoid.b
            )));
        }
        Ok(ellipsoid)
    }

    /// Build an ellipsoid from its two semi-axes.
    pub fn from_axes(semi_major_axis: f64, semi_minor_axis: f64) -> Result<Self, GridError> {
        Self::new(semi_major_axis, Some(semi_minor_axis), None)
    }

    fn with_shape(a: f64, shape: Shape) -> Self {
        match shape {
            Shape::SemiMinorAxis(b) => Self::from_parts(a, b, (a * a - b * b) / (a * a)),
            Shape::EccentricitySquared(e2) => Self::from_parts(a, (a * a * (1.0 - e2)).sqrt(), e2),
        }
    }

    fn from_parts(a: f64, b: f64, e2: f64) -> Self {
        Self {
            a,
            b,
            f: (a - b) / a,
            e2,
            ep2: (a * a - b * b) / (b * b),
            n: (a - b) / (a + b),
        }
    }

    /// Semi-major axis `a` (metres).
    pub fn semi_major_axis(&self) -> f64 {
        self.a
    }

    /// Semi-minor axis `b` (metres).
    pub fn semi_minor_axis(&self) -> f64 {
        self.b
    }

    /// Flattening `(a - b) / a`.
    pub fn flattening(&self) -> f64 {
        self.f
    }

    /// First eccentricity squared `e²`.
    pub fn eccentricity_squared(&self) -> f64 {
        self.e2
    }

    /// First eccentricity (computed at runtime).
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    /// Second eccentricity squared `e'² = (a² - b²) / b²`.
    pub fn second_eccentricity_squared(&self) -> f64 {
        self.ep2
    }

    /// Third flattening `n = (a - b) / (a + b)`.
    pub fn third_flattening(&self) -> f64 {
        self.n
    }

    /// Prime-vertical radius of curvature `ν = a / sqrt(1 - e²·sin²φ)`.
    pub fn prime_vertical_radius(&self, phi: f64) -> f64 {
        self.a / (1.0 - self.e2 * sin_squared(phi)).sqrt()
    }

    /// Meridional radius of curvature `ρ = a·(1 - e²) / (1 - e²·sin²φ)^1.5`.
    pub fn meridional_radius(&self, phi: f64) -> f64 {
        self.a * (1.0 - self.e2) / (1.0 - self.e2 * sin_squared(phi)).powf(1.5)
    }
}

impl fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[semi-major axis = {}, semi-minor axis = {}]",
            self.a, self.b
        )
    }
}

/// Named reference ellipsoids.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum EllipsoidId {
    Airy1830,
    ModifiedAiry,
    AustralianNational1966,
    Bessel1841,
    Clarke1866,
    Clarke1880,
    Everest,
    Fischer1960,
    Fischer1968,
    Grs67,
    Grs75,
    Grs80,
    Hayford1910,
    Helmert1906,
    Hough1956,
    Iers1989,
    International,
    Krassovsky1940,
    ModifiedEverest,
    NewInternational1967,
    SouthAmerican1969,
    Wgs60,
    Wgs66,
    Wgs72,
    Wgs84,
}

impl EllipsoidId {
    fn parameters(self) -> (f64, Shape) {
        use Shape::*;
        match self {
            Self::Airy1830 => (6_377_563.396, SemiMinorAxis(6_356_256.909)),
            Self::ModifiedAiry => (6_377_340.189, EccentricitySquared(0.006_670_540_15)),
            Self::AustralianNational1966 => (6_378_160.0, SemiMinorAxis(6_356_774.719)),
            Self::Bessel1841 => (6_377_397.155, SemiMinorAxis(6_356_078.962_9)),
            Self::Clarke1866 => (6_378_206.4, SemiMinorAxis(6_356_583.8)),
            Self::Clarke1880 => (6_378_249.145, SemiMinorAxis(6_356_514.869_6)),
            Self::Everest => (6_377_276.345_18, SemiMinorAxis(6_356_075.415_11)),
            Self::Fischer1960 => (6_378_166.0, SemiMinorAxis(6_356_784.284)),
            Self::Fischer1968 => (6_378_150.0, SemiMinorAxis(6_356_768.337)),
            Self::Grs67 => (6_378_160.0, SemiMinorAxis(6_356_774.516_09)),
            Self::Grs75 => (6_378_140.0, SemiMinorAxis(6_356_755.288)),
            Self::Grs80 => (6_378_137.0, SemiMinorAxis(6_356_752.314_1)),
            Self::Hayford1910 => (6_378_388.0, SemiMinorAxis(6_356_911.946)),
            Self::Helmert1906 => (6_378_200.0, SemiMinorAxis(6_356_818.17)),
            Self::Hough1956 => (6_378_270.0, SemiMinorAxis(6_356_794.34)),
            Self::Iers1989 => (6_378_136.0, SemiMinorAxis(6_356_751.302)),
            Self::International => (6_378_388.0, SemiMinorAxis(6_356_911.946_2)),
            Self::Krassovsky1940 => (6_378_245.0, SemiMinorAxis(6_356_863.019)),
            Self::ModifiedEverest => (6_377_304.063, SemiMinorAxis(6_356_103.039)),
            Self::NewInternational1967 => (6_378_157.5, SemiMinorAxis(6_356_772.2)),
            Self::SouthAmerican1969 => (6_378_160.0, SemiMinorAxis(6_356_774.719_2)),
            Self::Wgs60 => (6_378_165.0, SemiMinorAxis(6_356_783.287)),
            Self::Wgs66 => (6_378_145.0, SemiMinorAxis(6_356_759.770)),
            Self::Wgs72 => (6_378_135.0, SemiMinorAxis(6_356_750.5)),
            Self::Wgs84 => (6_378_137.0, SemiMinorAxis(6_356_752.314_2)),
        }
    }

    /// The shared catalog instance for this ellipsoid.
    pub fn ellipsoid(self) -> &'static Ellipsoid {
        &ELLIPSOIDS[self as usize]
    }
}

lazy_static! {
    // Indexed by discriminant; EnumIter yields variants in declaration order.
    static ref ELLIPSOIDS: Vec<Ellipsoid> = {
        debug!(count = EllipsoidId::COUNT, "building ellipsoid catalog");
        EllipsoidId::iter()
            .map(|id| {
                let (a, shape) = id.parameters();
                Ellipsoid::with_shape(a, shape)
            })
            .collect()
    };
}
