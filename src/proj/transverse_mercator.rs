//! Transverse Mercator projection: Redfearn series with an iterated inverse.
//!
//! One engine parameterised by (ellipsoid, F0, φ0, λ0, E0, N0) serves every
//! grid in the crate: the British National Grid, the Irish Grid and all UTM
//! zones differ only in those six values.
//!
//! Forward, with ν/ρ the transverse/meridional radii scaled by F0,
//! η² = ν/ρ - 1 and Δλ = λ - λ0:
//!   N = M(φ) + N0 + II·Δλ² + III·Δλ⁴ + IIIA·Δλ⁶
//!   E = E0 + IV·Δλ + V·Δλ³ + VI·Δλ⁵
//!
//! Inverse: solve M(φ') = N - N0 by fixed-point iteration starting from
//! φ' = (N - N0)/(a·F0) + φ0, then expand in ΔE = E - E0 with VII..XIIA.
//! The series loses accuracy beyond 3° from λ0, which the Norway and
//! Svalbard UTM zones reach, so the result is refined by one Newton step
//! against the forward projection.

use tracing::warn;

use crate::error::ProjError;
use crate::proj::common::{meridional_arc, tan_squared};
use crate::proj::ellipsoid::{Ellipsoid, EllipsoidId};
use crate::proj::Projection;

/// UTM central scale factor.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
/// UTM false easting (metres).
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing south of the equator (metres).
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Stop iterating once |N - N0 - M(φ')| drops below this (metres).
const ARC_TOLERANCE: f64 = 0.001;
/// The iteration normally settles in 3-5 steps.
const MAX_ITERATIONS: usize = 32;

#[derive(Clone, Debug)]
pub struct TransverseMercator<'a> {
    ellipsoid: &'a Ellipsoid,
    lon0: f64,
    lat0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl<'a> TransverseMercator<'a> {
    /// Angles in radians, offsets in metres.
    pub fn new(
        ellipsoid: &'a Ellipsoid,
        lon0: f64,
        lat0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, ProjError> {
        if !(k0.is_finite() && k0 > 0.0) {
            return Err(ProjError::InvalidParameter(format!(
                "scale factor ({k0}) must be finite and positive"
            )));
        }
        if ![lon0, lat0, false_easting, false_northing]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(ProjError::InvalidParameter(
                "origin and false origin must be finite".into(),
            ));
        }
        Ok(Self {
            ellipsoid,
            lon0,
            lat0,
            k0,
            false_easting,
            false_northing,
        })
    }

    /// Longitude of natural origin (radians).
    pub fn central_meridian(&self) -> f64 {
        self.lon0
    }

    /// Latitude of natural origin (radians).
    pub fn origin_latitude(&self) -> f64 {
        self.lat0
    }

    pub fn scale_factor(&self) -> f64 {
        self.k0
    }

    /// Scaled transverse (ν) and meridional (ρ) radii of curvature at `phi`.
    fn radii(&self, phi: f64) -> (f64, f64) {
        (
            self.k0 * self.ellipsoid.prime_vertical_radius(phi),
            self.k0 * self.ellipsoid.meridional_radius(phi),
        )
    }

    /// Solve M(φ') = N - N0 for the footpoint latitude φ'.
    fn footpoint_latitude(&self, northing: f64) -> Result<f64, ProjError> {
        let ak0 = self.ellipsoid.semi_major_axis() * self.k0;
        let target = northing - self.false_northing;
        let mut phi = target / ak0 + self.lat0;

        for _ in 0..MAX_ITERATIONS {
            let residual = target - meridional_arc(self.ellipsoid, self.k0, phi, self.lat0);
            phi += residual / ak0;
            if residual.abs() < ARC_TOLERANCE {
                return Ok(phi);
            }
        }

        let residual = target - meridional_arc(self.ellipsoid, self.k0, phi, self.lat0);
        warn!(
            northing,
            residual, "transverse mercator inverse did not converge"
        );
        Err(ProjError::NoConvergence {
            iterations: MAX_ITERATIONS,
            residual,
        })
    }

    /// Series inverse, accurate to about 1 mm within 3° of λ0.
    fn series_inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let phi = self.footpoint_latitude(y)?;

        let tan_phi = phi.tan();
        let tan2 = tan_phi * tan_phi;
        let tan4 = tan2 * tan2;
        let sec_phi = 1.0 / phi.cos();
        let (nu, rho) = self.radii(phi);
        let eta2 = nu / rho - 1.0;

        let vii = tan_phi / (2.0 * rho * nu);
        let viii = tan_phi / (24.0 * rho * nu.powi(3))
            * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
        let ix = tan_phi / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
        let x_ = sec_phi / nu;
        let xi = sec_phi / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
        let xii = sec_phi / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
        let xiia = sec_phi / (5040.0 * nu.powi(7))
            * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan4 * tan2);

        let de = x - self.false_easting;
        let lat = phi - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
        let lon = self.lon0 + x_ * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);

        Ok((lon, lat))
    }
}

impl TransverseMercator<'static> {
    /// Create a Transverse Mercator for a UTM zone (1-60) on WGS84.
    pub fn utm_zone(zone: u8, north: bool) -> Self {
        debug_assert!((1..=60).contains(&zone), "UTM zone {zone} out of range");
        let lon0 = utm_central_meridian(zone).to_radians();
        let false_northing = if north { 0.0 } else { UTM_FALSE_NORTHING_SOUTH };
        Self {
            ellipsoid: EllipsoidId::Wgs84.ellipsoid(),
            lon0,
            lat0: 0.0,
            k0: UTM_SCALE_FACTOR,
            false_easting: UTM_FALSE_EASTING,
            false_northing,
        }
    }
}

/// Central meridian of a UTM zone, in degrees.
pub fn utm_central_meridian(zone: u8) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

impl Projection for TransverseMercator<'_> {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let (sin_phi, cos_phi) = lat.sin_cos();
        let tan2 = tan_squared(lat);
        let tan4 = tan2 * tan2;
        let (nu, rho) = self.radii(lat);
        let eta2 = nu / rho - 1.0;

        let m = meridional_arc(self.ellipsoid, self.k0, lat, self.lat0);

        let i = m + self.false_northing;
        let ii = nu / 2.0 * sin_phi * cos_phi;
        let iii = nu / 24.0 * sin_phi * cos_phi.powi(3) * (5.0 - tan2 + 9.0 * eta2);
        let iiia = nu / 720.0 * sin_phi * cos_phi.powi(5) * (61.0 - 58.0 * tan2 + tan4);
        let iv = nu * cos_phi;
        let v = nu / 6.0 * cos_phi.powi(3) * (nu / rho - tan2);
        let vi = nu / 120.0
            * cos_phi.powi(5)
            * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

        let dl = lon - self.lon0;
        let northing = i + ii * dl.powi(2) + iii * dl.powi(4) + iiia * dl.powi(6);
        let easting = self.false_easting + iv * dl + v * dl.powi(3) + vi * dl.powi(5);

        Ok((easting, northing))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (lon, lat) = self.series_inverse(x, y)?;

        // Newton step: the projection is conformal, so the Jacobian is the
        // point scale times a rotation by the grid convergence γ.
        let (e, n) = self.forward(lon, lat)?;
        let (de, dn) = (x - e, y - n);
        let (nu, rho) = self.radii(lat);
        let gamma = ((lon - self.lon0).tan() * lat.sin()).atan();
        let (sin_g, cos_g) = gamma.sin_cos();

        let lon = lon + (cos_g * de + sin_g * dn) / (nu * lat.cos());
        let lat = lat + (cos_g * dn - sin_g * de) / rho;
        Ok((lon, lat))
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        self.ellipsoid
    }
}
