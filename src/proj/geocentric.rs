//! Geodetic ⇄ geocentric (ECEF) conversion on an ellipsoid.
//!
//! Forward, with N = a / √(1 − e²·sin²φ):
//!   X = (N + h)·cosφ·cosλ
//!   Y = (N + h)·cosφ·sinλ
//!   Z = (N·(1 − e²) + h)·sinφ
//!
//! Inverse follows Bowring (1976): with p = √(X² + Y²) and the parametric
//! latitude θ = atan(Z·a / (p·b)),
//!   φ = atan((Z + e'²·b·sin³θ) / (p − e²·a·cos³θ))
//! The closed form is evaluated a second time with θ re-derived from the
//! first φ, which takes the error below 1e-12° up to orbital heights.

use std::f64::consts::FRAC_PI_2;

use super::ellipsoid::Ellipsoid;

impl Ellipsoid {
    /// (lon, lat) in radians and ellipsoidal height in metres -> (X, Y, Z).
    pub fn to_geocentric(&self, lon: f64, lat: f64, height: f64) -> (f64, f64, f64) {
        let n = self.prime_vertical_radius(lat);
        let (sin_phi, cos_phi) = lat.sin_cos();
        let (sin_lam, cos_lam) = lon.sin_cos();

        let x = (n + height) * cos_phi * cos_lam;
        let y = (n + height) * cos_phi * sin_lam;
        let z = (n * (1.0 - self.eccentricity_squared()) + height) * sin_phi;
        (x, y, z)
    }

    /// (X, Y, Z) -> (lon, lat) in radians and ellipsoidal height in metres.
    pub fn to_geodetic(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let a = self.semi_major_axis();
        let b = self.semi_minor_axis();
        let lon = y.atan2(x);
        let p = x.hypot(y);

        // On the polar axis the latitude is fixed by the sign of Z
        if p < 1.0e-12 {
            return (lon, FRAC_PI_2.copysign(z), z.abs() - b);
        }

        let theta = (z * a).atan2(p * b);
        let phi = self.bowring_latitude(p, z, theta);

        let theta = (b * phi.sin()).atan2(a * phi.cos());
        let lat = self.bowring_latitude(p, z, theta);

        let (sin_phi, cos_phi) = lat.sin_cos();
        let n = self.prime_vertical_radius(lat);
        let height = p * cos_phi + z * sin_phi - a * a / n;

        (lon, lat, height)
    }

    fn bowring_latitude(&self, p: f64, z: f64, theta: f64) -> f64 {
        let a = self.semi_major_axis();
        let b = self.semi_minor_axis();
        let (sin_t, cos_t) = theta.sin_cos();
        let num = z + self.second_eccentricity_squared() * b * sin_t.powi(3);
        let den = p - self.eccentricity_squared() * a * cos_t.powi(3);
        num.atan2(den)
    }
}

#[cfg(test)]
mod tests {
    use crate::proj::ellipsoid::EllipsoidId;
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_prime_meridian() {
        let wgs84 = EllipsoidId::Wgs84.ellipsoid();
        let (x, y, z) = wgs84.to_geocentric(0.0, 0.0, 0.0);
        assert_relative_eq!(x, 6_378_137.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_north_pole() {
        let wgs84 = EllipsoidId::Wgs84.ellipsoid();
        let (x, y, z) = wgs84.to_geocentric(0.0, 90.0_f64.to_radians(), 0.0);
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(z, wgs84.semi_minor_axis(), epsilon = 1e-6);

        let (_, lat, h) = wgs84.to_geodetic(0.0, 0.0, z + 100.0);
        assert_relative_eq!(lat, 90.0_f64.to_radians());
        assert_relative_eq!(h, 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_roundtrip() {
        let grs80 = EllipsoidId::Grs80.ellipsoid();
        let cases: &[(f64, f64, f64)] = &[
            (12.0, 55.0, 100.0),
            (-2.0, 52.65, 0.0),
            (151.2, -33.9, 50.0),
            (-179.5, 89.9, 8_848.0),
            (45.0, -60.0, -400.0),
            (0.0, 45.0, 400_000.0),
        ];
        for &(lon_deg, lat_deg, h) in cases {
            let (x, y, z) = grs80.to_geocentric(lon_deg.to_radians(), lat_deg.to_radians(), h);
            let (lon, lat, h2) = grs80.to_geodetic(x, y, z);
            assert_relative_eq!(lon.to_degrees(), lon_deg, epsilon = 1e-9);
            assert_relative_eq!(lat.to_degrees(), lat_deg, epsilon = 1e-9);
            assert_relative_eq!(h2, h, epsilon = 1e-6);
        }
    }
}
