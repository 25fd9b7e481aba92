//! Common helpers for projection math (meridional arc, trig powers).

use super::ellipsoid::Ellipsoid;

/// Scaled meridional arc length from latitude `phi0` to `phi` (radians).
///
/// Fourth-order series in the third flattening `n = (a - b) / (a + b)`:
///   M = b·F0·[ (1 + n + 5/4·n² + 5/4·n³)·(φ - φ0)
///            - (3n + 3n² + 21/8·n³)·sin(φ - φ0)·cos(φ + φ0)
///            + (15/8·n² + 15/8·n³)·sin(2(φ - φ0))·cos(2(φ + φ0))
///            - 35/24·n³·sin(3(φ - φ0))·cos(3(φ + φ0)) ]
pub fn meridional_arc(ellipsoid: &Ellipsoid, k0: f64, phi: f64, phi0: f64) -> f64 {
    let n = ellipsoid.third_flattening();
    let n2 = n * n;
    let n3 = n2 * n;

    let diff = phi - phi0;
    let sum = phi + phi0;

    let ma = (1.0 + n + 5.0 / 4.0 * n2 + 5.0 / 4.0 * n3) * diff;
    let mb = (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * diff.sin() * sum.cos();
    let mc = (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3) * (2.0 * diff).sin() * (2.0 * sum).cos();
    let md = 35.0 / 24.0 * n3 * (3.0 * diff).sin() * (3.0 * sum).cos();

    ellipsoid.semi_minor_axis() * k0 * (ma - mb + mc - md)
}

pub fn sin_squared(x: f64) -> f64 {
    let s = x.sin();
    s * s
}

pub fn tan_squared(x: f64) -> f64 {
    let t = x.tan();
    t * t
}
