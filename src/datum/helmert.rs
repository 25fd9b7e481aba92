//! Seven-parameter Helmert similarity transform between geocentric frames.
//!
//! Position-vector convention, small-angle rotations:
//!   [X']   [dx]            [  1  -rz   ry ] [X]
//!   [Y'] = [dy] + (1 + s)· [ rz    1  -rx ] [Y]
//!   [Z']   [dz]            [-ry   rx    1 ] [Z]
//! with s = ds·1e-6 and rx, ry, rz converted from arc-seconds to radians.

/// Helmert parameters taking coordinates on a datum to WGS84.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HelmertParams {
    /// Translation along X (metres).
    pub dx: f64,
    /// Translation along Y (metres).
    pub dy: f64,
    /// Translation along Z (metres).
    pub dz: f64,
    /// Scale correction (parts per million).
    pub ds: f64,
    /// Rotation about X (arc-seconds).
    pub rx: f64,
    /// Rotation about Y (arc-seconds).
    pub ry: f64,
    /// Rotation about Z (arc-seconds).
    pub rz: f64,
}

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

impl HelmertParams {
    /// Translation-only shift, as used by the regional NAD27 datums.
    pub const fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            dx,
            dy,
            dz,
            ds: 0.0,
            rx: 0.0,
            ry: 0.0,
            rz: 0.0,
        }
    }

    /// All seven parameters flipped in sign: the approximate reverse transform.
    pub fn negated(&self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            dz: -self.dz,
            ds: -self.ds,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the transform to a geocentric point.
    pub fn apply(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let sc = 1.0 + self.ds * 1e-6;
        let rx = self.rx * ARCSEC_TO_RAD;
        let ry = self.ry * ARCSEC_TO_RAD;
        let rz = self.rz * ARCSEC_TO_RAD;

        (
            self.dx + sc * (x - rz * y + ry * z),
            self.dy + sc * (rz * x + y - rx * z),
            self.dz + sc * (-ry * x + rx * y + z),
        )
    }
}
