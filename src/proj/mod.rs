//! Ellipsoids, ECEF conversion and the Transverse Mercator engine that
//! every grid in this crate is built on.

pub mod common;
pub mod ellipsoid;
pub mod geocentric;
pub mod transverse_mercator;

use crate::error::ProjError;

/// A map projection between geodetic angles and planar grid metres.
pub trait Projection: Send + Sync {
    /// (lon, lat) in radians -> (easting, northing) in metres, false origin applied.
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError>;

    /// (easting, northing) in metres -> (lon, lat) in radians.
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;

    /// Forward in place, stopping at the first failure.
    fn forward_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        for c in coords.iter_mut() {
            *c = self.forward(c.0, c.1)?;
        }
        Ok(())
    }

    /// Inverse in place, stopping at the first failure.
    fn inverse_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        for c in coords.iter_mut() {
            *c = self.inverse(c.0, c.1)?;
        }
        Ok(())
    }

    /// The ellipsoid the projection is defined on.
    fn ellipsoid(&self) -> &ellipsoid::Ellipsoid;
}
