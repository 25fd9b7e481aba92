//! Geographic coordinate conversions: datum shifts, ECEF, the British and
//! Irish national grids, UTM and MGRS.

pub mod coords;
pub mod datum;
pub mod error;
pub mod pipeline;
pub mod proj;

pub use coords::{
    Coordinate, EcefRef, GeographicPosition, IrishRef, MgrsPrecision, MgrsRef, OsRef,
    ToGeographic, UtmRef,
};
pub use coords::mgrs::MgrsLettering;
pub use datum::DatumId;
pub use error::{GridError, ProjError};
pub use pipeline::{CoordinateSystem, GridTransform, Pipeline};
