//! Conversions between coordinate systems.
//!
//! [`Pipeline`] converts typed [`Coordinate`] values into a target
//! [`CoordinateSystem`], shifting datum on the way when the target needs it.
//! [`GridTransform`] is the planar counterpart: it moves raw `(x, y)` pairs
//! between EPSG-coded systems, which is what bulk callers want.

use tracing::debug;

use crate::coords::mgrs::MgrsLettering;
use crate::coords::{
    Coordinate, EcefRef, GeographicPosition, IrishRef, MgrsRef, OsRef, ToGeographic, UtmRef,
};
use crate::datum::{self, DatumId};
use crate::error::GridError;
use crate::proj::transverse_mercator::TransverseMercator;
use crate::proj::Projection;

/// Target of a [`Pipeline`] conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateSystem {
    Geographic(DatumId),
    Ecef(DatumId),
    Osgb,
    Irish,
    Utm,
    Mgrs(MgrsLettering),
}

/// Converts any [`Coordinate`] into one fixed target system.
#[derive(Clone, Copy, Debug)]
pub struct Pipeline {
    target: CoordinateSystem,
}

impl Pipeline {
    pub fn new(target: CoordinateSystem) -> Self {
        Self { target }
    }

    pub fn target(&self) -> CoordinateSystem {
        self.target
    }

    /// Convert one coordinate. Goes through geographic on the source datum;
    /// grid targets then move it onto their own datum.
    pub fn convert(&self, coordinate: &Coordinate) -> Result<Coordinate, GridError> {
        let position = coordinate.to_geographic()?;
        self.from_geographic(&position)
    }

    /// Convert a slice, stopping at the first failure.
    pub fn convert_batch(&self, coordinates: &[Coordinate]) -> Result<Vec<Coordinate>, GridError> {
        coordinates.iter().map(|c| self.convert(c)).collect()
    }

    fn from_geographic(&self, position: &GeographicPosition) -> Result<Coordinate, GridError> {
        Ok(match self.target {
            CoordinateSystem::Geographic(datum) => position.to_datum(datum).into(),
            CoordinateSystem::Ecef(datum) => {
                EcefRef::from_geographic(&position.to_datum(datum)).into()
            }
            CoordinateSystem::Osgb => OsRef::from_geographic(position)?.into(),
            CoordinateSystem::Irish => IrishRef::from_geographic(position)?.into(),
            CoordinateSystem::Utm => UtmRef::from_geographic(position)?.into(),
            CoordinateSystem::Mgrs(lettering) => {
                MgrsRef::from_utm_with(&UtmRef::from_geographic(position)?, lettering)?.into()
            }
        })
    }
}

/// Describes one side of a [`GridTransform`].
enum CrsEndpoint {
    /// (lon, lat) in degrees on a datum.
    Geographic(DatumId),
    /// (easting, northing) in metres.
    Projected {
        projection: Box<dyn Projection>,
        datum: DatumId,
    },
}

impl CrsEndpoint {
    fn datum(&self) -> DatumId {
        match self {
            CrsEndpoint::Geographic(datum) => *datum,
            CrsEndpoint::Projected { datum, .. } => *datum,
        }
    }

    /// Native units -> (lon, lat) in radians on this endpoint's datum.
    fn to_lon_lat(&self, x: f64, y: f64) -> Result<(f64, f64), GridError> {
        match self {
            CrsEndpoint::Geographic(_) => Ok((x.to_radians(), y.to_radians())),
            CrsEndpoint::Projected { projection, .. } => Ok(projection.inverse(x, y)?),
        }
    }

    fn from_lon_lat(&self, lon: f64, lat: f64) -> Result<(f64, f64), GridError> {
        match self {
            CrsEndpoint::Geographic(_) => Ok((lon.to_degrees(), lat.to_degrees())),
            CrsEndpoint::Projected { projection, .. } => Ok(projection.forward(lon, lat)?),
        }
    }
}

/// Planar transform between two coordinate reference systems.
///
/// Geographic systems take `(lon, lat)` in degrees, projected systems
/// `(easting, northing)` in metres. A datum shift (height 0) is applied
/// between the two sides when their datums differ.
pub struct GridTransform {
    src: CrsEndpoint,
    dst: CrsEndpoint,
}

impl GridTransform {
    /// Create a transform from source and destination CRS identifiers.
    ///
    /// Accepts EPSG codes ("EPSG:27700") for the systems this crate models,
    /// or a datum name ("osgb36", "nad27-cuba") for geographic coordinates
    /// on that datum.
    pub fn new(src_crs: &str, dst_crs: &str) -> Result<Self, GridError> {
        let src = parse_crs(src_crs)?;
        let dst = parse_crs(dst_crs)?;
        debug!(src = src_crs, dst = dst_crs, "grid transform");
        Ok(Self { src, dst })
    }

    /// Transform a single point from source to destination.
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), GridError> {
        let (lon, lat) = self.src.to_lon_lat(x, y)?;
        let (lon, lat) = datum::transform(self.src.datum(), self.dst.datum(), lon, lat, 0.0);
        self.dst.from_lon_lat(lon, lat)
    }

    /// Transform in place, stopping at the first failure.
    pub fn transform_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), GridError> {
        for c in coords.iter_mut() {
            *c = self.transform(c.0, c.1)?;
        }
        Ok(())
    }
}

/// Try to parse a CRS identifier into a `CrsEndpoint`.
fn parse_crs(crs: &str) -> Result<CrsEndpoint, GridError> {
    let unknown = || GridError::InvalidArgument(format!("Unsupported coordinate system ({crs})"));

    let Some(code) = crs
        .strip_prefix("EPSG:")
        .or_else(|| crs.strip_prefix("epsg:"))
    else {
        let datum: DatumId = crs.parse().map_err(|_| unknown())?;
        return Ok(CrsEndpoint::Geographic(datum));
    };
    let code: u32 = code.parse().map_err(|_| unknown())?;

    let endpoint = match code {
        4326 => CrsEndpoint::Geographic(DatumId::Wgs84),
        4258 => CrsEndpoint::Geographic(DatumId::Etrf89),
        4277 => CrsEndpoint::Geographic(DatumId::Osgb36),
        4299 => CrsEndpoint::Geographic(DatumId::Ireland1965),
        4267 => CrsEndpoint::Geographic(DatumId::Nad27ContiguousUs),

        // British National Grid
        27700 => CrsEndpoint::Projected {
            projection: Box::new(OsRef::projection()?),
            datum: DatumId::Osgb36,
        },

        // TM65 / Irish Grid
        29902 => CrsEndpoint::Projected {
            projection: Box::new(IrishRef::projection()?),
            datum: DatumId::Ireland1965,
        },

        // UTM North: EPSG:326XX (zones 1-60)
        32601..=32660 => CrsEndpoint::Projected {
            projection: Box::new(TransverseMercator::utm_zone((code - 32600) as u8, true)),
            datum: DatumId::Wgs84,
        },

        // UTM South: EPSG:327XX (zones 1-60)
        32701..=32760 => CrsEndpoint::Projected {
            projection: Box::new(TransverseMercator::utm_zone((code - 32700) as u8, false)),
            datum: DatumId::Wgs84,
        },

        _ => return Err(unknown()),
    };
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_convert_geographic_to_every_system() {
        let p = Coordinate::from(GeographicPosition::new(52.65798, 1.71605).unwrap());

        let os = Pipeline::new(CoordinateSystem::Osgb).convert(&p).unwrap();
        assert!(matches!(os, Coordinate::Osgb(_)));

        let utm = Pipeline::new(CoordinateSystem::Utm).convert(&p).unwrap();
        let Coordinate::Utm(u) = utm else { panic!("expected UTM, got {utm:?}") };
        assert_eq!((u.zone(), u.band()), (31, 'U'));

        let mgrs = Pipeline::new(CoordinateSystem::Mgrs(MgrsLettering::Standard))
            .convert(&p)
            .unwrap();
        assert!(matches!(mgrs, Coordinate::Mgrs(_)));

        let ecef = Pipeline::new(CoordinateSystem::Ecef(DatumId::Wgs84)).convert(&p).unwrap();
        assert!(matches!(ecef, Coordinate::Ecef(_)));

        // Great Britain lies outside the Irish Grid
        assert!(Pipeline::new(CoordinateSystem::Irish).convert(&p).is_err());
    }

    #[test]
    fn test_convert_os_to_geographic_wgs84() {
        let os = Coordinate::from(OsRef::new(651_409.903, 313_177.270).unwrap());
        let out = Pipeline::new(CoordinateSystem::Geographic(DatumId::Wgs84))
            .convert(&os)
            .unwrap();
        let Coordinate::Geographic(p) = out else { panic!("expected geographic, got {out:?}") };
        assert_eq!(p.datum(), DatumId::Wgs84);
        assert_relative_eq!(p.latitude(), 52.658, epsilon = 1e-3);
        assert_relative_eq!(p.longitude(), 1.716, epsilon = 1e-3);
    }

    #[test]
    fn test_convert_mgrs_to_utm() {
        let mgrs = Coordinate::from("31UDQ4825111932".parse::<MgrsRef>().unwrap());
        let out = Pipeline::new(CoordinateSystem::Utm).convert(&mgrs).unwrap();
        let Coordinate::Utm(u) = out else { panic!("expected UTM, got {out:?}") };
        assert_relative_eq!(u.easting(), 448_251.0, epsilon = 0.01);
        assert_relative_eq!(u.northing(), 5_411_932.0, epsilon = 0.01);
    }

    #[test]
    fn test_convert_batch() {
        let coords: Vec<Coordinate> = [(51.5, -0.12), (55.95, -3.19), (53.48, -2.24)]
            .iter()
            .map(|&(lat, lon)| GeographicPosition::new(lat, lon).unwrap().into())
            .collect();
        let out = Pipeline::new(CoordinateSystem::Osgb).convert_batch(&coords).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|c| matches!(c, Coordinate::Osgb(_))));

        let mut with_bad = coords.clone();
        with_bad.push(GeographicPosition::new(-33.9, 151.2).unwrap().into());
        assert!(Pipeline::new(CoordinateSystem::Osgb).convert_batch(&with_bad).is_err());
    }

    #[test]
    fn test_grid_transform_4326_to_27700() {
        let t = GridTransform::new("EPSG:4326", "EPSG:27700").unwrap();
        let (e, n) = t.transform(1.71605, 52.65798).unwrap();
        assert_relative_eq!(e, 651_409.9, epsilon = 1.0);
        assert_relative_eq!(n, 313_177.3, epsilon = 1.0);
    }

    #[test]
    fn test_grid_transform_utm33_to_4326() {
        let t = GridTransform::new("EPSG:32633", "EPSG:4326").unwrap();
        let (lon, lat) = t.transform(500_000.0, 5_760_000.0).unwrap();
        assert!(lon > 14.0 && lon < 16.0, "lon = {lon}");
        assert!(lat > 51.0 && lat < 53.0, "lat = {lat}");
    }

    #[test]
    fn test_grid_transform_named_datum() {
        let t = GridTransform::new("osgb36", "EPSG:27700").unwrap();
        let lat = 52.0 + 39.0 / 60.0 + 27.2531 / 3600.0;
        let lon = 1.0 + 43.0 / 60.0 + 4.5177 / 3600.0;
        let (e, n) = t.transform(lon, lat).unwrap();
        assert_relative_eq!(e, 651_409.903, epsilon = 0.001);
        assert_relative_eq!(n, 313_177.270, epsilon = 0.001);
    }

    #[test]
    fn test_grid_transform_batch() {
        let t = GridTransform::new("EPSG:27700", "EPSG:29902").unwrap();
        // Either side of the North Channel
        let mut coords = vec![(146_000.0, 530_000.0), (206_000.0, 560_000.0)];
        t.transform_batch(&mut coords).unwrap();
        for (e, n) in &coords {
            assert!(*e > 0.0 && *e < 600_000.0, "e = {e}");
            assert!(*n > 0.0 && *n < 700_000.0, "n = {n}");
        }
    }

    #[test]
    fn test_identity_same_crs() {
        let t = GridTransform::new("EPSG:32633", "EPSG:32633").unwrap();
        let (x, y) = t.transform(500_000.0, 5_760_000.0).unwrap();
        assert_relative_eq!(x, 500_000.0, epsilon = 0.01);
        assert_relative_eq!(y, 5_760_000.0, epsilon = 0.01);
    }

    #[test]
    fn test_unsupported_crs() {
        assert!(GridTransform::new("EPSG:4326", "EPSG:2154").is_err());
        assert!(GridTransform::new("EPSG:32661", "EPSG:4326").is_err());
        assert!(GridTransform::new("nowhere", "EPSG:4326").is_err());
    }
}
