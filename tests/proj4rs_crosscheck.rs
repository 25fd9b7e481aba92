//! Cross-check the native Transverse Mercator against proj4rs.

use approx::assert_relative_eq;
use proj4rs::Proj;

use gridref::coords::OsRef;
use gridref::proj::transverse_mercator::TransverseMercator;
use gridref::proj::Projection;

const LONGLAT_WGS84: &str = "+proj=longlat +ellps=WGS84";
const LONGLAT_AIRY: &str = "+proj=longlat +a=6377563.396 +b=6356256.909";
const OSGB: &str = "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 \
                    +a=6377563.396 +b=6356256.909 +units=m";

fn proj4rs_forward(geo: &str, grid: &str, lon: f64, lat: f64) -> (f64, f64) {
    let src = Proj::from_user_string(geo).unwrap();
    let dst = Proj::from_user_string(grid).unwrap();
    let mut point = (lon.to_radians(), lat.to_radians());
    proj4rs::transform::transform(&src, &dst, &mut point).unwrap();
    point
}

#[test]
fn test_utm33_matches_proj4rs() {
    let grid = "+proj=utm +zone=33 +ellps=WGS84 +units=m";
    let native = TransverseMercator::utm_zone(33, true);

    for &(lon, lat) in &[(15.0, 52.0), (13.0, 55.0), (17.5, 47.2), (12.1, 60.3)] as &[(f64, f64)] {
        let (e, n) = native.forward(lon.to_radians(), lat.to_radians()).unwrap();
        let (pe, pn) = proj4rs_forward(LONGLAT_WGS84, grid, lon, lat);
        assert_relative_eq!(e, pe, epsilon = 0.05);
        assert_relative_eq!(n, pn, epsilon = 0.05);
    }
}

#[test]
fn test_utm_south_matches_proj4rs() {
    let grid = "+proj=utm +zone=56 +south +ellps=WGS84 +units=m";
    let native = TransverseMercator::utm_zone(56, false);

    let (lon, lat): (f64, f64) = (151.2153, -33.8568);
    let (e, n) = native.forward(lon.to_radians(), lat.to_radians()).unwrap();
    let (pe, pn) = proj4rs_forward(LONGLAT_WGS84, grid, lon, lat);
    assert_relative_eq!(e, pe, epsilon = 0.05);
    assert_relative_eq!(n, pn, epsilon = 0.05);
}

#[test]
fn test_british_national_grid_matches_proj4rs() {
    let native = OsRef::projection().unwrap();

    for &(lon, lat) in &[(1.7179, 52.6576), (-0.1276, 51.5072), (-3.1883, 55.9533), (-5.7, 50.07)] as &[(f64, f64)] {
        let (e, n) = native.forward(lon.to_radians(), lat.to_radians()).unwrap();
        let (pe, pn) = proj4rs_forward(LONGLAT_AIRY, OSGB, lon, lat);
        assert_relative_eq!(e, pe, epsilon = 0.05);
        assert_relative_eq!(n, pn, epsilon = 0.05);
    }
}

#[test]
fn test_inverse_matches_proj4rs() {
    let native = OsRef::projection().unwrap();
    let src = Proj::from_user_string(OSGB).unwrap();
    let dst = Proj::from_user_string(LONGLAT_AIRY).unwrap();

    for &(e, n) in &[(651_409.903, 313_177.270), (530_000.0, 180_000.0), (325_000.0, 673_000.0)] {
        let (lon, lat) = native.inverse(e, n).unwrap();
        let mut point = (e, n);
        proj4rs::transform::transform(&src, &dst, &mut point).unwrap();
        assert_relative_eq!(lon.to_degrees(), point.0.to_degrees(), epsilon = 1e-7);
        assert_relative_eq!(lat.to_degrees(), point.1.to_degrees(), epsilon = 1e-7);
    }
}
