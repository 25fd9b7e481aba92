//! Geodetic datums and the Helmert datum transform.
//!
//! Every datum carries the seven parameters taking it to WGS84, the
//! reference datum. Transforms between two non-reference datums hop through
//! WGS84; there is no direct composition.

pub mod helmert;

use lazy_static::lazy_static;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::{debug, trace};

use crate::proj::ellipsoid::{Ellipsoid, EllipsoidId};

pub use helmert::HelmertParams;

/// A named datum: reference ellipsoid plus Helmert parameters to WGS84.
#[derive(Debug)]
pub struct Datum {
    id: DatumId,
    name: &'static str,
    ellipsoid: &'static Ellipsoid,
    helmert: HelmertParams,
}

impl Datum {
    pub fn id(&self) -> DatumId {
        self.id
    }

    /// Full descriptive name, e.g. "Ireland 1965".
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ellipsoid(&self) -> &'static Ellipsoid {
        self.ellipsoid
    }

    pub fn helmert(&self) -> &HelmertParams {
        &self.helmert
    }
}

/// Named datums.
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
pub enum DatumId {
    Wgs84,
    Etrf89,
    Osgb36,
    Ireland1965,
    Nad27Alaska,
    Nad27AlbertaBritishColumbia,
    Nad27AleutianEast,
    Nad27AleutianWest,
    Nad27Bahamas,
    Nad27Canada,
    Nad27CanadaEast,
    Nad27CanadaManitobaOntario,
    Nad27CanadaNwTerritory,
    Nad27CanadaYukon,
    Nad27CanalZone,
    Nad27Caribbean,
    Nad27CentralAmerica,
    Nad27ContiguousUs,
    Nad27Cuba,
    Nad27EasternUs,
    Nad27Greenland,
    Nad27Mexico,
    Nad27SanSalvador,
    Nad27WesternUs,
}

impl DatumId {
    fn definition(self) -> (&'static str, EllipsoidId, HelmertParams) {
        use EllipsoidId::*;
        let t = HelmertParams::translation;
        match self {
            Self::Wgs84 => ("World Geodetic System 1984 (WGS84)", Wgs84, HelmertParams::default()),
            Self::Etrf89 => (
                "European Terrestrial Reference Frame (ETRF89)",
                Wgs84,
                HelmertParams::default(),
            ),
            Self::Osgb36 => (
                "Ordnance Survey of Great Britain 1936 (OSGB36)",
                Airy1830,
                HelmertParams {
                    dx: 446.448,
                    dy: -125.157,
                    dz: 542.06,
                    ds: -20.4894,
                    rx: 0.1502,
                    ry: 0.247,
                    rz: 0.8421,
                },
            ),
            Self::Ireland1965 => (
                "Ireland 1965",
                ModifiedAiry,
                HelmertParams {
                    dx: 482.53,
                    dy: -130.596,
                    dz: 564.557,
                    ds: 8.15,
                    rx: -1.042,
                    ry: -0.214,
                    rz: -0.631,
                },
            ),
            Self::Nad27Alaska => (
                "North American Datum 1927 (NAD27) - Alaska",
                Clarke1866,
                t(-5.0, 135.0, 172.0),
            ),
            Self::Nad27AlbertaBritishColumbia => (
                "North American Datum 1927 (NAD27) - Alberta and British Columbia",
                Clarke1866,
                t(-7.0, 162.0, 188.0),
            ),
            Self::Nad27AleutianEast => (
                "North American Datum 1927 (NAD27) - Aleutian East",
                Clarke1866,
                t(-2.0, 152.0, 149.0),
            ),
            Self::Nad27AleutianWest => (
                "North American Datum 1927 (NAD27) - Aleutian West",
                Clarke1866,
                t(2.0, 204.0, 105.0),
            ),
            Self::Nad27Bahamas => (
                "North American Datum 1927 (NAD27) - Bahamas",
                Clarke1866,
                t(-4.0, 154.0, 178.0),
            ),
            Self::Nad27Canada => (
                "North American Datum 1927 (NAD27) - Canada",
                Clarke1866,
                t(-10.0, 158.0, 187.0),
            ),
            Self::Nad27CanadaEast => (
                "North American Datum 1927 (NAD27) - Canada East",
                Clarke1866,
                t(-22.0, 160.0, 190.0),
            ),
            Self::Nad27CanadaManitobaOntario => (
                "North American Datum 1927 (NAD27) - Canada Manitoba/Ontario",
                Clarke1866,
                t(-9.0, 157.0, 184.0),
            ),
            Self::Nad27CanadaNwTerritory => (
                "North American Datum 1927 (NAD27) - Canada NW Territory",
                Clarke1866,
                t(4.0, 159.0, 188.0),
            ),
            Self::Nad27CanadaYukon => (
                "North American Datum 1927 (NAD27) - Canada Yukon",
                Clarke1866,
                t(-7.0, 139.0, 181.0),
            ),
            Self::Nad27CanalZone => (
                "North American Datum 1927 (NAD27) - Canal Zone",
                Clarke1866,
                t(0.0, 125.0, 201.0),
            ),
            Self::Nad27Caribbean => (
                "North American Datum 1927 (NAD27) - Caribbean",
                Clarke1866,
                t(-3.0, 142.0, 183.0),
            ),
            Self::Nad27CentralAmerica => (
                "North American Datum 1927 (NAD27) - Central America",
                Clarke1866,
                t(0.0, 125.0, 194.0),
            ),
            Self::Nad27ContiguousUs => (
                "North American Datum 1927 (NAD27) - Contiguous United States",
                Clarke1866,
                t(-8.0, 160.0, 176.0),
            ),
            Self::Nad27Cuba => (
                "North American Datum 1927 (NAD27) - Cuba",
                Clarke1866,
                t(-9.0, 152.0, 178.0),
            ),
            Self::Nad27EasternUs => (
                "North American Datum 1927 (NAD27) - Eastern US",
                Clarke1866,
                t(-9.0, 161.0, 179.0),
            ),
            Self::Nad27Greenland => (
                "North American Datum 1927 (NAD27) - Greenland",
                Clarke1866,
                t(11.0, 114.0, 195.0),
            ),
            Self::Nad27Mexico => (
                "North American Datum 1927 (NAD27) - Mexico",
                Clarke1866,
                t(-12.0, 130.0, 190.0),
            ),
            Self::Nad27SanSalvador => (
                "North American Datum 1927 (NAD27) - San Salvador",
                Clarke1866,
                t(1.0, 140.0, 165.0),
            ),
            Self::Nad27WesternUs => (
                "North American Datum 1927 (NAD27) - Western US",
                Clarke1866,
                t(-8.0, 159.0, 175.0),
            ),
        }
    }

    /// The shared registry instance for this datum.
    pub fn datum(self) -> &'static Datum {
        &DATUMS[self as usize]
    }

    /// WGS84 is the fixed point every Helmert parameter set is relative to.
    pub fn is_reference(self) -> bool {
        self == Self::Wgs84
    }
}

lazy_static! {
    static ref DATUMS: Vec<Datum> = {
        debug!(count = DatumId::COUNT, "building datum registry");
        DatumId::iter()
            .map(|id| {
                let (name, ellipsoid, helmert) = id.definition();
                Datum {
                    id,
                    name,
                    ellipsoid: ellipsoid.ellipsoid(),
                    helmert,
                }
            })
            .collect()
    };
}

/// Move a geodetic position from datum `from` to datum `to`.
///
/// Angles in radians. Routes through ECEF: geodetic on the source ellipsoid,
/// Helmert shift, geodetic on the target ellipsoid. Towards WGS84 the source
/// datum's parameters are applied; away from WGS84 the target datum's
/// parameters are applied with every sign flipped. The ellipsoidal height is
/// carried over unchanged and only (lon, lat) is returned.
pub fn transform(from: DatumId, to: DatumId, lon: f64, lat: f64, height: f64) -> (f64, f64) {
    if from == to {
        return (lon, lat);
    }

    if !from.is_reference() && !to.is_reference() {
        let (lon, lat) = transform(from, DatumId::Wgs84, lon, lat, height);
        return transform(DatumId::Wgs84, to, lon, lat, height);
    }

    let params = if to.is_reference() {
        trace!(%from, %to, "helmert forward");
        *from.datum().helmert()
    } else {
        trace!(%from, %to, "helmert reverse");
        to.datum().helmert().negated()
    };

    let (x, y, z) = from.datum().ellipsoid().to_geocentric(lon, lat, height);
    let (x, y, z) = params.apply(x, y, z);
    let (lon, lat, _) = to.datum().ellipsoid().to_geodetic(x, y, z);
    (lon, lat)
}
