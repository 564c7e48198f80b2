//! Great-circle interpolation and the planar projection used for the map.

use crate::domain::model::ProjectedCoordinate;
use geo::{Coord, LineString, Rect};
use geographiclib_rs::{DirectGeodesic, Geodesic, InverseGeodesic};

/// WGS84 semi-major axis, in metres.
pub const SEMI_MAJOR_AXIS: f64 = 6378137.0;
/// Inverse flattening of the reference ellipsoid used for arcs.
pub const INVERSE_FLATTENING: f64 = 298.257;
/// Intermediate points per route arc unless configured otherwise.
pub const DEFAULT_ARC_POINTS: usize = 200;

const DEG_TO_RAD: f64 = 0.017453292519943295;
// SEMI_MAJOR_AXIS / 2
const NORTHING_FACTOR: f64 = 3189068.5;

/// Projects a geographic coordinate (degrees) onto the Web-Mercator-style plane.
///
/// The formula must stay numerically identical to the published maps; it is
/// not meant to be a geodetically exact transform. Latitudes of ±90° diverge.
pub fn project_to_plane(longitude: f64, latitude: f64) -> ProjectedCoordinate {
    let east = longitude * DEG_TO_RAD;
    let north = latitude * DEG_TO_RAD;
    let northing = NORTHING_FACTOR * ((1.0 + north.sin()) / (1.0 - north.sin())).ln();
    Coord {
        x: SEMI_MAJOR_AXIS * east,
        y: northing,
    }
}

/// Returns `n + 2` (longitude, latitude) points along the geodesic from A to B:
/// the origin, `n` evenly spaced intermediate points, then the destination.
pub fn great_circle_points(
    lon_a: f64,
    lat_a: f64,
    lon_b: f64,
    lat_b: f64,
    n: usize,
) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(n + 2);
    points.push((lon_a, lat_a));

    if n > 0 {
        if lon_a == lon_b && lat_a == lat_b {
            points.extend(std::iter::repeat((lon_a, lat_a)).take(n));
        } else {
            let geod = Geodesic::new(SEMI_MAJOR_AXIS, 1.0 / INVERSE_FLATTENING);
            let (distance, azimuth, _, _): (f64, f64, f64, f64) =
                geod.inverse(lat_a, lon_a, lat_b, lon_b);
            let step = distance / (n as f64 + 1.0);

            for i in 1..=n {
                let (lat, lon): (f64, f64) = geod.direct(lat_a, lon_a, azimuth, step * i as f64);
                points.push((lon, lat));
            }
        }
    }

    points.push((lon_b, lat_b));
    points
}

/// Projected polyline of the arc between two airports.
pub fn route_polyline(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64, n: usize) -> LineString<f64> {
    LineString::new(
        great_circle_points(lon_a, lat_a, lon_b, lat_b, n)
            .into_iter()
            .map(|(lon, lat)| project_to_plane(lon, lat))
            .collect(),
    )
}

/// Default map window: every longitude, latitudes from 66°S to 70°N.
pub fn map_bounds() -> Rect<f64> {
    Rect::new(project_to_plane(-180.0, -66.0), project_to_plane(180.0, 70.0))
}
