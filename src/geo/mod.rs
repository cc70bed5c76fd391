//! Geographic helpers: projection, following camera, and the road network.
//!
//! Distances are computed in a local equirectangular frame, which is
//! accurate to well under a meter over the few hundred meters a snapping
//! query or a street-level view covers.

mod camera;
mod projection;
mod renderer;
mod roads;

pub use camera::{FollowingCamera, DEFAULT_FOLLOW_ZOOM};
pub use projection::MapProjection;
pub use renderer::render_roads;
pub use roads::{RoadNetwork, RoadNetworkError, SnapResult};

use geo_types::Coord;

/// Meters spanned by one degree of latitude.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Moves a coordinate by the given east/north distances in meters.
pub fn offset_meters(coord: Coord<f64>, east_m: f64, north_m: f64) -> Coord<f64> {
    let lat_scale = coord.y.to_radians().cos().max(1e-6);
    Coord {
        x: coord.x + east_m / (METERS_PER_DEGREE * lat_scale),
        y: coord.y + north_m / METERS_PER_DEGREE,
    }
}

/// Converts `coord` to meters east/north of `origin`.
pub fn to_local_meters(origin: Coord<f64>, coord: Coord<f64>) -> (f64, f64) {
    let lat_scale = origin.y.to_radians().cos();
    (
        (coord.x - origin.x) * METERS_PER_DEGREE * lat_scale,
        (coord.y - origin.y) * METERS_PER_DEGREE,
    )
}

/// Inverse of [`to_local_meters`].
pub fn from_local_meters(origin: Coord<f64>, east_m: f64, north_m: f64) -> Coord<f64> {
    offset_meters(origin, east_m, north_m)
}

/// Initial bearing from `from` to `to`, degrees clockwise from north.
pub fn bearing_deg(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let (east, north) = to_local_meters(from, to);
    east.atan2(north).to_degrees().rem_euclid(360.0)
}
