//! Road network used by the road-snapping provider.

use super::{bearing_deg, from_local_meters, to_local_meters};
use geo_types::{Coord, LineString};
use geojson::{Feature, GeoJson, Geometry, Value};

/// Errors that can occur while loading a road network.
#[derive(Debug, Clone, PartialEq)]
pub enum RoadNetworkError {
    /// The input was not valid GeoJSON.
    Parse(String),
}

impl std::fmt::Display for RoadNetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoadNetworkError::Parse(msg) => write!(f, "Failed to parse road GeoJSON: {}", msg),
        }
    }
}

impl std::error::Error for RoadNetworkError {}

/// The closest point on the network to a query position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Matched position on the road (x = lon, y = lat)
    pub coord: Coord<f64>,
    /// Distance from the query position in meters
    pub distance_m: f64,
    /// Index of the matched road
    pub road_index: usize,
    /// Bearing of the matched segment in its drawing direction
    pub bearing_deg: f64,
}

impl SnapResult {
    /// Picks the road direction (forward or reverse) closest to `heading`.
    pub fn align_bearing(&self, heading: f64) -> f64 {
        let reverse = (self.bearing_deg + 180.0).rem_euclid(360.0);
        if angle_between(heading, self.bearing_deg) <= angle_between(heading, reverse) {
            self.bearing_deg
        } else {
            reverse
        }
    }
}

fn angle_between(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// A set of road centerlines.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    roads: Vec<LineString<f64>>,
}

impl RoadNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from polylines. Lines with fewer than two points are dropped.
    pub fn from_lines(roads: Vec<LineString<f64>>) -> Self {
        Self {
            roads: roads.into_iter().filter(|r| r.0.len() >= 2).collect(),
        }
    }

    /// Loads every `LineString` and `MultiLineString` in a GeoJSON document.
    ///
    /// Other geometry types are ignored.
    pub fn from_geojson(geojson_str: &str) -> Result<Self, RoadNetworkError> {
        let geojson: GeoJson = geojson_str
            .parse()
            .map_err(|e| RoadNetworkError::Parse(format!("{}", e)))?;

        let mut lines = Vec::new();
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in &fc.features {
                    collect_feature(feature, &mut lines);
                }
            }
            GeoJson::Feature(f) => collect_feature(&f, &mut lines),
            GeoJson::Geometry(g) => collect_geometry(&g, &mut lines),
        }

        log::debug!("Loaded {} road(s) from GeoJSON", lines.len());
        Ok(Self::from_lines(lines))
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn roads(&self) -> &[LineString<f64>] {
        &self.roads
    }

    /// Finds the closest point on any road within `max_distance_m` of `coord`.
    pub fn snap(&self, coord: Coord<f64>, max_distance_m: f64) -> Option<SnapResult> {
        let mut best: Option<SnapResult> = None;

        for (road_index, road) in self.roads.iter().enumerate() {
            for line in road.lines() {
                // Work in meters relative to the query point
                let a = to_local_meters(coord, line.start);
                let b = to_local_meters(coord, line.end);
                let (dx, dy) = (b.0 - a.0, b.1 - a.1);
                let len_sq = dx * dx + dy * dy;
                let t = if len_sq == 0.0 {
                    0.0
                } else {
                    (-(a.0 * dx + a.1 * dy) / len_sq).clamp(0.0, 1.0)
                };
                let (px, py) = (a.0 + dx * t, a.1 + dy * t);
                let distance_m = (px * px + py * py).sqrt();

                if distance_m > max_distance_m {
                    continue;
                }
                if best.is_some_and(|b| b.distance_m <= distance_m) {
                    continue;
                }

                best = Some(SnapResult {
                    coord: from_local_meters(coord, px, py),
                    distance_m,
                    road_index,
                    bearing_deg: bearing_deg(line.start, line.end),
                });
            }
        }

        best
    }
}

fn collect_feature(feature: &Feature, lines: &mut Vec<LineString<f64>>) {
    if let Some(geometry) = &feature.geometry {
        collect_geometry(geometry, lines);
    }
}

fn collect_geometry(geometry: &Geometry, lines: &mut Vec<LineString<f64>>) {
    match &geometry.value {
        Value::LineString(coords) => {
            lines.push(to_line_string(coords));
        }
        Value::MultiLineString(parts) => {
            lines.extend(parts.iter().map(|coords| to_line_string(coords)));
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry(g, lines);
            }
        }
        _ => {}
    }
}

fn to_line_string(coords: &[Vec<f64>]) -> LineString<f64> {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| Coord { x: c[0], y: c[1] })
        .collect::<Vec<_>>()
        .into()
}
