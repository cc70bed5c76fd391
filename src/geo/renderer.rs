//! Road network rendering.
//!
//! Renders road centerlines to the egui canvas.

use super::{MapProjection, RoadNetwork};
use eframe::egui::{Painter, Pos2, Stroke};
use geo_types::Coord;

/// Renders every road that intersects the visible area.
pub fn render_roads(
    painter: &Painter,
    network: &RoadNetwork,
    projection: &MapProjection,
    stroke: Stroke,
) {
    for road in network.roads() {
        render_line_string(painter, &road.0, projection, stroke);
    }
}

/// Renders a single polyline.
fn render_line_string(
    painter: &Painter,
    coords: &[Coord<f64>],
    projection: &MapProjection,
    stroke: Stroke,
) {
    if coords.len() < 2 {
        return;
    }

    // Quick bounding box check for visibility
    let (min_lon, max_lon, min_lat, max_lat) = coords.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), c| {
            (
                min_x.min(c.x),
                max_x.max(c.x),
                min_y.min(c.y),
                max_y.max(c.y),
            )
        },
    );

    if !projection.bbox_visible(min_lon, min_lat, max_lon, max_lat) {
        return;
    }

    let screen_points: Vec<Pos2> = coords
        .iter()
        .map(|c| projection.geo_to_screen(*c))
        .collect();

    for window in screen_points.windows(2) {
        if let [p1, p2] = window {
            // Skip sub-pixel segments
            let dist_sq = (p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2);
            if dist_sq > 0.5 {
                painter.line_segment([*p1, *p2], stroke);
            }
        }
    }
}
