//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lat/lon) and
//! screen coordinates for rendering on the canvas.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;

/// Degrees of latitude visible from the center to the edge at zoom 0.
const ZOOM_ZERO_RANGE_DEG: f64 = 180.0;

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Center latitude of the view
    pub center_lat: f64,
    /// Center longitude of the view
    pub center_lon: f64,
    /// Web-map style zoom level; each step halves the visible span
    pub zoom: f64,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            center_lat: 0.0,
            center_lon: 0.0,
            zoom: 17.0,
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapProjection {
    /// Creates a new projection centered on a coordinate.
    pub fn new(center: Coord<f64>, zoom: f64, screen_rect: Rect) -> Self {
        Self {
            center_lat: center.y,
            center_lon: center.x,
            zoom,
            screen_rect,
        }
    }

    /// Half-height of the visible area in degrees of latitude.
    pub fn range_deg(&self) -> f64 {
        ZOOM_ZERO_RANGE_DEG / 2f64.powf(self.zoom)
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    ///
    /// Uses a simple equirectangular projection which is adequate at
    /// street-level zoom.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let effective_range = self.range_deg();

        let rel_lon = coord.x - self.center_lon;
        let rel_lat = coord.y - self.center_lat;

        let lat_correction = self.center_lat.to_radians().cos();
        let corrected_lon = rel_lon * lat_correction;

        // Normalized (-1 to 1); screen Y increases downward
        let norm_x = corrected_lon / effective_range;
        let norm_y = -rel_lat / effective_range;

        let center = self.screen_rect.center();
        let half_size = self.screen_rect.size().min_elem() / 2.0;

        Pos2::new(
            center.x + (norm_x as f32) * half_size,
            center.y + (norm_y as f32) * half_size,
        )
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let effective_range = self.range_deg();

        let center = self.screen_rect.center();
        let half_size = self.screen_rect.size().min_elem() / 2.0;

        let norm_x = (pos.x - center.x) / half_size;
        let norm_y = (pos.y - center.y) / half_size;

        let lat_correction = self.center_lat.to_radians().cos();
        let rel_lon = (norm_x as f64) * effective_range / lat_correction;
        let rel_lat = -(norm_y as f64) * effective_range;

        Coord {
            x: self.center_lon + rel_lon,
            y: self.center_lat + rel_lat,
        }
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        (
            top_left.x.min(bottom_right.x),
            top_left.y.min(bottom_right.y),
            top_left.x.max(bottom_right.x),
            top_left.y.max(bottom_right.y),
        )
    }

    /// Checks if a bounding box intersects with the visible bounds.
    pub fn bbox_visible(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> bool {
        let (vis_min_lon, vis_min_lat, vis_max_lon, vis_max_lat) = self.visible_bounds();
        !(max_lon < vis_min_lon
            || min_lon > vis_max_lon
            || max_lat < vis_min_lat
            || min_lat > vis_max_lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> MapProjection {
        MapProjection::new(
            Coord { x: -122.0, y: 37.0 },
            17.0,
            Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        )
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let p = projection();
        let pos = p.geo_to_screen(Coord { x: -122.0, y: 37.0 });
        assert_eq!(pos, Pos2::new(400.0, 300.0));
    }

    #[test]
    fn test_north_is_up() {
        let p = projection();
        let north = p.geo_to_screen(Coord { x: -122.0, y: 37.0001 });
        let east = p.geo_to_screen(Coord { x: -121.9999, y: 37.0 });
        assert!(north.y < 300.0);
        assert!(east.x > 400.0);
    }

    #[test]
    fn test_screen_round_trip() {
        let p = projection();
        let coord = Coord { x: -122.0002, y: 37.0003 };
        let back = p.screen_to_geo(p.geo_to_screen(coord));
        assert!((back.x - coord.x).abs() < 1e-7);
        assert!((back.y - coord.y).abs() < 1e-7);
    }

    #[test]
    fn test_zoom_halves_range() {
        let mut p = projection();
        let range = p.range_deg();
        p.zoom += 1.0;
        assert!((p.range_deg() * 2.0 - range).abs() < 1e-15);
    }
}
