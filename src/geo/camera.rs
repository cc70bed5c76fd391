//! Camera that keeps the user's location centered.

use geo_types::Coord;

/// Default zoom while following the user.
pub const DEFAULT_FOLLOW_ZOOM: f64 = 17.0;

const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 22.0;

/// Follows the location puck at a fixed zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowingCamera {
    /// Last followed position (x = lon, y = lat)
    pub center: Option<Coord<f64>>,
    /// Zoom level used while following
    pub zoom: f64,
    /// Whether user gestures may change the zoom
    pub zoom_updates_allowed: bool,
}

impl Default for FollowingCamera {
    fn default() -> Self {
        Self {
            center: None,
            zoom: DEFAULT_FOLLOW_ZOOM,
            zoom_updates_allowed: false,
        }
    }
}

impl FollowingCamera {
    pub fn new(zoom: f64, zoom_updates_allowed: bool) -> Self {
        Self {
            center: None,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            zoom_updates_allowed,
        }
    }

    /// Recenters on a new position.
    pub fn follow(&mut self, coord: Coord<f64>) {
        self.center = Some(coord);
    }

    /// Applies a zoom gesture. Ignored when zoom updates are not allowed.
    ///
    /// Returns true if the zoom changed.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        if !self.zoom_updates_allowed || delta == 0.0 {
            return false;
        }
        let zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let changed = zoom != self.zoom;
        self.zoom = zoom;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_locked_by_default() {
        let mut camera = FollowingCamera::default();
        assert!(!camera.zoom_by(1.0));
        assert_eq!(camera.zoom, DEFAULT_FOLLOW_ZOOM);
    }

    #[test]
    fn test_zoom_clamped_when_allowed() {
        let mut camera = FollowingCamera::new(21.5, true);
        assert!(camera.zoom_by(5.0));
        assert_eq!(camera.zoom, MAX_ZOOM);
        assert!(!camera.zoom_by(1.0));
    }

    #[test]
    fn test_follow_recenters() {
        let mut camera = FollowingCamera::default();
        assert_eq!(camera.center, None);
        camera.follow(Coord { x: 1.0, y: 2.0 });
        assert_eq!(camera.center, Some(Coord { x: 1.0, y: 2.0 }));
    }
}
