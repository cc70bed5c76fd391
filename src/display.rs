//! The map display capability and its in-memory implementation.
//!
//! `MapDisplay` is everything the core needs from a map: which location
//! provider drives the puck, where the puck is, and which markers to show.
//! `MapView` keeps that state for the canvas to draw each frame.

use crate::geo::FollowingCamera;
use crate::location::{Heading, LocationFix, ProviderKind};
use crate::markers::Marker;

/// Handle to a group of markers owned by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerManagerId(pub usize);

/// Capability interface for the map.
pub trait MapDisplay {
    /// Makes `provider` the sole source of the user location puck.
    fn override_location_provider(&mut self, provider: ProviderKind);

    /// Creates an empty marker group.
    fn create_marker_manager(&mut self) -> MarkerManagerId;

    /// Replaces the whole contents of a marker group.
    fn replace_markers(&mut self, manager: MarkerManagerId, markers: Vec<Marker>);

    /// Moves the location puck.
    fn show_user_location(&mut self, fix: &LocationFix);

    /// Rotates the location puck's heading indicator.
    fn show_user_heading(&mut self, heading: Heading);
}

/// Map state rendered by the canvas.
#[derive(Debug, Default)]
pub struct MapView {
    location_provider: Option<ProviderKind>,
    provider_overrides: usize,
    marker_managers: Vec<Vec<Marker>>,
    marker_replacements: usize,
    user_location: Option<LocationFix>,
    user_heading: Option<Heading>,
    camera: FollowingCamera,
}

impl MapView {
    pub fn new(camera: FollowingCamera) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    /// Provider currently driving the puck.
    pub fn location_provider(&self) -> Option<ProviderKind> {
        self.location_provider
    }

    /// Number of times the location provider has been overridden.
    pub fn provider_overrides(&self) -> usize {
        self.provider_overrides
    }

    /// All displayed markers across every group, in group order.
    pub fn markers(&self) -> Vec<Marker> {
        self.marker_managers.iter().flatten().cloned().collect()
    }

    /// Number of marker groups created so far.
    pub fn marker_manager_count(&self) -> usize {
        self.marker_managers.len()
    }

    /// Number of full marker replacements so far.
    pub fn marker_replacements(&self) -> usize {
        self.marker_replacements
    }

    pub fn user_location(&self) -> Option<&LocationFix> {
        self.user_location.as_ref()
    }

    pub fn user_heading(&self) -> Option<Heading> {
        self.user_heading
    }

    pub fn camera(&self) -> &FollowingCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FollowingCamera {
        &mut self.camera
    }
}

impl MapDisplay for MapView {
    fn override_location_provider(&mut self, provider: ProviderKind) {
        if self.location_provider != Some(provider) {
            log::info!("Map location provider set to {}", provider.label());
        }
        self.location_provider = Some(provider);
        self.provider_overrides += 1;
    }

    fn create_marker_manager(&mut self) -> MarkerManagerId {
        self.marker_managers.push(Vec::new());
        MarkerManagerId(self.marker_managers.len() - 1)
    }

    fn replace_markers(&mut self, manager: MarkerManagerId, markers: Vec<Marker>) {
        match self.marker_managers.get_mut(manager.0) {
            Some(slot) => {
                *slot = markers;
                self.marker_replacements += 1;
            }
            None => log::warn!("Ignoring markers for unknown manager {:?}", manager),
        }
    }

    fn show_user_location(&mut self, fix: &LocationFix) {
        self.user_location = Some(*fix);
        self.camera.follow(fix.coord());
    }

    fn show_user_heading(&mut self, heading: Heading) {
        self.user_heading = Some(heading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::compute_markers;

    #[test]
    fn test_replace_is_full_replace() {
        let mut view = MapView::default();
        let manager = view.create_marker_manager();
        view.replace_markers(manager, compute_markers(1.0, 2.0, &Default::default()));
        view.replace_markers(manager, compute_markers(3.0, 4.0, &Default::default())[..2].to_vec());

        let markers = view.markers();
        assert_eq!(markers.len(), 2);
        assert!((markers[0].coordinate.y - 3.0001).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_manager_ignored() {
        let mut view = MapView::default();
        view.replace_markers(MarkerManagerId(3), compute_markers(1.0, 2.0, &Default::default()));
        assert!(view.markers().is_empty());
        assert_eq!(view.marker_replacements(), 0);
    }

    #[test]
    fn test_location_moves_camera() {
        let mut view = MapView::default();
        view.show_user_location(&LocationFix::new(37.0, -122.0));
        assert_eq!(view.camera().center.map(|c| (c.x, c.y)), Some((-122.0, 37.0)));
        assert_eq!(view.user_location().map(|f| f.latitude), Some(37.0));
    }

    #[test]
    fn test_override_replaces_provider() {
        let mut view = MapView::default();
        view.override_location_provider(ProviderKind::RawDevice);
        view.override_location_provider(ProviderKind::RoadSnapping);
        assert_eq!(view.location_provider(), Some(ProviderKind::RoadSnapping));
        assert_eq!(view.provider_overrides(), 2);
    }
}
