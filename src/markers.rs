//! Decorative markers laid out around the latest location fix.
//!
//! The layout is a fixed constellation of five points offset from a single
//! anchor. It holds no state of its own beyond the anchor: every update
//! recomputes the whole set and replaces what the display shows.

use crate::display::{MapDisplay, MarkerManagerId};
use crate::location::LocationFix;
use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// Marker offsets from the anchor as (Δlat, Δlon) in degrees, in display order.
pub const MARKER_OFFSETS: [(f64, f64); 5] = [
    (0.0001, -0.0001),
    (-0.0001, -0.0001),
    (-0.0001, 0.0001),
    (0.0002, -0.0002),
    (-0.0002, 0.0002),
];

/// Icon used when none is configured.
pub const DEFAULT_ICON: &str = "polygon2";

/// Named image used to draw a marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconRef(pub String);

impl IconRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for IconRef {
    fn default() -> Self {
        Self::new(DEFAULT_ICON)
    }
}

/// Which point of the icon sits on the marker coordinate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconAnchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl IconAnchor {
    /// Offset from the icon's top-left corner to its anchor point,
    /// for an icon of `width` x `height`.
    pub fn offset_in_icon(&self, width: f32, height: f32) -> (f32, f32) {
        let (fx, fy) = match self {
            IconAnchor::Center => (0.5, 0.5),
            IconAnchor::Top => (0.5, 0.0),
            IconAnchor::Bottom => (0.5, 1.0),
            IconAnchor::Left => (0.0, 0.5),
            IconAnchor::Right => (1.0, 0.5),
            IconAnchor::TopLeft => (0.0, 0.0),
            IconAnchor::TopRight => (1.0, 0.0),
            IconAnchor::BottomLeft => (0.0, 1.0),
            IconAnchor::BottomRight => (1.0, 1.0),
        };
        (width * fx, height * fy)
    }
}

/// A single point annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Position (x = lon, y = lat)
    pub coordinate: Coord<f64>,
    pub icon: IconRef,
    pub anchor: IconAnchor,
}

/// Coordinates of the five markers around `(latitude, longitude)`.
pub fn marker_coordinates(latitude: f64, longitude: f64) -> [Coord<f64>; 5] {
    MARKER_OFFSETS.map(|(d_lat, d_lon)| Coord {
        x: longitude + d_lon,
        y: latitude + d_lat,
    })
}

/// Builds the marker set for an anchor. Pure: same input, same output.
pub fn compute_markers(latitude: f64, longitude: f64, icon: &IconRef) -> Vec<Marker> {
    marker_coordinates(latitude, longitude)
        .into_iter()
        .map(|coordinate| Marker {
            coordinate,
            icon: icon.clone(),
            anchor: IconAnchor::Bottom,
        })
        .collect()
}

/// Regenerates and republishes the marker set whenever the anchor moves.
#[derive(Debug, Default)]
pub struct MarkerLayoutGenerator {
    icon: IconRef,
    anchor: Option<LocationFix>,
    /// Created on first publish and reused afterwards
    manager: Option<MarkerManagerId>,
}

impl MarkerLayoutGenerator {
    pub fn new(icon: IconRef) -> Self {
        Self {
            icon,
            anchor: None,
            manager: None,
        }
    }

    /// The most recent fix, if any has been received.
    pub fn anchor(&self) -> Option<&LocationFix> {
        self.anchor.as_ref()
    }

    /// Markers for the current anchor; empty before the first fix.
    pub fn markers(&self) -> Vec<Marker> {
        match &self.anchor {
            Some(fix) => compute_markers(fix.latitude, fix.longitude, &self.icon),
            None => Vec::new(),
        }
    }

    /// Stores `fix` as the sole anchor and republishes.
    pub fn on_location_update(&mut self, fix: LocationFix, display: &mut dyn MapDisplay) {
        self.anchor = Some(fix);
        self.publish(display);
    }

    /// Replaces the display's markers with those for the current anchor.
    ///
    /// Does nothing before the first fix, leaving the display empty.
    pub fn publish(&mut self, display: &mut dyn MapDisplay) {
        if self.anchor.is_none() {
            log::trace!("No anchor yet, nothing to publish");
            return;
        }

        let manager = match self.manager {
            Some(manager) => manager,
            None => {
                let manager = display.create_marker_manager();
                self.manager = Some(manager);
                manager
            }
        };

        let markers = self.markers();
        log::debug!("Publishing {} markers to {:?}", markers.len(), manager);
        display.replace_markers(manager, markers);
    }
}
