//! Centralized color constants for the UI.

use eframe::egui::Color32;

/// Colors for the map canvas.
pub mod canvas {
    use super::Color32;

    /// Background color.
    pub const BACKGROUND: Color32 = Color32::from_rgb(236, 232, 224);
    /// Road fill.
    pub const ROAD: Color32 = Color32::from_rgb(255, 255, 255);
    /// Road outline, drawn wider underneath the fill.
    pub const ROAD_CASING: Color32 = Color32::from_rgb(200, 194, 184);
    /// Overlay text.
    pub const OVERLAY_TEXT: Color32 = Color32::from_rgb(60, 60, 70);
    /// Overlay error text.
    pub const OVERLAY_ERROR: Color32 = Color32::from_rgb(200, 40, 40);
}

/// Colors for the decorative markers.
pub mod markers {
    use super::Color32;

    pub const FILL: Color32 = Color32::from_rgb(230, 70, 60);
    pub const STROKE: Color32 = Color32::from_rgb(140, 30, 25);
}

/// Colors for the user location puck.
pub mod puck {
    use super::Color32;

    pub const FILL: Color32 = Color32::from_rgb(30, 120, 255);
    pub const STROKE: Color32 = Color32::WHITE;
    pub const HEADING: Color32 = Color32::from_rgb(30, 120, 255);

    /// Soft halo around the puck - requires alpha, use function.
    pub fn halo() -> Color32 {
        Color32::from_rgba_unmultiplied(30, 120, 255, 50)
    }
}
