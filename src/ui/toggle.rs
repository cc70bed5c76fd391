//! Floating "Snap to Roads" button.

use eframe::egui::{self, Color32, RichText};
use snapmap::SnappingState;

/// Distance from the bottom of the screen to the button.
const BOTTOM_OFFSET: f32 = 50.0;
const FONT_SIZE: f32 = 25.0;
const CORNER_RADIUS: f32 = 5.0;
const HORIZONTAL_PADDING: f32 = 5.0;

/// Draws the toggle for the current state. Returns true when tapped.
pub fn render_snap_toggle(ctx: &egui::Context, state: SnappingState) -> bool {
    let indicator = state.indicator();
    let (r, g, b) = indicator.color();
    let mut tapped = false;

    egui::Area::new(egui::Id::new("snap_toggle"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -BOTTOM_OFFSET))
        .show(ctx, |ui| {
            ui.spacing_mut().button_padding = egui::vec2(HORIZONTAL_PADDING, 0.0);
            let button = egui::Button::new(
                RichText::new(indicator.title())
                    .size(FONT_SIZE)
                    .color(Color32::WHITE),
            )
            .fill(Color32::from_rgb(r, g, b))
            .corner_radius(CORNER_RADIUS);
            tapped = ui.add(button).clicked();
        });

    tapped
}
