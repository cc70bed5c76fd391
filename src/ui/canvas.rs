//! Central canvas UI: street map with markers and the location puck.

use super::colors;
use eframe::egui::{self, Color32, Painter, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use snapmap::geo::{render_roads, MapProjection, RoadNetwork};
use snapmap::location::Heading;
use snapmap::{MapSession, MapView, Marker};

/// Marker icon size in points.
const MARKER_SIZE: Vec2 = Vec2::new(14.0, 18.0);
const PUCK_RADIUS: f32 = 8.0;
const HEADING_LENGTH: f32 = 22.0;

/// Render the map canvas for the current session.
pub fn render_canvas(
    ctx: &egui::Context,
    session: &mut MapSession<MapView>,
    roads: &RoadNetwork,
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, Sense::hover());
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, colors::canvas::BACKGROUND);

        let view = session.display();
        let center = view
            .camera()
            .center
            .or_else(|| roads.roads().first().and_then(|r| r.0.first().copied()));

        if let Some(center) = center {
            let projection = MapProjection::new(center, view.camera().zoom, rect);

            // Casing first so the fill draws over it
            render_roads(
                &painter,
                roads,
                &projection,
                Stroke::new(12.0, colors::canvas::ROAD_CASING),
            );
            render_roads(
                &painter,
                roads,
                &projection,
                Stroke::new(9.0, colors::canvas::ROAD),
            );

            for marker in view.markers() {
                render_marker(&painter, &projection, &marker);
            }

            if let Some(fix) = view.user_location() {
                let pos = projection.geo_to_screen(fix.coord());
                render_puck(&painter, pos, view.user_heading());
            }
        }

        draw_overlay_info(ui, &rect, session);

        if response.hovered() {
            let scroll_delta = ctx.input(|i| i.raw_scroll_delta);
            if scroll_delta.y != 0.0 {
                let delta = if scroll_delta.y > 0.0 { 1.0 } else { -1.0 };
                if session.display_mut().camera_mut().zoom_by(delta) {
                    log::debug!("Zoom now {}", session.display().camera().zoom);
                }
            }
        }
    });
}

/// Draws a marker as a downward triangle whose tip sits on the anchor point.
fn render_marker(painter: &Painter, projection: &MapProjection, marker: &Marker) {
    let anchor = projection.geo_to_screen(marker.coordinate);
    let (ax, ay) = marker.anchor.offset_in_icon(MARKER_SIZE.x, MARKER_SIZE.y);
    let icon_rect = Rect::from_min_size(anchor - Vec2::new(ax, ay), MARKER_SIZE);

    if !painter.clip_rect().intersects(icon_rect) {
        return;
    }

    let points = vec![
        icon_rect.left_top(),
        icon_rect.right_top(),
        Pos2::new(icon_rect.center().x, icon_rect.bottom()),
    ];
    painter.add(egui::Shape::convex_polygon(
        points,
        colors::markers::FILL,
        Stroke::new(1.5, colors::markers::STROKE),
    ));
}

/// Draws the user location puck with an optional heading arrow.
fn render_puck(painter: &Painter, pos: Pos2, heading: Option<Heading>) {
    painter.circle_filled(pos, PUCK_RADIUS * 2.5, colors::puck::halo());

    if let Some(heading) = heading {
        // Screen y grows downward, north is up
        let rad = (heading.degrees as f32).to_radians();
        let dir = Vec2::new(rad.sin(), -rad.cos());
        painter.line_segment(
            [pos, pos + dir * HEADING_LENGTH],
            Stroke::new(3.0, colors::puck::HEADING),
        );
    }

    painter.circle(
        pos,
        PUCK_RADIUS,
        colors::puck::FILL,
        Stroke::new(2.0, colors::puck::STROKE),
    );
}

fn draw_overlay_info(ui: &mut egui::Ui, rect: &Rect, session: &MapSession<MapView>) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(320.0, 110.0));

    let view = session.display();
    let position = match view.user_location() {
        Some(fix) => format!("{:.6}, {:.6}", fix.latitude, fix.longitude),
        None => "waiting for fix".to_string(),
    };

    let lines = [
        format!("Source: {}", session.active_provider().label()),
        format!("Location: {}", position),
        format!("Markers: {}", view.markers().len()),
        format!("Permission: {}", session.authorization().label()),
    ];

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            for line in lines {
                ui.label(overlay_text(line, colors::canvas::OVERLAY_TEXT));
            }
            if let Some(err) = session.last_error() {
                ui.label(overlay_text(
                    format!("Error: {}", err),
                    colors::canvas::OVERLAY_ERROR,
                ));
            }
        });
    });
}

fn overlay_text(text: String, color: Color32) -> RichText {
    RichText::new(text).monospace().size(12.0).color(color)
}
