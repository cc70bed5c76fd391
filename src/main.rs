#![warn(clippy::all)]

//! SnapMap - a map demo that switches between raw and road-snapped location.
//!
//! The screen shows the user's location puck on a street-level map, a
//! "Snap to Roads" toggle, and five markers that follow the latest fix.

mod ui;

use eframe::egui;
use snapmap::geo::{FollowingCamera, RoadNetwork};
use snapmap::location::{LocationProvider, RawDeviceProvider, RoadSnappingProvider};
use snapmap::{MapSession, MapView, Settings};
use std::time::Duration;
use web_time::Instant;

/// How often to repaint while waiting for provider output.
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "SnapMap",
        native_options,
        Box::new(|cc| Ok(Box::new(SnapMapApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(SnapMapApp::new(cc)))),
            )
            .await;

        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// The demo screen.
pub struct SnapMapApp {
    /// Selector, markers and map state
    session: MapSession<MapView>,

    /// Roads drawn under the markers (also used for snapping)
    roads: RoadNetwork,
}

impl SnapMapApp {
    /// Creates a new SnapMapApp instance.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::load();
        let roads = settings.road_network();
        let (raw, road_snapping) = build_providers(&settings, &roads);

        let camera = FollowingCamera::new(settings.follow_zoom, settings.zoom_updates_allowed);
        let session = MapSession::new(
            MapView::new(camera),
            raw,
            road_snapping,
            settings.marker_icon(),
        );

        log::info!(
            "SnapMap ready: {} road(s), follow zoom {}",
            roads.len(),
            settings.follow_zoom
        );

        Self { session, roads }
    }
}

/// Providers backed by a simulated drive around the configured track.
///
/// Both tracks share one epoch so the simulated device does not jump when
/// the providers are swapped.
#[cfg(not(target_arch = "wasm32"))]
fn build_providers(
    settings: &Settings,
    roads: &RoadNetwork,
) -> (Box<dyn LocationProvider>, Box<dyn LocationProvider>) {
    use snapmap::location::SimulatedTrack;

    let epoch = Instant::now();
    let track = || {
        SimulatedTrack::new(settings.track_coords(), settings.update_interval(), epoch)
            .with_jitter(settings.jitter_m)
            .with_samples_per_leg(settings.samples_per_leg)
    };

    let raw = RawDeviceProvider::new(Box::new(track()));
    let road_snapping = RoadSnappingProvider::new(Box::new(track()), roads.clone())
        .with_max_snap_distance(settings.max_snap_distance_m);
    (Box::new(raw), Box::new(road_snapping))
}

/// Providers backed by the browser's geolocation.
#[cfg(target_arch = "wasm32")]
fn build_providers(
    settings: &Settings,
    roads: &RoadNetwork,
) -> (Box<dyn LocationProvider>, Box<dyn LocationProvider>) {
    use snapmap::location::BrowserGeolocation;

    let raw = RawDeviceProvider::new(Box::new(BrowserGeolocation::new()));
    let road_snapping =
        RoadSnappingProvider::new(Box::new(BrowserGeolocation::new()), roads.clone())
            .with_max_snap_distance(settings.max_snap_distance_m);
    (Box::new(raw), Box::new(road_snapping))
}

impl eframe::App for SnapMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll(Instant::now());

        ui::render_canvas(ctx, &mut self.session, &self.roads);

        if ui::render_snap_toggle(ctx, self.session.snapping_state()) {
            let kind = self.session.toggle_snapping();
            log::info!("Toggle tapped, now using {}", kind.label());
        }

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
