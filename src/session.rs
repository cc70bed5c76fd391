//! Wires the selector, the marker layout and the map display together.

use crate::display::MapDisplay;
use crate::location::{
    AuthorizationStatus, Heading, LocationError, LocationEvent, LocationProvider, ProviderKind,
};
use crate::markers::{IconRef, MarkerLayoutGenerator};
use crate::state::{LocationSourceSelector, SnappingState};
use web_time::Instant;

/// One map screen: a display, the provider selector feeding it, and the
/// markers that follow the latest fix.
pub struct MapSession<D: MapDisplay> {
    display: D,
    selector: LocationSourceSelector,
    markers: MarkerLayoutGenerator,
    last_heading: Option<Heading>,
    last_error: Option<LocationError>,
    authorization: AuthorizationStatus,
}

impl<D: MapDisplay> MapSession<D> {
    /// Creates the session with the raw provider active.
    pub fn new(
        mut display: D,
        raw: Box<dyn LocationProvider>,
        road_snapping: Box<dyn LocationProvider>,
        icon: IconRef,
    ) -> Self {
        let selector = LocationSourceSelector::new(raw, road_snapping, &mut display);
        Self {
            display,
            selector,
            markers: MarkerLayoutGenerator::new(icon),
            last_heading: None,
            last_error: None,
            authorization: AuthorizationStatus::NotDetermined,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn snapping_state(&self) -> SnappingState {
        self.selector.state()
    }

    pub fn active_provider(&self) -> ProviderKind {
        self.selector.active_kind()
    }

    pub fn markers(&self) -> &MarkerLayoutGenerator {
        &self.markers
    }

    pub fn last_heading(&self) -> Option<Heading> {
        self.last_heading
    }

    /// Most recent provider error, cleared by the next successful update.
    pub fn last_error(&self) -> Option<&LocationError> {
        self.last_error.as_ref()
    }

    pub fn authorization(&self) -> AuthorizationStatus {
        self.authorization
    }

    /// Handles a tap on the toggle button.
    pub fn toggle_snapping(&mut self) -> ProviderKind {
        let kind = self.selector.toggle_snapping(&mut self.display);
        self.markers.publish(&mut self.display);
        kind
    }

    /// Selects a provider and republishes markers from the last known anchor.
    pub fn set_snapping(&mut self, enabled: bool) -> ProviderKind {
        let kind = self.selector.set_snapping(enabled, &mut self.display);
        self.markers.publish(&mut self.display);
        kind
    }

    /// Pumps providers and handles their events. Returns how many were handled.
    pub fn poll(&mut self, now: Instant) -> usize {
        let events = self.selector.poll(now);
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    /// The single handler for provider notifications.
    pub fn handle_event(&mut self, event: LocationEvent) {
        match event {
            LocationEvent::LocationUpdated(fixes) => {
                // Fixes arrive oldest first
                let Some(fix) = fixes.last().copied() else {
                    log::debug!("Ignoring empty location update");
                    return;
                };
                log::debug!(
                    "Location update from {}: {:.6}, {:.6}",
                    self.active_provider().label(),
                    fix.latitude,
                    fix.longitude
                );
                self.last_error = None;
                self.display.show_user_location(&fix);
                self.markers.on_location_update(fix, &mut self.display);
            }
            LocationEvent::HeadingUpdated(heading) => {
                log::trace!("Heading update: {:.1}", heading.degrees);
                self.last_heading = Some(heading);
                self.display.show_user_heading(heading);
            }
            LocationEvent::Failed(error) => {
                log::warn!("{} failed: {}", self.active_provider().label(), error);
                self.last_error = Some(error);
            }
            LocationEvent::AuthorizationChanged(status) => {
                if status == AuthorizationStatus::Denied {
                    log::warn!("Location authorization denied");
                } else {
                    log::info!("Location authorization: {}", status.label());
                }
                self.authorization = status;
            }
        }
    }
}
