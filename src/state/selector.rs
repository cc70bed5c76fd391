//! Chooses which location provider feeds the map.

use super::SnappingState;
use crate::display::MapDisplay;
use crate::location::{
    Delegate, LocationEvent, LocationProvider, ProviderEvent, ProviderKind, RegistrationId,
};
use std::sync::mpsc::{channel, Receiver, Sender};
use web_time::Instant;

/// Maps the snapping flag onto one of two providers.
///
/// Exactly one provider holds a delegate at a time. Every selection hands
/// out a fresh [`RegistrationId`]; events still in flight from an earlier
/// registration are dropped when the channel is drained.
pub struct LocationSourceSelector {
    state: SnappingState,
    raw: Box<dyn LocationProvider>,
    road_snapping: Box<dyn LocationProvider>,
    active_registration: Option<RegistrationId>,
    next_registration: RegistrationId,
    sender: Sender<ProviderEvent>,
    receiver: Receiver<ProviderEvent>,
}

impl LocationSourceSelector {
    /// Creates the selector and activates the raw provider.
    pub fn new(
        raw: Box<dyn LocationProvider>,
        road_snapping: Box<dyn LocationProvider>,
        display: &mut dyn MapDisplay,
    ) -> Self {
        let (sender, receiver) = channel();
        let mut selector = Self {
            state: SnappingState::default(),
            raw,
            road_snapping,
            active_registration: None,
            next_registration: 1,
            sender,
            receiver,
        };
        selector.set_snapping(false, display);
        selector
    }

    pub fn state(&self) -> SnappingState {
        self.state
    }

    /// Kind of the provider currently registered.
    pub fn active_kind(&self) -> ProviderKind {
        self.state.provider()
    }

    pub fn active_registration(&self) -> Option<RegistrationId> {
        self.active_registration
    }

    /// Sets the snapping flag and swaps providers accordingly.
    ///
    /// Always performs the full sequence, even when the flag is unchanged:
    /// release the old provider, override the display, register a fresh
    /// delegate, start updates.
    pub fn set_snapping(&mut self, enabled: bool, display: &mut dyn MapDisplay) -> ProviderKind {
        self.state.enabled = enabled;
        let kind = self.state.provider();

        self.release_providers();
        display.override_location_provider(kind);

        let registration = self.next_registration;
        self.next_registration += 1;
        self.active_registration = Some(registration);

        let delegate = Delegate::new(registration, self.sender.clone());
        let provider = self.provider_mut(kind);
        provider.set_delegate(Some(delegate));
        provider.start_updating_location();

        log::info!(
            "Snapping {}: {} active (registration {})",
            if enabled { "enabled" } else { "disabled" },
            kind.label(),
            registration
        );
        kind
    }

    /// Flips the snapping flag.
    pub fn toggle_snapping(&mut self, display: &mut dyn MapDisplay) -> ProviderKind {
        self.set_snapping(!self.state.enabled, display)
    }

    /// Pumps the active provider and returns its events in delivery order.
    pub fn poll(&mut self, now: Instant) -> Vec<LocationEvent> {
        let kind = self.active_kind();
        self.provider_mut(kind).poll(now);

        let active = self.active_registration;
        let mut events = Vec::new();
        for event in self.receiver.try_iter() {
            if Some(event.registration) == active {
                events.push(event.event);
            } else {
                log::debug!(
                    "Dropping stale event from {} (registration {})",
                    event.source.label(),
                    event.registration
                );
            }
        }
        events
    }

    fn release_providers(&mut self) {
        for provider in [&mut self.raw, &mut self.road_snapping] {
            if provider.is_updating() {
                provider.stop_updating_location();
            }
            provider.set_delegate(None);
        }
    }

    fn provider_mut(&mut self, kind: ProviderKind) -> &mut dyn LocationProvider {
        match kind {
            ProviderKind::RawDevice => self.raw.as_mut(),
            ProviderKind::RoadSnapping => self.road_snapping.as_mut(),
        }
    }
}
