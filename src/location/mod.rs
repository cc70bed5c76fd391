//! Location fixes, provider events, and the provider capability.
//!
//! Providers never call back into their consumer directly. Instead each
//! provider holds a [`Delegate`]: a channel sender tagged with the
//! registration it was handed out under. The selector drains the channel on
//! the UI thread and discards anything tagged with a registration that is no
//! longer active, so a replaced provider cannot deliver ghost updates.

#[cfg(target_arch = "wasm32")]
mod browser;
mod raw;
mod snapping;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserGeolocation;
pub use raw::RawDeviceProvider;
pub use snapping::{RoadSnappingProvider, DEFAULT_MAX_SNAP_DISTANCE_M};
pub use source::{PositionSource, RawSample, SimulatedTrack, SourceEvent};

use chrono::{DateTime, Utc};
use geo_types::Coord;
use std::sync::mpsc::Sender;
use web_time::Instant;

/// A single observed position, stamped when it was received.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    pub received_at: DateTime<Utc>,
}

impl LocationFix {
    /// Creates a fix stamped with the current time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            received_at: Utc::now(),
        }
    }

    /// Creates a fix from a geographic coordinate (x = lon, y = lat).
    pub fn from_coord(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }

    /// Returns the fix as a geographic coordinate (x = lon, y = lat).
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// Direction of travel in degrees clockwise from true north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    pub degrees: f64,
}

impl Heading {
    /// Creates a heading, normalizing into `[0, 360)`.
    pub fn new(degrees: f64) -> Self {
        Self {
            degrees: degrees.rem_euclid(360.0),
        }
    }
}

/// Location permission as last reported by a provider.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Authorized,
    Denied,
}

impl AuthorizationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AuthorizationStatus::NotDetermined => "not determined",
            AuthorizationStatus::Authorized => "authorized",
            AuthorizationStatus::Denied => "denied",
        }
    }
}

/// Errors a location provider can report through its delegate.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationError {
    /// The user or platform refused location access.
    PermissionDenied,
    /// The position source could not produce a position.
    PositionUnavailable(String),
    /// The position source did not answer in time.
    Timeout,
    /// Road snapping was requested without any roads to snap to.
    NoRoadNetwork,
    /// Anything else the platform reports.
    Other(String),
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "Location permission denied"),
            LocationError::PositionUnavailable(msg) => write!(f, "Position unavailable: {}", msg),
            LocationError::Timeout => write!(f, "Location request timed out"),
            LocationError::NoRoadNetwork => write!(f, "No road network loaded for snapping"),
            LocationError::Other(msg) => write!(f, "Location error: {}", msg),
        }
    }
}

impl std::error::Error for LocationError {}

/// The closed set of notifications a provider sends to its delegate.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// One or more new fixes, oldest first.
    LocationUpdated(Vec<LocationFix>),
    HeadingUpdated(Heading),
    Failed(LocationError),
    AuthorizationChanged(AuthorizationStatus),
}

/// Which provider variant produced (or should produce) location updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    RawDevice,
    RoadSnapping,
}

impl ProviderKind {
    /// Provider selected for a given snapping flag.
    pub fn for_snapping(enabled: bool) -> Self {
        if enabled {
            ProviderKind::RoadSnapping
        } else {
            ProviderKind::RawDevice
        }
    }

    /// Human-readable label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::RawDevice => "Device GPS",
            ProviderKind::RoadSnapping => "Road snapping",
        }
    }
}

/// Identifies one delegate registration handed out by the selector.
pub type RegistrationId = u64;

/// An event as it travels through the delegate channel.
#[derive(Debug, Clone)]
pub struct ProviderEvent {
    pub registration: RegistrationId,
    pub source: ProviderKind,
    pub event: LocationEvent,
}

/// The receiving end a provider reports to.
#[derive(Debug, Clone)]
pub struct Delegate {
    registration: RegistrationId,
    sender: Sender<ProviderEvent>,
}

impl Delegate {
    pub fn new(registration: RegistrationId, sender: Sender<ProviderEvent>) -> Self {
        Self {
            registration,
            sender,
        }
    }

    pub fn registration(&self) -> RegistrationId {
        self.registration
    }

    /// Sends an event tagged with this registration.
    pub fn notify(&self, source: ProviderKind, event: LocationEvent) {
        let event = ProviderEvent {
            registration: self.registration,
            source,
            event,
        };
        if self.sender.send(event).is_err() {
            log::debug!(
                "Delegate receiver for registration {} is gone",
                self.registration
            );
        }
    }
}

/// Capability shared by the raw and road-snapping providers.
///
/// Providers are driven cooperatively: the owner calls [`poll`] once per
/// frame and the provider forwards whatever its position source produced to
/// the registered delegate. Nothing is delivered while no delegate is set.
///
/// [`poll`]: LocationProvider::poll
pub trait LocationProvider {
    fn kind(&self) -> ProviderKind;

    /// Replaces the delegate. `None` clears the registration.
    fn set_delegate(&mut self, delegate: Option<Delegate>);

    fn start_updating_location(&mut self);

    fn stop_updating_location(&mut self);

    fn is_updating(&self) -> bool;

    /// Pumps pending position-source output to the delegate.
    fn poll(&mut self, now: Instant);
}

/// Translates one position-source event into delegate notifications.
///
/// `map_sample` lets the road-snapping provider adjust coordinates before
/// they become fixes.
pub(crate) fn forward_source_event(
    delegate: Option<&Delegate>,
    kind: ProviderKind,
    event: SourceEvent,
    map_sample: impl FnOnce(RawSample) -> RawSample,
) {
    let Some(delegate) = delegate else {
        log::trace!("{} produced output with no delegate set", kind.label());
        return;
    };

    match event {
        SourceEvent::Sample(sample) => {
            let sample = map_sample(sample);
            delegate.notify(
                kind,
                LocationEvent::LocationUpdated(vec![LocationFix::from_coord(sample.coord)]),
            );
            if let Some(degrees) = sample.heading {
                delegate.notify(kind, LocationEvent::HeadingUpdated(Heading::new(degrees)));
            }
        }
        SourceEvent::Authorization(status) => {
            delegate.notify(kind, LocationEvent::AuthorizationChanged(status));
        }
        SourceEvent::Error(error) => {
            delegate.notify(kind, LocationEvent::Failed(error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_provider_kind_for_snapping() {
        assert_eq!(ProviderKind::for_snapping(true), ProviderKind::RoadSnapping);
        assert_eq!(ProviderKind::for_snapping(false), ProviderKind::RawDevice);
    }

    #[test]
    fn test_heading_normalization() {
        assert_eq!(Heading::new(370.0).degrees, 10.0);
        assert_eq!(Heading::new(-90.0).degrees, 270.0);
        assert_eq!(Heading::new(0.0).degrees, 0.0);
    }

    #[test]
    fn test_fix_coord_axis_order() {
        let fix = LocationFix::new(37.0, -122.0);
        let coord = fix.coord();
        assert_eq!(coord.x, -122.0);
        assert_eq!(coord.y, 37.0);

        let back = LocationFix::from_coord(coord);
        assert_eq!(back.latitude, 37.0);
        assert_eq!(back.longitude, -122.0);
    }

    #[test]
    fn test_delegate_tags_registration() {
        let (sender, receiver) = channel();
        let delegate = Delegate::new(7, sender);
        delegate.notify(
            ProviderKind::RawDevice,
            LocationEvent::AuthorizationChanged(AuthorizationStatus::Authorized),
        );

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.registration, 7);
        assert_eq!(event.source, ProviderKind::RawDevice);
    }

    #[test]
    fn test_forward_sample_with_heading() {
        let (sender, receiver) = channel();
        let delegate = Delegate::new(1, sender);
        let sample = RawSample {
            coord: Coord { x: -122.0, y: 37.0 },
            heading: Some(45.0),
        };
        forward_source_event(
            Some(&delegate),
            ProviderKind::RawDevice,
            SourceEvent::Sample(sample),
            |s| s,
        );

        let events: Vec<_> = receiver.try_iter().map(|e| e.event).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            LocationEvent::LocationUpdated(fixes) => {
                assert_eq!(fixes.len(), 1);
                assert_eq!(fixes[0].latitude, 37.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(events[1], LocationEvent::HeadingUpdated(Heading::new(45.0)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LocationError::NoRoadNetwork.to_string(),
            "No road network loaded for snapping"
        );
        assert_eq!(
            LocationError::PositionUnavailable("no fix".to_string()).to_string(),
            "Position unavailable: no fix"
        );
    }
}
