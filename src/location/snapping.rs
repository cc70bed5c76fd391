//! Provider that matches device positions onto the road network.

use super::{
    forward_source_event, Delegate, LocationError, LocationEvent, LocationProvider,
    PositionSource, ProviderKind, RawSample,
};
use crate::geo::RoadNetwork;
use web_time::Instant;

/// Default search radius for road matching.
pub const DEFAULT_MAX_SNAP_DISTANCE_M: f64 = 30.0;

/// Reports device positions moved onto the nearest road.
///
/// Matching is passive: a fix farther than `max_snap_distance_m` from every
/// road is reported unchanged rather than dropped. When snapped, the heading
/// follows the road direction closest to the device's own heading.
pub struct RoadSnappingProvider {
    source: Box<dyn PositionSource>,
    network: RoadNetwork,
    max_snap_distance_m: f64,
    delegate: Option<Delegate>,
    updating: bool,
}

impl RoadSnappingProvider {
    pub fn new(source: Box<dyn PositionSource>, network: RoadNetwork) -> Self {
        Self {
            source,
            network,
            max_snap_distance_m: DEFAULT_MAX_SNAP_DISTANCE_M,
            delegate: None,
            updating: false,
        }
    }

    pub fn with_max_snap_distance(mut self, meters: f64) -> Self {
        self.max_snap_distance_m = meters.max(0.0);
        self
    }

    fn snap(network: &RoadNetwork, max_distance_m: f64, sample: RawSample) -> RawSample {
        match network.snap(sample.coord, max_distance_m) {
            Some(result) => RawSample {
                coord: result.coord,
                heading: Some(match sample.heading {
                    Some(heading) => result.align_bearing(heading),
                    None => result.bearing_deg,
                }),
            },
            None => sample,
        }
    }
}

impl LocationProvider for RoadSnappingProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::RoadSnapping
    }

    fn set_delegate(&mut self, delegate: Option<Delegate>) {
        self.delegate = delegate;
    }

    fn start_updating_location(&mut self) {
        if self.network.is_empty() {
            log::warn!("Road snapping provider cannot start: no road network loaded");
            if let Some(delegate) = &self.delegate {
                delegate.notify(
                    self.kind(),
                    LocationEvent::Failed(LocationError::NoRoadNetwork),
                );
            }
            self.updating = false;
            return;
        }

        log::debug!(
            "Road snapping provider: start updating ({} roads)",
            self.network.len()
        );
        self.source.start();
        self.updating = true;
    }

    fn stop_updating_location(&mut self) {
        log::debug!("Road snapping provider: stop updating");
        self.source.stop();
        self.updating = false;
    }

    fn is_updating(&self) -> bool {
        self.updating
    }

    fn poll(&mut self, now: Instant) {
        if !self.updating {
            return;
        }
        let kind = self.kind();
        for event in self.source.poll(now) {
            forward_source_event(self.delegate.as_ref(), kind, event, |sample| {
                Self::snap(&self.network, self.max_snap_distance_m, sample)
            });
        }
    }
}
