//! Provider that forwards device positions unmodified.

use super::{
    forward_source_event, Delegate, LocationProvider, PositionSource, ProviderKind,
};
use web_time::Instant;

/// Reports raw device positions as they arrive.
pub struct RawDeviceProvider {
    source: Box<dyn PositionSource>,
    delegate: Option<Delegate>,
    updating: bool,
}

impl RawDeviceProvider {
    pub fn new(source: Box<dyn PositionSource>) -> Self {
        Self {
            source,
            delegate: None,
            updating: false,
        }
    }
}

impl LocationProvider for RawDeviceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::RawDevice
    }

    fn set_delegate(&mut self, delegate: Option<Delegate>) {
        self.delegate = delegate;
    }

    fn start_updating_location(&mut self) {
        log::debug!("Raw device provider: start updating");
        self.source.start();
        self.updating = true;
    }

    fn stop_updating_location(&mut self) {
        log::debug!("Raw device provider: stop updating");
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
        for event in self.source.poll(now) {
            forward_source_event(self.delegate.as_ref(), self.kind(), event, |s| s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationEvent, SimulatedTrack};
    use geo_types::Coord;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    fn provider(epoch: Instant) -> RawDeviceProvider {
        let track = SimulatedTrack::new(
            vec![Coord { x: -122.0, y: 37.0 }, Coord { x: -122.0, y: 37.001 }],
            Duration::from_secs(1),
            epoch,
        );
        RawDeviceProvider::new(Box::new(track))
    }

    #[test]
    fn test_nothing_delivered_until_started() {
        let epoch = Instant::now();
        let (sender, receiver) = channel();
        let mut provider = provider(epoch);
        provider.set_delegate(Some(Delegate::new(1, sender)));

        provider.poll(epoch);
        assert!(receiver.try_recv().is_err());

        provider.start_updating_location();
        assert!(provider.is_updating());
        provider.poll(epoch);
        let events: Vec<_> = receiver.try_iter().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e.event, LocationEvent::LocationUpdated(_))));
        assert!(events.iter().all(|e| e.source == ProviderKind::RawDevice));
    }

    #[test]
    fn test_cleared_delegate_receives_nothing() {
        let epoch = Instant::now();
        let (sender, receiver) = channel();
        let mut provider = provider(epoch);
        provider.set_delegate(Some(Delegate::new(1, sender)));
        provider.start_updating_location();
        provider.set_delegate(None);

        provider.poll(epoch);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_raw_fix_is_unmodified() {
        let epoch = Instant::now();
        let (sender, receiver) = channel();
        let mut provider = provider(epoch);
        provider.set_delegate(Some(Delegate::new(1, sender)));
        provider.start_updating_location();
        provider.poll(epoch);

        let fix = receiver
            .try_iter()
            .find_map(|e| match e.event {
                LocationEvent::LocationUpdated(fixes) => fixes.first().copied(),
                _ => None,
            })
            .unwrap();
        assert_eq!(fix.latitude, 37.0);
        assert_eq!(fix.longitude, -122.0);
    }
}
