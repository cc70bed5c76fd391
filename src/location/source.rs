//! Raw position sources that feed the location providers.
//!
//! A source knows nothing about delegates or snapping; it only turns time
//! (or browser callbacks) into samples. Both providers wrap one.

use super::{AuthorizationStatus, LocationError};
use crate::geo::{bearing_deg, offset_meters};
use geo_types::Coord;
use std::time::Duration;
use web_time::Instant;

/// One raw position reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Position (x = lon, y = lat)
    pub coord: Coord<f64>,
    /// Direction of travel in degrees, when the source knows it
    pub heading: Option<f64>,
}

/// Output of a position source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Sample(RawSample),
    Authorization(AuthorizationStatus),
    Error(LocationError),
}

/// Something that produces raw positions.
pub trait PositionSource {
    fn start(&mut self);
    fn stop(&mut self);
    /// Returns everything produced since the last poll.
    fn poll(&mut self, now: Instant) -> Vec<SourceEvent>;
}

/// Default number of samples taken along each leg of the track.
const DEFAULT_SAMPLES_PER_LEG: u64 = 10;

/// Shortest sample interval accepted.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Replays a looped waypoint track as if a device were driving it.
///
/// The sample index is derived from the time elapsed since `epoch`, so two
/// tracks built with the same epoch agree on where the "device" is. That
/// keeps the position continuous when the demo swaps providers.
///
/// A deterministic jitter of up to `jitter_m` meters is added to every
/// sample to mimic the noise of a raw GPS fix.
pub struct SimulatedTrack {
    legs: Vec<(Coord<f64>, Coord<f64>)>,
    /// Used when the track is a single point
    fallback: Option<Coord<f64>>,
    interval: Duration,
    samples_per_leg: u64,
    jitter_m: f64,
    epoch: Instant,
    running: bool,
    last_index: Option<u64>,
    authorization_reported: bool,
}

impl SimulatedTrack {
    /// Creates a track that emits one sample per `interval`.
    ///
    /// Consecutive duplicate waypoints are ignored; the track is closed
    /// back to its first waypoint.
    pub fn new(waypoints: Vec<Coord<f64>>, interval: Duration, epoch: Instant) -> Self {
        let mut legs = Vec::new();
        if waypoints.len() > 1 {
            let closing = (waypoints[waypoints.len() - 1], waypoints[0]);
            legs = waypoints
                .windows(2)
                .map(|w| (w[0], w[1]))
                .chain(std::iter::once(closing))
                .filter(|(a, b)| a != b)
                .collect();
        }

        Self {
            legs,
            fallback: waypoints.first().copied(),
            interval: interval.max(MIN_INTERVAL),
            samples_per_leg: DEFAULT_SAMPLES_PER_LEG,
            jitter_m: 0.0,
            epoch,
            running: false,
            last_index: None,
            authorization_reported: false,
        }
    }

    /// Sets the maximum simulated GPS error in meters.
    pub fn with_jitter(mut self, jitter_m: f64) -> Self {
        self.jitter_m = jitter_m.max(0.0);
        self
    }

    /// Sets how many samples are taken along each leg.
    pub fn with_samples_per_leg(mut self, samples: u64) -> Self {
        self.samples_per_leg = samples.max(1);
        self
    }

    /// Returns true if the track has no position to report at all.
    pub fn is_empty(&self) -> bool {
        self.fallback.is_none()
    }

    /// Computes the sample with the given index. Pure in `index`.
    pub fn sample_at(&self, index: u64) -> Option<RawSample> {
        let (coord, heading) = if self.legs.is_empty() {
            (self.fallback?, None)
        } else {
            let leg = ((index / self.samples_per_leg) % self.legs.len() as u64) as usize;
            let t = (index % self.samples_per_leg) as f64 / self.samples_per_leg as f64;
            let (a, b) = self.legs[leg];
            let coord = Coord {
                x: a.x + (b.x - a.x) * t,
                y: a.y + (b.y - a.y) * t,
            };
            (coord, Some(bearing_deg(a, b)))
        };

        Some(RawSample {
            coord: self.jitter(coord, index),
            heading,
        })
    }

    fn jitter(&self, coord: Coord<f64>, index: u64) -> Coord<f64> {
        if self.jitter_m == 0.0 {
            return coord;
        }
        let phase = index as f64;
        let east = self.jitter_m * (phase * 1.7).sin();
        let north = self.jitter_m * (phase * 2.3).cos();
        offset_meters(coord, east, north)
    }

    fn index_at(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.epoch);
        (elapsed.as_secs_f64() / self.interval.as_secs_f64()) as u64
    }
}

impl PositionSource for SimulatedTrack {
    fn start(&mut self) {
        self.running = true;
        self.last_index = None;
        self.authorization_reported = false;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn poll(&mut self, now: Instant) -> Vec<SourceEvent> {
        if !self.running {
            return Vec::new();
        }

        let mut events = Vec::new();
        if !self.authorization_reported {
            self.authorization_reported = true;
            events.push(SourceEvent::Authorization(AuthorizationStatus::Authorized));
        }

        if self.is_empty() {
            events.push(SourceEvent::Error(LocationError::PositionUnavailable(
                "simulated track has no waypoints".to_string(),
            )));
            self.running = false;
            return events;
        }

        let index = self.index_at(now);
        if self.last_index != Some(index) {
            self.last_index = Some(index);
            if let Some(sample) = self.sample_at(index) {
                events.push(SourceEvent::Sample(sample));
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coord<f64>> {
        vec![
            Coord { x: -122.0, y: 37.0 },
            Coord { x: -122.0, y: 37.001 },
            Coord { x: -121.999, y: 37.001 },
            Coord { x: -121.999, y: 37.0 },
        ]
    }

    fn samples(events: &[SourceEvent]) -> Vec<RawSample> {
        events
            .iter()
            .filter_map(|e| match e {
                SourceEvent::Sample(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_no_output_before_start() {
        let epoch = Instant::now();
        let mut track = SimulatedTrack::new(square(), Duration::from_secs(1), epoch);
        assert!(track.poll(epoch).is_empty());
    }

    #[test]
    fn test_authorization_then_sample_on_first_poll() {
        let epoch = Instant::now();
        let mut track = SimulatedTrack::new(square(), Duration::from_secs(1), epoch);
        track.start();

        let events = track.poll(epoch);
        assert_eq!(
            events[0],
            SourceEvent::Authorization(AuthorizationStatus::Authorized)
        );
        let samples = samples(&events);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].coord, Coord { x: -122.0, y: 37.0 });
    }

    #[test]
    fn test_one_sample_per_interval() {
        let epoch = Instant::now();
        let mut track = SimulatedTrack::new(square(), Duration::from_secs(1), epoch);
        track.start();

        assert_eq!(samples(&track.poll(epoch)).len(), 1);
        // Same interval: nothing new
        assert!(track.poll(epoch + Duration::from_millis(500)).is_empty());
        assert_eq!(
            samples(&track.poll(epoch + Duration::from_millis(1100))).len(),
            1
        );
    }

    #[test]
    fn test_stop_silences_output() {
        let epoch = Instant::now();
        let mut track = SimulatedTrack::new(square(), Duration::from_secs(1), epoch);
        track.start();
        track.poll(epoch);
        track.stop();
        assert!(track.poll(epoch + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn test_track_loops_and_heads_north_first() {
        let epoch = Instant::now();
        let track =
            SimulatedTrack::new(square(), Duration::from_secs(1), epoch).with_samples_per_leg(2);

        let first = track.sample_at(0).unwrap();
        assert!((first.heading.unwrap() - 0.0).abs() < 1e-9);

        // 4 legs * 2 samples: index 8 wraps back to the start
        assert_eq!(track.sample_at(8), track.sample_at(0));

        let midway = track.sample_at(1).unwrap();
        assert!((midway.coord.y - 37.0005).abs() < 1e-12);
    }

    #[test]
    fn test_jitter_is_deterministic_and_bounded() {
        let epoch = Instant::now();
        let track =
            SimulatedTrack::new(square(), Duration::from_secs(1), epoch).with_jitter(5.0);
        let clean = SimulatedTrack::new(square(), Duration::from_secs(1), epoch);

        for index in 0..20 {
            let noisy = track.sample_at(index).unwrap();
            assert_eq!(Some(noisy), track.sample_at(index));

            let exact = clean.sample_at(index).unwrap();
            let (east, north) = crate::geo::to_local_meters(exact.coord, noisy.coord);
            assert!((east * east + north * north).sqrt() <= 5.0 * 2f64.sqrt() + 1e-6);
        }
    }

    #[test]
    fn test_tracks_sharing_epoch_agree() {
        let epoch = Instant::now();
        let mut a = SimulatedTrack::new(square(), Duration::from_secs(1), epoch);
        let mut b = SimulatedTrack::new(square(), Duration::from_secs(1), epoch);
        a.start();
        b.start();

        let later = epoch + Duration::from_secs(13);
        assert_eq!(samples(&a.poll(later)), samples(&b.poll(later)));
    }

    #[test]
    fn test_single_point_track_has_no_heading() {
        let epoch = Instant::now();
        let track = SimulatedTrack::new(
            vec![Coord { x: 1.0, y: 2.0 }],
            Duration::from_secs(1),
            epoch,
        );
        let sample = track.sample_at(3).unwrap();
        assert_eq!(sample.coord, Coord { x: 1.0, y: 2.0 });
        assert_eq!(sample.heading, None);
    }

    #[test]
    fn test_empty_track_reports_error_once() {
        let epoch = Instant::now();
        let mut track = SimulatedTrack::new(Vec::new(), Duration::from_secs(1), epoch);
        track.start();

        let events = track.poll(epoch);
        assert!(events
            .iter()
            .any(|e| matches!(e, SourceEvent::Error(LocationError::PositionUnavailable(_)))));
        assert!(track.poll(epoch + Duration::from_secs(2)).is_empty());
    }
}
