//! Demo settings.
//!
//! On native builds settings are read from the JSON file named by the
//! `SNAPMAP_CONFIG` environment variable; on the web they are read from
//! localStorage, and the defaults are written there on first run so they can
//! be edited in place. Missing or invalid settings fall back to the defaults.

use crate::geo::{RoadNetwork, DEFAULT_FOLLOW_ZOOM};
use crate::location::DEFAULT_MAX_SNAP_DISTANCE_M;
use crate::markers::{IconRef, DEFAULT_ICON};
use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_UPDATE_INTERVAL_SECS: f64 = 1.0;
const MIN_UPDATE_INTERVAL_SECS: f64 = 0.01;

/// Errors that can occur while loading settings.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The settings file could not be read.
    Io(String),
    /// The settings were not valid JSON for [`Settings`].
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(msg) => write!(f, "Failed to read settings: {}", msg),
            SettingsError::Parse(msg) => write!(f, "Failed to parse settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Everything the demo screen can be configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Camera zoom while following the user.
    pub follow_zoom: f64,
    /// Whether scroll gestures may change the following zoom.
    pub zoom_updates_allowed: bool,
    /// Seconds between simulated position samples.
    pub update_interval_secs: f64,
    /// Samples taken along each leg of the simulated track.
    pub samples_per_leg: u64,
    /// Largest distance a fix may be moved onto a road.
    pub max_snap_distance_m: f64,
    /// Maximum simulated GPS error.
    pub jitter_m: f64,
    /// Image name used for the decorative markers.
    pub marker_icon: String,
    /// Simulated track as `[lon, lat]` pairs.
    pub track: Vec<[f64; 2]>,
    /// Road network as inline GeoJSON; the track itself is used when absent.
    pub roads_geojson: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            follow_zoom: DEFAULT_FOLLOW_ZOOM,
            zoom_updates_allowed: false,
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
            samples_per_leg: 10,
            max_snap_distance_m: DEFAULT_MAX_SNAP_DISTANCE_M,
            jitter_m: 6.0,
            marker_icon: DEFAULT_ICON.to_string(),
            // A block around Union Square, San Francisco
            track: vec![
                [-122.40776, 37.78788],
                [-122.40618, 37.78768],
                [-122.40653, 37.78594],
                [-122.40811, 37.78614],
            ],
            roads_geojson: None,
        }
    }
}

impl Settings {
    /// Environment variable naming the native settings file.
    pub const CONFIG_ENV: &'static str = "SNAPMAP_CONFIG";

    /// localStorage key for persisting settings.
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "snapmap_settings";

    /// Parses settings from JSON; omitted fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Reads settings from a JSON file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Load settings from the file named by `SNAPMAP_CONFIG`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::CONFIG_ENV) else {
            log::info!("{} not set, using default settings", Self::CONFIG_ENV);
            return Self::default();
        };

        match Self::from_file(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.to_string_lossy());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return Self::default(),
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(s)) => s,
            Ok(None) => {
                let settings = Self::default();
                settings.save();
                return settings;
            }
            Err(_) => return Self::default(),
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from localStorage");
                settings
            }
            Err(e) => {
                log::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return,
        };

        let json = match serde_json::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save settings: {:?}", e);
        } else {
            log::info!("Saved settings to localStorage");
        }
    }

    /// Time between simulated samples, at least 10 ms.
    ///
    /// Values that do not fit a `Duration` fall back to the default of 1 s.
    pub fn update_interval(&self) -> Duration {
        let secs = self.update_interval_secs.max(MIN_UPDATE_INTERVAL_SECS);
        match Duration::try_from_secs_f64(secs) {
            Ok(interval) => interval,
            Err(e) => {
                log::warn!(
                    "Invalid update_interval_secs {}: {}; using {}s",
                    self.update_interval_secs,
                    e,
                    DEFAULT_UPDATE_INTERVAL_SECS
                );
                Duration::from_secs_f64(DEFAULT_UPDATE_INTERVAL_SECS)
            }
        }
    }

    pub fn marker_icon(&self) -> IconRef {
        IconRef::new(self.marker_icon.clone())
    }

    /// The simulated track as coordinates (x = lon, y = lat).
    pub fn track_coords(&self) -> Vec<Coord<f64>> {
        self.track.iter().map(|&[x, y]| Coord { x, y }).collect()
    }

    /// Road network for snapping.
    ///
    /// Uses `roads_geojson` when it parses, otherwise the closed track.
    pub fn road_network(&self) -> RoadNetwork {
        if let Some(geojson) = &self.roads_geojson {
            match RoadNetwork::from_geojson(geojson) {
                Ok(network) => return network,
                Err(e) => log::warn!("{}; falling back to the track", e),
            }
        }

        let mut coords = self.track_coords();
        if let Some(&first) = coords.first() {
            if coords.len() > 2 {
                coords.push(first);
            }
        }
        RoadNetwork::from_lines(vec![LineString::from(coords)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo_screen() {
        let settings = Settings::default();
        assert_eq!(settings.follow_zoom, 17.0);
        assert!(!settings.zoom_updates_allowed);
        assert_eq!(settings.marker_icon().name(), "polygon2");
        assert_eq!(settings.update_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "follow_zoom": 15.5, "jitter_m": 0 }"#).unwrap();
        assert_eq!(settings.follow_zoom, 15.5);
        assert_eq!(settings.jitter_m, 0.0);
        assert_eq!(settings.track, Settings::default().track);
    }

    #[test]
    fn test_huge_interval_falls_back() {
        let settings = Settings::from_json(r#"{ "update_interval_secs": 1e300 }"#).unwrap();
        assert_eq!(settings.update_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_tiny_interval_is_clamped() {
        let settings = Settings::from_json(r#"{ "update_interval_secs": -5 }"#).unwrap();
        assert_eq!(settings.update_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Settings::from_json("{ follow_zoom: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            track: vec![[1.0, 2.0], [3.0, 4.0]],
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_road_network_defaults_to_closed_track() {
        let settings = Settings::default();
        let network = settings.road_network();
        assert_eq!(network.len(), 1);
        let road = &network.roads()[0].0;
        assert_eq!(road.len(), settings.track.len() + 1);
        assert_eq!(road.first(), road.last());
    }

    #[test]
    fn test_road_network_from_geojson() {
        let settings = Settings {
            roads_geojson: Some(
                r#"{ "type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 1.0]] }"#.to_string(),
            ),
            ..Default::default()
        };
        let network = settings.road_network();
        assert_eq!(network.len(), 1);
        assert_eq!(network.roads()[0].0[1], Coord { x: 0.0, y: 1.0 });
    }

    #[test]
    fn test_bad_geojson_falls_back_to_track() {
        let settings = Settings {
            roads_geojson: Some("nope".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.road_network().len(), 1);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::path::Path::new("/nonexistent/snapmap.json");
        let err = Settings::from_file(path).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
