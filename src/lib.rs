#![warn(clippy::all)]

//! SnapMap - a map screen that switches between raw and road-snapped location.
//!
//! A toggle flips the snapping flag, the selector swaps which location
//! provider feeds the map, and every location update repositions a small
//! constellation of markers around the latest fix.

pub mod display;
pub mod geo;
pub mod location;
pub mod markers;
pub mod session;
pub mod settings;
pub mod state;

pub use display::{MapDisplay, MapView, MarkerManagerId};
pub use location::{LocationEvent, LocationFix, LocationProvider, ProviderKind};
pub use markers::{compute_markers, Marker, MarkerLayoutGenerator};
pub use session::MapSession;
pub use settings::Settings;
pub use state::{LocationSourceSelector, SnappingState};
