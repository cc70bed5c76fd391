//! Application state management.
//!
//! The only state the core owns is the snapping flag and the provider
//! registration it implies. Everything shown on the map is derived from
//! provider events.

mod selector;
mod snapping;

pub use selector::LocationSourceSelector;
pub use snapping::{SnappingState, ToggleIndicator};
