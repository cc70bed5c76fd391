//! UI modules for the SnapMap demo.
//!
//! - Central canvas: roads, markers, location puck and status overlay
//! - Snap toggle: the floating "Snap to Roads" button

mod canvas;
mod colors;
mod toggle;

pub use canvas::render_canvas;
pub use toggle::render_snap_toggle;
