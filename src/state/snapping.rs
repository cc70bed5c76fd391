//! Snapping flag and its toggle presentation.

use crate::location::ProviderKind;

/// Whether road snapping is enabled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SnappingState {
    pub enabled: bool,
}

impl SnappingState {
    /// Provider this state selects.
    pub fn provider(&self) -> ProviderKind {
        ProviderKind::for_snapping(self.enabled)
    }

    /// Visual state for the toggle button.
    pub fn indicator(&self) -> ToggleIndicator {
        if self.enabled {
            ToggleIndicator::Active
        } else {
            ToggleIndicator::Inactive
        }
    }
}

/// The two looks of the "Snap to Roads" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIndicator {
    /// Snapping on (blue)
    Active,
    /// Snapping off (dark gray)
    Inactive,
}

impl ToggleIndicator {
    /// Button title, which stays the same in both states.
    pub fn title(&self) -> &'static str {
        "Snap to Roads"
    }

    /// Background color (RGB).
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            ToggleIndicator::Active => (0, 0, 255),
            ToggleIndicator::Inactive => (85, 85, 85),
        }
    }
}
