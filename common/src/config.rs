use tracing::warn;

use crate::{
    constants::{DEFAULT_EMPTY_RATIO, ROOM_COUNT},
    levels::SelectionMode,
};

// ============================================================================
// Session Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub room_count: usize,
    pub empty_ratio: f32,
    pub selection: SelectionMode,
    // Fixed seed for reproducible playthroughs; None draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            room_count: ROOM_COUNT,
            empty_ratio: DEFAULT_EMPTY_RATIO,
            selection: SelectionMode::Prefix,
            seed: None,
        }
    }
}

impl SessionConfig {
    // Bring out-of-range values back to something the hotel can hold
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if self.room_count > ROOM_COUNT {
            warn!("room count {} exceeds the {} physical rooms, clamping", self.room_count, ROOM_COUNT);
            self.room_count = ROOM_COUNT;
        }
        // 1.0 is a valid request for a hotel with no encounters at all
        if !(0.0..=1.0).contains(&self.empty_ratio) {
            let clamped = if self.empty_ratio.is_nan() { DEFAULT_EMPTY_RATIO } else { self.empty_ratio.clamp(0.0, 1.0) };
            warn!("empty ratio {} outside [0, 1], using {}", self.empty_ratio, clamped);
            self.empty_ratio = clamped;
        }
        self
    }
}
