use serde::{Deserialize, Serialize};

/// Per-axis correction factor for motion vectors or jitter offsets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Apply to a vector, e.g. a jitter offset in pixels.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.x, y * self.y)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<(f32, f32)> for Scale {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}
