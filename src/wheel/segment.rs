// Segment - one fixed slice of the prize wheel
//
// The segment set is static configuration: ids, artwork references, display
// names and a single winning flag. Angles follow the widget's layout, where
// segment 0's center sits under the top pointer at rotation 0.

use serde::{Deserialize, Serialize};

/// Angular position of "12 o'clock" in the wheel's own frame
pub const ANGLE_ZERO_AT_TOP: f32 = -60.0;

/// Fine visual alignment offset carried over from the layout
pub const VISUAL_OFFSET: f32 = 30.0;

/// Static descriptor of one wheel slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    /// Artwork reference for the rendering surface
    pub image: String,
    pub name: String,
    pub is_winner: bool,
}

impl Segment {
    pub fn new(id: u32, image: &str, name: &str, is_winner: bool) -> Self {
        Self {
            id,
            image: image.to_string(),
            name: name.to_string(),
            is_winner,
        }
    }
}

/// Angular width of one segment, degrees
pub fn segment_angle(count: usize) -> f32 {
    360.0 / count as f32
}

/// Center angle of a segment in the wheel's frame, degrees
pub fn center_angle(index: usize, count: usize) -> f32 {
    let seg = segment_angle(count);
    index as f32 * seg + seg / 2.0 + ANGLE_ZERO_AT_TOP + VISUAL_OFFSET
}

/// Segment whose center sits closest to the top pointer for a rotation
///
/// The pointer is fixed at the top (0°); rotating the wheel by `rotation`
/// moves segment centers to `center + rotation` in screen space.
pub fn landed_index(rotation: f32, count: usize) -> usize {
    let mut best = 0;
    let mut best_distance = f32::MAX;

    for index in 0..count {
        let screen = (center_angle(index, count) + rotation).rem_euclid(360.0);
        // Angular distance to the pointer, wrap-aware
        let distance = screen.min(360.0 - screen);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }

    best
}
