use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// `-1` for left, `+1` for right.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Where the pet is and what it is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionState {
    pub x: i32,
    pub y: i32,
    /// Centre of the travel range. Redefined by dragging.
    pub anchor_x: i32,
    pub direction: Direction,
    pub is_moving: bool,
    pub is_dragging: bool,
}

impl MotionState {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            anchor_x: x,
            direction: Direction::Right,
            is_moving: false,
            is_dragging: false,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Distance from the anchor, signed.
    pub fn offset_from_anchor(&self) -> i32 {
        self.x - self.anchor_x
    }
}

/// Tunables for the wandering behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// How often the walk/idle choice is re-rolled.
    pub decision_interval_ms: u64,
    /// How often the position advances while walking.
    pub position_interval_ms: u64,
    /// Pixels moved per position tick.
    pub step: i32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            decision_interval_ms: 3000,
            position_interval_ms: 50,
            step: 2,
        }
    }
}
