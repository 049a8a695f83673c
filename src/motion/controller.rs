use rand::Rng;

use crate::sprites::SequenceId;

use super::{Direction, MotionConfig, MotionState};

/// Outcome of one decision tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Stay,
    Walk(Direction),
}

impl Decision {
    /// Uniform and memoryless: the previous state never weighs in.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            let direction = if rng.gen_bool(0.5) {
                Direction::Right
            } else {
                Direction::Left
            };
            Decision::Walk(direction)
        } else {
            Decision::Stay
        }
    }
}

/// The autonomous wandering state machine plus the drag override.
#[derive(Debug, Clone)]
pub struct MotionController {
    state: MotionState,
    travel_width: i32,
    config: MotionConfig,
    /// Pointer position relative to the pet origin at drag start.
    drag_offset: Option<(i32, i32)>,
}

impl MotionController {
    pub fn new(start: (i32, i32), travel_width: i32, config: MotionConfig) -> Self {
        debug_assert!(travel_width > 0, "travel width must be positive");
        debug_assert!(config.step > 0, "step must be positive");
        Self {
            state: MotionState::new(start.0, start.1),
            travel_width,
            config,
            drag_offset: None,
        }
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn travel_width(&self) -> i32 {
        self.travel_width
    }

    pub fn position(&self) -> (i32, i32) {
        self.state.position()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    /// The sequence the current state calls for.
    pub fn sequence(&self) -> SequenceId {
        if self.state.is_moving {
            SequenceId::walking(self.state.direction)
        } else {
            SequenceId::idle(self.state.direction)
        }
    }

    /// Decision tick. Returns what was chosen, or `None` while dragging.
    pub fn decide<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Decision> {
        if self.state.is_dragging {
            return None;
        }
        let decision = Decision::roll(rng);
        self.apply_decision(decision);
        Some(decision)
    }

    pub fn apply_decision(&mut self, decision: Decision) {
        match decision {
            Decision::Stay => self.state.is_moving = false,
            Decision::Walk(direction) => {
                self.state.is_moving = true;
                self.state.direction = direction;
            }
        }
    }

    /// Position tick. Returns true if the pet moved.
    ///
    /// Past the edge of the travel range the pet is clamped onto the edge and
    /// turned around in the same tick.
    pub fn position_tick(&mut self) -> bool {
        if !self.state.is_moving || self.state.is_dragging {
            return false;
        }

        let half_range = self.travel_width / 2;
        self.state.x += self.config.step * self.state.direction.sign();

        let offset = self.state.offset_from_anchor();
        if offset.abs() > half_range {
            if offset > 0 {
                self.state.x = self.state.anchor_x + half_range;
                self.state.direction = Direction::Left;
            } else {
                self.state.x = self.state.anchor_x - half_range;
                self.state.direction = Direction::Right;
            }
        }

        debug_assert!(self.state.offset_from_anchor().abs() <= half_range);
        true
    }

    pub fn begin_drag(&mut self, pointer: (i32, i32)) {
        self.state.is_dragging = true;
        self.drag_offset = Some((pointer.0 - self.state.x, pointer.1 - self.state.y));
    }

    /// Follow the pointer. Ignored (returns false) without an active drag.
    pub fn drag_to(&mut self, pointer: (i32, i32)) -> bool {
        let Some((dx, dy)) = self.drag_offset.filter(|_| self.state.is_dragging) else {
            return false;
        };
        self.state.x = pointer.0 - dx;
        self.state.y = pointer.1 - dy;
        self.state.anchor_x = self.state.x;
        true
    }

    /// Drop the pet. The travel range re-centres on the drop point.
    pub fn end_drag(&mut self) -> bool {
        if !self.state.is_dragging {
            return false;
        }
        self.state.is_dragging = false;
        self.state.anchor_x = self.state.x;
        self.drag_offset = None;
        true
    }

    /// Manual override: stop and face the last direction.
    pub fn force_idle(&mut self) {
        self.state.is_moving = false;
    }
}
