use std::sync::Arc;

use serde::Serialize;

use crate::sprites::{Frame, SequenceId, SpriteAnimationSet};

use super::StateError;

/// Where playback is. Only [`AnimationPlayer`] mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackCursor {
    pub sequence: SequenceId,
    pub frame_index: usize,
    /// Time left on the current frame. Goes negative when a tick overshoots.
    pub remaining_ms: i64,
}

/// Samples a sequence on a fixed-rate tick, moving to the next frame once
/// the current frame's duration has elapsed.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    sprites: Arc<SpriteAnimationSet>,
    cursor: PlaybackCursor,
}

impl AnimationPlayer {
    /// Frame 0 of `initial` is current immediately; no tick is needed.
    pub fn new(sprites: Arc<SpriteAnimationSet>, initial: SequenceId) -> Self {
        let remaining_ms = i64::from(sprites.sequence(initial).frame(0).duration_ms);
        Self {
            sprites,
            cursor: PlaybackCursor {
                sequence: initial,
                frame_index: 0,
                remaining_ms,
            },
        }
    }

    /// Account for `elapsed_ms` of display time. Returns true if the frame
    /// changed.
    ///
    /// At most one frame is skipped per call, however large `elapsed_ms` is:
    /// after a stall playback resumes from the next frame rather than
    /// catching up.
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        if elapsed_ms == 0 {
            return false;
        }

        let elapsed = i64::try_from(elapsed_ms).unwrap_or(i64::MAX);
        self.cursor.remaining_ms = self.cursor.remaining_ms.saturating_sub(elapsed);
        if self.cursor.remaining_ms > 0 {
            return false;
        }

        let sequence = self.sprites.sequence(self.cursor.sequence);
        self.cursor.frame_index = (self.cursor.frame_index + 1) % sequence.len();
        self.cursor.remaining_ms = i64::from(sequence.frame(self.cursor.frame_index).duration_ms);
        true
    }

    /// Switch sequences between ticks. A different sequence starts over at
    /// its first frame; re-selecting the active one leaves playback alone.
    pub fn set_sequence(&mut self, id: SequenceId) -> bool {
        if id == self.cursor.sequence {
            return false;
        }
        self.cursor = PlaybackCursor {
            sequence: id,
            frame_index: 0,
            remaining_ms: i64::from(self.sprites.sequence(id).frame(0).duration_ms),
        };
        true
    }

    pub fn set_sequence_by_name(&mut self, name: &str) -> Result<bool, StateError> {
        let id = name
            .parse::<SequenceId>()
            .map_err(|_| StateError::UnknownSequence(name.to_string()))?;
        Ok(self.set_sequence(id))
    }

    pub fn current_frame(&self) -> &Frame {
        self.sprites
            .sequence(self.cursor.sequence)
            .frame(self.cursor.frame_index)
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    pub fn sequence(&self) -> SequenceId {
        self.cursor.sequence
    }

    pub fn sprites(&self) -> &SpriteAnimationSet {
        &self.sprites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::{FrameRect, Manifest, ManifestEntry};
    use image::{DynamicImage, RgbaImage};

    fn entry(name: &str, col: u32, duration_ms: u32) -> ManifestEntry {
        ManifestEntry {
            name: name.to_string(),
            rect: FrameRect {
                x: col * 4,
                y: 0,
                w: 4,
                h: 4,
            },
            duration_ms,
        }
    }

    fn sprites() -> Arc<SpriteAnimationSet> {
        let sheet = DynamicImage::ImageRgba8(RgbaImage::new(32, 4));
        let manifest = Manifest {
            entries: vec![
                entry("F1 walk-right", 0, 100),
                entry("F2 walk-right", 1, 150),
                entry("L1 walk-left", 2, 40),
                entry("L2 walk-left", 3, 40),
                entry("L3 walk-left", 4, 40),
                entry("I1 idle-right", 5, 50),
                entry("J1 idle-left", 6, 50),
            ],
        };
        Arc::new(SpriteAnimationSet::from_manifest(&sheet, &manifest, 4).unwrap())
    }

    fn frame_name(player: &AnimationPlayer) -> &str {
        &player.current_frame().name
    }

    #[test]
    fn first_frame_is_available_before_any_tick() {
        let player = AnimationPlayer::new(sprites(), SequenceId::WalkRight);
        assert_eq!(frame_name(&player), "F1 walk-right");
        assert_eq!(player.cursor().remaining_ms, 100);
    }

    #[test]
    fn switches_frame_once_cumulative_time_reaches_duration() {
        let mut player = AnimationPlayer::new(sprites(), SequenceId::WalkRight);

        for tick in 1..=6 {
            assert!(!player.advance(16), "changed early at tick {tick}");
            assert_eq!(frame_name(&player), "F1 walk-right");
        }

        // 112 ms elapsed: crossed the 100 ms boundary.
        assert!(player.advance(16));
        assert_eq!(frame_name(&player), "F2 walk-right");
        assert_eq!(player.cursor().remaining_ms, 150);
    }

    #[test]
    fn cycles_back_to_first_frame() {
        let mut player = AnimationPlayer::new(sprites(), SequenceId::WalkLeft);
        let mut names = Vec::new();
        for _ in 0..4 {
            player.advance(40);
            names.push(frame_name(&player).to_string());
        }
        assert_eq!(names, ["L2 walk-left", "L3 walk-left", "L1 walk-left", "L2 walk-left"]);
    }

    #[test]
    fn zero_elapsed_never_changes_frame() {
        let mut player = AnimationPlayer::new(sprites(), SequenceId::WalkRight);
        player.advance(99);
        let before = *player.cursor();
        for _ in 0..10 {
            assert!(!player.advance(0));
        }
        assert_eq!(*player.cursor(), before);
    }

    #[test]
    fn long_stall_advances_a_single_frame() {
        let mut player = AnimationPlayer::new(sprites(), SequenceId::WalkLeft);
        assert!(player.advance(10_000));
        assert_eq!(frame_name(&player), "L2 walk-left");
        assert_eq!(player.cursor().remaining_ms, 40);
    }

    #[test]
    fn switching_sequence_restarts_at_first_frame() {
        let mut player = AnimationPlayer::new(sprites(), SequenceId::WalkLeft);
        player.advance(40);
        player.advance(20);
        assert_eq!(player.cursor().frame_index, 1);

        assert!(player.set_sequence(SequenceId::WalkRight));
        assert_eq!(frame_name(&player), "F1 walk-right");
        assert_eq!(player.cursor().remaining_ms, 100);
    }

    #[test]
    fn reselecting_active_sequence_keeps_cursor() {
        let mut player = AnimationPlayer::new(sprites(), SequenceId::WalkLeft);
        player.advance(40);
        let before = *player.cursor();
        assert!(!player.set_sequence(SequenceId::WalkLeft));
        assert_eq!(*player.cursor(), before);
    }

    #[test]
    fn current_frame_always_belongs_to_active_sequence() {
        let mut player = AnimationPlayer::new(sprites(), SequenceId::WalkRight);
        let order = [
            SequenceId::IdleLeft,
            SequenceId::WalkLeft,
            SequenceId::IdleRight,
            SequenceId::WalkRight,
        ];
        for step in 0..200 {
            if step % 7 == 0 {
                player.set_sequence(order[(step / 7) % order.len()]);
            }
            player.advance(16);
            let active = player.sequence();
            let token = active.token();
            assert!(
                player.current_frame().name.contains(token),
                "{} is not part of {active}",
                player.current_frame().name
            );
        }
    }

    #[test]
    fn unknown_sequence_name_is_a_state_error() {
        let mut player = AnimationPlayer::new(sprites(), SequenceId::WalkRight);
        let err = player.set_sequence_by_name("sleeping").unwrap_err();
        assert_eq!(err, StateError::UnknownSequence("sleeping".into()));
        assert_eq!(player.sequence(), SequenceId::WalkRight);

        assert_eq!(player.set_sequence_by_name("idle-left"), Ok(true));
        assert_eq!(player.sequence(), SequenceId::IdleLeft);
    }
}
