pub mod player;

pub use player::{AnimationPlayer, PlaybackCursor};

/// Frame rate the player is sampled at.
pub const ANIMATION_TICK_MS: u64 = 16;

/// Playback was asked for something the loaded set cannot show.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("unknown animation sequence `{0}`")]
    UnknownSequence(String),
}
