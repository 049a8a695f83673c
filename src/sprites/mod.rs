pub mod manifest;
pub mod sheet;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::motion::Direction;

pub use manifest::{FrameRect, Manifest, ManifestEntry};
pub use sheet::SpriteAnimationSet;

/// Every sequence the pet can show. The set is closed: a loaded
/// [`SpriteAnimationSet`] always holds all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceId {
    WalkRight,
    WalkLeft,
    IdleRight,
    IdleLeft,
}

impl SequenceId {
    pub const ALL: [SequenceId; 4] = [
        SequenceId::WalkRight,
        SequenceId::WalkLeft,
        SequenceId::IdleRight,
        SequenceId::IdleLeft,
    ];

    /// Token matched (case-insensitively) against manifest frame names.
    pub fn token(self) -> &'static str {
        match self {
            SequenceId::WalkRight => "walk-right",
            SequenceId::WalkLeft => "walk-left",
            SequenceId::IdleRight => "idle-right",
            SequenceId::IdleLeft => "idle-left",
        }
    }

    pub fn is_idle(self) -> bool {
        matches!(self, SequenceId::IdleRight | SequenceId::IdleLeft)
    }

    pub fn walking(direction: Direction) -> Self {
        match direction {
            Direction::Right => SequenceId::WalkRight,
            Direction::Left => SequenceId::WalkLeft,
        }
    }

    pub fn idle(direction: Direction) -> Self {
        match direction {
            Direction::Right => SequenceId::IdleRight,
            Direction::Left => SequenceId::IdleLeft,
        }
    }

    /// Which sequence a manifest frame belongs to, if any.
    pub fn classify(frame_name: &str) -> Option<Self> {
        let lowered = frame_name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| lowered.contains(id.token()))
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SequenceId {
    type Err = ();

    /// Accepts the manifest tokens and the long `walking-*` spelling.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lowered = name.trim().to_ascii_lowercase();
        let normalized = lowered.replace("walking-", "walk-");
        Self::ALL
            .into_iter()
            .find(|id| id.token() == normalized)
            .ok_or(())
    }
}

/// One displayable frame: where it came from on the sheet, how long it
/// stays up, and the bitmap already scaled to the pet's display size.
#[derive(Debug, Clone)]
pub struct Frame {
    pub name: String,
    pub rect: FrameRect,
    pub duration_ms: u32,
    pub image: Arc<RgbaImage>,
}

/// A non-empty cyclic list of frames.
#[derive(Debug, Clone)]
pub struct Sequence {
    id: SequenceId,
    frames: Vec<Frame>,
}

impl Sequence {
    pub(crate) fn new(id: SequenceId, frames: Vec<Frame>) -> Self {
        debug_assert!(!frames.is_empty(), "sequence {id} has no frames");
        Self { id, frames }
    }

    pub fn id(&self) -> SequenceId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, wrapping around the cycle.
    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index % self.frames.len()]
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
    }
}

/// Fatal sprite loading failures. A pet never starts from a partial set.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read sprite manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid sprite manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("failed to decode sprite sheet: {0}")]
    Image(#[from] image::ImageError),

    #[error("frame `{name}` at {rect} lies outside the {sheet_width}x{sheet_height} sheet")]
    FrameOutOfBounds {
        name: String,
        rect: FrameRect,
        sheet_width: u32,
        sheet_height: u32,
    },

    #[error("frame `{name}` has an empty rectangle")]
    EmptyFrame { name: String },

    #[error("sprite manifest has no frames for `{0}`")]
    MissingSequence(SequenceId),
}
