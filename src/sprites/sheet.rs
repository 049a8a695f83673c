use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::DynamicImage;

use super::{Frame, FrameRect, LoadError, Manifest, Sequence, SequenceId};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Idle sequences play this many times slower than authored.
pub const IDLE_DURATION_MULTIPLIER: u32 = 3;

/// Base frame duration used when a single still image stands in for every
/// sequence.
pub const STILL_FRAME_MS: u32 = 1000;

/// All four sequences of one character, loaded once and read-only after.
#[derive(Debug, Clone)]
pub struct SpriteAnimationSet {
    // Indexed by `SequenceId::index`; always holds all four.
    sequences: Vec<Sequence>,
    display_size: u32,
}

impl SpriteAnimationSet {
    /// Load a sheet image plus its frame manifest from disk.
    pub fn load(
        sheet_path: &Path,
        manifest_path: &Path,
        display_size: u32,
    ) -> Result<Self, LoadError> {
        let text = fs::read_to_string(manifest_path).map_err(|source| LoadError::Io {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        let manifest = Manifest::from_json(&text)?;
        let sheet = image::open(sheet_path)?;

        log_info!(
            "Loaded sprite sheet {} ({}x{}) with {} manifest frames",
            sheet_path.display(),
            sheet.width(),
            sheet.height(),
            manifest.entries.len()
        );

        Self::from_manifest(&sheet, &manifest, display_size)
    }

    /// Load a single still image and derive every sequence from it.
    pub fn load_single_image(path: &Path, display_size: u32) -> Result<Self, LoadError> {
        let image = image::open(path)?;
        log_info!(
            "Loaded still sprite {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::from_single_image(&image, display_size))
    }

    pub fn from_manifest(
        sheet: &DynamicImage,
        manifest: &Manifest,
        display_size: u32,
    ) -> Result<Self, LoadError> {
        let (sheet_width, sheet_height) = (sheet.width(), sheet.height());
        let mut grouped: HashMap<SequenceId, Vec<Frame>> = HashMap::new();

        for entry in &manifest.entries {
            if entry.rect.is_empty() {
                return Err(LoadError::EmptyFrame {
                    name: entry.name.clone(),
                });
            }
            if !entry.rect.fits_within(sheet_width, sheet_height) {
                return Err(LoadError::FrameOutOfBounds {
                    name: entry.name.clone(),
                    rect: entry.rect,
                    sheet_width,
                    sheet_height,
                });
            }

            let Some(id) = SequenceId::classify(&entry.name) else {
                log_debug!("Ignoring manifest frame `{}`: no sequence token", entry.name);
                continue;
            };

            let rect = entry.rect;
            let region = sheet.crop_imm(rect.x, rect.y, rect.w, rect.h);
            grouped.entry(id).or_default().push(Frame {
                name: entry.name.clone(),
                rect,
                duration_ms: scaled_duration(id, entry.duration_ms),
                image: Arc::new(scale_to_display(&region, display_size)),
            });
        }

        Self::assemble(grouped, display_size)
    }

    /// Build every sequence from one still image: the image faces right,
    /// its horizontal mirror faces left.
    pub fn from_single_image(image: &DynamicImage, display_size: u32) -> Self {
        let facing_right = Arc::new(scale_to_display(image, display_size));
        let facing_left = Arc::new(image::imageops::flip_horizontal(facing_right.as_ref()));
        let rect = FrameRect {
            x: 0,
            y: 0,
            w: image.width(),
            h: image.height(),
        };

        let sequences = SequenceId::ALL
            .into_iter()
            .map(|id| {
                let bitmap = match id {
                    SequenceId::WalkRight | SequenceId::IdleRight => Arc::clone(&facing_right),
                    SequenceId::WalkLeft | SequenceId::IdleLeft => Arc::clone(&facing_left),
                };
                let frame = Frame {
                    name: id.token().to_string(),
                    rect,
                    duration_ms: scaled_duration(id, STILL_FRAME_MS),
                    image: bitmap,
                };
                Sequence::new(id, vec![frame])
            })
            .collect();

        Self {
            sequences,
            display_size,
        }
    }

    fn assemble(
        mut grouped: HashMap<SequenceId, Vec<Frame>>,
        display_size: u32,
    ) -> Result<Self, LoadError> {
        let mut sequences = Vec::with_capacity(SequenceId::ALL.len());
        for id in SequenceId::ALL {
            let frames = grouped
                .remove(&id)
                .filter(|frames| !frames.is_empty())
                .ok_or(LoadError::MissingSequence(id))?;
            log_debug!("Sequence {} has {} frames", id, frames.len());
            sequences.push(Sequence::new(id, frames));
        }

        Ok(Self {
            sequences,
            display_size,
        })
    }

    pub fn sequence(&self, id: SequenceId) -> &Sequence {
        &self.sequences[id.index()]
    }

    pub fn sequence_by_name(&self, name: &str) -> Option<&Sequence> {
        name.parse::<SequenceId>().ok().map(|id| self.sequence(id))
    }

    pub fn display_size(&self) -> u32 {
        self.display_size
    }
}

fn scaled_duration(id: SequenceId, authored_ms: u32) -> u32 {
    if id.is_idle() {
        authored_ms.saturating_mul(IDLE_DURATION_MULTIPLIER)
    } else {
        authored_ms
    }
}

fn scale_to_display(region: &DynamicImage, display_size: u32) -> image::RgbaImage {
    // `resize` keeps the aspect ratio inside the square.
    region
        .resize(display_size, display_size, FilterType::Lanczos3)
        .to_rgba8()
}
