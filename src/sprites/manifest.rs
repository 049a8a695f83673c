//! Aseprite-style frame manifest.
//!
//! Both export layouts are accepted: `frames` as an object keyed by frame
//! name ("hash") or as an array of objects carrying a `filename`. Object key
//! order is kept so frames play in authored order.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl FrameRect {
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// True when the whole rectangle fits in a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.w);
        let bottom = self.y.checked_add(self.h);
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }
}

impl fmt::Display for FrameRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub rect: FrameRect,
    pub duration_ms: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

#[derive(Deserialize)]
struct RawManifest {
    frames: Value,
}

#[derive(Deserialize)]
struct RawFrame {
    frame: FrameRect,
    duration: u32,
}

#[derive(Deserialize)]
struct RawNamedFrame {
    filename: String,
    frame: FrameRect,
    duration: u32,
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw: RawManifest = serde_json::from_str(text)?;

        let entries = match raw.frames {
            Value::Object(map) => map
                .into_iter()
                .map(|(name, value)| {
                    let raw: RawFrame = serde_json::from_value(value)?;
                    Ok(ManifestEntry {
                        name,
                        rect: raw.frame,
                        duration_ms: raw.duration,
                    })
                })
                .collect::<Result<Vec<_>, serde_json::Error>>()?,
            Value::Array(items) => items
                .into_iter()
                .map(|value| {
                    let raw: RawNamedFrame = serde_json::from_value(value)?;
                    Ok(ManifestEntry {
                        name: raw.filename,
                        rect: raw.frame,
                        duration_ms: raw.duration,
                    })
                })
                .collect::<Result<Vec<_>, serde_json::Error>>()?,
            other => {
                return Err(serde_json::Error::custom(format!(
                    "`frames` must be an object or an array, found {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(Self { entries })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
