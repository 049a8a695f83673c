//! The boundary to the windowing layer.
//!
//! A session never touches windows directly. It hands finished frames and
//! notice requests to a [`PetSurface`], which the embedding application
//! implements on top of whatever toolkit draws the pet.

use chrono::Local;

use crate::interaction::MenuAction;
use crate::reminders::ReminderKind;
use crate::sprites::Frame;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_trace};

pub trait PetSurface {
    /// Blit `frame` (already at display size) with its top-left at `(x, y)`.
    fn present(&mut self, frame: &Frame, x: i32, y: i32);

    /// Show, or re-show and raise, the notice for `kind`.
    fn show_notice(&mut self, kind: ReminderKind);

    fn hide_notice(&mut self, _kind: ReminderKind) {}

    /// Move a visible notice so it sits centred on `(x, y)`'s column with its
    /// bottom edge at `y`.
    fn place_notice(&mut self, _kind: ReminderKind, _x: i32, _y: i32) {}

    fn open_menu(&mut self, _x: i32, _y: i32, _items: &[MenuAction]) {}
}

/// Headless surface that writes everything to the log.
#[derive(Debug, Default)]
pub struct LogSurface {
    frames_presented: u64,
    last_position: Option<(i32, i32)>,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl PetSurface for LogSurface {
    fn present(&mut self, frame: &Frame, x: i32, y: i32) {
        self.frames_presented += 1;
        if self.last_position != Some((x, y)) {
            log_debug!("pet at ({x}, {y}) showing {}", frame.name);
            self.last_position = Some((x, y));
        } else {
            log_trace!("frame {}", frame.name);
        }
    }

    fn show_notice(&mut self, kind: ReminderKind) {
        log_info!("[{}] {}", Local::now().format("%H:%M:%S"), kind.message());
    }

    fn hide_notice(&mut self, kind: ReminderKind) {
        log_debug!("{kind} notice hidden");
    }

    fn open_menu(&mut self, x: i32, y: i32, items: &[MenuAction]) {
        let labels: Vec<_> = items.iter().map(|item| item.label()).collect();
        log_info!("context menu at ({x}, {y}): {}", labels.join(", "));
    }
}
