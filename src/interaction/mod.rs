//! Pointer input and the context menu.
//!
//! Dragging takes precedence over autonomous motion: while a drag is in
//! progress the pointer is the only thing that moves the pet. The session
//! suspends the motion timers when [`Interaction::DragStarted`] comes back
//! and resumes them on [`Interaction::DragEnded`].

use serde::{Deserialize, Serialize};

use crate::motion::MotionController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

/// Raw input from the windowing layer. Coordinates are global screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum InputEvent {
    Press { button: PointerButton, x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Release { button: PointerButton, x: i32, y: i32 },
    DoubleClick { x: i32, y: i32 },
    MenuSelect { action: MenuAction },
    MenuDismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuAction {
    /// Quit the whole process, not just this pet.
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 1] = [MenuAction::Exit];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Exit => "Exit",
        }
    }
}

/// What an input did, for the session to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Ignored,
    DragStarted,
    Dragged,
    DragEnded,
    ForcedIdle,
    MenuOpened { x: i32, y: i32 },
    MenuClosed,
    ExitRequested,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    menu_open: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn handle(&mut self, event: InputEvent, motion: &mut MotionController) -> Interaction {
        match event {
            InputEvent::Press {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                if motion.is_dragging() {
                    return Interaction::Ignored;
                }
                motion.begin_drag((x, y));
                Interaction::DragStarted
            }
            InputEvent::Press {
                button: PointerButton::Secondary,
                x,
                y,
            } => {
                self.menu_open = true;
                Interaction::MenuOpened { x, y }
            }
            InputEvent::Press { .. } => Interaction::Ignored,
            InputEvent::Move { x, y } => {
                if motion.drag_to((x, y)) {
                    Interaction::Dragged
                } else {
                    Interaction::Ignored
                }
            }
            InputEvent::Release {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                if !motion.is_dragging() {
                    return Interaction::Ignored;
                }
                motion.drag_to((x, y));
                motion.end_drag();
                Interaction::DragEnded
            }
            InputEvent::Release { .. } => Interaction::Ignored,
            InputEvent::DoubleClick { .. } => {
                motion.force_idle();
                Interaction::ForcedIdle
            }
            InputEvent::MenuSelect { action } => {
                if !std::mem::take(&mut self.menu_open) {
                    return Interaction::Ignored;
                }
                match action {
                    MenuAction::Exit => Interaction::ExitRequested,
                }
            }
            InputEvent::MenuDismiss => {
                if std::mem::take(&mut self.menu_open) {
                    Interaction::MenuClosed
                } else {
                    Interaction::Ignored
                }
            }
        }
    }
}
