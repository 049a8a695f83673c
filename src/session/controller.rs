use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::animation::{AnimationPlayer, ANIMATION_TICK_MS};
use crate::interaction::{InputEvent, Interaction, InteractionController, MenuAction};
use crate::motion::MotionController;
use crate::reminders::{ReminderKind, ReminderScheduler};
use crate::settings::PetSettings;
use crate::sprites::SpriteAnimationSet;
use crate::surface::PetSurface;
use crate::timer::{Firing, TimerId, TimerWheel};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_trace};

/// Gap between a notice's bottom edge and the top of the pet.
const NOTICE_GAP_PX: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    /// The user asked to quit the whole process.
    Shutdown,
}

/// One pet on screen: its motion, animation, reminders and every timer
/// driving them, all on one virtual millisecond clock.
pub struct PetSession<S: PetSurface> {
    id: Uuid,
    started_at: DateTime<Utc>,
    motion: MotionController,
    player: AnimationPlayer,
    reminders: ReminderScheduler,
    interaction: InteractionController,
    timers: TimerWheel,
    rng: StdRng,
    surface: S,
    now_ms: u64,
    stopped: bool,
}

impl<S: PetSurface> PetSession<S> {
    pub fn new(settings: &PetSettings, sprites: Arc<SpriteAnimationSet>, surface: S) -> Self {
        Self::with_rng(settings, sprites, surface, StdRng::from_entropy())
    }

    /// Like [`PetSession::new`] with a caller-provided random source, for
    /// reproducible wandering.
    pub fn with_rng(
        settings: &PetSettings,
        sprites: Arc<SpriteAnimationSet>,
        surface: S,
        rng: StdRng,
    ) -> Self {
        let start = (settings.start_position.x, settings.start_position.y);
        let motion = MotionController::new(start, settings.travel_width, settings.motion);
        let player = AnimationPlayer::new(sprites, motion.sequence());
        let reminders = ReminderScheduler::new(settings.reminders.iter());

        let mut timers = TimerWheel::new();
        timers.start_periodic(TimerId::Animation, ANIMATION_TICK_MS, 0);
        timers.start_periodic(TimerId::Position, settings.motion.position_interval_ms, 0);
        timers.start_periodic(TimerId::Decision, settings.motion.decision_interval_ms, 0);
        reminders.schedule(&mut timers, 0);

        let mut session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            motion,
            player,
            reminders,
            interaction: InteractionController::new(),
            timers,
            rng,
            surface,
            now_ms: 0,
            stopped: false,
        };

        let enabled: Vec<String> = session
            .reminders
            .enabled_kinds()
            .map(|kind| kind.to_string())
            .collect();
        log_info!(
            "Pet session {} started at ({}, {}), travel width {}, reminders [{}]",
            session.id,
            start.0,
            start.1,
            settings.travel_width,
            enabled.join(", ")
        );

        session.present();
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    pub fn player(&self) -> &AnimationPlayer {
        &self.player
    }

    pub fn reminders(&self) -> &ReminderScheduler {
        &self.reminders
    }

    pub fn timers(&self) -> &TimerWheel {
        &self.timers
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// When the next timer is due, on the session clock.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Move the clock to `now_ms` and fire every timer due by then, one at a
    /// time in deadline order. Timers that fell behind fire once.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        while let Some(firing) = self.timers.pop_due(self.now_ms) {
            self.dispatch(firing);
        }
    }

    /// Step through every deadline up to `target_ms` as if the loop woke up
    /// exactly on time for each one.
    pub fn run_until(&mut self, target_ms: u64) {
        while let Some(deadline) = self.timers.next_deadline() {
            if deadline > target_ms {
                break;
            }
            self.advance_to(deadline);
        }
        self.advance_to(target_ms);
    }

    pub fn handle_input(&mut self, event: InputEvent, now_ms: u64) -> SessionControl {
        if self.stopped {
            return SessionControl::Continue;
        }
        self.advance_to(now_ms);

        match self.interaction.handle(event, &mut self.motion) {
            Interaction::DragStarted => {
                for id in TimerId::MOTION {
                    self.timers.suspend(id);
                }
                log_debug!("drag started at {:?}", self.motion.position());
            }
            Interaction::Dragged => self.place_notices(),
            Interaction::DragEnded => {
                for id in TimerId::MOTION {
                    self.timers.resume(id, self.now_ms);
                }
                self.place_notices();
                log_debug!(
                    "drag ended at {:?}, travel range re-centred",
                    self.motion.position()
                );
            }
            Interaction::ForcedIdle => {
                self.sync_sequence();
                log_debug!("forced idle facing {:?}", self.motion.state().direction);
            }
            Interaction::MenuOpened { x, y } => {
                self.surface.open_menu(x, y, &MenuAction::ALL);
            }
            Interaction::ExitRequested => {
                log_info!("Exit requested from pet session {}", self.id);
                return SessionControl::Shutdown;
            }
            Interaction::MenuClosed | Interaction::Ignored => {}
        }

        SessionControl::Continue
    }

    /// Cancel every timer and take down visible notices. Idempotent.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.timers.cancel_all();
        for kind in self.reminders.take_visible() {
            self.surface.hide_notice(kind);
        }

        let uptime = Utc::now() - self.started_at;
        log_info!(
            "Pet session {} stopped after {}s",
            self.id,
            uptime.num_seconds()
        );
    }

    fn dispatch(&mut self, firing: Firing) {
        match firing.id {
            TimerId::Animation => self.on_animation_tick(firing.elapsed_ms),
            TimerId::Position => self.on_position_tick(),
            TimerId::Decision => self.on_decision_tick(),
            TimerId::Reminder(kind) => self.on_reminder(kind),
            TimerId::NoticeHide(kind) => self.on_notice_hide(kind),
        }
    }

    fn on_animation_tick(&mut self, elapsed_ms: u64) {
        if self.player.advance(elapsed_ms) {
            log_trace!("frame -> {}", self.player.current_frame().name);
        }
        self.present();
    }

    fn on_position_tick(&mut self) {
        if self.motion.position_tick() {
            self.sync_sequence();
            self.place_notices();
        }
    }

    fn on_decision_tick(&mut self) {
        if let Some(decision) = self.motion.decide(&mut self.rng) {
            log_debug!("decision: {decision:?}");
            self.sync_sequence();
        }
    }

    fn on_reminder(&mut self, kind: ReminderKind) {
        self.reminders.on_fire(kind, &mut self.timers, self.now_ms);
        self.surface.show_notice(kind);
        let (x, y) = self.notice_anchor();
        self.surface.place_notice(kind, x, y);
    }

    fn on_notice_hide(&mut self, kind: ReminderKind) {
        if self.reminders.on_hide(kind) {
            self.surface.hide_notice(kind);
        }
    }

    fn sync_sequence(&mut self) {
        if self.player.set_sequence(self.motion.sequence()) {
            log_trace!("sequence -> {}", self.player.sequence());
        }
    }

    fn present(&mut self) {
        let (x, y) = self.motion.position();
        self.surface.present(self.player.current_frame(), x, y);
    }

    fn place_notices(&mut self) {
        let (x, y) = self.notice_anchor();
        for kind in self.reminders.visible() {
            self.surface.place_notice(kind, x, y);
        }
    }

    fn notice_anchor(&self) -> (i32, i32) {
        let (x, y) = self.motion.position();
        let half_size = (self.player.sprites().display_size() / 2) as i32;
        (x + half_size, y - NOTICE_GAP_PX)
    }

    #[cfg(test)]
    pub(crate) fn motion_mut(&mut self) -> &mut MotionController {
        &mut self.motion
    }
}

impl<S: PetSurface> Drop for PetSession<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
