pub mod controller;
pub mod runtime;

pub use controller::{PetSession, SessionControl};
pub use runtime::{run_session, ExitReason};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use image::{DynamicImage, Rgba, RgbaImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::interaction::MenuAction;
    use crate::reminders::ReminderKind;
    use crate::settings::PetSettings;
    use crate::sprites::{Frame, SpriteAnimationSet};
    use crate::surface::PetSurface;

    use super::PetSession;

    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub frames: Vec<(String, i32, i32)>,
        pub shown: Vec<ReminderKind>,
        pub hidden: Vec<ReminderKind>,
        pub placed: Vec<(ReminderKind, i32, i32)>,
        pub menus: Vec<(i32, i32)>,
    }

    impl PetSurface for RecordingSurface {
        fn present(&mut self, frame: &Frame, x: i32, y: i32) {
            self.frames.push((frame.name.clone(), x, y));
        }

        fn show_notice(&mut self, kind: ReminderKind) {
            self.shown.push(kind);
        }

        fn hide_notice(&mut self, kind: ReminderKind) {
            self.hidden.push(kind);
        }

        fn place_notice(&mut self, kind: ReminderKind, x: i32, y: i32) {
            self.placed.push((kind, x, y));
        }

        fn open_menu(&mut self, x: i32, y: i32, items: &[MenuAction]) {
            assert_eq!(items, &MenuAction::ALL);
            self.menus.push((x, y));
        }
    }

    /// 4px still sprite, so every sequence has one frame named after it.
    pub fn still_sprites() -> Arc<SpriteAnimationSet> {
        let image = RgbaImage::from_pixel(4, 4, Rgba([200, 120, 40, 255]));
        Arc::new(SpriteAnimationSet::from_single_image(
            &DynamicImage::ImageRgba8(image),
            4,
        ))
    }

    pub fn session_with(settings: PetSettings) -> PetSession<RecordingSurface> {
        PetSession::with_rng(
            &settings,
            still_sprites(),
            RecordingSurface::default(),
            StdRng::seed_from_u64(9),
        )
    }
}
