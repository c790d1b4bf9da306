use std::cell::RefCell;
use std::rc::Rc;

use grid_engine::{
    Engine, Entity, GridRect, KeyCode, KeySubscription, PointerEventName, PointerSubscription,
    Rgba, Surface, TimerSubscription,
};

pub(crate) const COUNTDOWN_SECONDS: f32 = 10.0;
const BLINK_HALF_PERIOD_FRAMES: u32 = 15;
const BADGE_BOUNDS: GridRect = GridRect::new(70.0, 5.0, 20.0, 3.0);

const BADGE_COLOR: Rgba = [40, 42, 50, 255];
const BAR_BRIGHT: Rgba = [250, 170, 40, 255];
const BAR_DIM: Rgba = [150, 100, 30, 255];
const EXPIRED_COLOR: Rgba = [200, 40, 40, 255];

/// Badge whose bar drains over `COUNTDOWN_SECONDS` and blinks until empty.
pub(crate) struct Countdown {
    pub(crate) elapsed: f32,
    pub(crate) blink_frames: u32,
}

impl Countdown {
    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.blink_frames = 0;
    }

    fn remaining_fraction(&self) -> f32 {
        (1.0 - self.elapsed / COUNTDOWN_SECONDS).clamp(0.0, 1.0)
    }

    fn blink_on(&self) -> bool {
        (self.blink_frames / BLINK_HALF_PERIOD_FRAMES) % 2 == 0
    }
}

impl Entity for Countdown {
    fn bounds(&self) -> GridRect {
        BADGE_BOUNDS
    }

    fn update(&mut self, dt_seconds: f32) {
        self.elapsed += dt_seconds;
    }

    fn seconds_elapsed(&self) -> f32 {
        self.elapsed
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fill_rect(BADGE_BOUNDS, BADGE_COLOR);
        let fraction = self.remaining_fraction();
        if fraction <= 0.0 {
            surface.fill_rect(BADGE_BOUNDS, EXPIRED_COLOR);
            return;
        }
        let bar = GridRect::new(
            BADGE_BOUNDS.x,
            BADGE_BOUNDS.y,
            BADGE_BOUNDS.w * fraction,
            BADGE_BOUNDS.h,
        );
        let color = if self.blink_on() { BAR_BRIGHT } else { BAR_DIM };
        surface.fill_rect(bar, color);
    }
}

/// Timer drives the blink; a click on the badge or `R` restarts it.
pub(crate) fn install(engine: &mut Engine) -> Rc<RefCell<Countdown>> {
    let countdown = Rc::new(RefCell::new(Countdown {
        elapsed: 0.0,
        blink_frames: 0,
    }));
    engine.add_entity(countdown.clone());

    let target = countdown.clone();
    engine.add_timer_subscription(TimerSubscription::new(
        countdown.clone(),
        COUNTDOWN_SECONDS,
        move |_| target.borrow_mut().blink_frames += 1,
    ));

    let target = countdown.clone();
    engine.add_pointer_subscription(PointerSubscription::new(
        PointerEventName::Press,
        countdown.clone(),
        move |_, _, _| target.borrow_mut().reset(),
    ));

    let target = countdown.clone();
    engine.add_key_subscription(KeySubscription::new(
        KeyCode::KeyR,
        countdown.clone(),
        move |_, _| target.borrow_mut().reset(),
    ));

    countdown
}
