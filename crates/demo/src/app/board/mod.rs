mod countdown;
mod rack;
mod runner;

use std::cell::RefCell;
use std::rc::Rc;

use grid_engine::{
    Engine, Entity, EntityRef, GridRect, PointerEventName, PointerSubscription,
};
use tracing::info;

/// Covers the canvas behind every other entity, so a drop on empty space
/// still lands on something.
struct Backdrop {
    bounds: GridRect,
}

impl Entity for Backdrop {
    fn bounds(&self) -> GridRect {
        self.bounds
    }
}

pub(crate) struct Board {
    pub(crate) rack: rack::Rack,
    pub(crate) course: runner::Course,
    pub(crate) countdown: Rc<RefCell<countdown::Countdown>>,
}

impl Board {
    fn log_layout(&self, engine: &Engine) {
        let counts = engine.active().counts();
        info!(
            entity_count = counts.entities,
            key_subscriptions = counts.keys,
            pointer_subscriptions = counts.pointers,
            slots = self.rack.slots.len(),
            tokens = self.rack.tokens.len(),
            lane_row = self.course.runner.borrow().bounds.y,
            hazard_x = self.course.hazard.borrow().bounds.x,
            countdown_seconds = countdown::COUNTDOWN_SECONDS - self.countdown.borrow().elapsed,
            "board_populated"
        );
    }
}

pub(crate) fn populate(engine: &mut Engine) -> Board {
    let board = Board {
        rack: rack::install(engine),
        course: runner::install(engine),
        countdown: countdown::install(engine),
    };
    discard_unplaced_drops(engine);
    board.log_layout(engine);
    board
}

/// A drag that ends anywhere but a slot drops whatever the token handed over.
fn discard_unplaced_drops(engine: &mut Engine) {
    let grid = *engine.grid();
    engine.add_entity(Rc::new(RefCell::new(Backdrop {
        bounds: GridRect::new(0.0, 0.0, grid.cols as f32, grid.rows as f32),
    })));
    let top_level: Vec<EntityRef> = engine.active().entities.clone();
    for entity in top_level {
        engine.add_pointer_subscription(PointerSubscription::new(
            PointerEventName::DragEnd,
            entity,
            |_, payload, _| payload.clear(),
        ));
    }
}
