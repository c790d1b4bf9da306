use std::cell::{Cell, RefCell};
use std::rc::Rc;

use grid_engine::{
    CollisionSubscription, Commands, Engine, Entity, EntityRef, Grid, GridRect, KeyCode,
    KeySubscription, Rgba, SpriteBox, Surface, Tag, Vec2,
};
use tracing::info;

pub(crate) const HAZARD: Tag = Tag("hazard");

const LANE_ROW: f32 = 60.0;
const RUNNER_START_X: f32 = 4.0;
const RUNNER_SIZE: f32 = 3.0;
const HAZARD_SIZE: f32 = 3.0;
const HAZARD_PATROL: (f32, f32) = (40.0, 90.0);
const HAZARD_SPEED_CELLS_PER_SECOND: f32 = 12.0;

const RUNNER_COLOR: Rgba = [90, 200, 120, 255];
const HAZARD_COLOR: Rgba = [220, 50, 50, 255];
const HAZARD_OUTLINE: Rgba = [90, 10, 10, 255];
const LANE_COLOR: Rgba = [200, 200, 210, 255];
const DIM_COLOR: Rgba = [20, 20, 30, 160];
const BANNER_COLOR: Rgba = [245, 245, 250, 255];
const RESUME_ICON_COLOR: Rgba = [60, 160, 230, 255];

pub(crate) struct Runner {
    pub(crate) bounds: GridRect,
    max_x: f32,
    max_y: f32,
}

impl Runner {
    fn new(grid: &Grid) -> Self {
        Self {
            bounds: GridRect::new(RUNNER_START_X, LANE_ROW, RUNNER_SIZE, RUNNER_SIZE),
            max_x: grid.cols as f32 - RUNNER_SIZE,
            max_y: grid.rows as f32 - RUNNER_SIZE,
        }
    }

    fn step(&mut self, dx: f32, dy: f32) {
        self.bounds.x = (self.bounds.x + dx).clamp(0.0, self.max_x);
        self.bounds.y = (self.bounds.y + dy).clamp(0.0, self.max_y);
    }

    fn reset(&mut self) {
        self.bounds.x = RUNNER_START_X;
        self.bounds.y = LANE_ROW;
    }
}

impl Entity for Runner {
    fn bounds(&self) -> GridRect {
        self.bounds
    }

    fn sprite_box(&self) -> Option<SpriteBox> {
        Some(SpriteBox {
            x: 0.5,
            y: 0.0,
            w: 2.0,
        })
    }

    fn render(&self, surface: &mut dyn Surface) {
        let body = GridRect::new(self.bounds.x + 0.5, self.bounds.y + 1.0, 2.0, 2.0);
        surface.fill_rect(body, RUNNER_COLOR);
        let head = Vec2::new(self.bounds.x + 1.5, self.bounds.y + 0.5);
        let radius_px = surface.grid().cell_width as f32 * 0.5;
        surface.fill_circle(head, radius_px, RUNNER_COLOR);
    }
}

/// Patrols back and forth along the runner's lane.
pub(crate) struct Hazard {
    pub(crate) bounds: GridRect,
    direction: f32,
}

impl Hazard {
    fn new() -> Self {
        Self {
            bounds: GridRect::new(HAZARD_PATROL.0, LANE_ROW, HAZARD_SIZE, HAZARD_SIZE),
            direction: 1.0,
        }
    }
}

impl Entity for Hazard {
    fn bounds(&self) -> GridRect {
        self.bounds
    }

    fn tags(&self) -> &[Tag] {
        &[HAZARD]
    }

    fn update(&mut self, dt_seconds: f32) {
        let (min_x, max_x) = HAZARD_PATROL;
        self.bounds.x += self.direction * HAZARD_SPEED_CELLS_PER_SECOND * dt_seconds;
        if self.bounds.x >= max_x {
            self.bounds.x = max_x;
            self.direction = -1.0;
        } else if self.bounds.x <= min_x {
            self.bounds.x = min_x;
            self.direction = 1.0;
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let GridRect { x, y, w, h } = self.bounds;
        let spikes = [
            Vec2::new(x, y + h),
            Vec2::new(x + w * 0.5, y),
            Vec2::new(x + w, y + h),
        ];
        surface.fill_polygon(&spikes, HAZARD_COLOR, HAZARD_OUTLINE);
    }
}

/// Overlay shown while the board is saved away.
pub(crate) struct PauseBanner {
    bounds: GridRect,
}

impl PauseBanner {
    fn centered(grid: &Grid) -> Self {
        let w = 24.0;
        let h = 10.0;
        Self {
            bounds: GridRect::new(
                (grid.cols as f32 - w) * 0.5,
                (grid.rows as f32 - h) * 0.5,
                w,
                h,
            ),
        }
    }
}

impl Entity for PauseBanner {
    fn bounds(&self) -> GridRect {
        self.bounds
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fill_screen(DIM_COLOR);
        surface.fill_rect(self.bounds, BANNER_COLOR);
        let GridRect { x, y, w, h } = self.bounds;
        let resume = [
            Vec2::new(x + w * 0.4, y + h * 0.25),
            Vec2::new(x + w * 0.65, y + h * 0.5),
            Vec2::new(x + w * 0.4, y + h * 0.75),
        ];
        surface.fill_polygon(&resume, RESUME_ICON_COLOR, RESUME_ICON_COLOR);
    }
}

/// Static strip under the lane so the patrol row is visible.
struct Lane {
    bounds: GridRect,
}

impl Entity for Lane {
    fn bounds(&self) -> GridRect {
        self.bounds
    }

    fn render(&self, surface: &mut dyn Surface) {
        let GridRect { x, y, w, .. } = self.bounds;
        surface.draw_line(Vec2::new(x, y), Vec2::new(x + w, y), 2.0, LANE_COLOR);
    }
}

pub(crate) struct Course {
    pub(crate) runner: Rc<RefCell<Runner>>,
    pub(crate) hazard: Rc<RefCell<Hazard>>,
}

pub(crate) fn install(engine: &mut Engine) -> Course {
    let grid = *engine.grid();
    engine.add_entity(Rc::new(RefCell::new(Lane {
        bounds: GridRect::new(0.0, LANE_ROW + RUNNER_SIZE, grid.cols as f32, 0.0),
    })));

    let runner = Rc::new(RefCell::new(Runner::new(&grid)));
    let hazard = Rc::new(RefCell::new(Hazard::new()));
    engine.add_entity(runner.clone());
    engine.add_entity(hazard.clone());

    for (key, dx, dy) in [
        (KeyCode::ArrowLeft, -1.0, 0.0),
        (KeyCode::ArrowRight, 1.0, 0.0),
        (KeyCode::ArrowUp, 0.0, -1.0),
        (KeyCode::ArrowDown, 0.0, 1.0),
    ] {
        let target = runner.clone();
        engine.add_key_subscription(KeySubscription::new(key, runner.clone(), move |_, _| {
            target.borrow_mut().step(dx, dy)
        }));
    }

    let running = Rc::new(Cell::new(engine.is_running()));
    engine.add_key_subscription(KeySubscription::new(
        KeyCode::Space,
        runner.clone(),
        move |_, commands| {
            running.set(!running.get());
            commands.set_running(running.get());
        },
    ));

    let target = runner.clone();
    engine.add_collision_subscription(CollisionSubscription::new(
        runner.clone(),
        [HAZARD],
        move |_, commands| {
            target.borrow_mut().reset();
            info!("runner_hit_hazard");
            show_pause_banner(&grid, commands);
        },
    ));

    Course { runner, hazard }
}

fn show_pause_banner(grid: &Grid, commands: &mut Commands) {
    let banner: EntityRef = Rc::new(RefCell::new(PauseBanner::centered(grid)));
    commands.save_screen();
    commands.clear_active();
    commands.add_entity(banner.clone());
    commands.subscribe(KeySubscription::new(
        KeyCode::Enter,
        banner,
        |_, commands| {
            commands.clear_active();
            commands.restore_screen();
        },
    ));
}
