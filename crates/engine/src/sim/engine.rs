use std::time::Instant;

use tracing::{debug, info};
use winit::keyboard::KeyCode;

use crate::app::{draw_drag_icon, Surface};

use super::collision::hits_for;
use super::commands::{Commands, ScreenCommand};
use super::entity::{contains_entity, same_entity, EntityRef};
use super::gesture::{GestureEmit, GestureState, GestureStep};
use super::grid::{Grid, Vec2};
use super::pointer::{DragPayload, PointerEvent, PointerEventName, PointerKind};
use super::resolver::{entities_at_cell, locate};
use super::screen::{Screen, ScreenState};
use super::subscription::{
    CollisionSubscription, KeySubscription, PointerCallback, PointerSubscription, Subscription,
    TimerSubscription,
};

/// Owns the screens, the gesture machine and the frame clock.
///
/// Every entry point (`handle_pointer`, `handle_key`, `frame`) applies the
/// commands its callbacks queued before returning.
pub struct Engine {
    grid: Grid,
    screens: ScreenState,
    gesture: GestureState,
    payload: DragPayload,
    commands: Commands,
    running: bool,
    last_frame: Option<Instant>,
}

impl Engine {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            screens: ScreenState::default(),
            gesture: GestureState::default(),
            payload: DragPayload::default(),
            commands: Commands::default(),
            running: true,
            last_frame: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn screens(&self) -> &ScreenState {
        &self.screens
    }

    pub fn active(&self) -> &Screen {
        self.screens.active()
    }

    pub fn entity_count(&self) -> usize {
        self.screens.active().entities.len()
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn drag_payload(&self) -> &DragPayload {
        &self.payload
    }

    pub fn drag_payload_mut(&mut self) -> &mut DragPayload {
        &mut self.payload
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            info!(running, "engine_running_changed");
        }
        self.running = running;
    }

    pub fn add_entity(&mut self, entity: EntityRef) {
        self.screens.active_mut().entities.push(entity);
    }

    pub fn subscribe(&mut self, subscription: impl Into<Subscription>) {
        self.screens.active_mut().add_subscription(subscription.into());
    }

    pub fn add_collision_subscription(&mut self, subscription: CollisionSubscription) {
        self.subscribe(subscription);
    }

    pub fn add_key_subscription(&mut self, subscription: KeySubscription) {
        self.subscribe(subscription);
    }

    pub fn add_timer_subscription(&mut self, subscription: TimerSubscription) {
        self.subscribe(subscription);
    }

    pub fn add_pointer_subscription(&mut self, subscription: PointerSubscription) {
        self.subscribe(subscription);
    }

    pub fn save_screen(&mut self) {
        self.screens.save();
    }

    pub fn restore_screen(&mut self) {
        self.screens.restore();
    }

    pub fn clear_active(&mut self) {
        self.screens.clear_active();
    }

    pub fn clear_backup(&mut self) {
        self.screens.clear_backup();
    }

    /// Deepest active entity under `pixel`.
    pub fn locate(&self, pixel: Vec2) -> Option<EntityRef> {
        locate(&self.screens.active().entities, &self.grid, pixel)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if self.gesture.is_drag(&event) {
            self.drive_gesture(&event);
        } else {
            match event.kind {
                PointerKind::Press => {
                    if let Some(entity) = self.locate(event.position_px) {
                        if entity.borrow().is_draggable() {
                            self.gesture.set_pressed_draggable(true);
                        }
                    }
                }
                PointerKind::Release => self.gesture.set_pressed_draggable(false),
                PointerKind::Move => {}
            }
            self.dispatch_pointer(&event);
        }
        self.apply_pending();
    }

    /// Plain pointer dispatch to top-level entities under the pointer cell.
    pub fn dispatch_pointer(&mut self, event: &PointerEvent) {
        let cell = self.grid.pixel_to_cell(event.position_px);
        let name = PointerEventName::from(event.kind);
        for entity in entities_at_cell(&self.screens.active().entities, cell) {
            let origin = entity.borrow().bounds().origin();
            let local = cell.offset_from(origin);
            let callbacks: Vec<PointerCallback> = self
                .screens
                .active()
                .pointers
                .iter()
                .filter(|sub| sub.name == name && same_entity(&sub.entity, &entity))
                .map(|sub| sub.callback.clone())
                .collect();
            for callback in callbacks {
                callback(local, &mut self.payload, &mut self.commands);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        let active = self.screens.active();
        for sub in active.keys.iter().filter(|sub| sub.key == key) {
            for entity in &active.entities {
                if same_entity(entity, &sub.entity) {
                    (sub.callback)(entity, &mut self.commands);
                }
            }
        }
        self.apply_pending();
    }

    /// One scheduler tick: update, render, collision scan, timer scan.
    pub fn frame(&mut self, now: Instant, surface: &mut dyn Surface) {
        let dt_seconds = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);

        if self.running {
            self.update_entities(dt_seconds);
        }
        self.render(surface);
        self.check_collisions();
        self.check_timers();
        self.last_frame = Some(now);
        self.apply_pending();
    }

    fn update_entities(&mut self, dt_seconds: f32) {
        for entity in &self.screens.active().entities {
            entity.borrow_mut().update(dt_seconds);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for entity in &self.screens.active().entities {
            entity.borrow().render(surface);
        }
        if let Some(event) = self.gesture.last_event() {
            draw_drag_icon(surface, self.grid.pixel_to_cell(event.position_px));
        }
    }

    fn check_collisions(&mut self) {
        let active = self.screens.active();
        for sub in &active.collisions {
            if !contains_entity(&active.entities, &sub.entity) {
                continue;
            }
            for candidate in hits_for(&sub.entity, &active.entities, &sub.tags) {
                (sub.callback)(&candidate, &mut self.commands);
            }
        }
    }

    fn check_timers(&mut self) {
        let active = self.screens.active();
        for sub in &active.timers {
            if !contains_entity(&active.entities, &sub.entity) {
                continue;
            }
            let elapsed = sub.entity.borrow().seconds_elapsed();
            if elapsed < sub.threshold_seconds {
                (sub.callback)(&mut self.commands);
            }
        }
    }

    fn drive_gesture(&mut self, event: &PointerEvent) {
        let grid = self.grid;
        loop {
            let entities = &self.screens.active().entities;
            let step = self
                .gesture
                .advance(event, |event| locate(entities, &grid, event.position_px));
            match step {
                GestureStep::Continue(emit) => self.deliver_gesture(&emit, event),
                GestureStep::Settle(emit) => {
                    self.deliver_gesture(&emit, event);
                    return;
                }
                GestureStep::Idle => return,
            }
        }
    }

    fn deliver_gesture(&mut self, emit: &GestureEmit, event: &PointerEvent) {
        let Some(target) = emit.target.as_ref() else {
            debug!(event = emit.name.as_str(), "gesture_emit_without_target");
            return;
        };
        let callback = self
            .screens
            .active()
            .pointers
            .iter()
            .find(|sub| sub.name == emit.name && same_entity(&sub.entity, target))
            .map(|sub| sub.callback.clone());
        let Some(callback) = callback else {
            return;
        };

        let origin = target.borrow().bounds().origin();
        let local = self.grid.pixel_to_cell(event.position_px).offset_from(origin);
        debug!(
            event = emit.name.as_str(),
            local_x = local.x,
            local_y = local.y,
            "gesture_emitted"
        );
        callback(local, &mut self.payload, &mut self.commands);
    }

    fn apply_pending(&mut self) {
        for command in self.commands.take() {
            debug!(command = command.label(), "screen_command_applied");
            match command {
                ScreenCommand::AddEntity(entity) => self.add_entity(entity),
                ScreenCommand::Subscribe(subscription) => self.subscribe(subscription),
                ScreenCommand::SaveScreen => self.save_screen(),
                ScreenCommand::RestoreScreen => self.restore_screen(),
                ScreenCommand::ClearActive => self.clear_active(),
                ScreenCommand::ClearBackup => self.clear_backup(),
                ScreenCommand::SetRunning(running) => self.set_running(running),
            }
        }
    }
}
