use std::time::{Duration, Instant};

use crate::sim::{DragState, Engine};

/// Frame timing over one interval plus the engine state seen on its last frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub active_entities: usize,
    pub backup_entities: usize,
    pub running: bool,
    pub drag_state: DragState,
    /// Frames in the interval that ended with a drag in progress.
    pub drag_frames: u32,
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    frame_time_sum: Duration,
    drag_frames: u32,
    last_engine: EngineSample,
}

#[derive(Debug, Clone, Copy, Default)]
struct EngineSample {
    active_entities: usize,
    backup_entities: usize,
    running: bool,
    drag_state: DragState,
}

impl EngineSample {
    fn of(engine: &Engine) -> Self {
        Self {
            active_entities: engine.entity_count(),
            backup_entities: engine.screens().backup().entities.len(),
            running: engine.is_running(),
            drag_state: engine.gesture().state(),
        }
    }
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    fn starting_at(interval_start: Instant, interval: Duration) -> Self {
        Self {
            interval_start,
            interval,
            frames: 0,
            frame_time_sum: Duration::ZERO,
            drag_frames: 0,
            last_engine: EngineSample::default(),
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, engine: &Engine) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
        if engine.gesture().last_event().is_some() {
            self.drag_frames = self.drag_frames.saturating_add(1);
        }
        self.last_engine = EngineSample::of(engine);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            (self.frame_time_sum.as_secs_f32() / self.frames as f32) * 1000.0
        };

        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            frame_time_ms,
            active_entities: self.last_engine.active_entities,
            backup_entities: self.last_engine.backup_entities,
            running: self.last_engine.running,
            drag_state: self.last_engine.drag_state,
            drag_frames: self.drag_frames,
        };

        self.interval_start = now;
        self.frames = 0;
        self.frame_time_sum = Duration::ZERO;
        self.drag_frames = 0;

        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::sim::{Entity, Grid, GridRect, PointerEvent};

    struct Tile {
        bounds: GridRect,
        draggable: bool,
    }

    impl Entity for Tile {
        fn bounds(&self) -> GridRect {
            self.bounds
        }

        fn is_draggable(&self) -> bool {
            self.draggable
        }
    }

    fn tile(x: f32, draggable: bool) -> Rc<RefCell<Tile>> {
        Rc::new(RefCell::new(Tile {
            bounds: GridRect::new(x, 0.0, 1.0, 1.0),
            draggable,
        }))
    }

    fn idle_engine() -> Engine {
        Engine::new(Grid::default())
    }

    #[test]
    fn snapshot_computes_expected_values() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));

        let engine = idle_engine();
        accumulator.record_frame(Duration::from_millis(16), &engine);
        accumulator.record_frame(Duration::from_millis(16), &engine);

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot should be emitted");

        assert!((snapshot.fps - 2.0).abs() < 0.05);
        assert!((snapshot.frame_time_ms - 16.0).abs() < 0.001);
    }

    #[test]
    fn snapshot_not_emitted_before_interval() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));
        accumulator.record_frame(Duration::from_millis(16), &idle_engine());

        assert!(accumulator
            .maybe_snapshot(base + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn snapshot_resets_the_interval() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));
        accumulator.record_frame(Duration::from_millis(10), &idle_engine());
        accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("first snapshot");

        let empty = accumulator
            .maybe_snapshot(base + Duration::from_secs(2))
            .expect("second snapshot");
        assert_eq!(empty.fps, 0.0);
        assert_eq!(empty.frame_time_ms, 0.0);
    }

    #[test]
    fn snapshot_reports_engine_state_and_drag_frames() {
        let base = Instant::now();
        let mut accumulator = MetricsAccumulator::starting_at(base, Duration::from_secs(1));
        let mut engine = idle_engine();
        engine.add_entity(tile(0.0, true));
        engine.add_entity(tile(4.0, false));

        accumulator.record_frame(Duration::from_millis(16), &engine);
        engine.handle_pointer(PointerEvent::press(1.0, 1.0));
        engine.handle_pointer(PointerEvent::moved(2.0, 1.0));
        engine.handle_pointer(PointerEvent::moved(3.0, 1.0));
        accumulator.record_frame(Duration::from_millis(16), &engine);
        engine.save_screen();
        engine.set_running(false);
        accumulator.record_frame(Duration::from_millis(16), &engine);

        let snapshot = accumulator
            .maybe_snapshot(base + Duration::from_secs(1))
            .expect("snapshot should be emitted");

        assert_eq!(snapshot.active_entities, 2);
        assert_eq!(snapshot.backup_entities, 2);
        assert!(!snapshot.running);
        assert_eq!(snapshot.drag_state, DragState::DragOver);
        assert_eq!(snapshot.drag_frames, 2);
    }
}
