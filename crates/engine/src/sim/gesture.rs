use std::rc::Rc;

use tracing::trace;

use super::entity::{EntityRef, WeakEntityRef};
use super::pointer::{PointerEvent, PointerEventName, PointerKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Init,
    DragStart,
    DragIn,
    DragOver,
    DragOut,
    DragEnd,
}

/// One semantic drag event for the engine to deliver.
#[derive(Clone)]
pub struct GestureEmit {
    pub name: PointerEventName,
    pub target: Option<EntityRef>,
}

pub enum GestureStep {
    /// Deliver, then advance again with the same pointer event.
    Continue(GestureEmit),
    /// Deliver, then wait for the next pointer event.
    Settle(GestureEmit),
    /// Nothing to deliver; wait for the next pointer event.
    Idle,
}

/// Single active drag sequence, advanced once per pointer event.
///
/// Immediate states (`DragStart`, `DragIn`, `DragOut`, `DragEnd`) chain
/// within one event; only `Init` and an unchanged `DragOver` wait.
#[derive(Debug, Default)]
pub struct GestureState {
    state: DragState,
    pressed_draggable: bool,
    was_moving: bool,
    current: Option<WeakEntityRef>,
    last_event: Option<PointerEvent>,
}

impl GestureState {
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn pressed_draggable(&self) -> bool {
        self.pressed_draggable
    }

    pub fn was_moving(&self) -> bool {
        self.was_moving
    }

    /// Raw event latched while dragging, used for the drag-icon overlay.
    pub fn last_event(&self) -> Option<PointerEvent> {
        self.last_event
    }

    pub fn current_entity(&self) -> Option<EntityRef> {
        self.current.as_ref().and_then(|weak| weak.upgrade())
    }

    pub(crate) fn set_pressed_draggable(&mut self, pressed: bool) {
        self.pressed_draggable = pressed;
    }

    /// Moving a pressed draggable, or releasing one that has already moved.
    pub fn is_drag(&self, event: &PointerEvent) -> bool {
        self.pressed_draggable
            && (event.kind == PointerKind::Move
                || (self.was_moving && event.kind == PointerKind::Release))
    }

    pub fn advance<F>(&mut self, event: &PointerEvent, mut locate: F) -> GestureStep
    where
        F: FnMut(&PointerEvent) -> Option<EntityRef>,
    {
        loop {
            match self.state {
                DragState::Init => {
                    if !(self.pressed_draggable && event.kind == PointerKind::Move) {
                        return GestureStep::Idle;
                    }
                    self.was_moving = true;
                    self.current = locate(event).as_ref().map(Rc::downgrade);
                    self.transition(DragState::DragStart);
                }
                DragState::DragStart => {
                    let emit = self.emit(PointerEventName::DragStart);
                    self.transition(DragState::DragIn);
                    return GestureStep::Continue(emit);
                }
                DragState::DragIn => {
                    self.current = locate(event).as_ref().map(Rc::downgrade);
                    let emit = self.emit(PointerEventName::DragIn);
                    self.transition(DragState::DragOver);
                    return GestureStep::Continue(emit);
                }
                DragState::DragOver => {
                    self.last_event = Some(*event);
                    let under_pointer = locate(event);
                    if !self.is_current(under_pointer.as_ref()) {
                        self.transition(DragState::DragOut);
                    } else if event.kind == PointerKind::Release {
                        self.transition(DragState::DragEnd);
                    } else {
                        return GestureStep::Settle(self.emit(PointerEventName::DragOver));
                    }
                }
                DragState::DragOut => {
                    let emit = self.emit(PointerEventName::DragOut);
                    self.transition(DragState::DragIn);
                    return GestureStep::Continue(emit);
                }
                DragState::DragEnd => {
                    let emit = self.emit(PointerEventName::DragEnd);
                    self.transition(DragState::Init);
                    self.pressed_draggable = false;
                    self.was_moving = false;
                    self.last_event = None;
                    self.current = None;
                    return GestureStep::Settle(emit);
                }
            }
        }
    }

    fn is_current(&self, candidate: Option<&EntityRef>) -> bool {
        match (&self.current, candidate) {
            (None, None) => true,
            (Some(current), Some(candidate)) => current.ptr_eq(&Rc::downgrade(candidate)),
            _ => false,
        }
    }

    fn emit(&self, name: PointerEventName) -> GestureEmit {
        GestureEmit {
            name,
            target: self.current_entity(),
        }
    }

    fn transition(&mut self, next: DragState) {
        trace!(from = ?self.state, to = ?next, "gesture_transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::testing::{handle, Block};
    use crate::sim::same_entity;

    fn names_until_wait(
        gesture: &mut GestureState,
        event: PointerEvent,
        under_pointer: &Option<EntityRef>,
    ) -> Vec<PointerEventName> {
        let mut names = Vec::new();
        loop {
            match gesture.advance(&event, |_| under_pointer.clone()) {
                GestureStep::Continue(emit) => names.push(emit.name),
                GestureStep::Settle(emit) => {
                    names.push(emit.name);
                    return names;
                }
                GestureStep::Idle => return names,
            }
        }
    }

    #[test]
    fn gate_requires_pressed_draggable() {
        let mut gesture = GestureState::default();
        assert!(!gesture.is_drag(&PointerEvent::moved(0.0, 0.0)));

        gesture.set_pressed_draggable(true);
        assert!(gesture.is_drag(&PointerEvent::moved(0.0, 0.0)));
        assert!(!gesture.is_drag(&PointerEvent::release(0.0, 0.0)));
        assert!(!gesture.is_drag(&PointerEvent::press(0.0, 0.0)));
    }

    #[test]
    fn init_ignores_non_move_events() {
        let mut gesture = GestureState::default();
        gesture.set_pressed_draggable(true);
        let names = names_until_wait(&mut gesture, PointerEvent::press(0.0, 0.0), &None);
        assert!(names.is_empty());
        assert_eq!(gesture.state(), DragState::Init);
        assert!(!gesture.was_moving());
    }

    #[test]
    fn first_move_chains_start_in_over_and_latches_event() {
        let a = handle(&Block::at("a", 0.0, 0.0, 1.0, 1.0).shared());
        let under = Some(a.clone());
        let mut gesture = GestureState::default();
        gesture.set_pressed_draggable(true);

        let event = PointerEvent::moved(3.0, 3.0);
        let names = names_until_wait(&mut gesture, event, &under);

        assert_eq!(
            names,
            [
                PointerEventName::DragStart,
                PointerEventName::DragIn,
                PointerEventName::DragOver
            ]
        );
        assert_eq!(gesture.state(), DragState::DragOver);
        assert!(gesture.was_moving());
        assert_eq!(gesture.last_event(), Some(event));
        assert!(same_entity(&gesture.current_entity().expect("current"), &a));
    }

    #[test]
    fn release_over_same_entity_ends_and_resets() {
        let a = handle(&Block::at("a", 0.0, 0.0, 1.0, 1.0).shared());
        let under = Some(a);
        let mut gesture = GestureState::default();
        gesture.set_pressed_draggable(true);
        names_until_wait(&mut gesture, PointerEvent::moved(1.0, 1.0), &under);

        let release = PointerEvent::release(1.0, 1.0);
        assert!(gesture.is_drag(&release));
        let names = names_until_wait(&mut gesture, release, &under);

        assert_eq!(names, [PointerEventName::DragEnd]);
        assert_eq!(gesture.state(), DragState::Init);
        assert!(!gesture.pressed_draggable());
        assert!(!gesture.was_moving());
        assert!(gesture.last_event().is_none());
    }

    #[test]
    fn pointer_leaving_entity_emits_out_then_in() {
        let a = handle(&Block::at("a", 0.0, 0.0, 1.0, 1.0).shared());
        let b = handle(&Block::at("b", 1.0, 0.0, 1.0, 1.0).shared());
        let mut gesture = GestureState::default();
        gesture.set_pressed_draggable(true);
        names_until_wait(&mut gesture, PointerEvent::moved(1.0, 1.0), &Some(a));

        let names = names_until_wait(&mut gesture, PointerEvent::moved(11.0, 1.0), &Some(b.clone()));
        assert_eq!(
            names,
            [
                PointerEventName::DragOut,
                PointerEventName::DragIn,
                PointerEventName::DragOver
            ]
        );
        assert!(same_entity(&gesture.current_entity().expect("current"), &b));
    }

    #[test]
    fn empty_space_counts_as_unchanged_target() {
        let mut gesture = GestureState::default();
        gesture.set_pressed_draggable(true);
        names_until_wait(&mut gesture, PointerEvent::moved(1.0, 1.0), &None);

        let names = names_until_wait(&mut gesture, PointerEvent::moved(2.0, 2.0), &None);
        assert_eq!(names, [PointerEventName::DragOver]);
    }
}
