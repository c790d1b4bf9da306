use std::any::Any;

use super::grid::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Press,
    Release,
    Move,
}

/// Raw pointer event in pointer-space pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position_px: Vec2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position_px: Vec2 { x, y },
        }
    }

    pub fn press(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Press, x, y)
    }

    pub fn release(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Release, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }
}

/// Name a pointer subscription listens for: a raw event kind or a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventName {
    Press,
    Release,
    Move,
    DragStart,
    DragIn,
    DragOver,
    DragOut,
    DragEnd,
}

impl From<PointerKind> for PointerEventName {
    fn from(kind: PointerKind) -> Self {
        match kind {
            PointerKind::Press => PointerEventName::Press,
            PointerKind::Release => PointerEventName::Release,
            PointerKind::Move => PointerEventName::Move,
        }
    }
}

impl PointerEventName {
    pub fn as_str(self) -> &'static str {
        match self {
            PointerEventName::Press => "press",
            PointerEventName::Release => "release",
            PointerEventName::Move => "move",
            PointerEventName::DragStart => "dragstart",
            PointerEventName::DragIn => "dragin",
            PointerEventName::DragOver => "dragover",
            PointerEventName::DragOut => "dragout",
            PointerEventName::DragEnd => "dragend",
        }
    }
}

/// Scratch space lent to every pointer callback of one drag.
#[derive(Default)]
pub struct DragPayload {
    data: Option<Box<dyn Any>>,
}

impl DragPayload {
    pub fn set<T: Any>(&mut self, value: T) {
        self.data = Some(Box::new(value));
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.data.as_ref().and_then(|data| data.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data.as_mut().and_then(|data| data.downcast_mut::<T>())
    }

    pub fn take<T: Any>(&mut self) -> Option<T> {
        match self.data.take()?.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(other) => {
                self.data = Some(other);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    pub fn clear(&mut self) {
        self.data = None;
    }
}

impl std::fmt::Debug for DragPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragPayload")
            .field("occupied", &self.data.is_some())
            .finish()
    }
}
