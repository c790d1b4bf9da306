use std::rc::Rc;

use winit::keyboard::KeyCode;

use super::commands::Commands;
use super::entity::{EntityRef, Tag};
use super::grid::Vec2;
use super::pointer::{DragPayload, PointerEventName};

pub type CollisionCallback = Rc<dyn Fn(&EntityRef, &mut Commands)>;
pub type KeyCallback = Rc<dyn Fn(&EntityRef, &mut Commands)>;
pub type TimerCallback = Rc<dyn Fn(&mut Commands)>;
pub type PointerCallback = Rc<dyn Fn(Vec2, &mut DragPayload, &mut Commands)>;

/// Fires with every active candidate carrying one of `tags` that touches `entity`.
#[derive(Clone)]
pub struct CollisionSubscription {
    pub entity: EntityRef,
    pub tags: Vec<Tag>,
    pub callback: CollisionCallback,
}

impl CollisionSubscription {
    pub fn new(
        entity: EntityRef,
        tags: impl Into<Vec<Tag>>,
        callback: impl Fn(&EntityRef, &mut Commands) + 'static,
    ) -> Self {
        Self {
            entity,
            tags: tags.into(),
            callback: Rc::new(callback),
        }
    }
}

#[derive(Clone)]
pub struct KeySubscription {
    pub key: KeyCode,
    pub entity: EntityRef,
    pub callback: KeyCallback,
}

impl KeySubscription {
    pub fn new(
        key: KeyCode,
        entity: EntityRef,
        callback: impl Fn(&EntityRef, &mut Commands) + 'static,
    ) -> Self {
        Self {
            key,
            entity,
            callback: Rc::new(callback),
        }
    }
}

/// Fires every frame while the owner's elapsed seconds are below `threshold_seconds`.
#[derive(Clone)]
pub struct TimerSubscription {
    pub entity: EntityRef,
    pub threshold_seconds: f32,
    pub callback: TimerCallback,
}

impl TimerSubscription {
    pub fn new(
        entity: EntityRef,
        threshold_seconds: f32,
        callback: impl Fn(&mut Commands) + 'static,
    ) -> Self {
        Self {
            entity,
            threshold_seconds,
            callback: Rc::new(callback),
        }
    }
}

#[derive(Clone)]
pub struct PointerSubscription {
    pub name: PointerEventName,
    pub entity: EntityRef,
    pub callback: PointerCallback,
}

impl PointerSubscription {
    pub fn new(
        name: PointerEventName,
        entity: EntityRef,
        callback: impl Fn(Vec2, &mut DragPayload, &mut Commands) + 'static,
    ) -> Self {
        Self {
            name,
            entity,
            callback: Rc::new(callback),
        }
    }
}

#[derive(Clone)]
pub enum Subscription {
    Collision(CollisionSubscription),
    Key(KeySubscription),
    Timer(TimerSubscription),
    Pointer(PointerSubscription),
}

impl From<CollisionSubscription> for Subscription {
    fn from(value: CollisionSubscription) -> Self {
        Subscription::Collision(value)
    }
}

impl From<KeySubscription> for Subscription {
    fn from(value: KeySubscription) -> Self {
        Subscription::Key(value)
    }
}

impl From<TimerSubscription> for Subscription {
    fn from(value: TimerSubscription) -> Self {
        Subscription::Timer(value)
    }
}

impl From<PointerSubscription> for Subscription {
    fn from(value: PointerSubscription) -> Self {
        Subscription::Pointer(value)
    }
}
