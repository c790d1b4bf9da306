mod collision;
mod commands;
mod engine;
mod entity;
mod gesture;
mod grid;
mod pointer;
mod resolver;
mod screen;
mod subscription;

pub use collision::{collect_candidates, hits_for, touches, CollisionBox};
pub use commands::{Commands, ScreenCommand};
pub use engine::Engine;
pub use entity::{same_entity, Entity, EntityRef, SpriteBox, Tag, WeakEntityRef};
pub use gesture::{DragState, GestureEmit, GestureState, GestureStep};
pub use grid::{Grid, GridCell, GridRect, Vec2};
pub use pointer::{DragPayload, PointerEvent, PointerEventName, PointerKind};
pub use resolver::{entities_at_cell, entity_at_cell, locate, resolve_deepest};
pub use screen::{Screen, ScreenCounts, ScreenState};
pub use subscription::{
    CollisionCallback, CollisionSubscription, KeyCallback, KeySubscription, PointerCallback,
    PointerSubscription, Subscription, TimerCallback, TimerSubscription,
};
