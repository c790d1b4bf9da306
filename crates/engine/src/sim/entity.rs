use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::app::Surface;

use super::grid::{GridRect, Vec2};

/// Shared handle to an application-owned entity. Identity is pointer identity.
pub type EntityRef = Rc<RefCell<dyn Entity>>;
pub type WeakEntityRef = Weak<RefCell<dyn Entity>>;

/// Capability marker an entity advertises for collision matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub &'static str);

/// Horizontal collision footprint relative to the entity origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpriteBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
}

pub trait Entity {
    fn bounds(&self) -> GridRect;

    fn update(&mut self, _dt_seconds: f32) {}

    fn render(&self, _surface: &mut dyn Surface) {}

    /// Child occupying `local`, a point relative to this entity's origin.
    fn child_at(&self, _local: Vec2) -> Option<EntityRef> {
        None
    }

    fn components(&self) -> Vec<EntityRef> {
        Vec::new()
    }

    fn sprite_box(&self) -> Option<SpriteBox> {
        None
    }

    fn tags(&self) -> &[Tag] {
        &[]
    }

    fn is_draggable(&self) -> bool {
        false
    }

    fn seconds_elapsed(&self) -> f32 {
        0.0
    }
}

pub fn same_entity(a: &EntityRef, b: &EntityRef) -> bool {
    Rc::ptr_eq(a, b)
}

pub(crate) fn has_any_tag(entity: &EntityRef, wanted: &[Tag]) -> bool {
    entity
        .borrow()
        .tags()
        .iter()
        .any(|tag| wanted.contains(tag))
}

pub(crate) fn contains_entity(entities: &[EntityRef], entity: &EntityRef) -> bool {
    entities.iter().any(|candidate| same_entity(candidate, entity))
}


#[cfg(test)]
mod tests {
    use super::testing::{handle, Block};
    use super::*;

    const ENEMY: Tag = Tag("enemy");
    const GEM: Tag = Tag("gem");

    #[test]
    fn identity_is_pointer_identity() {
        let a = Block::at("a", 0.0, 0.0, 1.0, 1.0).shared();
        let b = Block::at("a", 0.0, 0.0, 1.0, 1.0).shared();
        assert!(same_entity(&handle(&a), &handle(&a)));
        assert!(!same_entity(&handle(&a), &handle(&b)));
    }

    #[test]
    fn tag_membership_matches_any() {
        let mut block = Block::at("bug", 0.0, 0.0, 1.0, 1.0);
        block.tags = vec![ENEMY];
        let entity = handle(&block.shared());
        assert!(has_any_tag(&entity, &[GEM, ENEMY]));
        assert!(!has_any_tag(&entity, &[GEM]));
        assert!(!has_any_tag(&entity, &[]));
    }
}
