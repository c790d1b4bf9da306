use super::entity::{contains_entity, has_any_tag, EntityRef, Tag};

/// Row-restricted horizontal footprint used by the collision scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    pub row: f32,
    pub left: f32,
    pub width: f32,
}

impl CollisionBox {
    /// Origin plus sprite-box offset; entities without a sprite box use
    /// their own width at offset zero.
    pub fn of(entity: &EntityRef) -> Self {
        let entity = entity.borrow();
        let bounds = entity.bounds();
        match entity.sprite_box() {
            Some(sprite) => Self {
                row: bounds.y,
                left: bounds.x + sprite.x,
                width: sprite.w,
            },
            None => Self {
                row: bounds.y,
                left: bounds.x,
                width: bounds.w,
            },
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    fn right_edge_within(&self, other: &CollisionBox) -> bool {
        self.right() >= other.left && self.right() <= other.right()
    }
}

/// Same row, and either right edge lies inside the other's span (inclusive).
///
/// This is a test on right edges rather than interval intersection. The two
/// agree for non-negative widths; a negative-width footprint overlapping only
/// on its left side is not reported.
pub fn touches(subject: &CollisionBox, candidate: &CollisionBox) -> bool {
    candidate.row == subject.row
        && (candidate.right_edge_within(subject) || subject.right_edge_within(candidate))
}

/// Active entities carrying any of `tags`, each followed by its matching
/// components. An entity matching several tags is listed once.
pub fn collect_candidates(entities: &[EntityRef], tags: &[Tag]) -> Vec<EntityRef> {
    let mut candidates: Vec<EntityRef> = Vec::new();
    for entity in entities {
        if has_any_tag(entity, tags) && !contains_entity(&candidates, entity) {
            candidates.push(entity.clone());
        }
        let components = entity.borrow().components();
        for component in components {
            if has_any_tag(&component, tags) && !contains_entity(&candidates, &component) {
                candidates.push(component);
            }
        }
    }
    candidates
}

/// Candidates that touch `subject`, in candidate order.
///
/// The subject footprint is fixed up front; each candidate footprint is read
/// lazily, so a callback run between hits sees later candidates as they are.
pub fn hits_for(
    subject: &EntityRef,
    entities: &[EntityRef],
    tags: &[Tag],
) -> impl Iterator<Item = EntityRef> {
    let subject_box = CollisionBox::of(subject);
    collect_candidates(entities, tags)
        .into_iter()
        .filter(move |candidate| touches(&subject_box, &CollisionBox::of(candidate)))
}
