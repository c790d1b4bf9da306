use tracing::warn;

use super::entity::EntityRef;
use super::grid::{Grid, GridCell, Vec2};

const MAX_CHILD_DEPTH: usize = 64;

/// First top-level entity (declaration order) whose box contains `cell`.
pub fn entity_at_cell(entities: &[EntityRef], cell: GridCell) -> Option<EntityRef> {
    entities
        .iter()
        .find(|entity| entity.borrow().bounds().contains_cell(cell))
        .cloned()
}

/// Every top-level entity whose box contains `cell`, in declaration order.
pub fn entities_at_cell(entities: &[EntityRef], cell: GridCell) -> Vec<EntityRef> {
    entities
        .iter()
        .filter(|entity| entity.borrow().bounds().contains_cell(cell))
        .cloned()
        .collect()
}

/// Descends from the first top-level hit into nested children, translating
/// the point into each parent's local space, and returns the deepest match.
pub fn resolve_deepest(entities: &[EntityRef], cell: GridCell) -> Option<EntityRef> {
    let mut current = entity_at_cell(entities, cell)?;
    let mut point = cell.as_point();

    for _ in 0..MAX_CHILD_DEPTH {
        let next = {
            let entity = current.borrow();
            let origin = entity.bounds().origin();
            point = Vec2 {
                x: point.x - origin.x,
                y: point.y - origin.y,
            };
            entity.child_at(point)
        };
        match next {
            Some(child) => current = child,
            None => return Some(current),
        }
    }

    warn!(
        max_depth = MAX_CHILD_DEPTH,
        cell_x = cell.x,
        cell_y = cell.y,
        "child_resolution_depth_exceeded"
    );
    Some(current)
}

pub fn locate(entities: &[EntityRef], grid: &Grid, pixel: Vec2) -> Option<EntityRef> {
    resolve_deepest(entities, grid.pixel_to_cell(pixel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::testing::{handle, Block};
    use crate::sim::same_entity;

    fn grid() -> Grid {
        Grid {
            cell_width: 10,
            cell_height: 10,
            ..Grid::default()
        }
    }

    #[test]
    fn points_outside_every_entity_resolve_to_none() {
        let entities = vec![
            handle(&Block::at("a", 0.0, 0.0, 2.0, 2.0).shared()),
            handle(&Block::at("b", 5.0, 5.0, 1.0, 1.0).shared()),
        ];
        for (x, y) in [(25.0, 5.0), (5.0, 25.0), (45.0, 55.0), (60.0, 60.0), (-1.0, -1.0)] {
            assert!(
                locate(&entities, &grid(), Vec2::new(x, y)).is_none(),
                "({x}, {y}) should miss"
            );
        }
    }

    #[test]
    fn point_inside_single_childless_entity_resolves_to_it() {
        let a = handle(&Block::at("a", 2.0, 3.0, 2.0, 1.0).shared());
        let entities = vec![a.clone()];

        for (x, y) in [(20.0, 30.0), (39.9, 39.9), (35.0, 31.0)] {
            let hit = locate(&entities, &grid(), Vec2::new(x, y)).expect("hit");
            assert!(same_entity(&hit, &a));
        }
    }

    #[test]
    fn entity_occupies_only_its_top_left_cell_columns() {
        let a = handle(&Block::at("a", 2.0, 0.0, 1.0, 1.0).shared());
        let entities = vec![a];
        assert!(entity_at_cell(&entities, GridCell::new(2, 0)).is_some());
        assert!(entity_at_cell(&entities, GridCell::new(3, 0)).is_none());
    }

    #[test]
    fn overlapping_entities_resolve_to_declaration_order() {
        let first = handle(&Block::at("first", 0.0, 0.0, 4.0, 4.0).shared());
        let second = handle(&Block::at("second", 1.0, 1.0, 2.0, 2.0).shared());
        let entities = vec![first.clone(), second.clone()];

        let hit = locate(&entities, &grid(), Vec2::new(15.0, 15.0)).expect("hit");
        assert!(same_entity(&hit, &first));
        assert_eq!(entities_at_cell(&entities, GridCell::new(1, 1)).len(), 2);
    }

    #[test]
    fn nested_children_resolve_to_deepest_local_match() {
        let leaf = Block::at("leaf", 1.0, 0.0, 1.0, 1.0).shared();
        let mut middle = Block::at("middle", 2.0, 1.0, 3.0, 2.0);
        middle.children.push(leaf.clone());
        let middle = middle.shared();
        let mut root = Block::at("root", 10.0, 10.0, 6.0, 6.0);
        root.children.push(middle.clone());
        let root = root.shared();
        let entities = vec![handle(&root)];

        // Absolute cell (13, 11): local to root (3, 1), local to middle (1, 0) -> leaf.
        let hit = resolve_deepest(&entities, GridCell::new(13, 11)).expect("hit");
        assert!(same_entity(&hit, &handle(&leaf)));

        // Absolute cell (12, 12): inside middle but not leaf.
        let hit = resolve_deepest(&entities, GridCell::new(12, 12)).expect("hit");
        assert!(same_entity(&hit, &handle(&middle)));

        // Absolute cell (15, 15): inside root only.
        let hit = resolve_deepest(&entities, GridCell::new(15, 15)).expect("hit");
        assert!(same_entity(&hit, &handle(&root)));
    }
}
