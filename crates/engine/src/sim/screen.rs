use tracing::info;

use super::entity::EntityRef;
use super::subscription::{
    CollisionSubscription, KeySubscription, PointerSubscription, Subscription, TimerSubscription,
};

/// Everything one scene registers: entities plus the four subscription kinds.
#[derive(Clone, Default)]
pub struct Screen {
    pub entities: Vec<EntityRef>,
    pub collisions: Vec<CollisionSubscription>,
    pub keys: Vec<KeySubscription>,
    pub timers: Vec<TimerSubscription>,
    pub pointers: Vec<PointerSubscription>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenCounts {
    pub entities: usize,
    pub collisions: usize,
    pub keys: usize,
    pub timers: usize,
    pub pointers: usize,
}

impl Screen {
    pub fn add_subscription(&mut self, subscription: Subscription) {
        match subscription {
            Subscription::Collision(sub) => self.collisions.push(sub),
            Subscription::Key(sub) => self.keys.push(sub),
            Subscription::Timer(sub) => self.timers.push(sub),
            Subscription::Pointer(sub) => self.pointers.push(sub),
        }
    }

    /// Appends every collection of `other` onto this screen, in order.
    pub fn append_from(&mut self, other: &Screen) {
        self.entities.extend(other.entities.iter().cloned());
        self.collisions.extend(other.collisions.iter().cloned());
        self.keys.extend(other.keys.iter().cloned());
        self.timers.extend(other.timers.iter().cloned());
        self.pointers.extend(other.pointers.iter().cloned());
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.collisions.clear();
        self.keys.clear();
        self.timers.clear();
        self.pointers.clear();
    }

    pub fn counts(&self) -> ScreenCounts {
        ScreenCounts {
            entities: self.entities.len(),
            collisions: self.collisions.len(),
            keys: self.keys.len(),
            timers: self.timers.len(),
            pointers: self.pointers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts() == ScreenCounts::default()
    }
}

/// The active screen plus one backup slot used to overlay a transient scene.
///
/// Save and restore append rather than swap: restoring onto a non-empty
/// active screen concatenates both.
#[derive(Clone, Default)]
pub struct ScreenState {
    active: Screen,
    backup: Screen,
}

impl ScreenState {
    pub fn active(&self) -> &Screen {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut Screen {
        &mut self.active
    }

    pub fn backup(&self) -> &Screen {
        &self.backup
    }

    pub fn save(&mut self) {
        self.backup.append_from(&self.active);
        let counts = self.backup.counts();
        info!(
            backup_entities = counts.entities,
            backup_subscriptions = counts.collisions + counts.keys + counts.timers + counts.pointers,
            "screen_saved"
        );
    }

    pub fn restore(&mut self) {
        self.active.append_from(&self.backup);
        self.backup.clear();
        let counts = self.active.counts();
        info!(
            entity_count = counts.entities,
            subscription_count = counts.collisions + counts.keys + counts.timers + counts.pointers,
            "screen_restored"
        );
    }

    pub fn clear_active(&mut self) {
        self.active.clear();
        info!("active_screen_cleared");
    }

    pub fn clear_backup(&mut self) {
        self.backup.clear();
        info!("backup_screen_cleared");
    }
}

#[cfg(test)]
mod tests {
    use winit::keyboard::KeyCode;

    use super::*;
    use crate::sim::entity::testing::{handle, Block};

    fn populated_state() -> (ScreenState, EntityRef) {
        let mut state = ScreenState::default();
        let block = handle(&Block::at("a", 0.0, 0.0, 1.0, 1.0).shared());
        state.active_mut().entities.push(block.clone());
        state.active_mut().add_subscription(
            KeySubscription::new(KeyCode::Space, block.clone(), |_, _| {}).into(),
        );
        state.active_mut().add_subscription(
            TimerSubscription::new(block.clone(), 1.0, |_| {}).into(),
        );
        (state, block)
    }

    #[test]
    fn save_copies_without_clearing_active() {
        let (mut state, _) = populated_state();
        state.save();

        assert_eq!(state.active().counts(), state.backup().counts());
        assert_eq!(state.active().counts().entities, 1);
    }

    #[test]
    fn save_then_restore_concatenates_active_with_itself() {
        let (mut state, block) = populated_state();
        state.save();
        state.restore();

        let counts = state.active().counts();
        assert_eq!(counts.entities, 2);
        assert_eq!(counts.keys, 2);
        assert_eq!(counts.timers, 2);
        assert!(state
            .active()
            .entities
            .iter()
            .all(|entity| crate::sim::same_entity(entity, &block)));
        assert!(state.backup().is_empty());
    }

    #[test]
    fn clear_between_save_and_restore_round_trips_exactly() {
        let (mut state, block) = populated_state();
        let before = state.active().counts();

        state.save();
        state.clear_active();
        assert!(state.active().is_empty());

        let overlay = handle(&Block::at("overlay", 0.0, 0.0, 5.0, 5.0).shared());
        state.active_mut().entities.push(overlay);
        state.clear_active();
        state.restore();

        assert_eq!(state.active().counts(), before);
        assert!(crate::sim::same_entity(&state.active().entities[0], &block));
        assert!(state.backup().is_empty());
    }

    #[test]
    fn repeated_save_accumulates_in_backup() {
        let (mut state, _) = populated_state();
        state.save();
        state.save();
        assert_eq!(state.backup().counts().entities, 2);

        state.clear_backup();
        assert!(state.backup().is_empty());
        assert_eq!(state.active().counts().entities, 1);
    }
}
