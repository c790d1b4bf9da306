use super::entity::EntityRef;
use super::subscription::Subscription;

/// Deferred engine mutation requested from inside a callback.
pub enum ScreenCommand {
    AddEntity(EntityRef),
    Subscribe(Subscription),
    SaveScreen,
    RestoreScreen,
    ClearActive,
    ClearBackup,
    SetRunning(bool),
}

impl ScreenCommand {
    pub fn label(&self) -> &'static str {
        match self {
            ScreenCommand::AddEntity(_) => "add_entity",
            ScreenCommand::Subscribe(_) => "subscribe",
            ScreenCommand::SaveScreen => "save_screen",
            ScreenCommand::RestoreScreen => "restore_screen",
            ScreenCommand::ClearActive => "clear_active",
            ScreenCommand::ClearBackup => "clear_backup",
            ScreenCommand::SetRunning(_) => "set_running",
        }
    }
}

/// FIFO queue lent to callbacks; the engine applies it once the current
/// input event or frame has finished iterating.
#[derive(Default)]
pub struct Commands {
    queue: Vec<ScreenCommand>,
}

impl Commands {
    pub fn add_entity(&mut self, entity: EntityRef) {
        self.queue.push(ScreenCommand::AddEntity(entity));
    }

    pub fn subscribe(&mut self, subscription: impl Into<Subscription>) {
        self.queue.push(ScreenCommand::Subscribe(subscription.into()));
    }

    pub fn save_screen(&mut self) {
        self.queue.push(ScreenCommand::SaveScreen);
    }

    pub fn restore_screen(&mut self) {
        self.queue.push(ScreenCommand::RestoreScreen);
    }

    pub fn clear_active(&mut self) {
        self.queue.push(ScreenCommand::ClearActive);
    }

    pub fn clear_backup(&mut self) {
        self.queue.push(ScreenCommand::ClearBackup);
    }

    pub fn set_running(&mut self, running: bool) {
        self.queue.push(ScreenCommand::SetRunning(running));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<ScreenCommand> {
        std::mem::take(&mut self.queue)
    }
}
