use crate::event_loop::IdleFlags;
use crate::monitor::MonitorScheduler;
use crate::state::EditorContext;

/// Context for command execution, providing access to the editor state, the
/// monitor scheduler and the idle flags.
pub struct CommandContext<'a> {
    pub editor: &'a mut EditorContext,
    pub monitors: &'a mut MonitorScheduler,
    pub idle: &'a IdleFlags,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        editor: &'a mut EditorContext,
        monitors: &'a mut MonitorScheduler,
        idle: &'a IdleFlags,
    ) -> Self {
        Self {
            editor,
            monitors,
            idle,
        }
    }
}
