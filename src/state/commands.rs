//! Predicate-gated commands bound to a view-model.
//!
//! A `Command<T>` pairs a can-execute predicate with an action over some
//! target `T`. Commands are built once into a fixed `CommandTable` so every
//! lookup returns the same instance for the lifetime of the target.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use tracing::debug;

/// User-invocable actions exposed by the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// Open the project page in the default browser.
    ShowOnGitHub,
    /// Open the equalizer panel.
    ShowEqualizer,
    /// Close the equalizer panel.
    CloseEqualizer,
}

impl CommandId {
    /// Every command, in table order.
    pub const ALL: [CommandId; 3] = [
        CommandId::ShowOnGitHub,
        CommandId::ShowEqualizer,
        CommandId::CloseEqualizer,
    ];

    fn index(self) -> usize {
        match self {
            CommandId::ShowOnGitHub => 0,
            CommandId::ShowEqualizer => 1,
            CommandId::CloseEqualizer => 2,
        }
    }
}

/// An action on `T` guarded by a predicate.
pub struct Command<T> {
    id: CommandId,
    can_execute: fn(&T) -> bool,
    execute: fn(&mut T),
}

impl<T> Command<T> {
    /// Creates a command from its predicate and action.
    #[must_use]
    pub const fn new(id: CommandId, can_execute: fn(&T) -> bool, execute: fn(&mut T)) -> Self {
        Self {
            id,
            can_execute,
            execute,
        }
    }

    /// The command's identifier.
    #[must_use]
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Evaluates the predicate against `target`.
    #[must_use]
    pub fn can_execute(&self, target: &T) -> bool {
        (self.can_execute)(target)
    }

    /// Runs the action if the predicate allows it.
    ///
    /// # Returns
    ///
    /// `true` if the action ran.
    pub fn execute(&self, target: &mut T) -> bool {
        if !self.can_execute(target) {
            debug!("Command {:?} is not executable, ignoring", self.id);
            return false;
        }
        debug!("Executing command {:?}", self.id);
        (self.execute)(target);
        true
    }
}

impl<T> Clone for Command<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Command<T> {}

impl<T> Debug for Command<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Command").field("id", &self.id).finish()
    }
}

/// Fixed table holding one command per `CommandId`.
pub struct CommandTable<T> {
    commands: [Command<T>; 3],
}

impl<T> CommandTable<T> {
    /// Builds the table. Entries must be given in `CommandId::ALL` order.
    ///
    /// # Panics
    ///
    /// Panics if an entry is out of order; this is a construction bug.
    #[must_use]
    pub fn new(commands: [Command<T>; 3]) -> Self {
        for (command, id) in commands.iter().zip(CommandId::ALL) {
            assert_eq!(command.id, id, "command table out of order");
        }
        Self { commands }
    }

    /// Looks up a command.
    #[must_use]
    pub fn get(&self, id: CommandId) -> &Command<T> {
        &self.commands[id.index()]
    }
}

impl<T> Debug for CommandTable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_list().entries(self.commands.iter()).finish()
    }
}
