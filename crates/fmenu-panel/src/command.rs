#![forbid(unsafe_code)]

//! Commands emitted by action handlers.
//!
//! Handlers never mutate the stack directly. They append [`MenuCommand`]s to
//! a [`CommandSink`]; the invoking call drains the sink and returns the
//! commands to the owner, which applies navigation commands to the stack and
//! interprets the rest itself.
//!
//! # Invariants
//!
//! 1. Commands are returned in emission order.
//! 2. The sink is append-only; nothing in the engine reorders or filters it.

use std::any::Any;
use std::fmt;

use fmenu_core::Identifier;

use crate::row::ActionRow;
use crate::spec::PanelSpecification;

/// What an action handler asks the owner to do next.
pub enum MenuCommand {
    /// Dismiss the whole menu.
    Dismiss,
    /// Pop the top panel.
    Pop,
    /// Push a new panel.
    Push {
        spec: PanelSpecification,
        animated: bool,
    },
    /// Replace the top panel. `animated: None` lets the stack decide from the
    /// identities of the outgoing and incoming panels.
    Replace {
        spec: PanelSpecification,
        animated: Option<bool>,
    },
    /// Rewrite one action row in place, matched by identity on the top panel.
    UpdateAction {
        id: Identifier,
        action: ActionRow,
    },
    /// Host-defined payload passed through untouched.
    Custom(Box<dyn Any>),
}

impl fmt::Debug for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dismiss => f.write_str("Dismiss"),
            Self::Pop => f.write_str("Pop"),
            Self::Push { spec, animated } => f
                .debug_struct("Push")
                .field("spec", spec)
                .field("animated", animated)
                .finish(),
            Self::Replace { spec, animated } => f
                .debug_struct("Replace")
                .field("spec", spec)
                .field("animated", animated)
                .finish(),
            Self::UpdateAction { id, action } => f
                .debug_struct("UpdateAction")
                .field("id", id)
                .field("action", action)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Ordered collector handed to action handlers.
#[derive(Debug, Default)]
pub struct CommandSink {
    commands: Vec<MenuCommand>,
}

impl CommandSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, command: MenuCommand) {
        self.commands.push(command);
    }

    pub fn dismiss(&mut self) {
        self.emit(MenuCommand::Dismiss);
    }

    pub fn pop(&mut self) {
        self.emit(MenuCommand::Pop);
    }

    pub fn push(&mut self, spec: PanelSpecification, animated: bool) {
        self.emit(MenuCommand::Push { spec, animated });
    }

    pub fn replace(&mut self, spec: PanelSpecification, animated: Option<bool>) {
        self.emit(MenuCommand::Replace { spec, animated });
    }

    pub fn update_action(&mut self, id: impl Into<Identifier>, action: ActionRow) {
        self.emit(MenuCommand::UpdateAction {
            id: id.into(),
            action,
        });
    }

    pub fn custom(&mut self, payload: impl Any) {
        self.emit(MenuCommand::Custom(Box::new(payload)));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Consume the sink, yielding commands in emission order.
    #[must_use]
    pub fn into_commands(self) -> Vec<MenuCommand> {
        self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_emission_order() {
        let mut sink = CommandSink::new();
        sink.pop();
        sink.dismiss();
        sink.custom(42_u32);

        let commands = sink.into_commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], MenuCommand::Pop));
        assert!(matches!(commands[1], MenuCommand::Dismiss));
        match &commands[2] {
            MenuCommand::Custom(payload) => {
                assert_eq!(payload.downcast_ref::<u32>(), Some(&42));
            }
            other => panic!("expected Custom, got {other:?}"),
        }
    }

    #[test]
    fn update_action_carries_identity() {
        let mut sink = CommandSink::new();
        sink.update_action(7, ActionRow::new("Unmute").id(7));

        let commands = sink.into_commands();
        match &commands[0] {
            MenuCommand::UpdateAction { id, action } => {
                assert_eq!(*id, Identifier::from(7));
                assert_eq!(action.title(), "Unmute");
            }
            other => panic!("expected UpdateAction, got {other:?}"),
        }
    }
}
