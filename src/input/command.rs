//=========================================================================
// Commands & Bindings
//=========================================================================
//
// Maps key presses to shell commands per command context.
//
// Architecture:
//   (key, modifiers, context) → HashMap → Command
//
// Only bindings of the context passed to `map_event` resolve.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers};

//=== Command =============================================================

/// High-level request produced by the input engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Up,
    Down,
    Confirm,
    Back,
    ChangeMap,
    Quit,
}

//=== CommandContext ======================================================

/// Which binding set is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandContext {
    #[default]
    Menu,
    Gameplay,
}

//=== CommandMapper =======================================================

/// Key bindings for every command context.
#[derive(Debug, Clone, Default)]
pub struct CommandMapper {
    bindings: HashMap<(KeyCode, Modifiers, CommandContext), Command>,
}

impl CommandMapper {
    /// Empty mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapper with the stock menu and gameplay bindings.
    pub fn with_defaults() -> Self {
        use CommandContext::{Gameplay, Menu};

        let mut mapper = Self::new();
        mapper.bind(KeyCode::ArrowUp, Command::Up, Menu);
        mapper.bind(KeyCode::ArrowDown, Command::Down, Menu);
        mapper.bind(KeyCode::Enter, Command::Confirm, Menu);
        mapper.bind(KeyCode::Space, Command::Confirm, Menu);
        mapper.bind(KeyCode::Escape, Command::Back, Menu);
        mapper.bind_with_mods(KeyCode::KeyQ, Modifiers::CTRL, Command::Quit, Menu);

        mapper.bind(KeyCode::Escape, Command::Back, Gameplay);
        mapper.bind_with_mods(KeyCode::KeyM, Modifiers::CTRL, Command::ChangeMap, Gameplay);
        mapper.bind_with_mods(KeyCode::KeyQ, Modifiers::CTRL, Command::Quit, Gameplay);
        mapper
    }

    //--- Binding API ------------------------------------------------------

    pub fn bind(&mut self, key: KeyCode, command: Command, context: CommandContext) {
        self.bind_with_mods(key, Modifiers::NONE, command, context);
    }

    /// Binds a key chord. Modifiers must match exactly to trigger.
    pub fn bind_with_mods(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        command: Command,
        context: CommandContext,
    ) {
        self.bindings.insert((key, modifiers, context), command);
    }

    pub fn unbind(&mut self, key: KeyCode, modifiers: Modifiers, context: CommandContext) {
        self.bindings.remove(&(key, modifiers, context));
    }

    //--- Event Mapping ----------------------------------------------------

    /// Resolves a key press. Releases and mouse events map to nothing.
    pub fn map_event(&self, event: &InputEvent, context: CommandContext) -> Option<Command> {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                self.bindings.get(&(*key, *modifiers, context)).copied()
            }
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
