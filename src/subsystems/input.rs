//=========================================================================
// Input Engine
//=========================================================================
//
// Keyboard-only input: maps platform key events to commands through the
// context-aware binding table. No force-feedback hardware is driven.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, trace};

//=== Internal Dependencies ===============================================

use crate::core::subsystem::{InputEngine, LifecycleEnv, Subsystem, SubsystemId, WindowHandle};
use crate::error::SubsystemError;
use crate::input::{Command, CommandContext, CommandMapper, InputEvent};

//=== KeyboardInput =======================================================

#[derive(Debug)]
pub struct KeyboardInput {
    mapper: CommandMapper,
    window: Option<WindowHandle>,
}

impl KeyboardInput {
    pub fn new(mapper: CommandMapper) -> Self {
        Self {
            mapper,
            window: None,
        }
    }

    pub fn mapper_mut(&mut self) -> &mut CommandMapper {
        &mut self.mapper
    }

    pub fn window(&self) -> Option<WindowHandle> {
        self.window
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new(CommandMapper::with_defaults())
    }
}

impl Subsystem for KeyboardInput {
    fn id(&self) -> SubsystemId {
        SubsystemId::Input
    }

    fn startup(&mut self, env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.window = env.window;
        match env.window {
            Some(window) => info!(target: "input", "Input bound to window {}", window.0),
            None => info!(target: "input", "No window, input disabled"),
        }
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), SubsystemError> {
        self.window = None;
        Ok(())
    }
}

impl InputEngine for KeyboardInput {
    fn process(&mut self, context: CommandContext, events: &[InputEvent]) -> Vec<Command> {
        let commands: Vec<Command> = events
            .iter()
            .filter_map(|event| self.mapper.map_event(event, context))
            .collect();
        if !commands.is_empty() {
            trace!(target: "input", "{context:?}: {commands:?}");
        }
        commands
    }

    fn has_force_feedback_device(&self) -> bool {
        false
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
