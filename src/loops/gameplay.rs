//=========================================================================
// Gameplay Loop
//=========================================================================
//
// Per-session frame controller. Setup validates the terrain and swaps
// the menu visuals for session visuals; the loop then ticks at the
// session's fixed rate until a mode change is requested.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{frame_interval, pace};
use crate::core::context::AppContext;
use crate::core::modes::ModeExit;
use crate::core::session::{FrameController, SessionBinding, SessionFactory, SessionId};
use crate::core::state::OperatingMode;
use crate::core::subsystem::Panel;
use crate::error::{Fault, SetupError};
use crate::input::{Command, CommandContext};

//=== SimulationController ================================================

pub struct SimulationController {
    binding: SessionBinding,
    ticks: u64,
}

impl SimulationController {
    pub fn new(binding: SessionBinding) -> Self {
        Self { binding, ticks: 0 }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn decide(command: Command) -> Option<OperatingMode> {
        match command {
            Command::Back => Some(OperatingMode::Menu),
            Command::ChangeMap => Some(OperatingMode::ChangeMap),
            Command::Quit => Some(OperatingMode::ShuttingDown),
            _ => None,
        }
    }
}

impl FrameController for SimulationController {
    fn session_id(&self) -> SessionId {
        self.binding.id
    }

    fn setup_gameplay_loop(&mut self, ctx: &mut AppContext) -> Result<(), SetupError> {
        let terrain = self
            .binding
            .config
            .terrain
            .clone()
            .ok_or(SetupError::NoTerrain)?;
        if !ctx.services.cache.contains_terrain(&terrain) {
            return Err(SetupError::UnknownTerrain(terrain));
        }

        ctx.services.render.attach_session_node(&format!("terrain:{terrain}"));
        ctx.services.audio.stop_menu_music();
        ctx.services.gui.set_visible(Panel::MainMenu, false);
        ctx.services.gui.destroy_selector();
        ctx.services.gui.set_visible(Panel::TopMenubar, true);
        ctx.services.render.set_menu_backdrop_visible(false);

        info!(
            "{} ready on '{terrain}' (force feedback: {})",
            self.binding.id,
            self.binding.force_feedback.is_enabled()
        );
        Ok(())
    }

    fn enter_gameplay_loop(&mut self, ctx: &mut AppContext) -> Result<ModeExit, Fault> {
        let interval = frame_interval(self.binding.config.tps);

        loop {
            let started = Instant::now();
            if ctx.state.operating.pending() != OperatingMode::Simulation {
                return Ok(ModeExit::Yield);
            }

            let frame = ctx.service_frame(CommandContext::Gameplay)?;
            if frame.close_requested {
                return Ok(ModeExit::SwitchTo(OperatingMode::ShuttingDown));
            }
            if let Some(next) = frame.commands.into_iter().find_map(Self::decide) {
                return Ok(ModeExit::SwitchTo(next));
            }

            self.ticks += 1;
            pace(started, interval);
        }
    }
}

impl Drop for SimulationController {
    fn drop(&mut self) {
        debug!("{} released after {} tick(s)", self.binding.id, self.ticks);
    }
}

//=== SimulationFactory ===================================================

#[derive(Debug, Default)]
pub struct SimulationFactory;

impl SimulationFactory {
    pub fn new() -> Self {
        Self
    }
}

impl SessionFactory for SimulationFactory {
    fn create_session(&mut self, binding: SessionBinding) -> Box<dyn FrameController> {
        Box::new(SimulationController::new(binding))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
