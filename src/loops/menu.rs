//=========================================================================
// Menu Loop
//=========================================================================
//
// Main menu and terrain selector.
//
// ```text
//   main menu:  Confirm ─► open selector     Back/Quit ─► ShuttingDown
//   selector:   Up/Down ─► move cursor       Confirm   ─► Simulation
//               Back    ─► main menu         Quit      ─► ShuttingDown
// ```
//
// With a launch preset the selector never opens: Confirm on the main
// menu goes straight back to the preset terrain.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{frame_interval, pace};
use crate::core::context::AppContext;
use crate::core::modes::{MenuLoop, ModeExit};
use crate::core::state::OperatingMode;
use crate::core::subsystem::{Panel, SelectorKind};
use crate::error::Fault;
use crate::input::{Command, CommandContext};

//=== InteractiveMenu =====================================================

#[derive(Debug, Default)]
pub struct InteractiveMenu {
    cursor: usize,
}

impl InteractiveMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn handle(&mut self, ctx: &mut AppContext, command: Command) -> Option<ModeExit> {
        if command == Command::Quit {
            return Some(ModeExit::SwitchTo(OperatingMode::ShuttingDown));
        }
        if ctx.services.gui.is_visible(Panel::Selector) {
            self.handle_selector(ctx, command)
        } else {
            self.handle_main_menu(ctx, command)
        }
    }

    fn handle_main_menu(&mut self, ctx: &mut AppContext, command: Command) -> Option<ModeExit> {
        match command {
            Command::Confirm if ctx.preset_terrain().is_some() => {
                Some(ModeExit::SwitchTo(OperatingMode::Simulation))
            }
            Command::Confirm => {
                self.cursor = 0;
                ctx.services.gui.set_visible(Panel::MainMenu, false);
                ctx.services.gui.show_selector(SelectorKind::Terrain);
                None
            }
            Command::Back => Some(ModeExit::SwitchTo(OperatingMode::ShuttingDown)),
            _ => None,
        }
    }

    fn handle_selector(&mut self, ctx: &mut AppContext, command: Command) -> Option<ModeExit> {
        let terrains = ctx.services.cache.terrains();
        match command {
            Command::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            Command::Down => {
                if self.cursor + 1 < terrains.len() {
                    self.cursor += 1;
                }
                None
            }
            Command::Confirm => {
                let Some(terrain) = terrains.get(self.cursor) else {
                    warn!("No terrain to select");
                    return None;
                };
                info!("Terrain selected: {terrain}");
                ctx.selection = Some(terrain.clone());
                ctx.services.gui.destroy_selector();
                Some(ModeExit::SwitchTo(OperatingMode::Simulation))
            }
            Command::Back => {
                ctx.services.gui.destroy_selector();
                ctx.services.gui.set_visible(Panel::MainMenu, true);
                None
            }
            _ => None,
        }
    }
}

impl MenuLoop for InteractiveMenu {
    fn enter_menu_loop(&mut self, ctx: &mut AppContext) -> Result<ModeExit, Fault> {
        let entered = ctx.state.operating.active();
        let interval = frame_interval(ctx.settings.sim.menu_fps);
        debug!("Menu loop entered ({entered})");

        loop {
            let started = Instant::now();
            if ctx.state.operating.pending() != entered {
                return Ok(ModeExit::Yield);
            }

            let frame = ctx.service_frame(CommandContext::Menu)?;
            if frame.close_requested {
                return Ok(ModeExit::SwitchTo(OperatingMode::ShuttingDown));
            }
            for command in frame.commands {
                if let Some(exit) = self.handle(ctx, command) {
                    return Ok(exit);
                }
            }

            pace(started, interval);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
