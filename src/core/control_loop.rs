//=========================================================================
// Main Control Loop
//=========================================================================
//
// Top-level dispatcher over the operating mode.
//
// ```text
//   prime ─► loop while pending != ShuttingDown
//              ├─ Menu        checkpoint → exit actions → Menu loop
//              ├─ Simulation  session setup → checkpoint → Gameplay loop
//              │              → drop session → clear scene
//              └─ ChangeMap   checkpoint → selector/main menu → Menu loop
// ```
//
// Each nested loop blocks until it returns a `ModeExit`. The dispatcher
// records the decision as the pending mode; it is applied at the next
// iteration's checkpoint.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;
use crate::core::modes::{MenuLoop, ModeExit};
use crate::core::session::{SessionBinding, SessionFactory, SessionId};
use crate::core::state::{ConnectionMode, OperatingMode};
use crate::core::subsystem::{Panel, SelectorKind, SubsystemId};
use crate::error::Fault;

//=== MainControlLoop =====================================================

pub struct MainControlLoop {
    menu: Box<dyn MenuLoop>,
    sessions: Box<dyn SessionFactory>,

    /// Active mode after the previous dispatch.
    previous: OperatingMode,

    next_session: u64,
}

impl MainControlLoop {
    pub fn new(menu: Box<dyn MenuLoop>, sessions: Box<dyn SessionFactory>) -> Self {
        Self {
            menu,
            sessions,
            previous: OperatingMode::Bootstrap,
            next_session: 1,
        }
    }

    pub fn previous_mode(&self) -> OperatingMode {
        self.previous
    }

    //--- Priming ----------------------------------------------------------

    /// Posts the first requests from the launch flags.
    pub fn prime(&mut self, ctx: &mut AppContext) -> Result<(), Fault> {
        if ctx.launch.regen_cache_only {
            info!("Regenerating content cache");
            let entries = ctx
                .services
                .cache
                .regenerate(&ctx.paths)
                .map_err(|e| Fault::subsystem(SubsystemId::Cache, e))?;
            info!("Content cache regenerated ({entries} entries)");
            ctx.state.operating.set_pending(OperatingMode::ShuttingDown);
            return Ok(());
        }

        let first = if ctx.preset_terrain().is_some() {
            OperatingMode::Simulation
        } else {
            OperatingMode::Menu
        };
        ctx.state.operating.set_pending(first);

        if ctx.join_on_startup() {
            info!("Joining multiplayer on startup");
            ctx.state.connection.set_pending(ConnectionMode::Connected);
        }
        Ok(())
    }

    //--- Dispatch ---------------------------------------------------------

    /// Dispatches until ShuttingDown is requested.
    pub fn run(&mut self, ctx: &mut AppContext) -> Result<(), Fault> {
        while !ctx.state.operating.pending().is_terminal() {
            self.step(ctx)?;
        }
        info!("Shutdown requested (last active mode: {})", ctx.state.operating.active());
        Ok(())
    }

    /// One dispatch on the pending operating mode.
    pub fn step(&mut self, ctx: &mut AppContext) -> Result<(), Fault> {
        match ctx.state.operating.pending() {
            OperatingMode::Bootstrap => {
                ctx.state
                    .operating
                    .replace_pending(OperatingMode::Bootstrap, OperatingMode::Menu);
                self.enter_menu(ctx)?;
            }
            OperatingMode::Menu => self.enter_menu(ctx)?,
            OperatingMode::Simulation => self.enter_simulation(ctx)?,
            OperatingMode::ChangeMap => self.enter_change_map(ctx)?,
            OperatingMode::ShuttingDown => return Ok(()),
        }
        self.previous = ctx.state.operating.active();
        Ok(())
    }

    //--- Menu -------------------------------------------------------------

    fn enter_menu(&mut self, ctx: &mut AppContext) -> Result<(), Fault> {
        if !Self::checkpoint(ctx, OperatingMode::Menu) {
            return Ok(());
        }
        if self.previous == OperatingMode::Simulation {
            Self::leave_simulation(ctx);
        }

        if ctx.settings.audio.menu_music {
            ctx.services.audio.play_menu_music();
        }
        ctx.services.gui.reflect_mode(OperatingMode::Menu);

        let joining = ctx.state.connection.pending() == ConnectionMode::Connected;
        if (joining || ctx.skip_main_menu()) && ctx.preset_terrain().is_none() {
            ctx.services.gui.set_visible(Panel::MainMenu, false);
            ctx.services.gui.show_selector(SelectorKind::Terrain);
        }

        self.run_menu_loop(ctx)
    }

    /// Exit actions for Simulation → Menu.
    fn leave_simulation(ctx: &mut AppContext) {
        if ctx.state.connection.active() == ConnectionMode::Connected {
            info!("Leaving multiplayer session");
            ctx.services.network.disconnect();
            ctx.state.connection.set_pending(ConnectionMode::Disconnected);
            ctx.service_connection();
        }

        ctx.services.render.camera_return_to_menu();
        ctx.services.gui.set_visible(Panel::TopMenubar, false);
        ctx.services.render.set_menu_backdrop_visible(true);

        if let Some(voice) = ctx.services.voice.as_deref_mut() {
            if voice.is_connected() {
                voice.set_non_positional();
            }
        }
    }

    //--- Simulation -------------------------------------------------------

    fn enter_simulation(&mut self, ctx: &mut AppContext) -> Result<(), Fault> {
        let id = SessionId(self.next_session);
        self.next_session += 1;

        let binding = SessionBinding::snapshot(id, ctx);
        info!("Creating {id} (terrain: {:?})", binding.config.terrain);
        let mut controller = self.sessions.create_session(binding);

        if let Err(e) = controller.setup_gameplay_loop(ctx) {
            warn!("Simulation setup failed, returning to menu: {e}");
            drop(controller);
            ctx.services.render.clear_scene();
            if !ctx
                .state
                .operating
                .replace_pending(OperatingMode::Simulation, OperatingMode::Menu)
            {
                debug!("Newer request kept: {}", ctx.state.operating.pending());
            }
            return Ok(());
        }

        if !Self::checkpoint(ctx, OperatingMode::Simulation) {
            drop(controller);
            ctx.services.render.clear_scene();
            return Ok(());
        }
        ctx.services.gui.reflect_mode(OperatingMode::Simulation);

        ctx.register_session(controller.session_id());
        let exit = controller.enter_gameplay_loop(ctx);
        ctx.clear_session();

        drop(controller);
        ctx.services.render.clear_scene();
        debug!("{id} ended, scene cleared");

        Self::record(ctx, OperatingMode::Simulation, exit?);
        Ok(())
    }

    //--- ChangeMap --------------------------------------------------------

    fn enter_change_map(&mut self, ctx: &mut AppContext) -> Result<(), Fault> {
        if !Self::checkpoint(ctx, OperatingMode::ChangeMap) {
            return Ok(());
        }

        ctx.services.render.set_menu_backdrop_visible(true);
        ctx.services.gui.reflect_mode(OperatingMode::ChangeMap);
        if ctx.preset_terrain().is_some() {
            ctx.services.gui.set_visible(Panel::MainMenu, true);
        } else {
            ctx.services.gui.show_selector(SelectorKind::Terrain);
        }

        self.run_menu_loop(ctx)
    }

    //--- Helpers ----------------------------------------------------------

    fn run_menu_loop(&mut self, ctx: &mut AppContext) -> Result<(), Fault> {
        let entered = ctx.state.operating.active();
        let exit = self.menu.enter_menu_loop(ctx)?;
        Self::record(ctx, entered, exit);
        Ok(())
    }

    /// Applies the pending mode if it is still the one being dispatched.
    fn checkpoint(ctx: &mut AppContext, expected: OperatingMode) -> bool {
        match ctx.state.operating.apply_if_pending(expected) {
            Some(transition) => {
                info!("Operating mode {} -> {}", transition.from, transition.to);
                true
            }
            None => {
                debug!("Request for {expected} superseded before checkpoint");
                false
            }
        }
    }

    /// Posts a mode loop's decision unless another context already did.
    fn record(ctx: &mut AppContext, entered: OperatingMode, exit: ModeExit) {
        match exit {
            ModeExit::SwitchTo(next) => {
                if !ctx.state.operating.replace_pending(entered, next) {
                    debug!(
                        "{next} dropped, {} was requested first",
                        ctx.state.operating.pending()
                    );
                }
            }
            ModeExit::Yield => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
