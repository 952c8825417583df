//=========================================================================
// Application Context
//=========================================================================
//
// The one object every component receives by `&mut`: paths, settings,
// state machines, process-scoped services, and the active session handle.
// Built once after bootstrap and dropped after shutdown.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::bootstrap::{AppPaths, LaunchOptions, Settings};
use crate::core::services::ProcessServices;
use crate::core::session::SessionId;
use crate::core::state::{AppStateController, ConnectionMode};
use crate::core::subsystem::{Panel, SubsystemId};
use crate::error::Fault;
use crate::input::{Command, CommandContext};

//=== FrameInput ==========================================================

/// Result of one cooperative service frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub commands: Vec<Command>,
    pub close_requested: bool,
}

//=== AppContext ==========================================================

pub struct AppContext {
    pub paths: AppPaths,
    pub settings: Settings,
    pub launch: LaunchOptions,
    pub state: AppStateController,
    pub services: ProcessServices,

    /// Terrain picked in the selector, consumed by the next session.
    pub selection: Option<String>,

    active_session: Option<SessionId>,
}

impl AppContext {
    pub fn new(
        paths: AppPaths,
        settings: Settings,
        launch: LaunchOptions,
        services: ProcessServices,
    ) -> Self {
        Self {
            paths,
            settings,
            launch,
            state: AppStateController::new(),
            services,
            selection: None,
            active_session: None,
        }
    }

    //--- Bring-up ---------------------------------------------------------

    /// Starts all process-scoped subsystems, then validates force feedback.
    pub fn bring_up(&mut self) -> Result<(), Fault> {
        let effective = self.launch.effective(&self.settings);
        self.services
            .bring_up(&self.paths, &effective, self.launch.regen_cache_only)?;
        if self.settings.io.ffb_enabled && !self.services.input.has_force_feedback_device() {
            warn!("Force feedback enabled but no compatible device found, disabling it");
            self.settings.io.ffb_enabled = false;
        }
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    pub fn preset_terrain(&self) -> Option<&str> {
        self.launch.preset_terrain.as_deref()
    }

    pub fn skip_main_menu(&self) -> bool {
        self.settings.app.skip_main_menu || self.launch.skip_main_menu
    }

    pub fn join_on_startup(&self) -> bool {
        self.settings.mp.join_on_startup || self.launch.join_multiplayer
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.active_session
    }

    pub(crate) fn register_session(&mut self, id: SessionId) {
        self.active_session = Some(id);
    }

    pub(crate) fn clear_session(&mut self) {
        self.active_session = None;
    }

    //--- Cooperative Servicing --------------------------------------------

    /// One iteration's worth of background work: connection checkpoint,
    /// platform events, input mapping.
    pub fn service_frame(&mut self, context: CommandContext) -> Result<FrameInput, Fault> {
        self.service_connection();

        let frame = self
            .services
            .render
            .pump()
            .map_err(|e| Fault::subsystem(SubsystemId::Render, e))?;
        let commands = if frame.inputs.is_empty() {
            Vec::new()
        } else {
            self.services.input.process(context, &frame.inputs)
        };

        Ok(FrameInput {
            commands,
            close_requested: frame.close_requested,
        })
    }

    /// Connection-mode checkpoint.
    pub fn service_connection(&mut self) {
        let connection = &mut self.state.connection;
        let (active, pending) = (connection.active(), connection.pending());
        if active == pending {
            return;
        }

        match (active, pending) {
            (
                ConnectionMode::NotConnected | ConnectionMode::Disconnected,
                ConnectionMode::Connected,
            ) => {
                if !connection.replace_pending(ConnectionMode::Connected, ConnectionMode::Connecting)
                {
                    return;
                }
                connection.apply_pending();
                info!(
                    "Connecting to {}:{}",
                    self.launch
                        .mp_host
                        .as_deref()
                        .unwrap_or(&self.settings.mp.server_host),
                    self.launch.mp_port.unwrap_or(self.settings.mp.server_port)
                );
                if let Err(e) = self.services.network.connect(connection.handle()) {
                    warn!("Could not start network session: {e}");
                    connection.set_pending(ConnectionMode::Disconnected);
                    connection.apply_pending();
                }
            }
            (ConnectionMode::Connecting, ConnectionMode::Connected) => {
                if connection.apply_if_pending(ConnectionMode::Connected).is_some() {
                    info!("Connected to multiplayer server");
                    self.services.gui.set_visible(Panel::MpClientList, true);
                }
            }
            (ConnectionMode::Connected, _) => {
                if connection.apply_if_pending(pending).is_some() {
                    warn!("Multiplayer connection lost ({pending})");
                    self.services.gui.set_visible(Panel::MpClientList, false);
                }
            }
            _ => {
                if let Some(transition) = connection.apply_if_pending(pending) {
                    info!("Connection {} -> {}", transition.from, transition.to);
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{Fixture, FixtureOptions};
    use crate::input::{InputEvent, KeyCode};
    use crate::platform::PlatformFrame;

    #[test]
    fn missing_force_feedback_device_disables_it() {
        let mut fixture = Fixture::new();
        assert!(fixture.ctx.settings.io.ffb_enabled);

        fixture.ctx.bring_up().unwrap();

        assert!(!fixture.ctx.settings.io.ffb_enabled);
    }

    #[test]
    fn present_force_feedback_device_keeps_it() {
        let mut fixture = Fixture::with(FixtureOptions {
            ffb_device: true,
            ..FixtureOptions::default()
        });

        fixture.ctx.bring_up().unwrap();

        assert!(fixture.ctx.settings.io.ffb_enabled);
    }

    #[test]
    fn service_frame_maps_input_to_commands() {
        let mut fixture = Fixture::new();
        fixture.push_frame(PlatformFrame {
            inputs: vec![InputEvent::key_down(KeyCode::Enter)],
            close_requested: false,
        });

        let frame = fixture.ctx.service_frame(CommandContext::Menu).unwrap();

        assert_eq!(frame.commands, vec![Command::Confirm]);
        assert!(!frame.close_requested);
    }

    #[test]
    fn service_frame_reports_window_close() {
        let mut fixture = Fixture::new();
        fixture.push_frame(PlatformFrame {
            inputs: Vec::new(),
            close_requested: true,
        });

        assert!(fixture.ctx.service_frame(CommandContext::Menu).unwrap().close_requested);
    }

    #[test]
    fn connect_request_starts_network_and_reaches_connected() {
        let mut fixture = Fixture::with(FixtureOptions {
            connect_outcome: Some(ConnectionMode::Connected),
            ..FixtureOptions::default()
        });
        fixture.ctx.state.connection.set_pending(ConnectionMode::Connected);

        fixture.ctx.service_connection();
        assert_eq!(fixture.ctx.state.connection.active(), ConnectionMode::Connecting);
        assert!(fixture.journal.contains("network.connect"));

        fixture.ctx.service_connection();
        assert_eq!(fixture.ctx.state.connection.active(), ConnectionMode::Connected);
        assert!(fixture.journal.contains("gui.show MpClientList"));
    }

    #[test]
    fn failed_connect_ends_disconnected() {
        let mut fixture = Fixture::with(FixtureOptions {
            connect_outcome: Some(ConnectionMode::Disconnected),
            ..FixtureOptions::default()
        });
        fixture.ctx.state.connection.set_pending(ConnectionMode::Connected);

        fixture.ctx.service_connection();
        fixture.ctx.service_connection();

        assert_eq!(
            fixture.ctx.state.connection.active(),
            ConnectionMode::Disconnected
        );
        assert!(!fixture.journal.contains("gui.show MpClientList"));
    }

    #[test]
    fn lost_connection_hides_client_list() {
        let mut fixture = Fixture::with(FixtureOptions {
            connect_outcome: Some(ConnectionMode::Connected),
            ..FixtureOptions::default()
        });
        fixture.ctx.state.connection.set_pending(ConnectionMode::Connected);
        fixture.ctx.service_connection();
        fixture.ctx.service_connection();

        fixture.ctx.state.handles().connection.set_pending(ConnectionMode::Disconnected);
        fixture.ctx.service_connection();

        assert_eq!(
            fixture.ctx.state.connection.active(),
            ConnectionMode::Disconnected
        );
        assert!(fixture.journal.contains("gui.hide MpClientList"));
    }

    #[test]
    fn session_handle_registration() {
        let mut fixture = Fixture::new();
        fixture.ctx.register_session(SessionId(9));
        assert_eq!(fixture.ctx.active_session(), Some(SessionId(9)));

        fixture.ctx.clear_session();
        assert_eq!(fixture.ctx.active_session(), None);
    }
}
