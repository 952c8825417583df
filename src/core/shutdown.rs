//=========================================================================
// Shutdown Sequencer
//=========================================================================
//
// Runs once the operating mode is terminal.
//
// ```text
//   save settings → destroy selector → disconnect → destroy scene
//     → tear down subsystems (reverse creation) → release session handle
// ```
//
// Every step runs even when an earlier one failed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;
use crate::core::state::ConnectionMode;
use crate::core::subsystem::SubsystemId;
use crate::error::{ConfigError, SubsystemError};

//=== ShutdownReport ======================================================

/// What went wrong during shutdown, if anything.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    pub settings_error: Option<ConfigError>,
    pub teardown_failures: Vec<(SubsystemId, SubsystemError)>,
    pub disconnected: bool,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.settings_error.is_none() && self.teardown_failures.is_empty()
    }
}

//=== shut_down ===========================================================

pub fn shut_down(ctx: &mut AppContext) -> ShutdownReport {
    info!("Shutting down");
    let mut report = ShutdownReport::default();

    if let Err(e) = ctx.settings.save(&ctx.paths.config_file) {
        warn!("Could not save settings: {e}");
        report.settings_error = Some(e);
    }

    ctx.services.gui.destroy_selector();

    match ctx.state.connection.active() {
        ConnectionMode::Connected | ConnectionMode::Connecting => {
            ctx.services.network.disconnect();
            ctx.state.connection.set_pending(ConnectionMode::Disconnected);
            ctx.state.connection.apply_pending();
            report.disconnected = true;
        }
        ConnectionMode::NotConnected | ConnectionMode::Disconnected => {}
    }

    ctx.services.render.destroy_scene();

    report.teardown_failures = ctx.services.tear_down();
    ctx.clear_session();

    if report.is_clean() {
        info!("Shutdown complete");
    } else {
        error!(
            "Shutdown finished with {} teardown failure(s)",
            report.teardown_failures.len()
        );
    }
    report
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::Settings;
    use crate::core::testing::{Fixture, FixtureOptions};

    fn running() -> Fixture {
        let mut fixture = Fixture::new();
        fixture.ctx.bring_up().unwrap();
        fixture.journal.clear();
        fixture
    }

    #[test]
    fn persists_settings() {
        let mut fixture = running();
        fixture.ctx.settings.app.skip_main_menu = true;

        let report = shut_down(&mut fixture.ctx);

        assert!(report.is_clean());
        let saved = Settings::load(&fixture.ctx.paths.config_file).unwrap();
        assert!(saved.app.skip_main_menu);
    }

    #[test]
    fn steps_run_in_order() {
        let mut fixture = running();

        shut_down(&mut fixture.ctx);

        let entries = fixture.journal.entries();
        assert_eq!(entries[0], "gui.destroy_selector");
        assert_eq!(entries[1], "render.destroy_scene");
        assert_eq!(entries[2], "voice.teardown");
        assert_eq!(entries.last().map(String::as_str), Some("render.teardown"));
    }

    #[test]
    fn connected_session_is_disconnected() {
        let mut fixture = Fixture::with(FixtureOptions {
            connect_outcome: Some(ConnectionMode::Connected),
            ..FixtureOptions::default()
        });
        fixture.ctx.bring_up().unwrap();
        fixture.ctx.state.connection.set_pending(ConnectionMode::Connected);
        fixture.ctx.service_connection();
        fixture.ctx.service_connection();

        let report = shut_down(&mut fixture.ctx);

        assert!(report.disconnected);
        assert!(fixture.journal.position("network.disconnect") < fixture.journal.position("render.destroy_scene"));
        assert_eq!(fixture.ctx.state.connection.active(), ConnectionMode::Disconnected);
    }

    #[test]
    fn pending_connection_is_cancelled() {
        let mut fixture = running();
        fixture.ctx.state.connection.set_pending(ConnectionMode::Connected);
        fixture.ctx.service_connection();
        assert_eq!(fixture.ctx.state.connection.active(), ConnectionMode::Connecting);

        let report = shut_down(&mut fixture.ctx);

        assert!(report.disconnected);
        assert!(fixture.journal.contains("network.disconnect"));
    }

    #[test]
    fn idle_connection_is_left_alone() {
        let mut fixture = running();

        let report = shut_down(&mut fixture.ctx);

        assert!(!report.disconnected);
        assert!(!fixture.journal.contains("network.disconnect"));
    }

    #[test]
    fn failures_do_not_stop_later_steps() {
        let mut fixture = running();
        fixture.failures.fail("input.teardown");
        fixture.failures.fail("audio.teardown");
        std::fs::create_dir_all(&fixture.ctx.paths.config_file).unwrap();

        let report = shut_down(&mut fixture.ctx);

        assert!(report.settings_error.is_some());
        assert_eq!(report.teardown_failures.len(), 2);
        assert!(fixture.journal.contains("render.destroy_scene"));
        assert!(fixture.journal.contains("render.teardown"));
        assert!(!report.is_clean());
    }
}
