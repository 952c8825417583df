//=========================================================================
// Simulation Sessions
//=========================================================================
//
// Session-scoped resources, created on every entry into Simulation and
// dropped before the scene graph is cleared.
//
// ```text
//   SessionFactory::create_session(binding) ─► Box<dyn FrameController>
//        binding = { id, force-feedback binding, config snapshot }
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;
use crate::core::modes::ModeExit;
use crate::error::{Fault, SetupError};

//=== SessionId ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

//=== ForceFeedbackBinding ================================================

/// Force-feedback output bound to one session.
#[derive(Debug)]
pub struct ForceFeedbackBinding {
    enabled: bool,
}

impl ForceFeedbackBinding {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            debug!("Force feedback bound");
        }
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Drop for ForceFeedbackBinding {
    fn drop(&mut self) {
        if self.enabled {
            debug!("Force feedback released");
        }
    }
}

//=== SessionConfig =======================================================

/// Settings captured at session start. Later edits do not leak in.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub terrain: Option<String>,

    /// True when the terrain came from the launch preset.
    pub preset: bool,

    pub tps: f64,
}

//=== SessionBinding ======================================================

#[derive(Debug)]
pub struct SessionBinding {
    pub id: SessionId,
    pub force_feedback: ForceFeedbackBinding,
    pub config: SessionConfig,
}

impl SessionBinding {
    /// Snapshots what a new session needs from the context.
    ///
    /// A launch preset wins over the selector's choice.
    pub fn snapshot(id: SessionId, ctx: &AppContext) -> Self {
        let preset = ctx.preset_terrain().map(str::to_owned);
        let config = SessionConfig {
            preset: preset.is_some(),
            terrain: preset.or_else(|| ctx.selection.clone()),
            tps: ctx.settings.sim.tps,
        };
        Self {
            id,
            force_feedback: ForceFeedbackBinding::new(ctx.settings.io.ffb_enabled),
            config,
        }
    }
}

//=== FrameController =====================================================

/// Per-session controller owning the gameplay loop.
pub trait FrameController {
    fn session_id(&self) -> SessionId;

    /// Prepares the session. A failure sends the process back to Menu.
    fn setup_gameplay_loop(&mut self, ctx: &mut AppContext) -> Result<(), SetupError>;

    fn enter_gameplay_loop(&mut self, ctx: &mut AppContext) -> Result<ModeExit, Fault>;
}

//=== SessionFactory ======================================================

pub trait SessionFactory {
    fn create_session(&mut self, binding: SessionBinding) -> Box<dyn FrameController>;
}

//=========================================================================
// Unit Tests
//=========================================================================
