//=========================================================================
// Mode Loops
//=========================================================================
//
// Contract between the main control loop and the nested loops it runs.
//
// A mode loop blocks until it decides what comes next and returns that
// decision as a value. Faults travel separately in the `Err` arm.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::context::AppContext;
use crate::core::state::OperatingMode;
use crate::error::Fault;

//=== ModeExit ============================================================

/// How a nested mode loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeExit {
    /// The loop requests this operating mode next.
    SwitchTo(OperatingMode),

    /// Another context already posted a request; leave it untouched.
    Yield,
}

//=== MenuLoop ============================================================

/// The loop that runs while the main menu or terrain selector is up.
pub trait MenuLoop {
    fn enter_menu_loop(&mut self, ctx: &mut AppContext) -> Result<ModeExit, Fault>;
}
