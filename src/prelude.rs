//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use rigshell::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Process boundary
pub use crate::app::{App, AppParts, Exit, Launcher};
pub use crate::report::{DialogReporter, ErrorReporter};

// Bootstrap
pub use crate::bootstrap::{AppPaths, BaseDirs, Boot, Cli, LaunchOptions, Settings, SystemDirs};

// Core
pub use crate::core::state::{ConnectionMode, OperatingMode};
pub use crate::core::{
    AppContext, FrameController, MainControlLoop, MenuLoop, ModeExit, ServiceSet,
    SessionBinding, SessionFactory, SessionId,
};

// Errors
pub use crate::error::{Fault, SetupError, SubsystemError};

// Input
pub use crate::input::{Command, CommandContext, CommandMapper, InputEvent, KeyCode, Modifiers};

// Stock collaborators
pub use crate::subsystems::standard_parts;
