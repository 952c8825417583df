//=========================================================================
// Core
//
// Application lifecycle: state machines, subsystem sequencing, the main
// control loop and shutdown.
//
// ```text
//   AppContext ─┬─ AppStateController   (operating + connection mailboxes)
//               ├─ ProcessServices      (subsystems + lifecycle ledger)
//               └─ active SessionId
//
//   MainControlLoop ─► MenuLoop / FrameController ─► ModeExit
// ```
//
//=========================================================================

pub mod context;
pub mod control_loop;
pub mod modes;
pub mod services;
pub mod session;
pub mod shutdown;
pub mod state;
pub mod subsystem;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{AppContext, FrameInput};
pub use control_loop::MainControlLoop;
pub use modes::{MenuLoop, ModeExit};
pub use services::{ProcessServices, ServiceSet};
pub use session::{FrameController, SessionBinding, SessionFactory, SessionId};
pub use shutdown::{shut_down, ShutdownReport};
