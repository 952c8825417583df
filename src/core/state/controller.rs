//=========================================================================
// Application State Controller
//=========================================================================
//
// Owns the operating-mode and connection-mode mailboxes.
//
// The controller does not decide which transitions are legal; that is
// the dispatch table of the main control loop. It only stores requests
// and applies them when asked to.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{ConnectionMode, OperatingMode, PendingHandle, StateMailbox};

//=== StateHandles ========================================================

/// Cloneable write access to both state machines for other contexts.
#[derive(Debug, Clone)]
pub struct StateHandles {
    pub operating: PendingHandle<OperatingMode>,
    pub connection: PendingHandle<ConnectionMode>,
}

//=== AppStateController ==================================================

/// Two independent double-buffered state machines.
#[derive(Debug)]
pub struct AppStateController {
    pub operating: StateMailbox<OperatingMode>,
    pub connection: StateMailbox<ConnectionMode>,
}

impl AppStateController {
    pub fn new() -> Self {
        Self {
            operating: StateMailbox::new(OperatingMode::Bootstrap),
            connection: StateMailbox::new(ConnectionMode::NotConnected),
        }
    }

    pub fn handles(&self) -> StateHandles {
        StateHandles {
            operating: self.operating.handle(),
            connection: self.connection.handle(),
        }
    }
}

impl Default for AppStateController {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
