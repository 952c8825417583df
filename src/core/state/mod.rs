//=========================================================================
// Application State
//=========================================================================
//
// The two top-level state machines of the process.
//
// Architecture:
// ```text
//   OperatingMode   ── Bootstrap → Menu ⇄ Simulation ⇄ ChangeMap → ShuttingDown
//   ConnectionMode  ── NotConnected → Connecting → Connected → Disconnected
// ```
//
// Both are double-buffered through a `StateMailbox`: the active value is
// what the process has fully entered, the pending value is the request
// that will be honored at the next loop checkpoint.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod controller;
pub mod mailbox;

//=== Public API ==========================================================

pub use controller::{AppStateController, StateHandles};
pub use mailbox::{PendingHandle, StateMailbox, Transition};

//=== External Dependencies ===============================================

use std::fmt;

//=== ModeValue ===========================================================

/// Marker trait for values that can live in a [`StateMailbox`].
///
/// Values cross execution contexts (network worker, signal handler), so
/// they must be `Send + 'static` and cheap to copy.
pub trait ModeValue: 'static + Send + Copy + Eq + fmt::Debug {}

//=== OperatingMode =======================================================

/// Top-level operating mode of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingMode {
    /// Process is still bringing subsystems up. Never requested as a target.
    Bootstrap,

    /// Main menu and terrain selector.
    Menu,

    /// A simulation session is running.
    Simulation,

    /// Returning to the terrain selector to load a different map.
    ChangeMap,

    /// Terminal state; the control loop exits when this becomes pending.
    ShuttingDown,
}

impl OperatingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Menu => "menu",
            Self::Simulation => "simulation",
            Self::ChangeMap => "change-map",
            Self::ShuttingDown => "shutting-down",
        }
    }

    /// True for the mode that ends the main control loop.
    pub fn is_terminal(self) -> bool {
        self == Self::ShuttingDown
    }
}

impl ModeValue for OperatingMode {}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=== ConnectionMode ======================================================

/// Network session state, independent from the operating mode so that a
/// connection can outlive a Simulation → Menu → Simulation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionMode {
    NotConnected,
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotConnected => "not-connected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }

    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl ModeValue for ConnectionMode {}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
