//=========================================================================
// Subsystem Lifecycle Facade
//=========================================================================
//
// Uniform create/startup/teardown contract for every heavyweight service.
//
// Lifecycle:
// ```text
//   create()   ── singleton construction, no I/O, idempotent
//   startup()  ── I/O-bound initialization
//   teardown() ── reverses create(); called in exact reverse creation order
// ```
//
// Dependency table (a subsystem may only be created after these exist):
// ```text
//   Render  ─┬─► Gui ─► Input
//   Content ─┴─► Cache
//   Audio, Network ─► (none)      Voice ─► Network
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub mod contracts;
pub mod lifecycle;

//=== Public API ==========================================================

pub use contracts::{
    AudioManager, CacheIndex, ContentManager, GuiRoot, InputEngine, NetworkSession, Panel,
    RenderContext, ResourcePack, SelectorKind, VoiceChat, WindowHandle,
};
pub use lifecycle::LifecycleLedger;

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::bootstrap::{AppPaths, Settings};
use crate::error::SubsystemError;

//=== SubsystemId =========================================================

/// Identifies one process-scoped subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsystemId {
    Render,
    Content,
    Cache,
    Gui,
    Input,
    Audio,
    Network,
    Voice,
}

impl SubsystemId {
    pub const ALL: [SubsystemId; 8] = [
        Self::Render,
        Self::Content,
        Self::Cache,
        Self::Gui,
        Self::Input,
        Self::Audio,
        Self::Network,
        Self::Voice,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Content => "content",
            Self::Cache => "cache",
            Self::Gui => "gui",
            Self::Input => "input",
            Self::Audio => "audio",
            Self::Network => "network",
            Self::Voice => "voice",
        }
    }

    /// Subsystems that must already be created before this one.
    pub fn dependencies(self) -> &'static [SubsystemId] {
        match self {
            Self::Render | Self::Content | Self::Audio | Self::Network => &[],
            Self::Cache => &[Self::Content],
            Self::Gui => &[Self::Render],
            Self::Input => &[Self::Render, Self::Gui],
            Self::Voice => &[Self::Network],
        }
    }
}

impl fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=== LifecycleEnv ========================================================

/// Process-wide inputs available to lifecycle calls.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleEnv<'a> {
    pub paths: &'a AppPaths,
    pub settings: &'a Settings,

    /// Native window, once the render context has opened one.
    pub window: Option<WindowHandle>,

    /// Whether the base materials every content pack links against exist.
    pub managed_materials_ready: bool,

    /// The caller regenerates the cache itself right after bring-up.
    pub cache_regen_pending: bool,
}

//=== Subsystem ===========================================================

/// Lifecycle contract shared by every heavyweight service.
pub trait Subsystem {
    fn id(&self) -> SubsystemId;

    fn create(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn startup(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), SubsystemError>;
}

//=========================================================================
// Unit Tests
//=========================================================================
