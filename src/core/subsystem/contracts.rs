//=========================================================================
// Collaborator Contracts
//=========================================================================
//
// What the core needs from each external collaborator beyond the plain
// lifecycle. Implementations live in `crate::subsystems`; tests swap in
// in-memory doubles.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

//=== Internal Dependencies ===============================================

use super::Subsystem;
use crate::bootstrap::AppPaths;
use crate::core::state::{ConnectionMode, OperatingMode, PendingHandle};
use crate::error::SubsystemError;
use crate::input::{Command, CommandContext, InputEvent};
use crate::platform::PlatformFrame;

//=== Shared Types ========================================================

/// Opaque native window identifier handed to the input engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// Resource groups registered with the content manager at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourcePack {
    /// Engine base resources, required by everything else.
    Core,

    /// Menu backdrop images.
    Wallpapers,
}

impl ResourcePack {
    /// Directory name under the resources folder.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Wallpapers => "wallpapers",
        }
    }
}

/// Top-level GUI panels toggled by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    MainMenu,
    Selector,
    TopMenubar,
    MpClientList,
}

/// What the selector panel lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Terrain,
    Vehicle,
}

//=== RenderContext =======================================================

/// Window, viewport, camera and scene graph.
pub trait RenderContext: Subsystem {
    fn window(&self) -> Option<WindowHandle>;

    /// Services pending platform events without blocking.
    fn pump(&mut self) -> Result<PlatformFrame, SubsystemError>;

    /// Creates the scene manager and the process camera.
    fn create_scene(&mut self) -> Result<(), SubsystemError>;

    fn attach_session_node(&mut self, name: &str);

    /// Removes all scene objects. The camera survives.
    fn clear_scene(&mut self);

    /// Destroys camera and scene graph. Shutdown only.
    fn destroy_scene(&mut self);

    fn camera_return_to_menu(&mut self);

    fn set_menu_backdrop_visible(&mut self, visible: bool);
}

//=== ContentManager ======================================================

/// Resource packs and user content roots.
pub trait ContentManager: Subsystem {
    fn add_resource_pack(&mut self, pack: ResourcePack) -> Result<(), SubsystemError>;

    /// Loads the base materials that mod content links against.
    fn init_managed_materials(&mut self) -> Result<(), SubsystemError>;

    fn managed_materials_ready(&self) -> bool;
}

//=== CacheIndex ==========================================================

/// Index of installable content (terrains, vehicles, archives).
pub trait CacheIndex: Subsystem {
    /// Rebuilds the index from the content roots. Returns the entry count.
    fn regenerate(&mut self, paths: &AppPaths) -> Result<usize, SubsystemError>;

    fn terrains(&self) -> Vec<String>;

    fn contains_terrain(&self, name: &str) -> bool;

    fn index_path(&self) -> Option<PathBuf> {
        None
    }
}

//=== GuiRoot =============================================================

/// Top-level GUI state.
pub trait GuiRoot: Subsystem {
    fn reflect_mode(&mut self, mode: OperatingMode);

    fn set_visible(&mut self, panel: Panel, visible: bool);

    fn is_visible(&self, panel: Panel) -> bool;

    /// Opens the selector listing `kind`. Makes [`Panel::Selector`] visible.
    fn show_selector(&mut self, kind: SelectorKind);

    /// Releases the selector's resources. Shutdown only.
    fn destroy_selector(&mut self);
}

//=== InputEngine =========================================================

/// Translates platform input into commands.
pub trait InputEngine: Subsystem {
    fn process(&mut self, context: CommandContext, events: &[InputEvent]) -> Vec<Command>;

    fn has_force_feedback_device(&self) -> bool;
}

//=== AudioManager ========================================================

pub trait AudioManager: Subsystem {
    fn play_menu_music(&mut self);

    fn stop_menu_music(&mut self);
}

//=== NetworkSession ======================================================

/// Multiplayer session. Connection progress is reported asynchronously
/// through the handle, never by return value.
pub trait NetworkSession: Subsystem {
    fn connect(&mut self, connection: PendingHandle<ConnectionMode>) -> Result<(), SubsystemError>;

    fn disconnect(&mut self);
}

//=== VoiceChat ===========================================================

pub trait VoiceChat: Subsystem {
    fn is_connected(&self) -> bool;

    /// Stops spatializing voices once no session places them in the world.
    fn set_non_positional(&mut self);
}
