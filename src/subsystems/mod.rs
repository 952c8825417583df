//=========================================================================
// Reference Subsystems
//=========================================================================
//
// Stock implementations of the collaborator contracts, and the wiring
// that assembles them for the shipped binary.
//
// ```text
//   render ── Renderer (winit window or headless) + SceneGraph
//   content ─ PackContentManager (resource packs, material scan)
//   cache ─── FileCacheIndex (index.toml under the cache dir)
//   gui ───── PanelGui
//   input ─── KeyboardInput (CommandMapper defaults)
//   audio ─── MenuAudio
//   network ─ TcpNetworkSession
//   voice ─── none
// ```
//
//=========================================================================

pub mod audio;
pub mod cache;
pub mod content;
pub mod gui;
pub mod input;
pub mod network;
pub mod render;
pub mod scene;

pub use audio::MenuAudio;
pub use cache::{CacheEntry, EntryKind, FileCacheIndex};
pub use content::PackContentManager;
pub use gui::PanelGui;
pub use input::KeyboardInput;
pub use network::TcpNetworkSession;
pub use render::Renderer;
pub use scene::{CameraFraming, SceneGraph};

//=== Internal Dependencies ===============================================

use crate::app::AppParts;
use crate::bootstrap::Boot;
use crate::core::ServiceSet;
use crate::loops::{InteractiveMenu, SimulationFactory};
use crate::platform::WindowConfig;

//=== Wiring ==============================================================

/// Assembles the stock collaborators for `boot`.
///
/// Headless runs and cache regeneration never open a window.
pub fn standard_parts(boot: &Boot) -> AppParts {
    let render = if boot.launch.headless || boot.launch.regen_cache_only {
        Renderer::headless()
    } else {
        let window = &boot.settings.window;
        Renderer::windowed(WindowConfig {
            title: window.title.clone(),
            width: window.width,
            height: window.height,
        })
    };

    AppParts {
        services: ServiceSet {
            render: Box::new(render),
            content: Box::new(PackContentManager::new()),
            cache: Box::new(FileCacheIndex::new()),
            gui: Box::new(PanelGui::new()),
            input: Box::new(KeyboardInput::default()),
            audio: Box::new(MenuAudio::new()),
            network: Box::new(TcpNetworkSession::new()),
            voice: None,
        },
        menu: Box::new(InteractiveMenu::new()),
        sessions: Box::new(SimulationFactory::new()),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{AppPaths, LaunchOptions, Settings};
    use std::path::PathBuf;

    fn boot(launch: LaunchOptions) -> Boot {
        Boot {
            paths: AppPaths::from_base(PathBuf::from("/i"), PathBuf::from("/u")),
            settings: Settings::default(),
            launch,
        }
    }

    #[test]
    fn headless_wiring_has_no_window_and_no_voice() {
        let parts = standard_parts(&boot(LaunchOptions {
            headless: true,
            ..LaunchOptions::default()
        }));

        assert!(parts.services.render.window().is_none());
        assert!(parts.services.voice.is_none());
    }

    #[test]
    fn cache_regeneration_stays_headless() {
        let parts = standard_parts(&boot(LaunchOptions {
            regen_cache_only: true,
            ..LaunchOptions::default()
        }));

        assert!(parts.services.render.window().is_none());
    }
}
