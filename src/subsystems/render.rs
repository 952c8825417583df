//=========================================================================
// Render Context
//=========================================================================
//
// Window, event pump and scene graph.
//
// Windowed mode wraps a `Platform`; headless mode has no window and
// pumps empty frames, which is enough for cache regeneration and for
// preset sessions driven by the interrupt handler.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::scene::SceneGraph;
use crate::core::subsystem::{LifecycleEnv, RenderContext, Subsystem, SubsystemId, WindowHandle};
use crate::error::SubsystemError;
use crate::platform::{Platform, PlatformFrame, WindowConfig};

//=== Renderer ============================================================

pub struct Renderer {
    platform: Option<Platform>,
    scene: Option<SceneGraph>,
}

impl Renderer {
    pub fn windowed(config: WindowConfig) -> Self {
        Self {
            platform: Some(Platform::new(config)),
            scene: None,
        }
    }

    pub fn headless() -> Self {
        Self {
            platform: None,
            scene: None,
        }
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    fn scene_mut(&mut self) -> Option<&mut SceneGraph> {
        if self.scene.is_none() {
            debug!(target: "render", "No scene, call ignored");
        }
        self.scene.as_mut()
    }
}

impl Subsystem for Renderer {
    fn id(&self) -> SubsystemId {
        SubsystemId::Render
    }

    fn startup(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        match self.platform.as_mut() {
            Some(platform) => {
                platform.open()?;
                info!(target: "render", "Render window ready");
            }
            None => info!(target: "render", "Running headless"),
        }
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), SubsystemError> {
        self.scene = None;
        if let Some(platform) = self.platform.as_mut() {
            platform.close();
        }
        Ok(())
    }
}

impl RenderContext for Renderer {
    fn window(&self) -> Option<WindowHandle> {
        self.platform
            .as_ref()
            .and_then(Platform::window_id)
            .map(WindowHandle)
    }

    fn pump(&mut self) -> Result<PlatformFrame, SubsystemError> {
        match self.platform.as_mut() {
            Some(platform) => Ok(platform.pump()?),
            None => Ok(PlatformFrame::default()),
        }
    }

    fn create_scene(&mut self) -> Result<(), SubsystemError> {
        if self.scene.is_none() {
            debug!(target: "render", "Scene manager and camera created");
            self.scene = Some(SceneGraph::new());
        }
        Ok(())
    }

    fn attach_session_node(&mut self, name: &str) {
        if let Some(scene) = self.scene_mut() {
            scene.attach(name);
        }
    }

    fn clear_scene(&mut self) {
        if let Some(scene) = self.scene_mut() {
            scene.clear();
        }
    }

    fn destroy_scene(&mut self) {
        if self.scene.take().is_some() {
            debug!(target: "render", "Scene and camera destroyed");
        }
    }

    fn camera_return_to_menu(&mut self) {
        if let Some(scene) = self.scene_mut() {
            scene.frame_menu();
        }
    }

    fn set_menu_backdrop_visible(&mut self, visible: bool) {
        if let Some(scene) = self.scene_mut() {
            scene.set_backdrop_visible(visible);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
