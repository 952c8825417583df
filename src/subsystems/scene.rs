//=========================================================================
// Scene Graph
//=========================================================================
//
// Named nodes under one root, plus the camera and the menu backdrop.
//
// Sessions attach their nodes on setup; the control loop clears them
// once the session is gone. Clearing keeps the camera and the backdrop,
// which belong to the process rather than to a session.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== CameraFraming =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraFraming {
    /// Static shot behind the main menu.
    #[default]
    Menu,

    /// Follows the active session.
    Session,
}

//=== SceneGraph ==========================================================

#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<String>,
    camera: CameraFraming,
    backdrop_visible: bool,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            camera: CameraFraming::Menu,
            backdrop_visible: true,
        }
    }

    //--- Nodes ------------------------------------------------------------

    /// Attaches a node under the root. Duplicate names are ignored.
    pub fn attach(&mut self, name: &str) {
        if self.nodes.iter().any(|node| node == name) {
            warn!(target: "render::scene", "Node '{name}' already attached");
            return;
        }
        debug!(target: "render::scene", "Attached '{name}'");
        self.nodes.push(name.to_string());
        self.camera = CameraFraming::Session;
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| node != name);
        before != self.nodes.len()
    }

    /// Drops every node. Camera and backdrop survive.
    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            debug!(target: "render::scene", "Clearing {} node(s)", self.nodes.len());
        }
        self.nodes.clear();
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    //--- Camera and Backdrop ----------------------------------------------

    pub fn camera(&self) -> CameraFraming {
        self.camera
    }

    pub fn frame_menu(&mut self) {
        self.camera = CameraFraming::Menu;
    }

    pub fn backdrop_visible(&self) -> bool {
        self.backdrop_visible
    }

    pub fn set_backdrop_visible(&mut self, visible: bool) {
        self.backdrop_visible = visible;
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attaching_switches_camera_to_session() {
        let mut scene = SceneGraph::new();
        scene.attach("terrain:hills");

        assert_eq!(scene.nodes(), ["terrain:hills"]);
        assert_eq!(scene.camera(), CameraFraming::Session);
    }

    #[test]
    fn duplicate_attach_is_ignored() {
        let mut scene = SceneGraph::new();
        scene.attach("a");
        scene.attach("a");

        assert_eq!(scene.nodes().len(), 1);
    }

    #[test]
    fn clear_keeps_camera_and_backdrop() {
        let mut scene = SceneGraph::new();
        scene.set_backdrop_visible(false);
        scene.attach("a");
        scene.attach("b");

        scene.clear();

        assert!(scene.nodes().is_empty());
        assert_eq!(scene.camera(), CameraFraming::Session);
        assert!(!scene.backdrop_visible());
    }

    #[test]
    fn remove_reports_whether_node_existed() {
        let mut scene = SceneGraph::new();
        scene.attach("a");

        assert!(scene.remove("a"));
        assert!(!scene.remove("a"));
    }
}
