//=========================================================================
// GUI Root
//=========================================================================
//
// Panel visibility and the selector, as seen by the core. Drawing is the
// renderer's business; this only keeps the state it draws from.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::state::OperatingMode;
use crate::core::subsystem::{GuiRoot, Panel, SelectorKind, Subsystem, SubsystemId};
use crate::error::SubsystemError;

//=== PanelGui ============================================================

#[derive(Debug)]
pub struct PanelGui {
    mode: OperatingMode,
    visible: HashSet<Panel>,
    selector: Option<SelectorKind>,
}

impl PanelGui {
    pub fn new() -> Self {
        Self {
            mode: OperatingMode::Bootstrap,
            visible: HashSet::new(),
            selector: None,
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn selector(&self) -> Option<SelectorKind> {
        self.selector
    }
}

impl Default for PanelGui {
    fn default() -> Self {
        Self::new()
    }
}

impl Subsystem for PanelGui {
    fn id(&self) -> SubsystemId {
        SubsystemId::Gui
    }

    fn teardown(&mut self) -> Result<(), SubsystemError> {
        self.visible.clear();
        self.selector = None;
        Ok(())
    }
}

impl GuiRoot for PanelGui {
    fn reflect_mode(&mut self, mode: OperatingMode) {
        debug!(target: "gui", "Mode {} -> {mode}", self.mode);
        self.mode = mode;
        if mode == OperatingMode::Menu && self.selector.is_none() {
            self.visible.insert(Panel::MainMenu);
        }
    }

    fn set_visible(&mut self, panel: Panel, visible: bool) {
        if visible {
            self.visible.insert(panel);
        } else {
            self.visible.remove(&panel);
            if panel == Panel::Selector {
                self.selector = None;
            }
        }
    }

    fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }

    fn show_selector(&mut self, kind: SelectorKind) {
        debug!(target: "gui", "Selector opened ({kind:?})");
        self.selector = Some(kind);
        self.visible.insert(Panel::Selector);
    }

    fn destroy_selector(&mut self) {
        if self.selector.take().is_some() {
            debug!(target: "gui", "Selector destroyed");
        }
        self.visible.remove(&Panel::Selector);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
