//=========================================================================
// Process Services
//=========================================================================
//
// Owns every process-scoped subsystem and sequences their lifecycles.
//
// Bring-up order:
// ```text
//   Render  create → startup (window)
//   Content create → Core + Wallpapers packs
//   Render  scene manager + camera
//   Cache   create
//   Content startup (user content roots)
//   Gui     create → startup
//   Input   create → startup (window handle)
//   Content managed materials
//   Cache   startup (needs managed materials)
//   Audio, Network, Voice
// ```
//
// Teardown walks the lifecycle ledger in reverse and never stops early.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::bootstrap::{AppPaths, Settings};
use crate::core::subsystem::{
    AudioManager, CacheIndex, ContentManager, GuiRoot, InputEngine, LifecycleEnv,
    LifecycleLedger, NetworkSession, RenderContext, ResourcePack, Subsystem, SubsystemId,
    VoiceChat,
};
use crate::error::{Fault, SubsystemError};

//=== Dispatch ============================================================

/// Runs `$body` against the subsystem named by `$id`, bound as `$s`.
///
/// Absent optional subsystems evaluate to `Ok(())`.
macro_rules! with_subsystem {
    ($services:expr, $id:expr, |$s:ident| $body:expr) => {
        match $id {
            SubsystemId::Render => {
                let $s = &mut *$services.render;
                $body
            }
            SubsystemId::Content => {
                let $s = &mut *$services.content;
                $body
            }
            SubsystemId::Cache => {
                let $s = &mut *$services.cache;
                $body
            }
            SubsystemId::Gui => {
                let $s = &mut *$services.gui;
                $body
            }
            SubsystemId::Input => {
                let $s = &mut *$services.input;
                $body
            }
            SubsystemId::Audio => {
                let $s = &mut *$services.audio;
                $body
            }
            SubsystemId::Network => {
                let $s = &mut *$services.network;
                $body
            }
            SubsystemId::Voice => match $services.voice.as_deref_mut() {
                Some($s) => $body,
                None => Ok(()),
            },
        }
    };
}

//=== ServiceSet ==========================================================

/// Unstarted subsystem instances, as wired by the caller.
pub struct ServiceSet {
    pub render: Box<dyn RenderContext>,
    pub content: Box<dyn ContentManager>,
    pub cache: Box<dyn CacheIndex>,
    pub gui: Box<dyn GuiRoot>,
    pub input: Box<dyn InputEngine>,
    pub audio: Box<dyn AudioManager>,
    pub network: Box<dyn NetworkSession>,
    pub voice: Option<Box<dyn VoiceChat>>,
}

//=== ProcessServices =====================================================

/// Process-scoped subsystems plus their lifecycle ledger.
pub struct ProcessServices {
    pub render: Box<dyn RenderContext>,
    pub content: Box<dyn ContentManager>,
    pub cache: Box<dyn CacheIndex>,
    pub gui: Box<dyn GuiRoot>,
    pub input: Box<dyn InputEngine>,
    pub audio: Box<dyn AudioManager>,
    pub network: Box<dyn NetworkSession>,
    pub voice: Option<Box<dyn VoiceChat>>,
    ledger: LifecycleLedger,
    cache_regen_pending: bool,
}

impl From<ServiceSet> for ProcessServices {
    fn from(set: ServiceSet) -> Self {
        Self {
            render: set.render,
            content: set.content,
            cache: set.cache,
            gui: set.gui,
            input: set.input,
            audio: set.audio,
            network: set.network,
            voice: set.voice,
            ledger: LifecycleLedger::new(),
            cache_regen_pending: false,
        }
    }
}

impl ProcessServices {
    //--- Bring-up ---------------------------------------------------------

    /// Creates and starts every subsystem in dependency order.
    ///
    /// With `cache_regen_pending` the cache only loads an existing index at
    /// startup; the caller rebuilds it afterwards.
    pub fn bring_up(
        &mut self,
        paths: &AppPaths,
        settings: &Settings,
        cache_regen_pending: bool,
    ) -> Result<(), Fault> {
        info!("Bringing up subsystems");
        self.cache_regen_pending = cache_regen_pending;

        self.create(SubsystemId::Render, paths, settings)?;
        self.start(SubsystemId::Render, paths, settings)?;

        self.create(SubsystemId::Content, paths, settings)?;
        for pack in [ResourcePack::Core, ResourcePack::Wallpapers] {
            self.content
                .add_resource_pack(pack)
                .map_err(|e| Fault::subsystem(SubsystemId::Content, e))?;
        }

        self.render
            .create_scene()
            .map_err(|e| Fault::subsystem(SubsystemId::Render, e))?;

        self.create(SubsystemId::Cache, paths, settings)?;
        self.start(SubsystemId::Content, paths, settings)?;

        self.create(SubsystemId::Gui, paths, settings)?;
        self.start(SubsystemId::Gui, paths, settings)?;

        self.create(SubsystemId::Input, paths, settings)?;
        self.start(SubsystemId::Input, paths, settings)?;

        self.content
            .init_managed_materials()
            .map_err(|e| Fault::subsystem(SubsystemId::Content, e))?;
        self.start(SubsystemId::Cache, paths, settings)?;

        for id in [SubsystemId::Audio, SubsystemId::Network] {
            self.create(id, paths, settings)?;
            self.start(id, paths, settings)?;
        }
        if self.voice.is_some() {
            self.create(SubsystemId::Voice, paths, settings)?;
            self.start(SubsystemId::Voice, paths, settings)?;
        }

        info!("Subsystems ready: {:?}", self.ledger.created());
        Ok(())
    }

    fn env<'a>(&self, paths: &'a AppPaths, settings: &'a Settings) -> LifecycleEnv<'a> {
        LifecycleEnv {
            paths,
            settings,
            window: self.render.window(),
            managed_materials_ready: self.content.managed_materials_ready(),
            cache_regen_pending: self.cache_regen_pending,
        }
    }

    fn create(
        &mut self,
        id: SubsystemId,
        paths: &AppPaths,
        settings: &Settings,
    ) -> Result<(), Fault> {
        self.ledger
            .check_create(id)
            .map_err(|e| Fault::subsystem(id, e))?;
        let env = self.env(paths, settings);
        with_subsystem!(self, id, |s| s.create(&env)).map_err(|e| Fault::subsystem(id, e))?;
        self.ledger.record_created(id);
        Ok(())
    }

    fn start(
        &mut self,
        id: SubsystemId,
        paths: &AppPaths,
        settings: &Settings,
    ) -> Result<(), Fault> {
        self.ledger
            .check_startup(id)
            .map_err(|e| Fault::subsystem(id, e))?;
        let env = self.env(paths, settings);
        with_subsystem!(self, id, |s| s.startup(&env)).map_err(|e| Fault::subsystem(id, e))?;
        self.ledger.record_started(id);
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    pub fn created(&self) -> &[SubsystemId] {
        self.ledger.created()
    }

    //--- Teardown ---------------------------------------------------------

    /// Tears down every created subsystem in reverse creation order.
    ///
    /// Failures are logged and collected; remaining subsystems are still
    /// torn down.
    pub fn tear_down(&mut self) -> Vec<(SubsystemId, SubsystemError)> {
        let mut failures = Vec::new();
        for id in self.ledger.drain_teardown_order() {
            let result: Result<(), SubsystemError> = with_subsystem!(self, id, |s| s.teardown());
            match result {
                Ok(()) => info!(target: "lifecycle", "{id} torn down"),
                Err(e) => {
                    error!(target: "lifecycle", "{id} teardown failed: {e}");
                    failures.push((id, e));
                }
            }
        }
        failures
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
