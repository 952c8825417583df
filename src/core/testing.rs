//=========================================================================
// Test Doubles
//=========================================================================
//
// In-memory collaborators that record every call into a shared journal.
//
// Journal entries read `<subsystem>.<call>[ <detail>]`, e.g.
// `render.backdrop true` or `gui.show Selector`. Any entry can be made
// to fail through `Failures::fail`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::io;
use std::rc::Rc;

use tempfile::TempDir;

//=== Internal Dependencies ===============================================

use crate::bootstrap::{AppPaths, LaunchOptions, Settings};
use crate::core::context::AppContext;
use crate::core::control_loop::MainControlLoop;
use crate::core::modes::{MenuLoop, ModeExit};
use crate::core::services::{ProcessServices, ServiceSet};
use crate::core::session::{FrameController, SessionBinding, SessionFactory, SessionId};
use crate::core::state::{ConnectionMode, OperatingMode, PendingHandle};
use crate::core::subsystem::{
    AudioManager, CacheIndex, ContentManager, GuiRoot, InputEngine, LifecycleEnv,
    NetworkSession, Panel, RenderContext, ResourcePack, SelectorKind, Subsystem, SubsystemId,
    VoiceChat, WindowHandle,
};
use crate::error::{Fault, SetupError, SubsystemError};
use crate::input::{Command, CommandContext, CommandMapper, InputEvent};
use crate::platform::PlatformFrame;

//=== Journal =============================================================

#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn contains(&self, entry: &str) -> bool {
        self.0.borrow().iter().any(|e| e == entry)
    }

    pub(crate) fn position(&self, entry: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == entry)
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

//=== Failures ============================================================

#[derive(Debug, Clone, Default)]
pub(crate) struct Failures(Rc<RefCell<HashSet<String>>>);

impl Failures {
    pub(crate) fn fail(&self, entry: &str) {
        self.0.borrow_mut().insert(entry.to_string());
    }

    fn check(&self, entry: &str) -> Result<(), SubsystemError> {
        if self.0.borrow().contains(entry) {
            Err(SubsystemError::io(
                entry,
                io::Error::new(io::ErrorKind::Other, "injected failure"),
            ))
        } else {
            Ok(())
        }
    }
}

//=== Recorder ============================================================

/// Shared recorder each double embeds.
#[derive(Debug, Clone)]
struct Recorder {
    id: SubsystemId,
    journal: Journal,
    failures: Failures,
}

impl Recorder {
    fn step(&self, call: &str) -> Result<(), SubsystemError> {
        let entry = format!("{}.{}", self.id, call);
        self.journal.push(entry.clone());
        self.failures.check(&entry)
    }

    fn note(&self, call: impl AsRef<str>) {
        self.journal.push(format!("{}.{}", self.id, call.as_ref()));
    }
}

macro_rules! lifecycle_via_recorder {
    () => {
        fn id(&self) -> SubsystemId {
            self.recorder.id
        }

        fn create(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
            self.recorder.step("create")
        }

        fn teardown(&mut self) -> Result<(), SubsystemError> {
            self.recorder.step("teardown")
        }
    };
}

//=== Render ==============================================================

struct MockRender {
    recorder: Recorder,
    frames: Rc<RefCell<VecDeque<PlatformFrame>>>,
}

impl Subsystem for MockRender {
    lifecycle_via_recorder!();

    fn startup(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.recorder.step("startup")
    }
}

impl RenderContext for MockRender {
    fn window(&self) -> Option<WindowHandle> {
        Some(WindowHandle(7))
    }

    fn pump(&mut self) -> Result<PlatformFrame, SubsystemError> {
        Ok(self.frames.borrow_mut().pop_front().unwrap_or_default())
    }

    fn create_scene(&mut self) -> Result<(), SubsystemError> {
        self.recorder.step("create_scene")
    }

    fn attach_session_node(&mut self, name: &str) {
        self.recorder.note(format!("attach {name}"));
    }

    fn clear_scene(&mut self) {
        self.recorder.note("clear_scene");
    }

    fn destroy_scene(&mut self) {
        self.recorder.note("destroy_scene");
    }

    fn camera_return_to_menu(&mut self) {
        self.recorder.note("camera_menu");
    }

    fn set_menu_backdrop_visible(&mut self, visible: bool) {
        self.recorder.note(format!("backdrop {visible}"));
    }
}

//=== Content =============================================================

struct MockContent {
    recorder: Recorder,
    materials: bool,
}

impl Subsystem for MockContent {
    lifecycle_via_recorder!();

    fn startup(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.recorder.step("startup")
    }
}

impl ContentManager for MockContent {
    fn add_resource_pack(&mut self, pack: ResourcePack) -> Result<(), SubsystemError> {
        self.recorder.step(&format!("pack {}", pack.dir_name()))
    }

    fn init_managed_materials(&mut self) -> Result<(), SubsystemError> {
        self.recorder.step("materials")?;
        self.materials = true;
        Ok(())
    }

    fn managed_materials_ready(&self) -> bool {
        self.materials
    }
}

//=== Cache ===============================================================

struct MockCache {
    recorder: Recorder,
    terrains: Vec<String>,
}

impl Subsystem for MockCache {
    lifecycle_via_recorder!();

    fn startup(&mut self, env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.recorder.step("startup")?;
        self.recorder
            .note(format!("materials_ready {}", env.managed_materials_ready));
        Ok(())
    }
}

impl CacheIndex for MockCache {
    fn regenerate(&mut self, _paths: &AppPaths) -> Result<usize, SubsystemError> {
        self.recorder.step("regenerate")?;
        Ok(self.terrains.len())
    }

    fn terrains(&self) -> Vec<String> {
        self.terrains.clone()
    }

    fn contains_terrain(&self, name: &str) -> bool {
        self.terrains.iter().any(|terrain| terrain == name)
    }
}

//=== Gui =================================================================

struct MockGui {
    recorder: Recorder,
    visible: HashSet<Panel>,
}

impl Subsystem for MockGui {
    lifecycle_via_recorder!();

    fn startup(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.recorder.step("startup")
    }
}

impl GuiRoot for MockGui {
    fn reflect_mode(&mut self, mode: OperatingMode) {
        self.recorder.note(format!("mode {mode}"));
    }

    fn set_visible(&mut self, panel: Panel, visible: bool) {
        let verb = if visible { "show" } else { "hide" };
        self.recorder.note(format!("{verb} {panel:?}"));
        if visible {
            self.visible.insert(panel);
        } else {
            self.visible.remove(&panel);
        }
    }

    fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }

    fn show_selector(&mut self, kind: SelectorKind) {
        self.recorder.note(format!("selector {kind:?}"));
        self.visible.insert(Panel::Selector);
    }

    fn destroy_selector(&mut self) {
        self.recorder.note("destroy_selector");
        self.visible.remove(&Panel::Selector);
    }
}

//=== Input ===============================================================

struct MockInput {
    recorder: Recorder,
    mapper: CommandMapper,
    ffb_device: bool,
}

impl Subsystem for MockInput {
    lifecycle_via_recorder!();

    fn startup(&mut self, env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.recorder.step("startup")?;
        if let Some(window) = env.window {
            self.recorder.note(format!("window {}", window.0));
        }
        Ok(())
    }
}

impl InputEngine for MockInput {
    fn process(&mut self, context: CommandContext, events: &[InputEvent]) -> Vec<Command> {
        events
            .iter()
            .filter_map(|event| self.mapper.map_event(event, context))
            .collect()
    }

    fn has_force_feedback_device(&self) -> bool {
        self.ffb_device
    }
}

//=== Audio ===============================================================

struct MockAudio {
    recorder: Recorder,
}

impl Subsystem for MockAudio {
    lifecycle_via_recorder!();

    fn startup(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.recorder.step("startup")
    }
}

impl AudioManager for MockAudio {
    fn play_menu_music(&mut self) {
        self.recorder.note("music_on");
    }

    fn stop_menu_music(&mut self) {
        self.recorder.note("music_off");
    }
}

//=== Network =============================================================

struct MockNetwork {
    recorder: Recorder,
    outcome: Option<ConnectionMode>,
}

impl Subsystem for MockNetwork {
    lifecycle_via_recorder!();

    fn startup(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.recorder.step("startup")
    }
}

impl NetworkSession for MockNetwork {
    fn connect(&mut self, connection: PendingHandle<ConnectionMode>) -> Result<(), SubsystemError> {
        self.recorder.step("connect")?;
        if let Some(outcome) = self.outcome {
            connection.set_pending(outcome);
        }
        Ok(())
    }

    fn disconnect(&mut self) {
        self.recorder.note("disconnect");
    }
}

//=== Voice ===============================================================

struct MockVoice {
    recorder: Recorder,
    connected: bool,
}

impl Subsystem for MockVoice {
    lifecycle_via_recorder!();

    fn startup(&mut self, _env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.recorder.step("startup")
    }
}

impl VoiceChat for MockVoice {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn set_non_positional(&mut self) {
        self.recorder.note("non_positional");
    }
}

//=== Scripted Mode Loops =================================================

/// Menu loop returning scripted exits, `SwitchTo(ShuttingDown)` once empty.
pub(crate) struct ScriptedMenu {
    journal: Journal,
    exits: VecDeque<Result<ModeExit, Fault>>,
}

impl ScriptedMenu {
    pub(crate) fn new(journal: &Journal, exits: Vec<Result<ModeExit, Fault>>) -> Self {
        Self {
            journal: journal.clone(),
            exits: exits.into(),
        }
    }
}

impl MenuLoop for ScriptedMenu {
    fn enter_menu_loop(&mut self, ctx: &mut AppContext) -> Result<ModeExit, Fault> {
        self.journal
            .push(format!("menu.loop {}", ctx.state.operating.active()));
        self.exits
            .pop_front()
            .unwrap_or(Ok(ModeExit::SwitchTo(OperatingMode::ShuttingDown)))
    }
}

/// Plan for one scripted simulation session.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionPlan {
    pub setup_ok: bool,
    pub exit: ModeExit,

    /// Request posted from inside setup, as another context would.
    pub post_during_setup: Option<OperatingMode>,
}

impl SessionPlan {
    pub(crate) fn runs_then(exit: OperatingMode) -> Self {
        Self {
            setup_ok: true,
            exit: ModeExit::SwitchTo(exit),
            post_during_setup: None,
        }
    }

    pub(crate) fn fails_setup() -> Self {
        Self {
            setup_ok: false,
            exit: ModeExit::Yield,
            post_during_setup: None,
        }
    }

    pub(crate) fn fails_setup_after(posted: OperatingMode) -> Self {
        Self {
            post_during_setup: Some(posted),
            ..Self::fails_setup()
        }
    }
}

pub(crate) struct ScriptedSessions {
    journal: Journal,
    plans: VecDeque<SessionPlan>,
}

impl ScriptedSessions {
    pub(crate) fn new(journal: &Journal, plans: Vec<SessionPlan>) -> Self {
        Self {
            journal: journal.clone(),
            plans: plans.into(),
        }
    }
}

impl SessionFactory for ScriptedSessions {
    fn create_session(&mut self, binding: SessionBinding) -> Box<dyn FrameController> {
        self.journal.push(format!("session.create {}", binding.id));
        let plan = self
            .plans
            .pop_front()
            .unwrap_or_else(|| SessionPlan::runs_then(OperatingMode::ShuttingDown));
        Box::new(ScriptedController {
            id: binding.id,
            journal: self.journal.clone(),
            plan,
        })
    }
}

struct ScriptedController {
    id: SessionId,
    journal: Journal,
    plan: SessionPlan,
}

impl FrameController for ScriptedController {
    fn session_id(&self) -> SessionId {
        self.id
    }

    fn setup_gameplay_loop(&mut self, ctx: &mut AppContext) -> Result<(), SetupError> {
        self.journal.push("session.setup");
        if let Some(mode) = self.plan.post_during_setup {
            ctx.state.operating.handle().set_pending(mode);
        }
        if self.plan.setup_ok {
            Ok(())
        } else {
            Err(SetupError::NoTerrain)
        }
    }

    fn enter_gameplay_loop(&mut self, ctx: &mut AppContext) -> Result<ModeExit, Fault> {
        self.journal.push(format!(
            "session.loop {}",
            ctx.state.operating.active()
        ));
        if ctx.active_session() == Some(self.id) {
            self.journal.push("session.registered");
        }
        Ok(self.plan.exit)
    }
}

impl Drop for ScriptedController {
    fn drop(&mut self) {
        self.journal.push("session.drop");
    }
}

//=== Service Doubles =====================================================

/// A full set of journaling doubles, e.g. for wiring a whole `App`.
pub(crate) fn service_set(
    options: &FixtureOptions,
    journal: &Journal,
    failures: &Failures,
) -> ServiceSet {
    let frames = Rc::new(RefCell::new(VecDeque::new()));
    build_services(options, journal, failures, &frames)
}

fn build_services(
    options: &FixtureOptions,
    journal: &Journal,
    failures: &Failures,
    frames: &Rc<RefCell<VecDeque<PlatformFrame>>>,
) -> ServiceSet {
    let recorder = |id| Recorder {
        id,
        journal: journal.clone(),
        failures: failures.clone(),
    };

    ServiceSet {
        render: Box::new(MockRender {
            recorder: recorder(SubsystemId::Render),
            frames: Rc::clone(frames),
        }),
        content: Box::new(MockContent {
            recorder: recorder(SubsystemId::Content),
            materials: false,
        }),
        cache: Box::new(MockCache {
            recorder: recorder(SubsystemId::Cache),
            terrains: options.terrains.clone(),
        }),
        gui: Box::new(MockGui {
            recorder: recorder(SubsystemId::Gui),
            visible: HashSet::new(),
        }),
        input: Box::new(MockInput {
            recorder: recorder(SubsystemId::Input),
            mapper: CommandMapper::with_defaults(),
            ffb_device: options.ffb_device,
        }),
        audio: Box::new(MockAudio {
            recorder: recorder(SubsystemId::Audio),
        }),
        network: Box::new(MockNetwork {
            recorder: recorder(SubsystemId::Network),
            outcome: options.connect_outcome,
        }),
        voice: options.voice.then(|| {
            Box::new(MockVoice {
                recorder: recorder(SubsystemId::Voice),
                connected: options.voice_connected,
            }) as Box<dyn VoiceChat>
        }),
    }
}

//=== Fixture =============================================================

#[derive(Debug, Clone)]
pub(crate) struct FixtureOptions {
    pub voice: bool,
    pub voice_connected: bool,
    pub ffb_device: bool,
    pub preset_terrain: Option<String>,
    pub terrains: Vec<String>,
    pub connect_outcome: Option<ConnectionMode>,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            voice: true,
            voice_connected: false,
            ffb_device: false,
            preset_terrain: None,
            terrains: vec!["hills".to_string(), "dunes".to_string()],
            connect_outcome: None,
        }
    }
}

/// An `AppContext` wired to doubles, rooted in a temporary directory.
pub(crate) struct Fixture {
    pub ctx: AppContext,
    pub journal: Journal,
    pub failures: Failures,
    frames: Rc<RefCell<VecDeque<PlatformFrame>>>,
    _root: TempDir,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::with(FixtureOptions::default())
    }

    pub(crate) fn without_voice() -> Self {
        Self::with(FixtureOptions {
            voice: false,
            ..FixtureOptions::default()
        })
    }

    pub(crate) fn with(options: FixtureOptions) -> Self {
        let root = tempfile::tempdir().expect("temporary directory");
        let paths = AppPaths::from_base(root.path().join("install"), root.path().join("user"));
        let journal = Journal::default();
        let failures = Failures::default();
        let frames = Rc::new(RefCell::new(VecDeque::new()));
        let set = build_services(&options, &journal, &failures, &frames);

        let launch = LaunchOptions {
            preset_terrain: options.preset_terrain,
            ..LaunchOptions::default()
        };
        let ctx = AppContext::new(paths, Settings::default(), launch, ProcessServices::from(set));

        Self {
            ctx,
            journal,
            failures,
            frames,
            _root: root,
        }
    }

    pub(crate) fn push_frame(&self, frame: PlatformFrame) {
        self.frames.borrow_mut().push_back(frame);
    }

    /// Control loop driven by scripted menu exits and session plans.
    pub(crate) fn control(
        &self,
        menu: Vec<Result<ModeExit, Fault>>,
        sessions: Vec<SessionPlan>,
    ) -> MainControlLoop {
        MainControlLoop::new(
            Box::new(ScriptedMenu::new(&self.journal, menu)),
            Box::new(ScriptedSessions::new(&self.journal, sessions)),
        )
    }
}
