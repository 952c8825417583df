//=========================================================================
// Application
//=========================================================================
//
// Process boundary: bootstrap, bring-up, the control loop, shutdown, and
// conversion of faults into a dialog plus an exit code.
//
// ```text
//   Launcher::run(cli)
//     ├─ BootstrapSequencer ──Err──► dialog, exit 1
//     │                     ──help/version──► print, exit 0
//     └─ wire(boot) ─► App::run
//                        bring_up → prime → loop → shut_down
//                        Err(Fault) / panic ──► tear down, dialog, exit 0
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use crate::bootstrap::{Boot, BootOutcome, BaseDirs, BootstrapSequencer, Cli};
use crate::core::{
    shut_down, AppContext, MainControlLoop, MenuLoop, ProcessServices, ServiceSet,
    SessionFactory, ShutdownReport,
};
use crate::core::state::OperatingMode;
use crate::error::Fault;
use crate::report::ErrorReporter;

//=== AppParts ============================================================

/// Collaborators wired for one run.
pub struct AppParts {
    pub services: ServiceSet,
    pub menu: Box<dyn MenuLoop>,
    pub sessions: Box<dyn SessionFactory>,
}

//=== App =================================================================

pub struct App {
    ctx: AppContext,
    control: MainControlLoop,
}

impl App {
    pub fn new(boot: Boot, parts: AppParts) -> Self {
        let ctx = AppContext::new(
            boot.paths,
            boot.settings,
            boot.launch,
            ProcessServices::from(parts.services),
        );
        Self {
            ctx,
            control: MainControlLoop::new(parts.menu, parts.sessions),
        }
    }

    /// Routes Ctrl-C to a ShuttingDown request.
    ///
    /// Only one handler can exist per process; later installs are skipped.
    pub fn install_interrupt_handler(&self) {
        let operating = self.ctx.state.operating.handle();
        let installed = ctrlc::set_handler(move || {
            info!("Interrupt received, requesting shutdown");
            operating.set_pending(OperatingMode::ShuttingDown);
        });
        if let Err(e) = installed {
            debug!("Interrupt handler not installed: {e}");
        }
    }

    /// Runs until ShuttingDown, then shuts down.
    ///
    /// On a fault or a panic subsystems are still torn down, but settings
    /// are left untouched on disk.
    pub fn run(mut self) -> Result<ShutdownReport, Fault> {
        let driven = panic::catch_unwind(AssertUnwindSafe(|| self.drive()))
            .unwrap_or_else(|payload| Err(Fault::Runtime(panic_message(payload.as_ref()))));
        match driven {
            Ok(()) => {
                let transition = self.ctx.state.operating.apply_pending();
                info!("Operating mode {} -> {}", transition.from, transition.to);
                Ok(shut_down(&mut self.ctx))
            }
            Err(fault) => {
                error!("{fault}");
                let failures = self.ctx.services.tear_down();
                if !failures.is_empty() {
                    error!("{} subsystem(s) failed to tear down", failures.len());
                }
                self.ctx.clear_session();
                Err(fault)
            }
        }
    }

    fn drive(&mut self) -> Result<(), Fault> {
        self.ctx.bring_up()?;
        self.control.prime(&mut self.ctx)?;
        self.control.run(&mut self.ctx)
    }
}

//=== Exit ================================================================

/// How the process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Clean,

    /// Help or version was printed.
    Diagnostic,

    /// A runtime fault was reported to the user.
    Fault,

    /// Bootstrap failed before any subsystem existed.
    StartupError,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Self::StartupError => 1,
            Self::Clean | Self::Diagnostic | Self::Fault => 0,
        }
    }
}

//=== Launcher ============================================================

pub struct Launcher<'a> {
    dirs: &'a dyn BaseDirs,
    reporter: &'a mut dyn ErrorReporter,
    interrupts: bool,
}

impl<'a> Launcher<'a> {
    pub fn new(dirs: &'a dyn BaseDirs, reporter: &'a mut dyn ErrorReporter) -> Self {
        Self {
            dirs,
            reporter,
            interrupts: false,
        }
    }

    pub fn with_interrupt_handler(mut self) -> Self {
        self.interrupts = true;
        self
    }

    /// Bootstraps, wires the collaborators with `wire` and runs.
    ///
    /// `wire` is only called once bootstrap succeeded and no pseudo-state
    /// was requested.
    pub fn run<W>(self, cli: &Cli, out: &mut dyn Write, wire: W) -> Exit
    where
        W: FnOnce(&Boot) -> AppParts,
    {
        let boot = match BootstrapSequencer::new(self.dirs).run(cli) {
            Ok(BootOutcome::Ready(boot)) => boot,
            Ok(BootOutcome::PrintHelp) => {
                print_diagnostic(out, &Cli::help_text());
                return Exit::Diagnostic;
            }
            Ok(BootOutcome::PrintVersion) => {
                print_diagnostic(out, &Cli::version_text());
                return Exit::Diagnostic;
            }
            Err(e) => {
                error!("Startup failed: {e}");
                self.reporter.show_error("Startup error", &e.to_string());
                return Exit::StartupError;
            }
        };

        let interrupts = self.interrupts;
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            let app = App::new(boot.clone(), wire(&boot));
            if interrupts {
                app.install_interrupt_handler();
            }
            app.run()
        }));

        let fault = match outcome {
            Ok(Ok(report)) => {
                if !report.is_clean() {
                    info!("Shutdown completed with errors: {report:?}");
                }
                return Exit::Clean;
            }
            Ok(Err(fault)) => fault,
            Err(payload) => Fault::Runtime(panic_message(payload.as_ref())),
        };
        self.reporter.show_error(fault.title(), &fault.to_string());
        Exit::Fault
    }
}

fn print_diagnostic(out: &mut dyn Write, text: &str) {
    if let Err(e) = writeln!(out, "{}", text.trim_end()) {
        error!("Could not print to stdout: {e}");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
