//=========================================================================
// Rigshell Library Root
//
// Application lifecycle shell for a real-time vehicle simulator: boots
// the process, brings up the subsystems in dependency order, runs the
// operating-mode control loop and shuts everything down again.
//
// Typical usage:
// ```no_run
// use clap::Parser;
// use rigshell::prelude::*;
//
// let cli = Cli::parse();
// let dirs = SystemDirs::new(cli.install_dir.clone(), cli.user_dir.clone());
// let mut reporter = DialogReporter::new();
// let exit = Launcher::new(&dirs, &mut reporter)
//     .with_interrupt_handler()
//     .run(&cli, &mut std::io::stdout(), standard_parts);
// std::process::exit(i32::from(exit.code()));
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the state mailboxes, subsystem contracts and the control
// loop. `loops` and `subsystems` are the stock collaborators wired into
// the shipped binary; embedders may supply their own instead. `platform`
// wraps winit and is normally reached through `Renderer`.
//
pub mod app;
pub mod bootstrap;
pub mod core;
pub mod error;
pub mod input;
pub mod loops;
pub mod platform;
pub mod prelude;
pub mod report;
pub mod subsystems;

//--- Public Exports ------------------------------------------------------

pub use app::{App, AppParts, Exit, Launcher};
pub use subsystems::standard_parts;
