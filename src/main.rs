//=========================================================================
// Rigshell Binary
//=========================================================================

use std::io;
use std::process::ExitCode;

use clap::Parser;

use rigshell::bootstrap::{Cli, SystemDirs};
use rigshell::report::DialogReporter;
use rigshell::{standard_parts, Launcher};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let dirs = SystemDirs::new(cli.install_dir.clone(), cli.user_dir.clone());
    let mut reporter = DialogReporter {
        non_blocking: cli.headless,
    };

    let exit = Launcher::new(&dirs, &mut reporter)
        .with_interrupt_handler()
        .run(&cli, &mut io::stdout(), standard_parts);

    ExitCode::from(exit.code())
}
