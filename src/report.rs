//=========================================================================
// Error Reporting
//=========================================================================
//
// The blocking, user-visible error dialog shown before the process exits.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io::{self, BufRead, IsTerminal, Write};

use log::error;

//=== ErrorReporter =======================================================

pub trait ErrorReporter {
    /// Shows a fatal error and returns once the user acknowledged it.
    fn show_error(&mut self, title: &str, message: &str);
}

//=== DialogReporter ======================================================

/// Terminal dialog: logs, prints a framed message on stderr and waits
/// for Enter when stdin is interactive.
#[derive(Debug, Default)]
pub struct DialogReporter {
    /// Never block, even on a terminal.
    pub non_blocking: bool,
}

impl DialogReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn waits_for_ack(&self, interactive: bool) -> bool {
        interactive && !self.non_blocking
    }
}

impl ErrorReporter for DialogReporter {
    fn show_error(&mut self, title: &str, message: &str) {
        error!("{title} {message}");

        let mut stderr = io::stderr().lock();
        // Nothing sensible left to do if stderr itself is gone.
        let _ = stderr.write_all(frame(title, message).as_bytes());
        let _ = stderr.flush();

        let stdin = io::stdin();
        if !self.waits_for_ack(stdin.is_terminal()) {
            return;
        }
        let _ = writeln!(stderr, "Press Enter to exit.");
        let mut line = String::new();
        let _ = stdin.lock().read_line(&mut line);
    }
}

fn frame(title: &str, message: &str) -> String {
    let width = message
        .lines()
        .chain(std::iter::once(title))
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        + 4;
    let rule = "=".repeat(width);

    let mut out = format!("\n{rule}\n  {title}\n{rule}\n");
    for line in message.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

//=========================================================================
// Unit Tests
//=========================================================================
