//=========================================================================
// Logging
//=========================================================================
//
// Installs the `env_logger` backend behind the `log` facade.
//
// Records go to the process log file and to stderr. The backend itself
// accepts everything; verbosity is controlled with `log::set_max_level`
// so it can be tightened once the configuration file has been read.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use env_logger::{Builder, Target, WriteStyle};
use log::{debug, warn, LevelFilter};

//=== Internal Dependencies ===============================================

use crate::error::BootstrapError;

//=== Constants ===========================================================

/// Env var overriding every other level source.
pub const LOG_ENV: &str = "RIGSHELL_LOG";

//=== TeeWriter ===========================================================

/// Duplicates every write into the log file and stderr.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        let _ = io::stderr().write_all(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

//=== Level Resolution ====================================================

/// Parses a level name, warning and falling back to `info` on garbage.
pub fn parse_level(name: &str) -> LevelFilter {
    LevelFilter::from_str(name.trim()).unwrap_or_else(|_| {
        warn!("Unknown log level '{name}', using info");
        LevelFilter::Info
    })
}

/// Level from `RIGSHELL_LOG`, if set and valid.
pub fn env_level() -> Option<LevelFilter> {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
}

//=== Installation ========================================================

/// Opens `log_file` (truncating it) and installs the global logger.
///
/// A logger already installed in this process is kept; only the file
/// open can fail.
pub fn init(log_file: &Path, level: LevelFilter) -> Result<(), BootstrapError> {
    let file = File::create(log_file).map_err(|source| BootstrapError::LogFile {
        path: log_file.to_path_buf(),
        source,
    })?;

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Trace)
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        });

    if builder.try_init().is_err() {
        debug!("Logger already installed, keeping it");
    }
    log::set_max_level(level);
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================
