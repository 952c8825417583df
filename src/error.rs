//=========================================================================
// Errors
//=========================================================================
//
// Error types per layer.
//
// ```text
//   BootstrapError  ── fatal before any subsystem exists (exit code 1)
//   SubsystemError  ── raised by a lifecycle call or a collaborator
//   SetupError      ── Simulation setup; the only recovered failure
//   Fault           ── anything that reaches the process boundary
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::path::PathBuf;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::subsystem::SubsystemId;
use crate::platform::PlatformError;

//=== ConfigError =========================================================

/// Failures while reading or writing the user configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

//=== BootstrapError ======================================================

/// Fatal startup failures. Each variant renders a distinct message.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Error while retrieving program directory path")]
    InstallDir,

    #[error("Error while retrieving user directory path")]
    UserDir,

    #[error("Resources folder not found. Check if correctly installed.")]
    ResourcesMissing(PathBuf),

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),
}

//=== SubsystemError ======================================================

/// Failure raised by a subsystem lifecycle call or collaborator operation.
#[derive(Debug, Error)]
pub enum SubsystemError {
    #[error("{id} created before its dependency {missing}")]
    OutOfOrder { id: SubsystemId, missing: SubsystemId },

    #[error("{0} used before it was created")]
    NotCreated(SubsystemId),

    #[error("content references managed materials that are not initialized")]
    UnresolvedMaterials,

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode cache index: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("failed to decode cache index {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("network: {0}")]
    Network(String),
}

impl SubsystemError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//=== SetupError ==========================================================

/// Why a simulation session could not be set up.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no terrain selected")]
    NoTerrain,

    #[error("terrain '{0}' is not in the content cache")]
    UnknownTerrain(String),

    #[error(transparent)]
    Subsystem(#[from] SubsystemError),
}

//=== Fault ===============================================================

/// A failure that escapes a mode and ends the process.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("{id}: {source}")]
    Subsystem {
        id: SubsystemId,
        #[source]
        source: SubsystemError,
    },

    #[error("{0}")]
    Runtime(String),
}

impl Fault {
    pub fn subsystem(id: SubsystemId, source: SubsystemError) -> Self {
        Self::Subsystem { id, source }
    }

    /// Title of the fatal error dialog.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Subsystem { .. } => "An exception has occurred!",
            Self::Runtime(_) => "An exception (runtime error) has occurred!",
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
