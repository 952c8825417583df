//=========================================================================
// Filesystem Paths
//=========================================================================
//
// Base directory discovery and the application path layout.
//
// Layout:
// ```text
//   <install>/resources/            shipped content (must exist)
//   <user>/logs/rigshell.log        process log
//   <user>/config/rigshell.toml     persisted settings
//   <user>/cache/                   content cache index
//   <user>/mods/                    user content
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

//=== Internal Dependencies ===============================================

use crate::error::BootstrapError;

//=== BaseDirs ============================================================

/// Source of the two base directories everything else derives from.
pub trait BaseDirs {
    fn install_dir(&self) -> Result<PathBuf, BootstrapError>;

    fn user_dir(&self) -> Result<PathBuf, BootstrapError>;
}

//=== SystemDirs ==========================================================

/// Base directories from the running system, with optional overrides.
#[derive(Debug, Clone, Default)]
pub struct SystemDirs {
    install_override: Option<PathBuf>,
    user_override: Option<PathBuf>,
}

impl SystemDirs {
    /// Env var consulted when no `--user-dir` is given.
    pub const USER_DIR_ENV: &'static str = "RIGSHELL_USER_DIR";

    pub fn new(install_override: Option<PathBuf>, user_override: Option<PathBuf>) -> Self {
        Self {
            install_override,
            user_override,
        }
    }
}

impl BaseDirs for SystemDirs {
    fn install_dir(&self) -> Result<PathBuf, BootstrapError> {
        if let Some(dir) = &self.install_override {
            return Ok(dir.clone());
        }
        let exe = env::current_exe().map_err(|_| BootstrapError::InstallDir)?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or(BootstrapError::InstallDir)
    }

    fn user_dir(&self) -> Result<PathBuf, BootstrapError> {
        if let Some(dir) = &self.user_override {
            return Ok(dir.clone());
        }
        if let Some(dir) = env::var_os(Self::USER_DIR_ENV).filter(|value| !value.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        ProjectDirs::from("org", "Rigshell", "rigshell")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(BootstrapError::UserDir)
    }
}

//=== AppPaths ============================================================

/// Every path the process touches, resolved once during bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub install_dir: PathBuf,
    pub user_dir: PathBuf,
    pub resources_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub log_file: PathBuf,
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub cache_dir: PathBuf,
    pub mods_dir: PathBuf,
}

impl AppPaths {
    /// Derives the layout from the base directories. Touches nothing on disk.
    pub fn from_base(install_dir: PathBuf, user_dir: PathBuf) -> Self {
        let logs_dir = user_dir.join("logs");
        let config_dir = user_dir.join("config");
        Self {
            resources_dir: install_dir.join("resources"),
            log_file: logs_dir.join("rigshell.log"),
            config_file: config_dir.join("rigshell.toml"),
            cache_dir: user_dir.join("cache"),
            mods_dir: user_dir.join("mods"),
            logs_dir,
            config_dir,
            install_dir,
            user_dir,
        }
    }

    /// Directories scanned by the content cache, shipped content first.
    pub fn content_roots(&self) -> Vec<PathBuf> {
        vec![self.resources_dir.join("content"), self.mods_dir.clone()]
    }

    pub fn resource_pack_dir(&self, name: &str) -> PathBuf {
        self.resources_dir.join(name)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
