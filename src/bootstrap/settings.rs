//=========================================================================
// Settings
//=========================================================================
//
// User configuration persisted as TOML in `<user>/config/rigshell.toml`.
//
// Every section defaults independently, so a partial file loads and a
// missing file means "all defaults". Written back once at shutdown.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::error::ConfigError;

//=== Sections ============================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    /// Open the terrain selector directly instead of the main menu.
    pub skip_main_menu: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "Rigshell".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSection {
    /// Gameplay loop ticks per second.
    pub tps: f64,

    /// Menu loop frames per second.
    pub menu_fps: f64,
}

impl Default for SimSection {
    fn default() -> Self {
        Self {
            tps: 60.0,
            menu_fps: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoSection {
    pub ffb_enabled: bool,
}

impl Default for IoSection {
    fn default() -> Self {
        Self { ffb_enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSection {
    pub menu_music: bool,
    pub menu_track: String,
}

impl Default for AudioSection {
    fn default() -> Self {
        Self {
            menu_music: true,
            menu_track: "menu.ogg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplayerSection {
    pub join_on_startup: bool,
    pub server_host: String,
    pub server_port: u16,
    pub player_name: String,
    pub connect_timeout_ms: u64,
}

impl Default for MultiplayerSection {
    fn default() -> Self {
        Self {
            join_on_startup: false,
            server_host: "127.0.0.1".to_string(),
            server_port: 12000,
            player_name: "Player".to_string(),
            connect_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `log::LevelFilter` name: off, error, warn, info, debug, trace.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

//=== Settings ============================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: AppSection,
    pub window: WindowSection,
    pub sim: SimSection,
    pub io: IoSection,
    pub audio: AudioSection,
    pub mp: MultiplayerSection,
    pub log: LogSection,
}

impl Settings {
    /// Loads settings, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No configuration at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Configuration loaded from {}", path.display());
        Ok(settings)
    }

    /// Writes the settings, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
