//=========================================================================
// Command Line
//=========================================================================
//
// Launch flags. Built-in help and version handling is disabled so both
// run as bootstrap pseudo-states after logging and configuration exist.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use log::info;

//=== Internal Dependencies ===============================================

use super::Settings;

//=== Cli =================================================================

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(
    name = "rigshell",
    about = "Interactive real-time vehicle simulator",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print help and exit
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Print version and exit
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    /// Load this terrain immediately, skipping menu and selector
    #[arg(long = "map", value_name = "TERRAIN")]
    pub preset_terrain: Option<String>,

    /// Rebuild the content cache, then exit
    #[arg(long)]
    pub regen_cache_only: bool,

    /// Open the terrain selector instead of the main menu
    #[arg(long)]
    pub skip_main_menu: bool,

    /// Join the configured multiplayer server on startup
    #[arg(long = "join-mp")]
    pub join_multiplayer: bool,

    /// Multiplayer server host
    #[arg(long, value_name = "HOST")]
    pub mp_host: Option<String>,

    /// Multiplayer server port
    #[arg(long, value_name = "PORT")]
    pub mp_port: Option<u16>,

    /// Run without opening a window
    #[arg(long)]
    pub headless: bool,

    /// Override the installation directory
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Override the per-user data directory
    #[arg(long, value_name = "DIR")]
    pub user_dir: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

//=== LaunchOptions =======================================================

/// Per-launch state that is never written back to the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Non-empty forces immediate Simulation and suppresses the selector.
    pub preset_terrain: Option<String>,
    pub regen_cache_only: bool,
    pub headless: bool,

    //--- One-shot overrides of persisted settings -------------------------
    pub skip_main_menu: bool,
    pub join_multiplayer: bool,
    pub mp_host: Option<String>,
    pub mp_port: Option<u16>,
}

impl LaunchOptions {
    /// `settings` with this launch's overrides layered on top.
    pub fn effective(&self, settings: &Settings) -> Settings {
        let mut effective = settings.clone();
        effective.app.skip_main_menu |= self.skip_main_menu;
        effective.mp.join_on_startup |= self.join_multiplayer;
        if let Some(host) = &self.mp_host {
            effective.mp.server_host = host.clone();
        }
        if let Some(port) = self.mp_port {
            effective.mp.server_port = port;
        }
        effective
    }
}

impl Cli {
    /// Launch-only state. Nothing here reaches the settings file.
    pub fn launch_options(&self) -> LaunchOptions {
        let launch = LaunchOptions {
            preset_terrain: self
                .preset_terrain
                .clone()
                .filter(|terrain| !terrain.trim().is_empty()),
            regen_cache_only: self.regen_cache_only,
            headless: self.headless,
            skip_main_menu: self.skip_main_menu,
            join_multiplayer: self.join_multiplayer,
            mp_host: self.mp_host.clone(),
            mp_port: self.mp_port,
        };
        if let Some(terrain) = &launch.preset_terrain {
            info!("Preset terrain: {terrain}");
        }
        launch
    }

    pub fn help_text() -> String {
        Self::command().render_help().to_string()
    }

    pub fn version_text() -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
