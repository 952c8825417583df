//=========================================================================
// Bootstrap Sequencer
//=========================================================================
//
// Everything that happens before the first heavy subsystem exists.
//
// Steps (each may be fatal):
// ```text
//   1. base paths      install dir, user dir (distinct failures)
//   2. logging         logs dir, process log file
//   3. app paths       resources dir check, configuration load
//   4. cache dir       cache and mods directories
//   5. overrides       command-line flags onto settings
//   6. pseudo-states   help / version → exit before subsystems
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub mod cli;
pub mod logging;
pub mod paths;
pub mod settings;

//=== Public API ==========================================================

pub use cli::{Cli, LaunchOptions};
pub use paths::{AppPaths, BaseDirs, SystemDirs};
pub use settings::Settings;

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use log::{info, LevelFilter};

//=== Internal Dependencies ===============================================

use crate::error::BootstrapError;

//=== Boot ================================================================

/// Result of a successful bootstrap: the inputs for subsystem creation.
#[derive(Debug, Clone)]
pub struct Boot {
    pub paths: AppPaths,
    pub settings: Settings,
    pub launch: LaunchOptions,
}

/// What the process should do once bootstrap finished.
#[derive(Debug, Clone)]
pub enum BootOutcome {
    Ready(Boot),
    PrintHelp,
    PrintVersion,
}

//=== BootstrapSequencer ==================================================

pub struct BootstrapSequencer<'a> {
    dirs: &'a dyn BaseDirs,
}

impl<'a> BootstrapSequencer<'a> {
    pub fn new(dirs: &'a dyn BaseDirs) -> Self {
        Self { dirs }
    }

    pub fn run(&self, cli: &Cli) -> Result<BootOutcome, BootstrapError> {
        //--- 1. Base paths ------------------------------------------------
        let install_dir = self.dirs.install_dir()?;
        let user_dir = self.dirs.user_dir()?;
        let paths = AppPaths::from_base(install_dir, user_dir);

        //--- 2. Logging ---------------------------------------------------
        ensure_dir(&paths.logs_dir)?;
        let forced_level = logging::env_level().or_else(|| {
            cli.log_level
                .as_deref()
                .map(logging::parse_level)
        });
        logging::init(&paths.log_file, forced_level.unwrap_or(LevelFilter::Info))?;
        info!("{} starting", Cli::version_text());
        info!("Install directory: {}", paths.install_dir.display());
        info!("User directory: {}", paths.user_dir.display());

        //--- 3. Application paths and configuration -----------------------
        if !paths.resources_dir.is_dir() {
            return Err(BootstrapError::ResourcesMissing(paths.resources_dir));
        }
        ensure_dir(&paths.config_dir)?;
        let settings = Settings::load(&paths.config_file)?;

        //--- 4. Cache directory -------------------------------------------
        ensure_dir(&paths.cache_dir)?;
        ensure_dir(&paths.mods_dir)?;

        //--- 5. Command-line overrides ------------------------------------
        let launch = cli.launch_options();
        if forced_level.is_none() {
            log::set_max_level(logging::parse_level(&settings.log.level));
        }

        //--- 6. Pseudo-states ---------------------------------------------
        if cli.help {
            return Ok(BootOutcome::PrintHelp);
        }
        if cli.version {
            return Ok(BootOutcome::PrintVersion);
        }

        Ok(BootOutcome::Ready(Boot {
            paths,
            settings,
            launch,
        }))
    }
}

fn ensure_dir(path: &Path) -> Result<(), BootstrapError> {
    fs::create_dir_all(path).map_err(|source| BootstrapError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    struct FixedDirs {
        install: Result<PathBuf, ()>,
        user: Result<PathBuf, ()>,
    }

    impl BaseDirs for FixedDirs {
        fn install_dir(&self) -> Result<PathBuf, BootstrapError> {
            self.install.clone().map_err(|_| BootstrapError::InstallDir)
        }

        fn user_dir(&self) -> Result<PathBuf, BootstrapError> {
            self.user.clone().map_err(|_| BootstrapError::UserDir)
        }
    }

    fn installed() -> (TempDir, FixedDirs) {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("install").join("resources")).unwrap();
        let dirs = FixedDirs {
            install: Ok(root.path().join("install")),
            user: Ok(root.path().join("user")),
        };
        (root, dirs)
    }

    fn ready(outcome: BootOutcome) -> Boot {
        match outcome {
            BootOutcome::Ready(boot) => boot,
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn install_dir_failure_is_reported() {
        let dirs = FixedDirs {
            install: Err(()),
            user: Ok(PathBuf::from("/unused")),
        };
        let error = BootstrapSequencer::new(&dirs).run(&Cli::default()).unwrap_err();
        assert!(matches!(error, BootstrapError::InstallDir));
    }

    #[test]
    fn user_dir_failure_is_reported() {
        let dirs = FixedDirs {
            install: Ok(PathBuf::from("/unused")),
            user: Err(()),
        };
        let error = BootstrapSequencer::new(&dirs).run(&Cli::default()).unwrap_err();
        assert!(matches!(error, BootstrapError::UserDir));
    }

    #[test]
    fn missing_resources_folder_is_fatal() {
        let root = tempdir().unwrap();
        let dirs = FixedDirs {
            install: Ok(root.path().join("install")),
            user: Ok(root.path().join("user")),
        };

        let error = BootstrapSequencer::new(&dirs).run(&Cli::default()).unwrap_err();

        assert!(matches!(error, BootstrapError::ResourcesMissing(_)));
        assert!(root.path().join("user/logs/rigshell.log").exists());
    }

    #[test]
    fn creates_user_layout() {
        let (root, dirs) = installed();

        let boot = ready(BootstrapSequencer::new(&dirs).run(&Cli::default()).unwrap());

        assert!(boot.paths.log_file.exists());
        assert!(boot.paths.cache_dir.is_dir());
        assert!(boot.paths.mods_dir.is_dir());
        assert!(boot.paths.config_dir.is_dir());
        assert_eq!(boot.paths.user_dir, root.path().join("user"));
    }

    #[test]
    fn loads_configuration_then_applies_overrides() {
        let (root, dirs) = installed();
        let config = root.path().join("user/config/rigshell.toml");
        fs::create_dir_all(config.parent().unwrap()).unwrap();
        fs::write(&config, "[mp]\nserver_port = 4000\n").unwrap();
        let cli = Cli {
            mp_host: Some("sim.example".into()),
            preset_terrain: Some("hills".into()),
            ..Cli::default()
        };

        let boot = ready(BootstrapSequencer::new(&dirs).run(&cli).unwrap());

        let effective = boot.launch.effective(&boot.settings);
        assert_eq!(effective.mp.server_port, 4000);
        assert_eq!(effective.mp.server_host, "sim.example");
        assert_eq!(boot.settings.mp.server_host, "127.0.0.1");
        assert_eq!(boot.launch.preset_terrain.as_deref(), Some("hills"));
    }

    #[test]
    fn help_and_version_are_pseudo_states() {
        let (_root, dirs) = installed();
        let sequencer = BootstrapSequencer::new(&dirs);

        let help = Cli {
            help: true,
            ..Cli::default()
        };
        let version = Cli {
            version: true,
            ..Cli::default()
        };

        assert!(matches!(sequencer.run(&help).unwrap(), BootOutcome::PrintHelp));
        assert!(matches!(
            sequencer.run(&version).unwrap(),
            BootOutcome::PrintVersion
        ));
    }
}
