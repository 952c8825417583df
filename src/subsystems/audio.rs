//=========================================================================
// Audio Manager
//=========================================================================
//
// Menu music state. Playback itself belongs to the mixer; this tracks
// which track is meant to be playing and whether it can be found.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::subsystem::{AudioManager, LifecycleEnv, Subsystem, SubsystemId};
use crate::error::SubsystemError;

//=== MenuAudio ===========================================================

#[derive(Debug, Default)]
pub struct MenuAudio {
    track: Option<PathBuf>,
    playing: bool,
}

impl MenuAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn track(&self) -> Option<&PathBuf> {
        self.track.as_ref()
    }
}

impl Subsystem for MenuAudio {
    fn id(&self) -> SubsystemId {
        SubsystemId::Audio
    }

    fn startup(&mut self, env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        let track = env
            .paths
            .resources_dir
            .join("sounds")
            .join(&env.settings.audio.menu_track);
        if track.is_file() {
            self.track = Some(track);
        } else {
            warn!(target: "audio", "Menu track {} not found, music disabled", track.display());
        }
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), SubsystemError> {
        self.stop_menu_music();
        self.track = None;
        Ok(())
    }
}

impl AudioManager for MenuAudio {
    fn play_menu_music(&mut self) {
        if self.playing {
            return;
        }
        if let Some(track) = &self.track {
            debug!(target: "audio", "Playing {}", track.display());
            self.playing = true;
        }
    }

    fn stop_menu_music(&mut self) {
        if self.playing {
            debug!(target: "audio", "Menu music stopped");
            self.playing = false;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
