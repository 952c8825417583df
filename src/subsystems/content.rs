//=========================================================================
// Content Manager
//=========================================================================
//
// Resource packs from the installation plus user content roots.
//
// ```text
//   resources/core/               required
//   resources/core/materials/     managed base materials (*.material)
//   resources/wallpapers/         optional menu backdrops
//   resources/content/, mods/     content roots, scanned by the cache
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::bootstrap::AppPaths;
use crate::core::subsystem::{ContentManager, LifecycleEnv, ResourcePack, Subsystem, SubsystemId};
use crate::error::SubsystemError;

//=== PackContentManager ==================================================

#[derive(Debug, Default)]
pub struct PackContentManager {
    paths: Option<AppPaths>,
    packs: Vec<ResourcePack>,
    content_roots: Vec<PathBuf>,
    materials: Option<Vec<String>>,
}

impl PackContentManager {
    const MATERIAL_EXTENSION: &'static str = "material";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn packs(&self) -> &[ResourcePack] {
        &self.packs
    }

    pub fn content_roots(&self) -> &[PathBuf] {
        &self.content_roots
    }

    /// Managed material names, once initialized.
    pub fn materials(&self) -> Option<&[String]> {
        self.materials.as_deref()
    }

    fn pack_dir(&self, pack: ResourcePack) -> Result<PathBuf, SubsystemError> {
        self.paths
            .as_ref()
            .map(|paths| paths.resource_pack_dir(pack.dir_name()))
            .ok_or(SubsystemError::NotCreated(SubsystemId::Content))
    }
}

impl Subsystem for PackContentManager {
    fn id(&self) -> SubsystemId {
        SubsystemId::Content
    }

    fn create(&mut self, env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.paths = Some(env.paths.clone());
        Ok(())
    }

    fn startup(&mut self, env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.content_roots = env
            .paths
            .content_roots()
            .into_iter()
            .filter(|root| {
                let present = root.is_dir();
                if !present {
                    debug!(target: "content", "Skipping missing content root {}", root.display());
                }
                present
            })
            .collect();
        info!(target: "content", "{} content root(s) registered", self.content_roots.len());
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), SubsystemError> {
        self.packs.clear();
        self.content_roots.clear();
        self.materials = None;
        self.paths = None;
        Ok(())
    }
}

impl ContentManager for PackContentManager {
    fn add_resource_pack(&mut self, pack: ResourcePack) -> Result<(), SubsystemError> {
        let dir = self.pack_dir(pack)?;
        if !dir.is_dir() {
            if pack == ResourcePack::Core {
                return Err(SubsystemError::io(
                    dir,
                    io::Error::new(io::ErrorKind::NotFound, "core resource pack missing"),
                ));
            }
            warn!(target: "content", "Resource pack '{}' not found, skipping", pack.dir_name());
            return Ok(());
        }
        if !self.packs.contains(&pack) {
            debug!(target: "content", "Registered resource pack '{}'", pack.dir_name());
            self.packs.push(pack);
        }
        Ok(())
    }

    fn init_managed_materials(&mut self) -> Result<(), SubsystemError> {
        let dir = self.pack_dir(ResourcePack::Core)?.join("materials");

        let mut names = Vec::new();
        if dir.is_dir() {
            let entries = fs::read_dir(&dir).map_err(|e| SubsystemError::io(&dir, e))?;
            for entry in entries {
                let path = entry.map_err(|e| SubsystemError::io(&dir, e))?.path();
                if path.extension().and_then(|ext| ext.to_str()) == Some(Self::MATERIAL_EXTENSION) {
                    if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                        names.push(stem.to_string());
                    }
                }
            }
            names.sort();
        }

        info!(target: "content", "{} managed material(s) initialized", names.len());
        self.materials = Some(names);
        Ok(())
    }

    fn managed_materials_ready(&self) -> bool {
        self.materials.is_some()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
