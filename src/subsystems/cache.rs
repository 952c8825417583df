//=========================================================================
// Content Cache
//=========================================================================
//
// Index of every terrain, vehicle and load found under the content
// roots, persisted as `<user>/cache/index.toml`.
//
// Startup loads the index (regenerating it if it is missing or does not
// decode). It refuses to run before the managed base materials exist,
// since indexed content references them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

//=== Internal Dependencies ===============================================

use crate::bootstrap::AppPaths;
use crate::core::subsystem::{CacheIndex, LifecycleEnv, Subsystem, SubsystemId};
use crate::error::SubsystemError;

//=== EntryKind ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Terrain,
    Vehicle,
    Load,
}

impl EntryKind {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "terrn2" => Some(Self::Terrain),
            "truck" | "car" | "boat" | "airplane" | "train" => Some(Self::Vehicle),
            "load" => Some(Self::Load),
            _ => None,
        }
    }
}

//=== CacheEntry ==========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub name: String,
    pub kind: EntryKind,
    pub path: PathBuf,
}

/// On-disk layout of the index file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    #[serde(default)]
    entries: Vec<CacheEntry>,
}

//=== FileCacheIndex ======================================================

#[derive(Debug, Default)]
pub struct FileCacheIndex {
    index_path: Option<PathBuf>,
    entries: Vec<CacheEntry>,
}

impl FileCacheIndex {
    const VERSION: u32 = 1;
    const FILE_NAME: &'static str = "index.toml";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    fn scan(roots: &[PathBuf]) -> Vec<CacheEntry> {
        let mut entries = Vec::new();
        for root in roots.iter().filter(|root| root.is_dir()) {
            for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                let kind = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(EntryKind::from_extension);
                let name = path.file_stem().and_then(|stem| stem.to_str());
                if let (Some(kind), Some(name)) = (kind, name) {
                    entries.push(CacheEntry {
                        name: name.to_string(),
                        kind,
                        path: path.to_path_buf(),
                    });
                }
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        entries
    }

    fn load(path: &Path) -> Result<Vec<CacheEntry>, SubsystemError> {
        let text = fs::read_to_string(path).map_err(|e| SubsystemError::io(path, e))?;
        let file: IndexFile = toml::from_str(&text).map_err(|source| SubsystemError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        if file.version != Self::VERSION {
            return Err(SubsystemError::Decode {
                path: path.to_path_buf(),
                source: serde::de::Error::custom(format!(
                    "index version {} is not {}",
                    file.version,
                    Self::VERSION
                )),
            });
        }
        Ok(file.entries)
    }

    fn store(path: &Path, entries: &[CacheEntry]) -> Result<(), SubsystemError> {
        let file = IndexFile {
            version: Self::VERSION,
            entries: entries.to_vec(),
        };
        let text = toml::to_string_pretty(&file)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SubsystemError::io(parent, e))?;
        }
        fs::write(path, text).map_err(|e| SubsystemError::io(path, e))
    }
}

impl Subsystem for FileCacheIndex {
    fn id(&self) -> SubsystemId {
        SubsystemId::Cache
    }

    fn create(&mut self, env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        self.index_path = Some(env.paths.cache_dir.join(Self::FILE_NAME));
        Ok(())
    }

    fn startup(&mut self, env: &LifecycleEnv<'_>) -> Result<(), SubsystemError> {
        if !env.managed_materials_ready {
            return Err(SubsystemError::UnresolvedMaterials);
        }
        let path = self
            .index_path
            .clone()
            .ok_or(SubsystemError::NotCreated(SubsystemId::Cache))?;

        if path.is_file() {
            match Self::load(&path) {
                Ok(entries) => {
                    info!(target: "cache", "Loaded {} cache entries", entries.len());
                    self.entries = entries;
                    return Ok(());
                }
                Err(e) => warn!(target: "cache", "Cache index unusable: {e}"),
            }
        }
        if env.cache_regen_pending {
            debug!(target: "cache", "Index rebuild left to the pending regeneration");
            return Ok(());
        }
        self.regenerate(env.paths).map(|_| ())
    }

    fn teardown(&mut self) -> Result<(), SubsystemError> {
        self.entries.clear();
        Ok(())
    }
}

impl CacheIndex for FileCacheIndex {
    fn regenerate(&mut self, paths: &AppPaths) -> Result<usize, SubsystemError> {
        let roots = paths.content_roots();
        debug!(target: "cache", "Scanning {roots:?}");
        let entries = Self::scan(&roots);

        let path = self
            .index_path
            .get_or_insert_with(|| paths.cache_dir.join(Self::FILE_NAME))
            .clone();
        Self::store(&path, &entries)?;

        info!(target: "cache", "Indexed {} entries into {}", entries.len(), path.display());
        self.entries = entries;
        Ok(self.entries.len())
    }

    fn terrains(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Terrain)
            .map(|entry| entry.name.clone())
            .collect()
    }

    fn contains_terrain(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.kind == EntryKind::Terrain && entry.name == name)
    }

    fn index_path(&self) -> Option<PathBuf> {
        self.index_path.clone()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::Settings;
    use tempfile::{tempdir, TempDir};

    struct Layout {
        _root: TempDir,
        paths: AppPaths,
        settings: Settings,
    }

    impl Layout {
        fn new() -> Self {
            let root = tempdir().unwrap();
            let paths = AppPaths::from_base(root.path().join("install"), root.path().join("user"));
            let shipped = paths.resources_dir.join("content");
            fs::create_dir_all(shipped.join("terrains")).unwrap();
            fs::create_dir_all(&paths.mods_dir).unwrap();
            fs::write(shipped.join("terrains").join("hills.terrn2"), "").unwrap();
            fs::write(shipped.join("dumper.truck"), "").unwrap();
            fs::write(paths.mods_dir.join("dunes.TERRN2"), "").unwrap();
            fs::write(paths.mods_dir.join("readme.txt"), "").unwrap();
            Self {
                _root: root,
                paths,
                settings: Settings::default(),
            }
        }

        fn env(&self, materials: bool) -> LifecycleEnv<'_> {
            LifecycleEnv {
                paths: &self.paths,
                settings: &self.settings,
                window: None,
                managed_materials_ready: materials,
                cache_regen_pending: false,
            }
        }

        fn regen_env(&self) -> LifecycleEnv<'_> {
            LifecycleEnv {
                cache_regen_pending: true,
                ..self.env(true)
            }
        }
    }

    #[test]
    fn startup_refuses_without_managed_materials() {
        let layout = Layout::new();
        let mut cache = FileCacheIndex::new();
        cache.create(&layout.env(false)).unwrap();

        assert!(matches!(
            cache.startup(&layout.env(false)),
            Err(SubsystemError::UnresolvedMaterials)
        ));
    }

    #[test]
    fn regenerate_indexes_known_kinds() {
        let layout = Layout::new();
        let mut cache = FileCacheIndex::new();

        let count = cache.regenerate(&layout.paths).unwrap();

        assert_eq!(count, 3);
        assert_eq!(cache.terrains(), ["dunes", "hills"]);
        assert!(cache.contains_terrain("hills"));
        assert!(!cache.contains_terrain("dumper"));
        assert!(cache.index_path().unwrap().is_file());
    }

    #[test]
    fn startup_loads_existing_index() {
        let layout = Layout::new();
        FileCacheIndex::new().regenerate(&layout.paths).unwrap();
        fs::remove_file(layout.paths.mods_dir.join("dunes.TERRN2")).unwrap();

        let mut cache = FileCacheIndex::new();
        cache.create(&layout.env(true)).unwrap();
        cache.startup(&layout.env(true)).unwrap();

        assert!(cache.contains_terrain("dunes"));
    }

    #[test]
    fn corrupt_index_is_rebuilt() {
        let layout = Layout::new();
        fs::create_dir_all(&layout.paths.cache_dir).unwrap();
        fs::write(layout.paths.cache_dir.join("index.toml"), "version = \"x\"").unwrap();

        let mut cache = FileCacheIndex::new();
        cache.create(&layout.env(true)).unwrap();
        cache.startup(&layout.env(true)).unwrap();

        assert_eq!(cache.terrains().len(), 2);
    }

    #[test]
    fn pending_regeneration_scans_content_once() {
        let layout = Layout::new();
        let mut cache = FileCacheIndex::new();
        cache.create(&layout.regen_env()).unwrap();

        cache.startup(&layout.regen_env()).unwrap();

        let index = cache.index_path().unwrap();
        assert!(!index.exists());
        assert!(cache.terrains().is_empty());

        assert_eq!(cache.regenerate(&layout.paths).unwrap(), 3);
        assert!(index.is_file());
        assert_eq!(cache.terrains(), ["dunes", "hills"]);
    }

    #[test]
    fn teardown_forgets_entries() {
        let layout = Layout::new();
        let mut cache = FileCacheIndex::new();
        cache.regenerate(&layout.paths).unwrap();

        cache.teardown().unwrap();

        assert!(cache.entries().is_empty());
    }
}
