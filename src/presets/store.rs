//! JSON file storage for presets.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::{PresetError, Result};
use super::Preset;

/// Returns `~/.gympulse/presets.json`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(PresetError::HomeDirectoryNotFound)?;
    Ok(home.join(".gympulse").join("presets.json"))
}

/// Presets kept in memory and mirrored to a JSON file.
///
/// The list is always sorted by `updated_at`, newest first.
#[derive(Debug)]
pub struct PresetStore {
    path: PathBuf,
    presets: Vec<Preset>,
}

impl PresetStore {
    /// Opens the store at `path`.
    ///
    /// A missing file yields an empty store. An unreadable or corrupt file
    /// is logged and also yields an empty store, so the timer stays usable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let presets = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Vec<Preset>>(&bytes) {
                Ok(presets) => presets,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring corrupt presets file");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable presets file");
                Vec::new()
            }
        };

        let mut store = Self { path, presets };
        store.sort();
        debug!(count = store.presets.len(), "Presets loaded");
        store
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All presets, newest first.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Finds a preset by name, ignoring case and surrounding whitespace.
    pub fn find_by_name(&self, name: &str) -> Option<&Preset> {
        let wanted = name.trim().to_lowercase();
        self.presets
            .iter()
            .find(|p| p.name.to_lowercase() == wanted)
    }

    /// Looks a preset up by id or, failing that, by name.
    ///
    /// # Errors
    ///
    /// Returns `NameNotFound` when nothing matches.
    pub fn resolve(&self, key: &str) -> Result<&Preset> {
        if let Ok(id) = Uuid::parse_str(key.trim()) {
            if let Some(preset) = self.get(id) {
                return Ok(preset);
            }
        }
        self.find_by_name(key)
            .ok_or_else(|| PresetError::NameNotFound(key.trim().to_string()))
    }

    /// Inserts or replaces a preset (matched by id) and saves.
    ///
    /// The stored copy is normalized and stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn upsert(&mut self, preset: Preset, now: DateTime<Utc>) -> Result<Preset> {
        let mut normalized = preset.normalized();
        normalized.updated_at = now;

        match self.presets.iter_mut().find(|p| p.id == normalized.id) {
            Some(existing) => *existing = normalized.clone(),
            None => self.presets.push(normalized.clone()),
        }
        self.sort();
        self.save()?;
        Ok(normalized)
    }

    /// Renames a preset and saves.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or an I/O error on save.
    pub fn rename(&mut self, id: Uuid, name: &str, now: DateTime<Utc>) -> Result<Preset> {
        let preset = self
            .presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PresetError::NotFound(id))?;
        preset.name = Preset::normalized_name(name);
        preset.updated_at = now;
        let renamed = preset.clone();

        self.sort();
        self.save()?;
        Ok(renamed)
    }

    /// Deletes a preset and saves.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or an I/O error on save.
    pub fn delete(&mut self, id: Uuid) -> Result<Preset> {
        let index = self
            .presets
            .iter()
            .position(|p| p.id == id)
            .ok_or(PresetError::NotFound(id))?;
        let removed = self.presets.remove(index);
        self.save()?;
        Ok(removed)
    }

    fn sort(&mut self) {
        self.presets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }

    /// Writes to a sibling temp file, then renames over the target.
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PresetError::io(parent, e))?;
            }
        }

        let json = serde_json::to_vec_pretty(&self.presets)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| PresetError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| PresetError::io(&self.path, e))?;

        debug!(path = %self.path.display(), count = self.presets.len(), "Presets saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::AudioPreferences;
    use crate::types::TimerConfiguration;
    use chrono::TimeZone;

    fn t(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn preset(name: &str) -> Preset {
        Preset::from_configuration(
            name,
            &TimerConfiguration::new(5, 30, 15, 2, 3),
            AudioPreferences::default(),
            t(0),
        )
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::open(dir.path().join("none.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        fs::write(&path, "not json").unwrap();
        assert!(PresetStore::open(&path).is_empty());
    }

    #[test]
    fn test_upsert_persists_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("presets.json");
        let mut store = PresetStore::open(&path);

        let first = store.upsert(preset("First"), t(10)).unwrap();
        let second = store.upsert(preset("Second"), t(20)).unwrap();
        assert_eq!(store.presets()[0].id, second.id);

        let reopened = PresetStore::open(&path);
        assert_eq!(reopened.presets().len(), 2);
        assert_eq!(reopened.presets()[0].name, "Second");
        assert_eq!(reopened.presets()[1].id, first.id);
    }

    #[test]
    fn test_upsert_replaces_by_id_and_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PresetStore::open(dir.path().join("presets.json"));

        let mut saved = store.upsert(preset("Intervals"), t(10)).unwrap();
        saved.work_seconds = 0;
        saved.name = "   ".to_string();
        let updated = store.upsert(saved, t(30)).unwrap();

        assert_eq!(store.presets().len(), 1);
        assert_eq!(updated.work_seconds, 1);
        assert_eq!(updated.name, "New Timer");
        assert_eq!(updated.updated_at, t(30));
    }

    #[test]
    fn test_rename() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PresetStore::open(dir.path().join("presets.json"));
        let saved = store.upsert(preset("Old"), t(10)).unwrap();

        let renamed = store.rename(saved.id, "  Tabata  ", t(50)).unwrap();
        assert_eq!(renamed.name, "Tabata");
        assert_eq!(store.find_by_name("tabata").unwrap().id, saved.id);
        assert!(store.rename(Uuid::nil(), "x", t(60)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_resolve_by_id_or_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PresetStore::open(dir.path().join("presets.json"));
        let saved = store.upsert(preset("Tabata"), t(10)).unwrap();

        assert_eq!(store.resolve(&saved.id.to_string()).unwrap().id, saved.id);
        assert_eq!(store.resolve(" TABATA ").unwrap().id, saved.id);
        assert!(matches!(
            store.resolve("missing"),
            Err(PresetError::NameNotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        let mut store = PresetStore::open(&path);
        let saved = store.upsert(preset("Gone"), t(10)).unwrap();

        store.delete(saved.id).unwrap();
        assert!(store.get(saved.id).is_none());
        assert!(PresetStore::open(&path).is_empty());
        assert!(store.delete(saved.id).is_err());
    }
}
