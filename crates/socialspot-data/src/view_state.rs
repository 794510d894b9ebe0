//! Per-screen persisted UI state: last map viewport and filter selections.
//!
//! Each screen key maps to one JSON file. The filter payload is opaque to this
//! module; screens serialize whatever selection shape they own.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapViewport {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub viewport: Option<MapViewport>,
    pub filters: Value,
    pub saved_at: DateTime<Utc>,
}

impl ViewState {
    pub fn new(viewport: Option<MapViewport>, filters: Value) -> Self {
        Self {
            viewport,
            filters,
            saved_at: Utc::now(),
        }
    }
}

/// File-backed store of [`ViewState`] blobs keyed by screen.
#[derive(Debug, Clone)]
pub struct ViewStateStore {
    dir: PathBuf,
}

impl ViewStateStore {
    /// Store rooted at `<data dir>/view_state`.
    pub fn open_default() -> Self {
        Self::new(crate::get_data_dir().join("view_state"))
    }

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, screen: &str) -> PathBuf {
        let key: String = screen
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{key}.json"))
    }

    /// Read the saved state for `screen`.
    ///
    /// A missing file is `Ok(None)`. A corrupt file is logged and also treated
    /// as absent so a bad blob never blocks the screen from opening.
    #[instrument(name = "Load view state", skip(self), level = "debug")]
    pub fn load(&self, screen: &str) -> Result<Option<ViewState>> {
        let path = self.path_for(screen);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str(&contents) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable view state");
                Ok(None)
            }
        }
    }

    #[instrument(name = "Save view state", skip(self, state), level = "debug")]
    pub fn save(&self, screen: &str, state: &ViewState) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(screen);
        fs::write(&path, serde_json::to_vec_pretty(state)?)?;
        debug!(path = %path.display(), "View state saved");
        Ok(())
    }

    pub fn clear(&self, screen: &str) -> Result<()> {
        let path = self.path_for(screen);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_round_trip_and_clear() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ViewStateStore::new(dir.path().join("state"));

        assert!(store.load("map").unwrap().is_none());

        let state = ViewState::new(
            Some(MapViewport {
                latitude: 38.9784,
                longitude: -76.4922,
                latitude_delta: 0.5,
                longitude_delta: 0.5,
            }),
            json!({"category": "Outdoor Fun", "freeOnly": true}),
        );
        store.save("map", &state).unwrap();
        assert_eq!(store.load("map").unwrap(), Some(state));

        store.clear("map").unwrap();
        assert!(store.load("map").unwrap().is_none());
    }

    #[test]
    fn test_screen_keys_are_sanitized() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ViewStateStore::new(dir.path());
        store
            .save("../events/list", &ViewState::new(None, json!({})))
            .unwrap();
        assert!(dir.path().join("___events_list.json").exists());
    }

    #[test]
    fn test_corrupt_blob_reads_as_absent() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("home.json"), "{not json").unwrap();
        let store = ViewStateStore::new(dir.path());
        assert!(store.load("home").unwrap().is_none());
    }
}
