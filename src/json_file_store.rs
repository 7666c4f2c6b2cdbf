use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::used_number_store::{StoreError, UsedNumberStore};

/// Used-set kept as a pretty-printed JSON array in a single file.
#[derive(Clone, Debug)]
pub struct JsonFileUsedNumberStore {
    path: PathBuf,
}

impl JsonFileUsedNumberStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileUsedNumberStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl UsedNumberStore for JsonFileUsedNumberStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "initializing empty used-number store");
            self.save(&[])?;
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&self.path).map_err(|e| self.io_error(&self.path, e))?;
        serde_json::from_str(&data).map_err(|source| StoreError::Malformed {
            location: self.path.display().to_string(),
            source,
        })
    }

    fn save(&self, numbers: &[String]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(numbers)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }

        // Write beside the target and rename over it, so the previous
        // contents survive any failure before the rename.
        let temp = self.temp_path();
        let mut file = fs::File::create(&temp).map_err(|e| self.io_error(&temp, e))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| self.io_error(&temp, e))?;
        drop(file);

        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            self.io_error(&self.path, e)
        })
    }
}
