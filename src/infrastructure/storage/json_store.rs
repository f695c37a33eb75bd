use crate::domain::entities::resolution::ResolutionRecord;
use crate::domain::error::DomainError;
use crate::domain::ports::resolution_store::ResolutionStore;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_RESOLUTIONS_PATH: &str = "data/resolutions.json";

/// Resolution records kept as a pretty-printed JSON array on disk.
pub struct JsonResolutionStore {
    path: PathBuf,
}

impl JsonResolutionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "resolutions.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ResolutionStore for JsonResolutionStore {
    fn load(&self) -> Result<Vec<ResolutionRecord>, DomainError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "Reading {}: {e}",
                    self.path.display()
                )))
            }
        };
        if data.trim().is_empty() {
            return Ok(vec![]);
        }
        serde_json::from_str(&data)
            .map_err(|e| DomainError::Parse(format!("{}: {e}", self.path.display())))
    }

    fn save(&self, records: &[ResolutionRecord]) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| {
            DomainError::Storage(format!("Replacing {}: {e}", self.path.display()))
        })?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "Saved resolutions");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
