use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::debug;

/// String key-value store holding one JSON document per key.
pub trait Backend: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;
    fn set(&self, key: &str, value: String) -> Result<(), BackendError>;
}

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("failed to access \"{key}\": {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let entries = self.entries.lock().map_err(|_| BackendError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), BackendError> {
        let mut entries = self.entries.lock().map_err(|_| BackendError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Stores each key as `<key>.json` inside a directory.
///
/// The directory is created on the first write.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BackendError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), BackendError> {
        let io_error = |source| BackendError::Io {
            key: key.to_string(),
            source,
        };
        let path = self.path(key);
        fs::create_dir_all(&self.dir).map_err(io_error)?;
        fs::write(&path, value).map_err(io_error)?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}
