//! Filesystem backend: one `<id>.xlsx` file per artifact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::{generate_id, is_valid_id, not_found, ArtifactStore};

/// Directory-backed store. Nothing is evicted; artifacts live until
/// [`ArtifactStore::remove`] or until the directory is cleaned externally.
#[derive(Debug)]
pub struct FsStore {
    dir: PathBuf,
    prefix: String,
}

impl FsStore {
    /// Use `dir` for storage, creating it if needed.
    ///
    /// # Errors
    /// Fails when the directory cannot be created.
    pub fn new(dir: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.to_string(),
        })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Option<PathBuf> {
        is_valid_id(id).then(|| self.dir.join(format!("{id}.xlsx")))
    }
}

impl ArtifactStore for FsStore {
    fn put(&self, bytes: Vec<u8>) -> Result<String> {
        let id = generate_id(&self.prefix);
        let path = self.dir.join(format!("{id}.xlsx"));
        // write to a temp name first so readers never see a partial file
        let tmp = self.dir.join(format!(".{id}.tmp"));
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;
        log::debug!("stored {} byte(s) at {}", bytes.len(), path.display());
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Vec<u8>> {
        let path = self.path_for(id).ok_or_else(|| not_found(id))?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(not_found(id)),
            Err(err) => Err(err.into()),
        }
    }

    fn remove(&self, id: &str) -> Result<()> {
        let path = self.path_for(id).ok_or_else(|| not_found(id))?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(not_found(id)),
            Err(err) => Err(err.into()),
        }
    }

    fn len(&self) -> usize {
        fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter(|e| {
                        let name = e.file_name();
                        let name = name.to_string_lossy();
                        name.starts_with(&self.prefix) && name.ends_with(".xlsx")
                    })
                    .count()
            })
            .unwrap_or(0)
    }
}
