//! Whole-file access to the store.
//!
//! The file is read once when opened and rewritten in full on every
//! mutation. There is no locking: two processes mutating the same file
//! concurrently race on the read-modify-write and one update is lost.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use crate::command::StoreError;

pub struct StoreFile {
    file: File,
    path: PathBuf,
    contents: Vec<u8>,
}

impl StoreFile {
    /// Opens `path` for reading and writing, creating it when absent, and
    /// reads its full contents.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = options
            .open(&path)
            .map_err(|source| StoreError::io("open", &path, source))?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|source| StoreError::io("read", &path, source))?;

        log::debug!("Opened {} ({} bytes)", path.display(), contents.len());

        Ok(Self {
            file,
            path,
            contents,
        })
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the file contents with `bytes`.
    pub fn overwrite(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        self.file
            .set_len(0)
            .map_err(|source| StoreError::io("truncate", &self.path, source))?;
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(|source| StoreError::io("seek", &self.path, source))?;
        self.file
            .write_all(bytes)
            .map_err(|source| StoreError::io("write", &self.path, source))?;
        self.file
            .flush()
            .map_err(|source| StoreError::io("flush", &self.path, source))?;

        self.contents = bytes.to_vec();
        Ok(())
    }
}
