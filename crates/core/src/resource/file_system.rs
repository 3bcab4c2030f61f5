use crate::error::{ResourceError, Result};
use crate::util::path::{apply_relative_path, clean_path, filename, to_slash};
use crate::util::url::file_url;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use url::Url;

/// A resource addressed by a plain local path.
#[derive(Debug, Clone)]
pub struct FileSystemResource {
    /// Cleaned, `/`-separated path as given; keeps a trailing separator.
    path: String,
    file: PathBuf,
}

impl FileSystemResource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = clean_path(&to_slash(path.as_ref())).into_owned();
        // The empty path stands for the current directory.
        let file = if path.is_empty() {
            std::env::current_dir().unwrap_or_default()
        } else {
            std::path::absolute(&path).unwrap_or_else(|_| PathBuf::from(&path))
        };
        Self { path, file }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn description(&self) -> String {
        format!("file [{}]", self.file.display())
    }

    pub fn exists(&self) -> bool {
        self.file.exists()
    }

    pub fn is_readable(&self) -> bool {
        is_readable_file(&self.file)
    }

    pub fn is_writable(&self) -> bool {
        is_writable_file(&self.file)
    }

    pub fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        open_file(&self.file, &self.description())
    }

    pub fn open_write(&self) -> Result<Box<dyn Write + Send>> {
        create_file(&self.file, &self.description())
    }

    pub fn url(&self) -> Result<Url> {
        file_url(&self.file, self.file.is_dir())
    }

    pub fn filename(&self) -> Option<String> {
        filename(&self.path).map(str::to_string)
    }

    pub fn last_modified(&self) -> Result<SystemTime> {
        metadata(&self.file, &self.description())?
            .modified()
            .map_err(|e| ResourceError::from_io(self.description(), e))
    }

    pub fn content_length(&self) -> Result<u64> {
        Ok(metadata(&self.file, &self.description())?.len())
    }

    pub fn create_relative(&self, relative: &str) -> Self {
        Self::new(apply_relative_path(&self.path, relative))
    }
}

pub(crate) fn metadata(file: &Path, description: &str) -> Result<fs::Metadata> {
    fs::metadata(file).map_err(|e| ResourceError::from_io(description, e))
}

pub(crate) fn is_readable_file(file: &Path) -> bool {
    fs::metadata(file).is_ok_and(|m| !m.is_dir()) && File::open(file).is_ok()
}

pub(crate) fn is_writable_file(file: &Path) -> bool {
    fs::metadata(file).is_ok_and(|m| !m.is_dir() && !m.permissions().readonly())
}

pub(crate) fn open_file(file: &Path, description: &str) -> Result<Box<dyn Read + Send>> {
    if metadata(file, description)?.is_dir() {
        return Err(ResourceError::from_io(
            description,
            io::Error::new(io::ErrorKind::IsADirectory, "cannot open a directory for reading"),
        ));
    }
    let file = File::open(file).map_err(|e| ResourceError::from_io(description, e))?;
    Ok(Box::new(file))
}

pub(crate) fn create_file(file: &Path, description: &str) -> Result<Box<dyn Write + Send>> {
    let file = File::create(file).map_err(|e| ResourceError::from_io(description, e))?;
    Ok(Box::new(file))
}
