use crate::error::{ResourceError, Result};
use rescope_api::{VfsHandle, VirtualFileSystem};
use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use url::Url;

/// A node of an injected virtual filesystem.
#[derive(Clone)]
pub struct VfsResource {
    vfs: Arc<dyn VirtualFileSystem>,
    handle: VfsHandle,
}

impl fmt::Debug for VfsResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VfsResource")
            .field("handle", &self.handle)
            .finish()
    }
}

impl VfsResource {
    pub fn new(vfs: Arc<dyn VirtualFileSystem>, handle: VfsHandle) -> Self {
        Self { vfs, handle }
    }

    pub fn for_url(vfs: Arc<dyn VirtualFileSystem>, url: &Url) -> Result<Self> {
        let handle = vfs
            .root(url)
            .map_err(|e| ResourceError::from_io(format!("VFS root [{url}]"), e))?;
        Ok(Self::new(vfs, handle))
    }

    pub fn handle(&self) -> &VfsHandle {
        &self.handle
    }

    pub fn vfs(&self) -> &Arc<dyn VirtualFileSystem> {
        &self.vfs
    }

    pub fn description(&self) -> String {
        match self.vfs.url(&self.handle) {
            Ok(url) => format!("VFS resource [{url}]"),
            Err(_) => format!("VFS resource [{}]", self.vfs.path_name(&self.handle)),
        }
    }

    fn io_error(&self, err: io::Error) -> ResourceError {
        ResourceError::from_io(self.description(), err)
    }

    pub fn exists(&self) -> bool {
        self.vfs.exists(&self.handle)
    }

    pub fn is_readable(&self) -> bool {
        self.vfs.exists(&self.handle) && !self.vfs.is_directory(&self.handle)
    }

    pub fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        self.vfs.open_read(&self.handle).map_err(|e| self.io_error(e))
    }

    pub fn url(&self) -> Result<Url> {
        self.vfs.url(&self.handle).map_err(|e| self.io_error(e))
    }

    pub fn file_path(&self) -> Result<PathBuf> {
        self.vfs.physical_file(&self.handle).map_err(|e| {
            if e.kind() == io::ErrorKind::Unsupported {
                ResourceError::unsupported("file path", self.description())
            } else {
                self.io_error(e)
            }
        })
    }

    pub fn filename(&self) -> Option<String> {
        let name = self.vfs.name(&self.handle);
        (!name.is_empty()).then_some(name)
    }

    pub fn last_modified(&self) -> Result<SystemTime> {
        self.vfs.last_modified(&self.handle).map_err(|e| self.io_error(e))
    }

    pub fn content_length(&self) -> Result<u64> {
        self.vfs.size(&self.handle).map_err(|e| self.io_error(e))
    }

    /// Child lookup for nested relative paths; otherwise the relative URL is
    /// re-rooted in the VFS.
    pub fn create_relative(&self, relative: &str) -> Result<Self> {
        if !relative.starts_with('.') && relative.contains('/') {
            if let Ok(child) = self.vfs.child(&self.handle, relative) {
                return Ok(Self::new(self.vfs.clone(), child));
            }
        }
        let base = self.url()?;
        let target = base
            .join(relative)
            .map_err(|e| ResourceError::malformed(format!("{base} + {relative}"), e))?;
        Self::for_url(self.vfs.clone(), &target)
    }
}
