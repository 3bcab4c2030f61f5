//! Virtual filesystem contract.
//!
//! A foreign VFS (for example an application-server deployment tree) is
//! consumed only through this narrow, visitor-based interface. Handles are
//! opaque tokens minted by the VFS itself.

use std::fmt::{self, Debug};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use url::Url;

/// Opaque reference to a node of a virtual filesystem.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VfsHandle {
    token: Arc<str>,
}

impl VfsHandle {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl Debug for VfsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VfsHandle({})", self.token)
    }
}

/// Receives every node below a visited root (the root itself excluded).
pub trait VfsVisitor {
    fn visit(&mut self, handle: &VfsHandle);
}

pub trait VirtualFileSystem: Send + Sync + Debug {
    /// `false` when no VFS backend is present at runtime.
    fn is_available(&self) -> bool {
        true
    }

    fn root(&self, url: &Url) -> io::Result<VfsHandle>;

    fn child(&self, handle: &VfsHandle, path: &str) -> io::Result<VfsHandle>;

    fn visit(&self, root: &VfsHandle, visitor: &mut dyn VfsVisitor) -> io::Result<()>;

    fn exists(&self, handle: &VfsHandle) -> bool;

    fn is_directory(&self, handle: &VfsHandle) -> bool;

    fn size(&self, handle: &VfsHandle) -> io::Result<u64>;

    fn last_modified(&self, handle: &VfsHandle) -> io::Result<SystemTime>;

    fn open_read(&self, handle: &VfsHandle) -> io::Result<Box<dyn Read + Send>>;

    /// Simple name of the node (last path element).
    fn name(&self, handle: &VfsHandle) -> String;

    /// Full `/`-separated path of the node inside the VFS.
    fn path_name(&self, handle: &VfsHandle) -> String;

    fn url(&self, handle: &VfsHandle) -> io::Result<Url>;

    /// Local file backing the node, when there is one.
    fn physical_file(&self, _handle: &VfsHandle) -> io::Result<PathBuf> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "virtual file has no physical file",
        ))
    }
}

/// Null object used when no VFS is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVirtualFileSystem;

fn unavailable() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "no virtual filesystem available",
    )
}

impl VirtualFileSystem for NoVirtualFileSystem {
    fn is_available(&self) -> bool {
        false
    }

    fn root(&self, _url: &Url) -> io::Result<VfsHandle> {
        Err(unavailable())
    }

    fn child(&self, _handle: &VfsHandle, _path: &str) -> io::Result<VfsHandle> {
        Err(unavailable())
    }

    fn visit(&self, _root: &VfsHandle, _visitor: &mut dyn VfsVisitor) -> io::Result<()> {
        Err(unavailable())
    }

    fn exists(&self, _handle: &VfsHandle) -> bool {
        false
    }

    fn is_directory(&self, _handle: &VfsHandle) -> bool {
        false
    }

    fn size(&self, _handle: &VfsHandle) -> io::Result<u64> {
        Err(unavailable())
    }

    fn last_modified(&self, _handle: &VfsHandle) -> io::Result<SystemTime> {
        Err(unavailable())
    }

    fn open_read(&self, _handle: &VfsHandle) -> io::Result<Box<dyn Read + Send>> {
        Err(unavailable())
    }

    fn name(&self, handle: &VfsHandle) -> String {
        handle.token().rsplit('/').next().unwrap_or_default().to_string()
    }

    fn path_name(&self, handle: &VfsHandle) -> String {
        handle.token().to_string()
    }

    fn url(&self, _handle: &VfsHandle) -> io::Result<Url> {
        Err(unavailable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_vfs_degrades() {
        let vfs = NoVirtualFileSystem;
        assert!(!vfs.is_available());
        let url = Url::parse("vfs:/deploy/app.war/").unwrap();
        assert!(vfs.root(&url).is_err());

        let handle = VfsHandle::new("/deploy/app.war/index.html");
        assert!(!vfs.exists(&handle));
        assert_eq!(vfs.name(&handle), "index.html");
    }
}
