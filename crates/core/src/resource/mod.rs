//! The uniform resource abstraction.
//!
//! Every location resolves to one [`Resource`] variant. Constructors only
//! normalize strings and URLs; each capability call is a fresh query against
//! the backing store.

pub mod archive;
pub mod class_path;
pub mod file_system;
pub mod url;
pub mod vfs;

pub use archive::{ArchiveLocator, EntryStat};
pub use class_path::ClassPathResource;
pub use file_system::FileSystemResource;
pub use self::url::{FileUrlResource, UrlResource};
pub use vfs::VfsResource;

use crate::error::{ResourceError, Result};
use crate::util::url::is_file_url;
use indexmap::IndexSet;
use rescope_api::UrlStreamHandler;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use ::url::Url;

/// Resolved resources: no duplicates, first-seen order.
pub type ResourceSet = IndexSet<Resource>;

#[derive(Debug, Clone)]
pub enum Resource {
    FileSystem(FileSystemResource),
    ClassPath(ClassPathResource),
    Url(UrlResource),
    FileUrl(FileUrlResource),
    Vfs(VfsResource),
}

impl Resource {
    /// `FileUrl` for local file URLs, `Url` for everything else.
    pub fn from_url(url: Url, handler: Option<Arc<dyn UrlStreamHandler>>) -> Self {
        if is_file_url(&url) {
            Resource::FileUrl(FileUrlResource::new(url))
        } else {
            Resource::Url(UrlResource::new(url).with_handler(handler))
        }
    }

    pub fn description(&self) -> String {
        match self {
            Resource::FileSystem(r) => r.description(),
            Resource::ClassPath(r) => r.description(),
            Resource::Url(r) => r.description(),
            Resource::FileUrl(r) => r.description(),
            Resource::Vfs(r) => r.description(),
        }
    }

    /// Never fails; store errors read as `false`.
    pub fn exists(&self) -> bool {
        match self {
            Resource::FileSystem(r) => r.exists(),
            Resource::ClassPath(r) => r.exists(),
            Resource::Url(r) => r.exists(),
            Resource::FileUrl(r) => r.exists(),
            Resource::Vfs(r) => r.exists(),
        }
    }

    pub fn is_readable(&self) -> bool {
        match self {
            Resource::FileSystem(r) => r.is_readable(),
            Resource::ClassPath(r) => r.is_readable(),
            Resource::Url(r) => r.is_readable(),
            Resource::FileUrl(r) => r.is_readable(),
            Resource::Vfs(r) => r.is_readable(),
        }
    }

    pub fn is_file(&self) -> bool {
        match self {
            Resource::FileSystem(_) | Resource::FileUrl(_) => true,
            Resource::ClassPath(r) => r.is_file(),
            Resource::Url(r) => r.is_file(),
            Resource::Vfs(r) => r.file_path().is_ok(),
        }
    }

    pub fn is_writable(&self) -> bool {
        match self {
            Resource::FileSystem(r) => r.is_writable(),
            Resource::FileUrl(r) => r.is_writable(),
            Resource::ClassPath(_) | Resource::Url(_) | Resource::Vfs(_) => false,
        }
    }

    pub fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        match self {
            Resource::FileSystem(r) => r.open_read(),
            Resource::ClassPath(r) => r.open_read(),
            Resource::Url(r) => r.open_read(),
            Resource::FileUrl(r) => r.open_read(),
            Resource::Vfs(r) => r.open_read(),
        }
    }

    pub fn open_write(&self) -> Result<Box<dyn Write + Send>> {
        match self {
            Resource::FileSystem(r) => r.open_write(),
            Resource::FileUrl(r) => r.open_write(),
            Resource::ClassPath(_) | Resource::Url(_) | Resource::Vfs(_) => Err(
                ResourceError::unsupported("write", self.description()),
            ),
        }
    }

    pub fn url(&self) -> Result<Url> {
        match self {
            Resource::FileSystem(r) => r.url(),
            Resource::ClassPath(r) => r.url(),
            Resource::Url(r) => Ok(r.url().clone()),
            Resource::FileUrl(r) => Ok(r.url().clone()),
            Resource::Vfs(r) => r.url(),
        }
    }

    /// Same as [`Resource::url`]; every URL built here is a valid URI.
    pub fn uri(&self) -> Result<Url> {
        self.url()
    }

    pub fn file_path(&self) -> Result<PathBuf> {
        match self {
            Resource::FileSystem(r) => Ok(r.file().to_path_buf()),
            Resource::ClassPath(r) => r.file_path(),
            Resource::Url(r) => r.file_path(),
            Resource::FileUrl(r) => r.file_path(),
            Resource::Vfs(r) => r.file_path(),
        }
    }

    /// Last path element, percent-decoded for URLs.
    pub fn filename(&self) -> Option<String> {
        match self {
            Resource::FileSystem(r) => r.filename(),
            Resource::ClassPath(r) => r.filename(),
            Resource::Url(r) => r.filename(),
            Resource::FileUrl(r) => r.filename(),
            Resource::Vfs(r) => r.filename(),
        }
    }

    pub fn last_modified(&self) -> Result<SystemTime> {
        match self {
            Resource::FileSystem(r) => r.last_modified(),
            Resource::ClassPath(r) => r.last_modified(),
            Resource::Url(r) => r.last_modified(),
            Resource::FileUrl(r) => r.last_modified(),
            Resource::Vfs(r) => r.last_modified(),
        }
    }

    pub fn content_length(&self) -> Result<u64> {
        match self {
            Resource::FileSystem(r) => r.content_length(),
            Resource::ClassPath(r) => r.content_length(),
            Resource::Url(r) => r.content_length(),
            Resource::FileUrl(r) => r.content_length(),
            Resource::Vfs(r) => r.content_length(),
        }
    }

    /// With a trailing separator on this resource the result is a child,
    /// without one it is a sibling replacing the last element.
    pub fn create_relative(&self, relative: &str) -> Result<Resource> {
        Ok(match self {
            Resource::FileSystem(r) => Resource::FileSystem(r.create_relative(relative)),
            Resource::ClassPath(r) => Resource::ClassPath(r.create_relative(relative)),
            Resource::Url(r) => Resource::Url(r.create_relative(relative)?),
            Resource::FileUrl(r) => Resource::FileUrl(r.create_relative(relative)?),
            Resource::Vfs(r) => Resource::Vfs(r.create_relative(relative)?),
        })
    }

    pub fn content_as_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.open_read()?
            .read_to_end(&mut bytes)
            .map_err(|e| ResourceError::from_io(self.description(), e))?;
        Ok(bytes)
    }

    pub fn content_as_string(&self) -> Result<String> {
        String::from_utf8(self.content_as_bytes()?).map_err(|e| {
            ResourceError::from_io(
                self.description(),
                io::Error::new(io::ErrorKind::InvalidData, e),
            )
        })
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.description() == other.description()
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.description().hash(state);
    }
}

impl From<FileSystemResource> for Resource {
    fn from(r: FileSystemResource) -> Self {
        Resource::FileSystem(r)
    }
}

impl From<ClassPathResource> for Resource {
    fn from(r: ClassPathResource) -> Self {
        Resource::ClassPath(r)
    }
}

impl From<UrlResource> for Resource {
    fn from(r: UrlResource) -> Self {
        Resource::Url(r)
    }
}

impl From<FileUrlResource> for Resource {
    fn from(r: FileUrlResource) -> Self {
        Resource::FileUrl(r)
    }
}

impl From<VfsResource> for Resource {
    fn from(r: VfsResource) -> Self {
        Resource::Vfs(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_url_variants_compare_by_description() {
        let url = Url::parse("file:///opt/app/a.txt").unwrap();
        let as_file = Resource::FileUrl(FileUrlResource::new(url.clone()));
        let as_url = Resource::Url(UrlResource::new(url));
        assert_eq!(as_file, as_url);

        let mut set = ResourceSet::new();
        set.insert(as_file);
        assert!(!set.insert(as_url));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_descriptions() {
        let url = Resource::Url(UrlResource::parse("jar:file:/x.jar!/a/../b.txt").unwrap());
        assert_eq!(url.to_string(), "URL [jar:file:///x.jar!/b.txt]");
        assert!(!url.is_writable());
        assert!(matches!(
            url.open_write(),
            Err(ResourceError::UnsupportedCapability { capability: "write", .. })
        ));
    }

    #[test]
    fn test_content_helpers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.txt");
        fs::write(&path, "hello").unwrap();
        let resource = Resource::from_url(Url::from_file_path(&path).unwrap(), None);
        assert!(matches!(resource, Resource::FileUrl(_)));
        assert!(resource.is_file());
        assert_eq!(resource.content_as_string().unwrap(), "hello");
        assert_eq!(resource.content_length().unwrap(), 5);
        assert_eq!(resource.file_path().unwrap(), path);
    }
}
