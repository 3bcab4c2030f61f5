//! Backends that enumerate resources below a root directory resource.

pub mod class_path;
pub mod file_system;
pub mod jar;
pub mod vfs;

pub use class_path::ClassPathFinder;
pub use file_system::FileSystemFinder;
pub use jar::JarFinder;
pub use vfs::VfsFinder;

use crate::error::Result;
use crate::resource::Resource;

/// Enumerates the resources below `root` whose path relative to `root`
/// matches a sub-pattern.
///
/// Store failures (missing root, unreadable archive) yield an empty result;
/// only an invalid pattern is an error.
pub trait ResourceFinder: Send + Sync {
    fn find(&self, root: &Resource, sub_pattern: &str) -> Result<Vec<Resource>>;

    /// Finder name (for logging/debugging)
    fn name(&self) -> &str;
}
