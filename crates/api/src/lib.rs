pub mod connection;
pub mod error;
pub mod loader;
pub mod vfs;

// Re-export commonly used types
pub use connection::UrlStreamHandler;
pub use error::{PatternError, ResourceError, ResourceResult};
pub use loader::{EmptyResourceLoader, ResourceLoader};
pub use vfs::{NoVirtualFileSystem, VfsHandle, VfsVisitor, VirtualFileSystem};
