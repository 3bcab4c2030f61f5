//! Location-pattern resource resolution.
//!
//! Turns location strings such as `classpath*:META-INF/**/*.xml`,
//! `file:/etc/app/*.conf` or `jar:file:/lib/app.jar!/templates/**` into
//! uniform [`Resource`] handles, searching local directories, zip-format
//! archives, the program class path and an optional virtual filesystem.

pub mod config;
pub mod error;
pub mod finder;
pub mod loader;
pub mod logging;
pub mod matcher;
pub mod resolver;
pub mod resource;
pub mod util;

pub use config::ResolverConfig;
pub use error::{PatternError, ResourceError, Result};
pub use loader::{ClassPathEntry, ClassPathLoader, ClassPathManifest};
pub use matcher::AntPathMatcher;
pub use resolver::{PathMatchingResolver, ResolverBuilder};
pub use resource::{Resource, ResourceSet};

pub use rescope_api::{
    EmptyResourceLoader, NoVirtualFileSystem, ResourceLoader, UrlStreamHandler, VfsHandle,
    VfsVisitor, VirtualFileSystem,
};
