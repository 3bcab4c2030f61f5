//! Program resource lookup contract.
//!
//! A loader answers "where does this logical resource name live" for the
//! host program. Implementations may consult several physical roots
//! (directories and archives) and may delegate to a parent loader.

use std::fmt::Debug;
use std::sync::Arc;
use url::Url;

pub trait ResourceLoader: Send + Sync + Debug {
    /// First location bound to `name`, parent loaders first.
    fn resolve(&self, name: &str) -> Option<Url> {
        self.resolve_all(name).into_iter().next()
    }

    /// Every location bound to `name`, parent loaders first.
    fn resolve_all(&self, name: &str) -> Vec<Url>;

    /// Roots searched by this loader alone (not its ancestors), as file URLs
    /// or `jar:` URLs.
    fn roots(&self) -> Vec<Url> {
        Vec::new()
    }

    fn parent(&self) -> Option<Arc<dyn ResourceLoader>> {
        None
    }
}

/// Loader that knows no resources at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyResourceLoader;

impl ResourceLoader for EmptyResourceLoader {
    fn resolve_all(&self, _name: &str) -> Vec<Url> {
        Vec::new()
    }
}
