use super::ResourceFinder;
use crate::error::Result;
use crate::matcher::{AntPathMatcher, AntPattern};
use crate::resource::{Resource, VfsResource};
use crate::util::path::FOLDER_SEPARATOR;
use rescope_api::{VfsHandle, VfsVisitor, VirtualFileSystem};
use std::sync::Arc;
use tracing::debug;

/// Collects visited nodes whose path relative to the root matches.
struct PatternVisitor<'a> {
    vfs: &'a dyn VirtualFileSystem,
    root_path: String,
    pattern: &'a AntPattern,
    found: Vec<VfsHandle>,
}

impl<'a> PatternVisitor<'a> {
    fn new(vfs: &'a dyn VirtualFileSystem, root_path: String, pattern: &'a AntPattern) -> Self {
        let root_path = if root_path.is_empty() || root_path.ends_with(FOLDER_SEPARATOR) {
            root_path
        } else {
            format!("{root_path}{FOLDER_SEPARATOR}")
        };
        Self {
            vfs,
            root_path,
            pattern,
            found: Vec::new(),
        }
    }
}

impl VfsVisitor for PatternVisitor<'_> {
    fn visit(&mut self, handle: &VfsHandle) {
        let path = self.vfs.path_name(handle);
        let Some(relative) = path.strip_prefix(self.root_path.as_str()) else {
            return;
        };
        if self.pattern.matches(relative) {
            self.found.push(handle.clone());
        }
    }
}

/// Searches an injected virtual filesystem through its visitor interface.
#[derive(Debug, Clone)]
pub struct VfsFinder {
    vfs: Arc<dyn VirtualFileSystem>,
    matcher: AntPathMatcher,
}

impl VfsFinder {
    pub fn new(vfs: Arc<dyn VirtualFileSystem>, matcher: AntPathMatcher) -> Self {
        Self { vfs, matcher }
    }
}

impl ResourceFinder for VfsFinder {
    fn find(&self, root: &Resource, sub_pattern: &str) -> Result<Vec<Resource>> {
        let pattern = self.matcher.compile(sub_pattern)?;

        let handle = match root {
            Resource::Vfs(r) => r.handle().clone(),
            other => {
                let root_handle = other
                    .url()
                    .and_then(|url| VfsResource::for_url(self.vfs.clone(), &url));
                match root_handle {
                    Ok(r) => r.handle().clone(),
                    Err(e) => {
                        debug!(root = %root, error = %e, "Skipping VFS root that cannot be resolved");
                        return Ok(Vec::new());
                    }
                }
            }
        };

        let root_path = self.vfs.path_name(&handle);
        let mut visitor = PatternVisitor::new(self.vfs.as_ref(), root_path, &pattern);
        if let Err(e) = self.vfs.visit(&handle, &mut visitor) {
            debug!(root = %root, error = %e, "VFS visit failed");
            return Ok(Vec::new());
        }

        Ok(visitor
            .found
            .into_iter()
            .map(|h| Resource::Vfs(VfsResource::new(self.vfs.clone(), h)))
            .collect())
    }

    fn name(&self) -> &str {
        "vfs"
    }
}
