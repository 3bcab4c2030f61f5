use super::ResourceFinder;
use crate::error::Result;
use crate::matcher::AntPathMatcher;
use crate::resource::{FileSystemResource, Resource};
use crate::util::path::{FOLDER_SEPARATOR, to_slash};
use std::fs;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Walks a local directory tree, descending only into directories that can
/// still lead to a match.
#[derive(Debug, Clone)]
pub struct FileSystemFinder {
    matcher: AntPathMatcher,
}

impl FileSystemFinder {
    pub fn new(matcher: AntPathMatcher) -> Self {
        Self { matcher }
    }
}

impl ResourceFinder for FileSystemFinder {
    fn find(&self, root: &Resource, sub_pattern: &str) -> Result<Vec<Resource>> {
        let root_dir = match root.file_path() {
            Ok(path) => path,
            Err(e) => {
                debug!(root = %root, error = %e, "Cannot search for matching files: root is not in the file system");
                return Ok(Vec::new());
            }
        };
        let root_dir = std::path::absolute(&root_dir).unwrap_or(root_dir);

        match fs::metadata(&root_dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                debug!(root = %root_dir.display(), "Skipping search: root is not a directory");
                return Ok(Vec::new());
            }
            Err(e) => {
                debug!(root = %root_dir.display(), error = %e, "Skipping search: root does not exist");
                return Ok(Vec::new());
            }
        }
        if let Err(e) = fs::read_dir(&root_dir) {
            debug!(root = %root_dir.display(), error = %e, "Skipping search: root cannot be listed");
            return Ok(Vec::new());
        }

        // Entries are matched relative to the root, so the root path itself
        // never goes through the pattern compiler.
        let sub_pattern = sub_pattern.trim_start_matches(FOLDER_SEPARATOR);
        let pattern = self.matcher.compile(sub_pattern)?;
        trace!(root = %root_dir.display(), pattern = sub_pattern, "Searching directory tree");

        let mut found = Vec::new();
        let mut walker = WalkDir::new(&root_dir).sort_by_file_name().into_iter();
        while let Some(next) = walker.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "Skipping directory that cannot be listed");
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&root_dir) else {
                continue;
            };

            let path = to_slash(relative);
            if pattern.matches(&path) {
                trace!(path = %path, "Matched file");
                found.push(Resource::FileSystem(FileSystemResource::new(entry.path())));
            }
            if entry.file_type().is_dir() && !pattern.match_start(&format!("{path}/")) {
                trace!(path = %path, "Pruning directory");
                walker.skip_current_dir();
            }
        }
        Ok(found)
    }

    fn name(&self) -> &str {
        "file-system"
    }
}
