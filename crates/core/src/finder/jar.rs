use super::ResourceFinder;
use crate::error::Result;
use crate::matcher::{AntPathMatcher, AntPattern};
use crate::resource::{ArchiveLocator, Resource};
use crate::util::path::{FOLDER_SEPARATOR, filename};
use std::io::{Read, Seek};
use tracing::{debug, trace};
use zip::ZipArchive;

/// Matches central-directory entries of a zip-structured archive.
#[derive(Debug, Clone)]
pub struct JarFinder {
    matcher: AntPathMatcher,
}

impl JarFinder {
    pub fn new(matcher: AntPathMatcher) -> Self {
        Self { matcher }
    }
}

/// Entry paths below `root_entry` (relative to it) that match `pattern`,
/// in central-directory order. The archive stays owned by the caller.
pub fn matching_entries<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    root_entry: &str,
    pattern: &AntPattern,
) -> Vec<String> {
    let prefix = if root_entry.is_empty() || root_entry.ends_with(FOLDER_SEPARATOR) {
        root_entry.to_string()
    } else {
        format!("{root_entry}{FOLDER_SEPARATOR}")
    };

    archive
        .file_names()
        .filter_map(|name| {
            let name = name.strip_prefix(FOLDER_SEPARATOR).unwrap_or(name);
            let relative = name.strip_prefix(prefix.as_str())?;
            if pattern.matches(relative) {
                trace!(entry = %name, "Matched archive entry");
                Some(relative.to_string())
            } else {
                None
            }
        })
        .collect()
}

impl ResourceFinder for JarFinder {
    fn find(&self, root: &Resource, sub_pattern: &str) -> Result<Vec<Resource>> {
        let pattern = self.matcher.compile(sub_pattern)?;

        let locator = match root.url().and_then(|url| ArchiveLocator::from_url(&url)) {
            Ok(locator) => locator,
            Err(e) => {
                debug!(root = %root, error = %e, "Skipping archive root that cannot be located");
                return Ok(Vec::new());
            }
        };

        let relatives = {
            let mut archive = match locator.open() {
                Ok(archive) => archive,
                Err(e) => {
                    debug!(root = %root, error = %e, "Skipping archive that cannot be opened");
                    return Ok(Vec::new());
                }
            };
            matching_entries(&mut archive, locator.entry(), &pattern)
        };

        // A root without a trailing separator is re-entered through its own
        // last element so that results land below it, not beside it.
        let entry = locator.entry();
        let lead = if entry.is_empty() || entry.ends_with(FOLDER_SEPARATOR) {
            String::new()
        } else {
            format!("{}{FOLDER_SEPARATOR}", filename(entry).unwrap_or_default())
        };

        Ok(relatives
            .into_iter()
            .filter_map(|relative| match root.create_relative(&format!("{lead}{relative}")) {
                Ok(resource) => Some(resource),
                Err(e) => {
                    debug!(root = %root, entry = %relative, error = %e, "Skipping archive entry");
                    None
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "jar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn in_memory_archive(entries: &[&str]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for name in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(b"x").unwrap();
        }
        ZipArchive::new(zip.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_matching_entries_relative_to_offset() {
        let mut archive = in_memory_archive(&["lib/a.class", "lib/sub/b.class", "other/c.class"]);
        let pattern = AntPathMatcher::new().compile("**/*.class").unwrap();
        assert_eq!(
            matching_entries(&mut archive, "lib", &pattern),
            vec!["a.class", "sub/b.class"]
        );
        assert_eq!(matching_entries(&mut archive, "", &pattern).len(), 3);
        assert!(matching_entries(&mut archive, "missing/", &pattern).is_empty());
    }
}
