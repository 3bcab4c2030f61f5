//! Enumeration of every program-resource root bound to a location.
//!
//! For the empty location this also collects the archive roots of the
//! whole loader chain and of the class path manifest, since loaders only
//! answer the empty name for directory roots.

use crate::loader::ClassPathManifest;
use crate::resource::{ArchiveLocator, Resource, ResourceSet, UrlResource};
use crate::util::path::FOLDER_SEPARATOR;
use crate::util::url::{
    JAR_URL_PREFIX, JAR_URL_SEPARATOR, is_jar_file_url, is_jar_url, to_file_path,
};
use rescope_api::{ResourceLoader, UrlStreamHandler};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};
use url::Url;

#[derive(Debug, Clone)]
pub struct ClassPathFinder {
    loader: Arc<dyn ResourceLoader>,
    manifest: ClassPathManifest,
    handler: Option<Arc<dyn UrlStreamHandler>>,
}

/// Canonical archive key of a resource that addresses an archive or a
/// location inside one.
fn archive_key(resource: &Resource) -> Option<String> {
    let url = resource.url().ok()?;
    if is_jar_url(&url) {
        ArchiveLocator::from_url(&url).ok().map(|l| l.canonical_key())
    } else if is_jar_file_url(&url) {
        let path = to_file_path(&url).ok()?;
        ArchiveLocator::for_archive(&path).ok().map(|l| l.canonical_key())
    } else {
        None
    }
}

impl ClassPathFinder {
    pub fn new(
        loader: Arc<dyn ResourceLoader>,
        manifest: ClassPathManifest,
        handler: Option<Arc<dyn UrlStreamHandler>>,
    ) -> Self {
        Self {
            loader,
            manifest,
            handler,
        }
    }

    pub fn loader(&self) -> &Arc<dyn ResourceLoader> {
        &self.loader
    }

    pub fn manifest(&self) -> &ClassPathManifest {
        &self.manifest
    }

    /// Every root bound to `location` (a leading `/` is ignored).
    pub fn find_all(&self, location: &str) -> ResourceSet {
        let path = location.strip_prefix(FOLDER_SEPARATOR).unwrap_or(location);

        let mut result: ResourceSet = self
            .loader
            .resolve_all(path)
            .into_iter()
            .map(|url| Resource::from_url(url, self.handler.clone()))
            .collect();

        if path.is_empty() {
            let mut keys: HashSet<String> = result.iter().filter_map(archive_key).collect();
            self.add_loader_archive_roots(self.loader.as_ref(), &mut result, &mut keys);
            self.add_manifest_archive_roots(&mut result, &mut keys);
        }

        debug!(location, count = result.len(), "Resolved class path location");
        result
    }

    fn add_loader_archive_roots(
        &self,
        loader: &dyn ResourceLoader,
        result: &mut ResourceSet,
        keys: &mut HashSet<String>,
    ) {
        for url in loader.roots() {
            // Directory roots were answered by `resolve_all("")`.
            if !is_jar_url(&url) && url.path().ends_with(FOLDER_SEPARATOR) {
                continue;
            }
            let root_url = if is_jar_url(&url) {
                url
            } else {
                match Url::parse(&format!("{JAR_URL_PREFIX}{url}{JAR_URL_SEPARATOR}")) {
                    Ok(wrapped) => wrapped,
                    Err(e) => {
                        debug!(url = %url, error = %e, "Skipping class path root");
                        continue;
                    }
                }
            };
            let resource = Resource::Url(UrlResource::new(root_url));
            self.add_archive_root(resource, result, keys);
        }

        if let Some(parent) = loader.parent() {
            self.add_loader_archive_roots(parent.as_ref(), result, keys);
        }
    }

    fn add_manifest_archive_roots(&self, result: &mut ResourceSet, keys: &mut HashSet<String>) {
        for archive in self.manifest.archives() {
            let root = match ArchiveLocator::for_archive(archive).and_then(|l| l.to_url()) {
                Ok(url) => url,
                Err(e) => {
                    debug!(archive = %archive.display(), error = %e, "Skipping manifest entry");
                    continue;
                }
            };
            self.add_archive_root(Resource::Url(UrlResource::new(root)), result, keys);
        }
    }

    fn add_archive_root(
        &self,
        resource: Resource,
        result: &mut ResourceSet,
        keys: &mut HashSet<String>,
    ) {
        let Some(key) = archive_key(&resource) else {
            return;
        };
        if keys.contains(&key) {
            trace!(root = %resource, "Archive root already present");
            return;
        }
        if !resource.exists() {
            trace!(root = %resource, "Archive root does not exist");
            return;
        }
        keys.insert(key);
        result.insert(resource);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{ClassPathEntry, ClassPathLoader};
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn write_jar(path: &std::path::Path) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        zip.start_file("META-INF/MANIFEST.MF", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"Manifest-Version: 1.0\n").unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_empty_location_collects_archive_roots_once() {
        let dir = tempdir().unwrap();
        let classes = dir.path().join("classes");
        fs::create_dir_all(&classes).unwrap();
        let jar = dir.path().join("lib.jar");
        write_jar(&jar);

        let loader = Arc::new(ClassPathLoader::new(vec![
            ClassPathEntry::Directory(classes),
            ClassPathEntry::Archive(jar.clone()),
        ]));
        // Same archive spelled differently, plus a missing one.
        let manifest = ClassPathManifest::from_entries(vec![
            dir.path().join(".").join("lib.jar"),
            dir.path().join("missing.jar"),
        ]);
        let finder = ClassPathFinder::new(loader, manifest, None);

        let roots = finder.find_all("");
        assert_eq!(roots.len(), 2);
        let archives = roots
            .iter()
            .filter(|r| r.url().is_ok_and(|u| u.scheme() == "jar"))
            .count();
        assert_eq!(archives, 1);
    }

    #[test]
    fn test_named_location_uses_loader_only() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        write_jar(&jar);
        let loader = Arc::new(ClassPathLoader::new(vec![ClassPathEntry::Archive(jar)]));
        let finder = ClassPathFinder::new(loader, ClassPathManifest::default(), None);

        let found = finder.find_all("/META-INF/MANIFEST.MF");
        assert_eq!(found.len(), 1);
        assert!(finder.find_all("META-INF/other.txt").is_empty());
    }
}
