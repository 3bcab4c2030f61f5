//! Concrete program-resource loader and the class path manifest.
//!
//! The loader searches an ordered list of roots:
//! - directories, where `name` resolves to `dir/name`
//! - zip-structured archives, where `name` resolves to `jar:file:...!/name`
//!
//! Parent loaders are consulted first.

use crate::config::CLASS_PATH_ENV;
use crate::resource::ArchiveLocator;
use crate::util::path::{capitalize_drive, clean_path};
use crate::util::url::{archive_root_url, file_url};
use rescope_api::ResourceLoader;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;
use url::Url;

const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip", "war"];

pub fn is_archive_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ARCHIVE_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassPathEntry {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl ClassPathEntry {
    /// Classifies by file type, falling back to the extension for paths
    /// that do not exist yet.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            ClassPathEntry::Directory(path)
        } else if path.is_file() || is_archive_path(&path) {
            ClassPathEntry::Archive(path)
        } else {
            ClassPathEntry::Directory(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ClassPathEntry::Directory(p) | ClassPathEntry::Archive(p) => p,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ClassPathLoader {
    entries: Vec<ClassPathEntry>,
    parent: Option<Arc<dyn ResourceLoader>>,
}

impl ClassPathLoader {
    pub fn new(entries: Vec<ClassPathEntry>) -> Self {
        Self {
            entries,
            parent: None,
        }
    }

    pub fn from_manifest(manifest: &ClassPathManifest) -> Self {
        Self::new(
            manifest
                .entries()
                .iter()
                .cloned()
                .map(ClassPathEntry::from_path)
                .collect(),
        )
    }

    pub fn with_parent(mut self, parent: Arc<dyn ResourceLoader>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn entries(&self) -> &[ClassPathEntry] {
        &self.entries
    }

    fn resolve_local(&self, name: &str) -> Vec<Url> {
        let name = clean_path(name.trim_start_matches('/')).into_owned();
        if name == ".." || name.starts_with("../") {
            return Vec::new();
        }

        let mut found = Vec::new();
        for entry in &self.entries {
            let url = match entry {
                ClassPathEntry::Directory(dir) => {
                    let candidate = if name.is_empty() {
                        dir.clone()
                    } else {
                        dir.join(&name)
                    };
                    if !candidate.exists() {
                        continue;
                    }
                    file_url(&candidate, candidate.is_dir()).ok()
                }
                // Archives have no answer for the empty name; their roots
                // come from `roots()`.
                ClassPathEntry::Archive(_) if name.is_empty() => None,
                ClassPathEntry::Archive(archive) => ArchiveLocator::for_archive(archive)
                    .ok()
                    .map(|root| root.with_entry(&name))
                    .filter(ArchiveLocator::exists)
                    .and_then(|locator| locator.to_url().ok()),
            };
            if let Some(url) = url {
                trace!(name = %name, url = %url, "Resolved class path name");
                found.push(url);
            }
        }
        found
    }
}

impl ResourceLoader for ClassPathLoader {
    fn resolve_all(&self, name: &str) -> Vec<Url> {
        let mut urls = self
            .parent
            .as_ref()
            .map(|parent| parent.resolve_all(name))
            .unwrap_or_default();
        urls.extend(self.resolve_local(name));
        urls
    }

    fn roots(&self) -> Vec<Url> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                ClassPathEntry::Directory(dir) => file_url(dir, true).ok(),
                ClassPathEntry::Archive(archive) => archive_root_url(archive).ok(),
            })
            .collect()
    }

    fn parent(&self) -> Option<Arc<dyn ResourceLoader>> {
        self.parent.clone()
    }
}

/// Class path entries declared by the host process, as a platform path
/// list (`:` separated on Unix, `;` on Windows).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassPathManifest {
    entries: Vec<PathBuf>,
}

impl ClassPathManifest {
    pub fn parse(value: impl AsRef<OsStr>) -> Self {
        let entries = std::env::split_paths(value.as_ref())
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| PathBuf::from(capitalize_drive(&p.to_string_lossy()).into_owned()))
            .collect();
        Self { entries }
    }

    pub fn from_env() -> Self {
        std::env::var_os(CLASS_PATH_ENV)
            .map(Self::parse)
            .unwrap_or_default()
    }

    pub fn from_entries(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Archive entries only.
    pub fn archives(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| is_archive_path(p))
    }
}
