//! Location pattern resolution.
//!
//! A location is either a single resource (`classpath:config/app.xml`,
//! `file:/etc/app.conf`, `/data/rows.csv`) or a pattern
//! (`classpath*:META-INF/**/*.xml`, `/data/**/*.csv`). Patterns are split
//! into a wildcard-free root directory and a sub-pattern; the root is
//! resolved recursively and each root is searched by the finder matching
//! its backing store.

mod builder;

pub use builder::ResolverBuilder;

use crate::config::ResolverConfig;
use crate::error::{ResourceError, Result};
use crate::finder::{ClassPathFinder, FileSystemFinder, JarFinder, ResourceFinder, VfsFinder};
use crate::matcher::AntPathMatcher;
use crate::resource::{ClassPathResource, FileSystemResource, Resource, ResourceSet, VfsResource};
use crate::util::url::{
    CLASSPATH_ALL_URL_PREFIX, CLASSPATH_URL_PREFIX, WAR_URL_PREFIX, WAR_URL_SEPARATOR, is_jar_url,
    is_vfs_url, scheme_of,
};
use rescope_api::{ResourceLoader, UrlStreamHandler, VirtualFileSystem};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};
use url::Url;

pub struct PathMatchingResolver {
    config: ResolverConfig,
    matcher: AntPathMatcher,
    search_matcher: AntPathMatcher,
    loader: Arc<dyn ResourceLoader>,
    vfs: Arc<dyn VirtualFileSystem>,
    url_handler: Option<Arc<dyn UrlStreamHandler>>,
    class_path_finder: ClassPathFinder,
    file_system_finder: FileSystemFinder,
    jar_finder: JarFinder,
    vfs_finder: VfsFinder,
}

impl fmt::Debug for PathMatchingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathMatchingResolver")
            .field("config", &self.config)
            .field("loader", &self.loader)
            .field("vfs_available", &self.vfs.is_available())
            .finish()
    }
}

impl Default for PathMatchingResolver {
    fn default() -> Self {
        ResolverBuilder::new().build()
    }
}

impl PathMatchingResolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub fn path_matcher(&self) -> &AntPathMatcher {
        &self.matcher
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn loader(&self) -> &Arc<dyn ResourceLoader> {
        &self.loader
    }

    /// End of the location prefix. For `war:` locations the prefix runs up
    /// to the `*/` separator.
    fn prefix_end(location: &str) -> usize {
        if location.starts_with(WAR_URL_PREFIX) {
            location.find(WAR_URL_SEPARATOR).map_or(0, |idx| idx + 1)
        } else {
            location.find(':').map_or(0, |idx| idx + 1)
        }
    }

    fn is_vfs_url(&self, url: &Url) -> bool {
        self.vfs.is_available() && is_vfs_url(url, &self.config.vfs_schemes)
    }

    /// Single resource handle for `location`. Never touches the backing
    /// store, except for VFS locations which need a handle.
    pub fn get_resource(&self, location: &str) -> Result<Resource> {
        if let Some(path) = location.strip_prefix(CLASSPATH_ALL_URL_PREFIX) {
            return Ok(ClassPathResource::new(path, self.loader.clone()).into());
        }
        if let Some(path) = location.strip_prefix(CLASSPATH_URL_PREFIX) {
            return Ok(ClassPathResource::new(path, self.loader.clone()).into());
        }
        if scheme_of(location).is_none() {
            return Ok(FileSystemResource::new(location).into());
        }

        let url = Url::parse(location).map_err(|e| ResourceError::malformed(location, e))?;
        if self.is_vfs_url(&url) {
            return Ok(VfsResource::for_url(self.vfs.clone(), &url)?.into());
        }
        Ok(Resource::from_url(url, self.url_handler.clone()))
    }

    /// Every resource matching `location_pattern`.
    pub fn get_resources(&self, location_pattern: &str) -> Result<ResourceSet> {
        if let Some(path) = location_pattern.strip_prefix(CLASSPATH_ALL_URL_PREFIX) {
            if self.search_matcher.is_pattern(path) {
                return self.find_path_matching_resources(location_pattern);
            }
            return Ok(self.class_path_finder.find_all(path));
        }

        let prefix_end = Self::prefix_end(location_pattern);
        if self.search_matcher.is_pattern(&location_pattern[prefix_end..]) {
            return self.find_path_matching_resources(location_pattern);
        }

        let mut single = ResourceSet::new();
        single.insert(self.get_resource(location_pattern)?);
        Ok(single)
    }

    /// Longest wildcard-free directory prefix of `location`, prefix included.
    ///
    /// `/WEB-INF/*.xml` gives `/WEB-INF/`, `classpath*:**/*.xml` gives
    /// `classpath*:`.
    pub fn determine_root_dir<'a>(&self, location: &'a str) -> &'a str {
        let prefix_end = Self::prefix_end(location);
        let bytes = location.as_bytes();
        let mut root_dir_end = location.len();
        while root_dir_end > prefix_end
            && self.search_matcher.is_pattern(&location[prefix_end..root_dir_end])
        {
            root_dir_end = match root_dir_end.checked_sub(1) {
                Some(end) => bytes[..end]
                    .iter()
                    .rposition(|&b| b == b'/')
                    .map_or(0, |idx| idx + 1),
                None => 0,
            };
        }
        if root_dir_end < prefix_end {
            root_dir_end = prefix_end;
        }
        &location[..root_dir_end]
    }

    fn find_path_matching_resources(&self, location_pattern: &str) -> Result<ResourceSet> {
        let root_dir = self.determine_root_dir(location_pattern);
        let sub_pattern = &location_pattern[root_dir.len()..];
        self.search_matcher
            .compile(sub_pattern)
            .map_err(|e| ResourceError::malformed(location_pattern, e))?;

        let roots = self.get_resources(root_dir)?;
        let mut result = ResourceSet::new();
        for root in &roots {
            let url = match root.url() {
                Ok(url) => url,
                Err(e) => {
                    debug!(root = %root, error = %e, "Skipping root that cannot be resolved to a URL");
                    continue;
                }
            };

            let finder: &dyn ResourceFinder =
                if matches!(root, Resource::Vfs(_)) || self.is_vfs_url(&url) {
                    &self.vfs_finder
                } else if is_jar_url(&url) {
                    &self.jar_finder
                } else {
                    &self.file_system_finder
                };
            trace!(root = %root, finder = finder.name(), sub_pattern, "Searching root");
            result.extend(finder.find(root, sub_pattern)?);
        }

        debug!(pattern = location_pattern, count = result.len(), "Resolved location pattern");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_root_dir() {
        let resolver = PathMatchingResolver::default();
        let cases = [
            ("/WEB-INF/*.xml", "/WEB-INF/"),
            ("/WEB-INF/**/conf/*.xml", "/WEB-INF/"),
            ("classpath*:**/*.xml", "classpath*:"),
            ("classpath:config/**/*.xml", "classpath:config/"),
            ("file:/data/ab?/x.csv", "file:/data/"),
            ("*.csv", ""),
            ("data/*.csv", "data/"),
            ("C:/data/**/*.csv", "C:/data/"),
            ("war:file:/apps/shop.war*/WEB-INF/*.xml", "war:file:/apps/shop.war*/WEB-INF/"),
        ];
        for (location, expected) in cases {
            assert_eq!(resolver.determine_root_dir(location), expected, "{location}");
        }
    }

    #[test]
    fn test_get_resource_dispatch() {
        let resolver = PathMatchingResolver::default();
        assert!(matches!(
            resolver.get_resource("classpath:config/app.xml").unwrap(),
            Resource::ClassPath(_)
        ));
        assert!(matches!(
            resolver.get_resource("file:/etc/app.conf").unwrap(),
            Resource::FileUrl(_)
        ));
        assert!(matches!(
            resolver.get_resource("https://example.com/app.conf").unwrap(),
            Resource::Url(_)
        ));
        assert!(matches!(
            resolver.get_resource("/etc/app.conf").unwrap(),
            Resource::FileSystem(_)
        ));
        assert!(matches!(
            resolver.get_resource("C:/data/app.conf").unwrap(),
            Resource::FileSystem(_)
        ));
        // No VFS available: plain URL.
        assert!(matches!(
            resolver.get_resource("vfszip:/deploy/app.war/").unwrap(),
            Resource::Url(_)
        ));
        assert!(
            resolver
                .get_resource("http://exa mple.com/")
                .unwrap_err()
                .is_malformed()
        );
    }

    #[test]
    fn test_invalid_sub_pattern_fails_before_search() {
        let resolver = PathMatchingResolver::default();
        let err = resolver.get_resources("file:/nowhere/*/{id:[}.xml").unwrap_err();
        assert!(matches!(err, ResourceError::MalformedLocation { .. }));
    }

    #[test]
    fn test_non_pattern_yields_single_resource() {
        let resolver = PathMatchingResolver::default();
        let set = resolver.get_resources("/does/not/exist.txt").unwrap();
        assert_eq!(set.len(), 1);
        assert!(!set[0].exists());
    }
}
