use super::PathMatchingResolver;
use crate::config::ResolverConfig;
use crate::finder::{ClassPathFinder, FileSystemFinder, JarFinder, VfsFinder};
use crate::loader::{ClassPathLoader, ClassPathManifest};
use crate::matcher::{AntPathMatcher, DEFAULT_PATH_SEPARATOR, MatcherOptions, PatternCache};
use rescope_api::{NoVirtualFileSystem, ResourceLoader, UrlStreamHandler, VirtualFileSystem};
use std::sync::Arc;

/// Assembles a [`PathMatchingResolver`] from configuration and injected
/// collaborators. Anything not supplied gets a default:
/// - loader: a [`ClassPathLoader`] over the manifest entries
/// - manifest: parsed from `config.class_path`
/// - VFS: [`NoVirtualFileSystem`]
/// - pattern cache: a fresh one sized by the config
#[derive(Debug, Default)]
pub struct ResolverBuilder {
    config: ResolverConfig,
    loader: Option<Arc<dyn ResourceLoader>>,
    manifest: Option<ClassPathManifest>,
    vfs: Option<Arc<dyn VirtualFileSystem>>,
    url_handler: Option<Arc<dyn UrlStreamHandler>>,
    pattern_cache: Option<Arc<PatternCache>>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_manifest(mut self, manifest: ClassPathManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn with_vfs(mut self, vfs: Arc<dyn VirtualFileSystem>) -> Self {
        self.vfs = Some(vfs);
        self
    }

    pub fn with_url_handler(mut self, handler: Arc<dyn UrlStreamHandler>) -> Self {
        self.url_handler = Some(handler);
        self
    }

    /// Shares a pattern cache between several resolvers.
    pub fn with_pattern_cache(mut self, cache: Arc<PatternCache>) -> Self {
        self.pattern_cache = Some(cache);
        self
    }

    pub fn build(self) -> PathMatchingResolver {
        let config = self.config;
        let cache = self.pattern_cache.unwrap_or_else(|| {
            Arc::new(PatternCache::new(
                config.pattern_cache,
                config.pattern_cache_limit,
            ))
        });
        // Root and entry paths are always `/`-separated; only case and
        // trimming carry over from the configured matcher.
        let search_matcher = AntPathMatcher::with_options(
            MatcherOptions {
                separator: DEFAULT_PATH_SEPARATOR.to_string(),
                ..config.matcher_options()
            },
            cache.clone(),
        );
        let matcher = AntPathMatcher::with_options(config.matcher_options(), cache);

        let manifest = self
            .manifest
            .or_else(|| config.class_path.as_deref().map(ClassPathManifest::parse))
            .unwrap_or_default();
        let loader = self
            .loader
            .unwrap_or_else(|| Arc::new(ClassPathLoader::from_manifest(&manifest)));
        let vfs = self
            .vfs
            .unwrap_or_else(|| Arc::new(NoVirtualFileSystem));

        PathMatchingResolver {
            class_path_finder: ClassPathFinder::new(
                loader.clone(),
                manifest,
                self.url_handler.clone(),
            ),
            file_system_finder: FileSystemFinder::new(search_matcher.clone()),
            jar_finder: JarFinder::new(search_matcher.clone()),
            vfs_finder: VfsFinder::new(vfs.clone(), search_matcher.clone()),
            matcher,
            search_matcher,
            loader,
            vfs,
            url_handler: self.url_handler,
            config,
        }
    }
}
