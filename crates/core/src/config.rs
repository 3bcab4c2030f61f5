use crate::matcher::{CachePolicy, DEFAULT_CACHE_LIMIT, DEFAULT_PATH_SEPARATOR, MatcherOptions};
use crate::util::url::{SCHEME_VFS, SCHEME_VFSFILE, SCHEME_VFSZIP};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const CLASS_PATH_ENV: &str = "RESCOPE_CLASS_PATH";
pub const PATTERN_CACHE_ENV: &str = "RESCOPE_PATTERN_CACHE";
pub const PATTERN_CACHE_LIMIT_ENV: &str = "RESCOPE_PATTERN_CACHE_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub path_separator: String,
    pub case_sensitive: bool,
    pub trim_tokens: bool,
    pub pattern_cache: CachePolicy,
    pub pattern_cache_limit: usize,
    /// Platform path list of extra archive roots for `classpath*:` searches.
    pub class_path: Option<String>,
    /// URL schemes handed to the virtual filesystem.
    pub vfs_schemes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            case_sensitive: true,
            trim_tokens: false,
            pattern_cache: CachePolicy::Auto,
            pattern_cache_limit: DEFAULT_CACHE_LIMIT,
            class_path: None,
            vfs_schemes: vec![
                SCHEME_VFS.to_string(),
                SCHEME_VFSFILE.to_string(),
                SCHEME_VFSZIP.to_string(),
            ],
        }
    }
}

impl ResolverConfig {
    /// Defaults overlaid with the `RESCOPE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().overlay(lookup)
    }

    /// Applies overrides from `lookup`; unparsable values are ignored.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(class_path) = lookup(CLASS_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.class_path = Some(class_path);
        }
        if let Some(policy) = lookup(PATTERN_CACHE_ENV) {
            match policy.parse::<CachePolicy>() {
                Ok(policy) => self.pattern_cache = policy,
                Err(e) => warn!(value = %policy, "Ignoring {PATTERN_CACHE_ENV}: {e}"),
            }
        }
        if let Some(limit) = lookup(PATTERN_CACHE_LIMIT_ENV) {
            match limit.trim().parse::<usize>() {
                Ok(limit) => self.pattern_cache_limit = limit,
                Err(e) => warn!(value = %limit, "Ignoring {PATTERN_CACHE_LIMIT_ENV}: {e}"),
            }
        }
        self
    }

    pub fn matcher_options(&self) -> MatcherOptions {
        MatcherOptions {
            separator: self.path_separator.clone(),
            case_sensitive: self.case_sensitive,
            trim_tokens: self.trim_tokens,
        }
    }
}
