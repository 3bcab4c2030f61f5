//! Ant-style path matching.
//!
//! Mapping rules:
//! - `?` matches one character
//! - `*` matches zero or more characters inside a segment
//! - `**` matches zero or more segments
//! - `{name}` / `{name:regex}` match a segment part and capture it
//!
//! `/config/**/*.xml` matches every `.xml` file below `/config`, and
//! `/static/{name}.{ext:[a-z]+}` captures both parts of the file name.

pub mod cache;
pub mod comparator;
pub mod pattern;
pub mod segment;

pub use cache::{CachePolicy, DEFAULT_CACHE_LIMIT, PatternCache};
pub use comparator::{PatternComparator, PatternInfo};
pub use pattern::AntPattern;

use crate::error::PatternError;
use indexmap::IndexMap;
use pattern::tokenize;
use std::sync::Arc;

pub const DEFAULT_PATH_SEPARATOR: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherOptions {
    pub separator: String,
    pub case_sensitive: bool,
    pub trim_tokens: bool,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_PATH_SEPARATOR.to_string(),
            case_sensitive: true,
            trim_tokens: false,
        }
    }
}

/// Whether `path` contains wildcard characters.
pub fn is_pattern(path: &str) -> bool {
    path.contains('*') || path.contains('?')
}

#[derive(Debug, Clone)]
pub struct AntPathMatcher {
    options: Arc<MatcherOptions>,
    cache: Arc<PatternCache>,
}

impl Default for AntPathMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AntPathMatcher {
    pub fn new() -> Self {
        Self::with_options(MatcherOptions::default(), Arc::new(PatternCache::default()))
    }

    /// Matcher sharing an existing cache. An empty separator falls back to
    /// `/`.
    pub fn with_options(mut options: MatcherOptions, cache: Arc<PatternCache>) -> Self {
        if options.separator.is_empty() {
            options.separator = DEFAULT_PATH_SEPARATOR.to_string();
        }
        Self {
            options: Arc::new(options),
            cache,
        }
    }

    pub fn separator(&self) -> &str {
        &self.options.separator
    }

    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<PatternCache> {
        &self.cache
    }

    pub fn is_pattern(&self, path: &str) -> bool {
        is_pattern(path)
    }

    pub fn compile(&self, pattern: &str) -> Result<AntPattern, PatternError> {
        AntPattern::compile(pattern, self.options.clone(), &self.cache)
    }

    pub fn matches(&self, pattern: &str, path: &str) -> Result<bool, PatternError> {
        Ok(self.compile(pattern)?.matches(path))
    }

    pub fn match_start(&self, pattern: &str, path: &str) -> Result<bool, PatternError> {
        Ok(self.compile(pattern)?.match_start(path))
    }

    pub fn extract_variables(
        &self,
        pattern: &str,
        path: &str,
    ) -> Result<IndexMap<String, String>, PatternError> {
        self.compile(pattern)?.extract_variables(path)
    }

    /// Part of `path` covered by the wildcard part of `pattern`.
    ///
    /// `/docs/cvs/*.html` + `/docs/cvs/commit.html` gives `commit.html`,
    /// `/docs/**` + `/docs/cvs/commit` gives `cvs/commit`.
    pub fn extract_path_within_pattern(&self, pattern: &str, path: &str) -> String {
        let separator = self.separator();
        let pattern_parts = tokenize(pattern, separator, self.options.trim_tokens);
        let path_parts = tokenize(path, separator, self.options.trim_tokens);

        let mut out = String::new();
        let mut path_started = false;
        let mut segment = 0;
        while segment < pattern_parts.len() {
            if is_pattern(pattern_parts[segment]) {
                while segment < path_parts.len() {
                    if path_started || (segment == 0 && !pattern.starts_with(separator)) {
                        out.push_str(separator);
                    }
                    out.push_str(path_parts[segment]);
                    path_started = true;
                    segment += 1;
                }
            }
            segment += 1;
        }
        out
    }

    /// Combines two patterns into a new one.
    ///
    /// | first          | second        | result              |
    /// |----------------|---------------|---------------------|
    /// | `/hotels`      | `/bookings`   | `/hotels/bookings`  |
    /// | `/hotels/*`    | `bookings`    | `/hotels/bookings`  |
    /// | `/hotels/**`   | `bookings`    | `/hotels/**/bookings` |
    /// | `/*.html`      | `/hotels`     | `/hotels.html`      |
    /// | `/*.html`      | `/*.txt`      | error               |
    pub fn combine(&self, first: &str, second: &str) -> Result<String, PatternError> {
        let first_blank = first.trim().is_empty();
        let second_blank = second.trim().is_empty();
        if first_blank && second_blank {
            return Ok(String::new());
        }
        if first_blank {
            return Ok(second.to_string());
        }
        if second_blank {
            return Ok(first.to_string());
        }

        let separator = self.separator();
        let first_has_variables = first.contains('{');
        if first != second && !first_has_variables && self.matches(first, second)? {
            return Ok(second.to_string());
        }

        if let Some(stem) = first.strip_suffix("*") {
            if stem.ends_with(separator) && !stem.ends_with("*") {
                return Ok(self.concat(&stem[..stem.len() - separator.len()], second));
            }
        }
        if first.ends_with(&format!("{separator}**")) {
            return Ok(self.concat(first, second));
        }

        let star_dot = first.find("*.");
        let Some(star_dot) = star_dot.filter(|_| !first_has_variables && separator != ".") else {
            return Ok(self.concat(first, second));
        };

        let ext1 = &first[star_dot + 1..];
        let (file2, ext2) = match second.find('.') {
            Some(dot) => (&second[..dot], &second[dot..]),
            None => (second, ""),
        };
        let ext1_all = ext1 == ".*" || ext1.is_empty();
        let ext2_all = ext2 == ".*" || ext2.is_empty();
        if !ext1_all && !ext2_all {
            return Err(PatternError::IncompatibleCombine {
                first: first.to_string(),
                second: second.to_string(),
            });
        }
        let ext = if ext1_all { ext2 } else { ext1 };
        Ok(format!("{file2}{ext}"))
    }

    fn concat(&self, first: &str, second: &str) -> String {
        let separator = self.separator();
        match (first.ends_with(separator), second.starts_with(separator)) {
            (true, true) => format!("{first}{}", &second[separator.len()..]),
            (true, false) | (false, true) => format!("{first}{second}"),
            (false, false) => format!("{first}{separator}{second}"),
        }
    }

    pub fn comparator(&self, path: &str) -> PatternComparator {
        PatternComparator::new(path)
    }
}
