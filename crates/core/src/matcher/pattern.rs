use super::MatcherOptions;
use super::cache::PatternCache;
use super::segment::SegmentMatcher;
use crate::error::PatternError;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

pub(crate) const ANY_PATH: &str = "**";

#[derive(Debug, Clone)]
enum PatternSegment {
    /// `**`: zero or more whole path segments.
    AnyPath,
    Single(Arc<SegmentMatcher>),
}

impl PatternSegment {
    fn is_any_path(&self) -> bool {
        matches!(self, PatternSegment::AnyPath)
    }

    fn matches(&self, candidate: &str, variables: Option<&mut IndexMap<String, String>>) -> bool {
        match self {
            PatternSegment::AnyPath => true,
            PatternSegment::Single(matcher) => matcher.matches(candidate, variables),
        }
    }
}

/// A compiled location pattern. Compilation validates every segment, so
/// matching itself cannot fail.
#[derive(Debug, Clone)]
pub struct AntPattern {
    raw: String,
    options: Arc<MatcherOptions>,
    tokens: Arc<[String]>,
    segments: Vec<PatternSegment>,
}

pub(crate) fn tokenize<'a>(value: &'a str, separator: &str, trim: bool) -> Vec<&'a str> {
    value
        .split(separator)
        .map(|token| if trim { token.trim() } else { token })
        .filter(|token| !token.is_empty())
        .collect()
}

impl AntPattern {
    pub(crate) fn compile(
        pattern: &str,
        options: Arc<MatcherOptions>,
        cache: &PatternCache,
    ) -> Result<Self, PatternError> {
        let tokens = cache.tokens(&options, pattern, || {
            tokenize(pattern, &options.separator, options.trim_tokens)
                .into_iter()
                .map(str::to_string)
                .collect()
        });

        let segments = tokens
            .iter()
            .map(|token| {
                if token == ANY_PATH {
                    Ok(PatternSegment::AnyPath)
                } else {
                    cache
                        .segment(options.case_sensitive, token, || {
                            SegmentMatcher::compile(token, options.case_sensitive)
                        })
                        .map(PatternSegment::Single)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: pattern.to_string(),
            options,
            tokens,
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_pattern(&self) -> bool {
        super::is_pattern(&self.raw)
    }

    pub fn matches(&self, path: &str) -> bool {
        self.do_match(path, true, None)
    }

    /// Whether `path` could be the beginning of a matching path. Used to
    /// prune directory descent: a `false` answer guarantees that no path
    /// under `path` matches.
    pub fn match_start(&self, path: &str) -> bool {
        self.do_match(path, false, None)
    }

    pub fn extract_variables(&self, path: &str) -> Result<IndexMap<String, String>, PatternError> {
        let mut variables = IndexMap::new();
        if self.do_match(path, true, Some(&mut variables)) {
            Ok(variables)
        } else {
            Err(PatternError::NoMatch {
                pattern: self.raw.clone(),
                path: path.to_string(),
            })
        }
    }

    fn all_any_path(&self, from: usize, to: usize) -> bool {
        self.segments[from..to].iter().all(PatternSegment::is_any_path)
    }

    fn do_match(
        &self,
        path: &str,
        full_match: bool,
        mut variables: Option<&mut IndexMap<String, String>>,
    ) -> bool {
        let separator = self.options.separator.as_str();
        if path.starts_with(separator) != self.raw.starts_with(separator) {
            return false;
        }

        let segments = &self.segments;
        let path_dirs = tokenize(path, separator, self.options.trim_tokens);
        let pattern_trailing = self.raw.ends_with(separator);
        let path_trailing = path.ends_with(separator);

        // Half-open ranges: [patt_start, patt_end) and [path_start, path_end).
        let (mut patt_start, mut patt_end) = (0, segments.len());
        let (mut path_start, mut path_end) = (0, path_dirs.len());

        // Front walk up to the first `**`.
        while patt_start < patt_end && path_start < path_end {
            let segment = &segments[patt_start];
            if segment.is_any_path() {
                break;
            }
            if !segment.matches(path_dirs[path_start], variables.as_deref_mut()) {
                return false;
            }
            patt_start += 1;
            path_start += 1;
        }

        if path_start >= path_end {
            if patt_start >= patt_end {
                return pattern_trailing == path_trailing;
            }
            if !full_match {
                return true;
            }
            if patt_start + 1 == patt_end && self.tokens[patt_start] == "*" && path_trailing {
                return true;
            }
            return self.all_any_path(patt_start, patt_end);
        } else if patt_start >= patt_end {
            return false;
        } else if !full_match && segments[patt_start].is_any_path() {
            return true;
        }

        // Back walk down to the last `**`.
        while patt_start < patt_end && path_start < path_end {
            let segment = &segments[patt_end - 1];
            if segment.is_any_path() {
                break;
            }
            if !segment.matches(path_dirs[path_end - 1], variables.as_deref_mut()) {
                return false;
            }
            if patt_end == segments.len() && pattern_trailing != path_trailing {
                return false;
            }
            patt_end -= 1;
            path_end -= 1;
        }

        if path_start >= path_end {
            return self.all_any_path(patt_start, patt_end);
        }

        // Both ends now sit on `**`. Place every block between two `**` at
        // its leftmost position in the remaining path.
        while patt_start + 1 < patt_end && path_start < path_end {
            let Some(next_any) = (patt_start + 1..patt_end).find(|&i| segments[i].is_any_path())
            else {
                return false;
            };
            if next_any == patt_start + 1 {
                // `**/**` collapses.
                patt_start += 1;
                continue;
            }

            let block_len = next_any - patt_start - 1;
            let remaining = path_end - path_start;
            if block_len > remaining {
                return false;
            }

            let mut found = None;
            'window: for offset in 0..=(remaining - block_len) {
                for j in 0..block_len {
                    let segment = &segments[patt_start + j + 1];
                    let candidate = path_dirs[path_start + offset + j];
                    if !segment.matches(candidate, variables.as_deref_mut()) {
                        continue 'window;
                    }
                }
                found = Some(path_start + offset);
                break;
            }

            let Some(found) = found else {
                return false;
            };
            patt_start = next_any;
            path_start = found + block_len;
        }

        self.all_any_path(patt_start, patt_end)
    }
}

impl fmt::Display for AntPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
