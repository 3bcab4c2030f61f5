use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^/]+?\}").expect("variable regex"));

const CATCH_ALL: &str = "/**";

/// Wildcard statistics of a single pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternInfo {
    pub variables: usize,
    pub single_wildcards: usize,
    pub double_wildcards: usize,
    pub catch_all: bool,
    /// Length with every `{var}` counted as one character.
    pub length: usize,
}

impl PatternInfo {
    pub fn new(pattern: Option<&str>) -> Self {
        let Some(pattern) = pattern else {
            return Self {
                variables: 0,
                single_wildcards: 0,
                double_wildcards: 0,
                catch_all: true,
                length: 0,
            };
        };

        let bytes = pattern.as_bytes();
        let (mut variables, mut single_wildcards, mut double_wildcards) = (0, 0, 0);
        let mut pos = 0;
        while pos < bytes.len() {
            match bytes[pos] {
                b'{' => {
                    variables += 1;
                    pos += 1;
                }
                b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                    double_wildcards += 1;
                    pos += 2;
                }
                // A leading `*` and a trailing `.*` extension wildcard do not
                // count against specificity.
                b'*' => {
                    if pos > 0 && &bytes[pos - 1..] != b".*" {
                        single_wildcards += 1;
                    }
                    pos += 1;
                }
                _ => pos += 1,
            }
        }

        let length = if variables == 0 {
            pattern.len()
        } else {
            VARIABLE_PATTERN.replace_all(pattern, "#").len()
        };

        Self {
            variables,
            single_wildcards,
            double_wildcards,
            catch_all: pattern == CATCH_ALL,
            length,
        }
    }

    /// `**` weighs twice as much as `*` or `{var}`.
    pub fn total_count(&self) -> usize {
        self.variables + self.single_wildcards + 2 * self.double_wildcards
    }
}

/// Orders patterns from most to least specific for a given path.
#[derive(Debug, Clone)]
pub struct PatternComparator {
    path: String,
}

impl PatternComparator {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn compare(&self, first: &str, second: &str) -> Ordering {
        self.compare_optional(Some(first), Some(second))
    }

    pub fn compare_optional(&self, first: Option<&str>, second: Option<&str>) -> Ordering {
        let info1 = PatternInfo::new(first);
        let info2 = PatternInfo::new(second);

        match (info1.catch_all, info2.catch_all) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        let equals1 = first == Some(self.path.as_str());
        let equals2 = second == Some(self.path.as_str());
        match (equals1, equals2) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        info1
            .total_count()
            .cmp(&info2.total_count())
            .then_with(|| info2.length.cmp(&info1.length))
            .then_with(|| info1.single_wildcards.cmp(&info2.single_wildcards))
            .then_with(|| info1.variables.cmp(&info2.variables))
    }

    /// Stable sort, most specific first.
    pub fn sort<S: AsRef<str>>(&self, patterns: &mut [S]) {
        patterns.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
    }
}
