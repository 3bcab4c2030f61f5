//! Matching of a single path segment (`*.xml`, `v?`, `{name:[a-z]+}`).

use crate::error::PatternError;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// `?`, `*` or a `{...}` variable, allowing one level of nested braces
/// inside the variable (`{id:\d{3}}`).
static GLOB_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\?|\*|\{((?:\{[^/]+?\}|[^/{}]|\\[{}])+?)\}").expect("glob token regex")
});

const DEFAULT_VARIABLE_PATTERN: &str = "(.*)";

#[derive(Debug)]
enum SegmentKind {
    Exact,
    Regex {
        regex: Regex,
        variables: Vec<String>,
    },
}

/// Compiled form of one pattern segment.
#[derive(Debug)]
pub struct SegmentMatcher {
    raw: String,
    case_sensitive: bool,
    kind: SegmentKind,
}

impl SegmentMatcher {
    pub fn compile(segment: &str, case_sensitive: bool) -> Result<Self, PatternError> {
        let mut source = String::with_capacity(segment.len() + 8);
        let mut variables = Vec::new();
        let mut end = 0;

        for caps in GLOB_PATTERN.captures_iter(segment) {
            let Some(whole) = caps.get(0) else { continue };
            source.push_str(&regex::escape(&segment[end..whole.start()]));
            let token = whole.as_str();
            match token {
                "?" => source.push('.'),
                "*" => source.push_str(".*"),
                _ => {
                    let inner = &token[1..token.len() - 1];
                    let (name, variable_pattern) = match inner.find(':') {
                        Some(colon) => (&inner[..colon], Some(&inner[colon + 1..])),
                        None => (inner, None),
                    };
                    if name.starts_with('*') {
                        return Err(PatternError::InvalidSegment {
                            segment: segment.to_string(),
                            reason: format!("capturing pattern {{{name}}} is not supported"),
                        });
                    }
                    match variable_pattern {
                        Some(p) => {
                            source.push('(');
                            source.push_str(p);
                            source.push(')');
                        }
                        None => source.push_str(DEFAULT_VARIABLE_PATTERN),
                    }
                    variables.push(name.to_string());
                }
            }
            end = whole.end();
        }

        if end == 0 {
            return Ok(Self {
                raw: segment.to_string(),
                case_sensitive,
                kind: SegmentKind::Exact,
            });
        }
        source.push_str(&regex::escape(&segment[end..]));

        let regex = RegexBuilder::new(&format!("^(?:{source})$"))
            .dot_matches_new_line(true)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| PatternError::InvalidSegment {
                segment: segment.to_string(),
                reason: e.to_string(),
            })?;

        let groups = regex.captures_len() - 1;
        if groups != variables.len() {
            return Err(PatternError::CapturingGroup {
                segment: segment.to_string(),
                groups,
                variables: variables.len(),
            });
        }

        Ok(Self {
            raw: segment.to_string(),
            case_sensitive,
            kind: SegmentKind::Regex { regex, variables },
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Matches `candidate` against the whole segment, recording variable
    /// bindings when `variables` is given.
    pub fn matches(
        &self,
        candidate: &str,
        variables: Option<&mut IndexMap<String, String>>,
    ) -> bool {
        match &self.kind {
            SegmentKind::Exact => {
                if self.case_sensitive {
                    self.raw == candidate
                } else {
                    self.raw.to_lowercase() == candidate.to_lowercase()
                }
            }
            SegmentKind::Regex {
                regex,
                variables: names,
            } => {
                let Some(caps) = regex.captures(candidate) else {
                    return false;
                };
                if let Some(out) = variables {
                    for (idx, name) in names.iter().enumerate() {
                        let value = caps.get(idx + 1).map_or("", |m| m.as_str());
                        out.insert(name.clone(), value.to_string());
                    }
                }
                true
            }
        }
    }
}
