//! Bounded cache for tokenized patterns and compiled segment matchers.
//!
//! Repeated patterns are the common case, so the cache never evicts single
//! entries. Under [`CachePolicy::Auto`] it switches itself off (and drops its
//! contents) once the threshold is reached, which keeps memory bounded when
//! patterns are generated dynamically.

use super::MatcherOptions;
use super::segment::SegmentMatcher;
use crate::error::PatternError;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

pub const DEFAULT_CACHE_LIMIT: usize = 65536;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Cache until the threshold is reached, then stop caching.
    #[default]
    Auto,
    /// Cache without limit.
    Always,
    /// Never cache.
    Never,
}

impl std::str::FromStr for CachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(CachePolicy::Auto),
            "always" | "on" | "true" => Ok(CachePolicy::Always),
            "never" | "off" | "false" => Ok(CachePolicy::Never),
            other => Err(format!("unknown cache policy '{other}'")),
        }
    }
}

/// Tokenization depends on the separator and on trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TokensKey {
    separator: String,
    trim_tokens: bool,
    pattern: String,
}

/// Segment compilation depends on case sensitivity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SegmentKey {
    case_sensitive: bool,
    segment: String,
}

/// Safe to share between matchers with different [`MatcherOptions`]: every
/// entry is keyed by the options it was built with.
#[derive(Debug)]
pub struct PatternCache {
    policy: CachePolicy,
    limit: usize,
    active: AtomicBool,
    tokens: DashMap<TokensKey, Arc<[String]>>,
    segments: DashMap<SegmentKey, Arc<SegmentMatcher>>,
}

impl PatternCache {
    pub fn new(policy: CachePolicy, limit: usize) -> Self {
        Self {
            policy,
            limit,
            active: AtomicBool::new(policy != CachePolicy::Never),
            tokens: DashMap::new(),
            segments: DashMap::new(),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Number of cached tokenized patterns.
    pub fn pattern_count(&self) -> usize {
        self.tokens.len()
    }

    /// Number of cached segment matchers.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn clear(&self) {
        self.tokens.clear();
        self.segments.clear();
    }

    pub(crate) fn tokens(
        &self,
        options: &MatcherOptions,
        pattern: &str,
        tokenize: impl FnOnce() -> Vec<String>,
    ) -> Arc<[String]> {
        let key = TokensKey {
            separator: options.separator.clone(),
            trim_tokens: options.trim_tokens,
            pattern: pattern.to_string(),
        };
        if self.is_active() {
            if let Some(hit) = self.tokens.get(&key) {
                return hit.clone();
            }
        }
        let tokenized: Arc<[String]> = tokenize().into();
        if self.admit(self.tokens.len()) {
            self.tokens.insert(key, tokenized.clone());
        }
        tokenized
    }

    pub(crate) fn segment(
        &self,
        case_sensitive: bool,
        segment: &str,
        compile: impl FnOnce() -> Result<SegmentMatcher, PatternError>,
    ) -> Result<Arc<SegmentMatcher>, PatternError> {
        let key = SegmentKey {
            case_sensitive,
            segment: segment.to_string(),
        };
        if self.is_active() {
            if let Some(hit) = self.segments.get(&key) {
                return Ok(hit.clone());
            }
        }
        let matcher = Arc::new(compile()?);
        if self.admit(self.segments.len()) {
            self.segments.insert(key, matcher.clone());
        }
        Ok(matcher)
    }

    /// Decides whether a new entry may be stored, deactivating the cache
    /// when the auto threshold is hit.
    fn admit(&self, current_len: usize) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.policy == CachePolicy::Auto && current_len >= self.limit {
            if self.active.swap(false, Ordering::AcqRel) {
                warn!(
                    limit = self.limit,
                    "Pattern cache threshold reached; caching disabled for this matcher"
                );
                self.clear();
            }
            return false;
        }
        true
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(CachePolicy::Auto, DEFAULT_CACHE_LIMIT)
    }
}
