//! Resolver configuration from JSON and environment-style lookups

mod common;

use common::{names, slash, write_tree, write_zip};
use rescope_core::config::{CLASS_PATH_ENV, PATTERN_CACHE_ENV, PATTERN_CACHE_LIMIT_ENV};
use rescope_core::matcher::CachePolicy;
use rescope_core::{PathMatchingResolver, ResolverConfig};
use std::collections::HashMap;
use tempfile::TempDir;

#[test]
fn test_partial_json_keeps_defaults() {
    let config: ResolverConfig =
        serde_json::from_str(r#"{ "case_sensitive": false, "pattern_cache": "never" }"#).unwrap();

    assert!(!config.case_sensitive);
    assert_eq!(config.pattern_cache, CachePolicy::Never);
    assert_eq!(config.path_separator, "/");
    assert_eq!(config.vfs_schemes, vec!["vfs", "vfsfile", "vfszip"]);
}

#[test]
fn test_lookup_overrides() {
    let env: HashMap<&str, &str> = HashMap::from([
        (PATTERN_CACHE_ENV, "off"),
        (PATTERN_CACHE_LIMIT_ENV, "not-a-number"),
    ]);
    let config = ResolverConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.pattern_cache, CachePolicy::Never);
    assert_eq!(config.pattern_cache_limit, ResolverConfig::default().pattern_cache_limit);
    assert!(config.class_path.is_none());
}

#[test]
fn test_case_insensitive_resolution() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &[("conf/App.XML", ""), ("conf/other.txt", "")]);
    let config = ResolverConfig {
        case_sensitive: false,
        ..ResolverConfig::default()
    };
    let resolver = PathMatchingResolver::builder().with_config(config).build();

    let pattern = format!("{}/conf/*.xml", slash(temp.path()));
    assert_eq!(names(&resolver.get_resources(&pattern).unwrap()), vec!["App.XML"]);
}

#[test]
fn test_configured_class_path_feeds_loader_and_manifest() {
    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("plugins.jar");
    write_zip(&jar, &["plugins/a.json", "plugins/b.json"]);

    let class_path = std::env::join_paths([&jar]).unwrap();
    let env: HashMap<&str, String> =
        HashMap::from([(CLASS_PATH_ENV, class_path.to_string_lossy().into_owned())]);
    let config = ResolverConfig::from_lookup(|key| env.get(key).cloned());
    let resolver = PathMatchingResolver::builder().with_config(config).build();

    let found = resolver.get_resources("classpath*:plugins/*.json").unwrap();
    assert_eq!(names(&found), vec!["a.json", "b.json"]);
    assert_eq!(resolver.get_resources("classpath*:").unwrap().len(), 1);
}
