//! Pattern resolution inside zip-format archives

mod common;

use common::{names, write_zip};
use rescope_core::{ClassPathEntry, ClassPathLoader, PathMatchingResolver, Resource};
use std::sync::Arc;
use tempfile::TempDir;
use url::Url;

fn sample_jar(temp: &TempDir) -> std::path::PathBuf {
    let jar = temp.path().join("app.jar");
    write_zip(
        &jar,
        &[
            "META-INF/MANIFEST.MF",
            "lib/",
            "lib/a.class",
            "lib/sub/b.class",
            "lib/sub/readme.txt",
            "other/c.class",
        ],
    );
    jar
}

#[test]
fn test_entries_relative_to_root_offset() {
    let temp = TempDir::new().unwrap();
    let jar = sample_jar(&temp);
    let resolver = PathMatchingResolver::default();

    let archive = Url::from_file_path(&jar).unwrap();
    let found = resolver
        .get_resources(&format!("jar:{archive}!/lib/**/*.class"))
        .unwrap();

    assert_eq!(names(&found), vec!["a.class", "b.class"]);
    let urls: Vec<String> = found.iter().map(|r| r.url().unwrap().to_string()).collect();
    assert!(urls.iter().any(|u| u.ends_with("!/lib/a.class")));
    assert!(urls.iter().any(|u| u.ends_with("!/lib/sub/b.class")));

    for resource in &found {
        assert!(resource.exists());
        assert!(resource.is_readable());
        assert!(resource.file_path().is_err());
    }
}

#[test]
fn test_entry_content_is_readable() {
    let temp = TempDir::new().unwrap();
    let jar = sample_jar(&temp);
    let resolver = PathMatchingResolver::default();

    let archive = Url::from_file_path(&jar).unwrap();
    let found = resolver
        .get_resources(&format!("jar:{archive}!/lib/sub/*.txt"))
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].content_as_string().unwrap(), "lib/sub/readme.txt");
    assert_eq!(found[0].content_length().unwrap(), 18);
}

#[test]
fn test_class_path_archive_search() {
    let temp = TempDir::new().unwrap();
    let jar = sample_jar(&temp);
    let loader = Arc::new(ClassPathLoader::new(vec![ClassPathEntry::Archive(jar)]));
    let resolver = PathMatchingResolver::builder().with_loader(loader).build();

    let found = resolver.get_resources("classpath*:lib/**/*.class").unwrap();
    assert_eq!(names(&found), vec!["a.class", "b.class"]);
    assert!(found.iter().all(|r| matches!(r, Resource::Url(_))));
}

#[test]
fn test_missing_archive_yields_empty_set() {
    let temp = TempDir::new().unwrap();
    let resolver = PathMatchingResolver::default();

    let archive = Url::from_file_path(temp.path().join("absent.jar")).unwrap();
    let found = resolver
        .get_resources(&format!("jar:{archive}!/**/*.class"))
        .unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_empty_entry_exists_but_is_not_readable() {
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("sparse.jar");
    let mut zip = ZipWriter::new(std::fs::File::create(&jar).unwrap());
    zip.start_file("conf/empty.xml", SimpleFileOptions::default()).unwrap();
    zip.start_file("conf/full.xml", SimpleFileOptions::default()).unwrap();
    zip.write_all(b"<full/>").unwrap();
    zip.finish().unwrap();

    let resolver = PathMatchingResolver::default();
    let archive = Url::from_file_path(&jar).unwrap();

    let empty = resolver
        .get_resource(&format!("jar:{archive}!/conf/empty.xml"))
        .unwrap();
    assert!(empty.exists());
    assert_eq!(empty.content_length().unwrap(), 0);
    assert!(!empty.is_readable());

    let full = resolver
        .get_resource(&format!("jar:{archive}!/conf/full.xml"))
        .unwrap();
    assert!(full.is_readable());
}
