//! Relative resource creation across the resource variants

use rescope_core::resource::{ClassPathResource, FileSystemResource, FileUrlResource, UrlResource};
use rescope_core::{EmptyResourceLoader, PathMatchingResolver, Resource};
use std::sync::Arc;
use url::Url;

#[test]
fn test_trailing_separator_gives_child() {
    let base = Resource::from(FileSystemResource::new("dir/"));
    let Resource::FileSystem(child) = base.create_relative("x").unwrap() else {
        panic!("expected a file system resource");
    };
    assert_eq!(child.path(), "dir/x");
}

#[test]
fn test_missing_separator_gives_sibling() {
    let base = Resource::from(FileSystemResource::new("dir"));
    let Resource::FileSystem(sibling) = base.create_relative("x").unwrap() else {
        panic!("expected a file system resource");
    };
    assert_eq!(sibling.path(), "x");

    let nested = FileSystemResource::new("conf/app.xml").create_relative("db.xml");
    assert_eq!(nested.path(), "conf/db.xml");
}

#[test]
fn test_class_path_relative_keeps_loader() {
    let loader = Arc::new(EmptyResourceLoader);
    let base = ClassPathResource::new("/config/app.xml", loader);
    let relative = base.create_relative("../db/pool.xml");
    assert_eq!(relative.path(), "db/pool.xml");
    assert!(!relative.exists());
}

#[test]
fn test_url_relative_follows_same_convention() {
    let dir = FileUrlResource::new(Url::parse("file:///srv/dir/").unwrap());
    assert_eq!(dir.create_relative("x").unwrap().url().path(), "/srv/dir/x");

    let file = FileUrlResource::new(Url::parse("file:///srv/dir").unwrap());
    assert_eq!(file.create_relative("x").unwrap().url().path(), "/srv/x");

    let remote = UrlResource::new(Url::parse("https://example.com/static/").unwrap());
    assert_eq!(
        remote.create_relative("/app#1.js").unwrap().url().as_str(),
        "https://example.com/static/app%231.js"
    );
}

#[test]
fn test_archive_relative_stays_inside_archive() {
    let base = UrlResource::new(Url::parse("jar:file:///opt/app.jar!/templates/").unwrap());
    let page = base.create_relative("mail/welcome.html").unwrap();
    assert_eq!(
        page.url().as_str(),
        "jar:file:///opt/app.jar!/templates/mail/welcome.html"
    );
}

#[test]
fn test_resolver_handles_are_relative_capable() {
    let resolver = PathMatchingResolver::default();
    let base = resolver.get_resource("classpath:config/").unwrap();
    let Resource::ClassPath(child) = base.create_relative("app.xml").unwrap() else {
        panic!("expected a class path resource");
    };
    assert_eq!(child.path(), "config/app.xml");
}
