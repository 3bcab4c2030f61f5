use super::archive::ArchiveLocator;
use super::file_system::{create_file, is_readable_file, is_writable_file, metadata, open_file};
use crate::error::{ResourceError, Result};
use crate::util::path::{apply_relative_path, filename};
use crate::util::url::{is_file_url, is_jar_url, to_file_path};
use once_cell::sync::OnceCell;
use rescope_api::UrlStreamHandler;
use std::fmt;
use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use url::Url;

/// Normalizes a URL: archive URLs get both the archive part and the entry
/// part cleaned. Hierarchical URLs are already dot-segment free once parsed.
pub fn clean_url(url: Url) -> Url {
    if is_jar_url(&url) {
        if let Ok(cleaned) = ArchiveLocator::from_url(&url).and_then(|l| l.to_url()) {
            return cleaned;
        }
    }
    url
}

/// Resolves `relative` against `base`. Archive URLs resolve within the
/// entry path; everything else follows RFC 3986.
pub fn relative_url(base: &Url, relative: &str) -> Result<Url> {
    let relative = relative.strip_prefix('/').unwrap_or(relative);
    if is_jar_url(base) {
        let locator = ArchiveLocator::from_url(base)?;
        let entry = apply_relative_path(locator.entry(), relative);
        return locator.with_entry(&entry).to_url();
    }
    let escaped = relative.replace('#', "%23").replace('?', "%3F");
    base.join(&escaped)
        .map_err(|e| ResourceError::malformed(format!("{base} + {relative}"), e))
}

fn url_filename(url: &Url) -> Option<String> {
    let name = filename(url.path())?;
    Some(
        urlencoding::decode(name)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| name.to_string()),
    )
}

/// A resource addressed by an arbitrary URL.
#[derive(Clone)]
pub struct UrlResource {
    url: Url,
    handler: Option<Arc<dyn UrlStreamHandler>>,
}

impl fmt::Debug for UrlResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlResource")
            .field("url", &self.url.as_str())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

enum Backing {
    File(PathBuf),
    Archive(ArchiveLocator),
    Opaque,
}

impl UrlResource {
    pub fn new(url: Url) -> Self {
        Self {
            url: clean_url(url),
            handler: None,
        }
    }

    pub fn parse(location: &str) -> Result<Self> {
        let url = Url::parse(location).map_err(|e| ResourceError::malformed(location, e))?;
        Ok(Self::new(url))
    }

    pub fn with_handler(mut self, handler: Option<Arc<dyn UrlStreamHandler>>) -> Self {
        self.handler = handler;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn handler(&self) -> Option<&Arc<dyn UrlStreamHandler>> {
        self.handler.as_ref()
    }

    pub fn description(&self) -> String {
        format!("URL [{}]", self.url)
    }

    fn backing(&self) -> Result<Backing> {
        if is_file_url(&self.url) {
            Ok(Backing::File(to_file_path(&self.url)?))
        } else if is_jar_url(&self.url) {
            Ok(Backing::Archive(ArchiveLocator::from_url(&self.url)?))
        } else {
            Ok(Backing::Opaque)
        }
    }

    fn require_handler(&self, capability: &'static str) -> Result<&Arc<dyn UrlStreamHandler>> {
        self.handler.as_ref().ok_or_else(|| {
            ResourceError::unsupported(
                capability,
                format!("{} (no stream handler for '{}')", self.description(), self.url.scheme()),
            )
        })
    }

    fn io_error(&self, err: io::Error) -> ResourceError {
        ResourceError::from_io(self.description(), err)
    }

    pub fn exists(&self) -> bool {
        match self.backing() {
            Ok(Backing::File(path)) => path.exists(),
            Ok(Backing::Archive(locator)) => locator.exists(),
            Ok(Backing::Opaque) => match &self.handler {
                Some(handler) => match handler.content_length(&self.url) {
                    Ok(Some(_)) => true,
                    Ok(None) => handler.open(&self.url).is_ok(),
                    Err(_) => false,
                },
                None => false,
            },
            Err(_) => false,
        }
    }

    pub fn is_readable(&self) -> bool {
        match self.backing() {
            Ok(Backing::File(path)) => is_readable_file(&path),
            Ok(Backing::Archive(locator)) => {
                locator.stat().is_ok_and(|stat| !stat.is_dir && stat.size > 0)
            }
            Ok(Backing::Opaque) => match &self.handler {
                Some(handler) => match handler.content_length(&self.url) {
                    Ok(Some(len)) => len > 0,
                    Ok(None) => handler.open(&self.url).is_ok(),
                    Err(_) => false,
                },
                None => false,
            },
            Err(_) => false,
        }
    }

    pub fn is_file(&self) -> bool {
        is_file_url(&self.url)
    }

    pub fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        match self.backing()? {
            Backing::File(path) => open_file(&path, &self.description()),
            Backing::Archive(locator) => Ok(Box::new(Cursor::new(locator.read_entry()?))),
            Backing::Opaque => self
                .require_handler("read")?
                .open(&self.url)
                .map_err(|e| self.io_error(e)),
        }
    }

    pub fn file_path(&self) -> Result<PathBuf> {
        match self.backing()? {
            Backing::File(path) => Ok(path),
            _ => Err(ResourceError::unsupported(
                "file path",
                format!("{} cannot be resolved to an absolute file path", self.description()),
            )),
        }
    }

    pub fn filename(&self) -> Option<String> {
        url_filename(&self.url)
    }

    pub fn last_modified(&self) -> Result<SystemTime> {
        match self.backing()? {
            Backing::File(path) => metadata(&path, &self.description())?
                .modified()
                .map_err(|e| self.io_error(e)),
            Backing::Archive(locator) => locator.stat()?.last_modified.ok_or_else(|| {
                ResourceError::unsupported("last modified", self.description())
            }),
            Backing::Opaque => self
                .require_handler("last modified")?
                .last_modified(&self.url)
                .map_err(|e| self.io_error(e))?
                .ok_or_else(|| ResourceError::unsupported("last modified", self.description())),
        }
    }

    /// Length from store metadata; opaque URLs whose handler reports no
    /// length are read through once.
    pub fn content_length(&self) -> Result<u64> {
        match self.backing()? {
            Backing::File(path) => Ok(metadata(&path, &self.description())?.len()),
            Backing::Archive(locator) => Ok(locator.stat()?.size),
            Backing::Opaque => {
                let handler = self.require_handler("content length")?;
                if let Some(len) = handler.content_length(&self.url).map_err(|e| self.io_error(e))? {
                    return Ok(len);
                }
                let mut stream = handler.open(&self.url).map_err(|e| self.io_error(e))?;
                io::copy(&mut stream, &mut io::sink()).map_err(|e| self.io_error(e))
            }
        }
    }

    pub fn create_relative(&self, relative: &str) -> Result<Self> {
        let url = relative_url(&self.url, relative)?;
        Ok(Self::new(url).with_handler(self.handler.clone()))
    }
}

/// A `file:` (or `vfsfile:`) URL resource. Writable, and caches the local
/// path after the first lookup.
#[derive(Debug, Clone)]
pub struct FileUrlResource {
    url: Url,
    file: OnceCell<PathBuf>,
}

impl FileUrlResource {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            file: OnceCell::new(),
        }
    }

    pub fn parse(location: &str) -> Result<Self> {
        let url = Url::parse(location).map_err(|e| ResourceError::malformed(location, e))?;
        if !is_file_url(&url) {
            return Err(ResourceError::malformed(location, "not a file URL"));
        }
        Ok(Self::new(url))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn description(&self) -> String {
        format!("URL [{}]", self.url)
    }

    pub fn file_path(&self) -> Result<PathBuf> {
        self.file
            .get_or_try_init(|| to_file_path(&self.url))
            .cloned()
    }

    pub fn exists(&self) -> bool {
        self.file_path().is_ok_and(|p| p.exists())
    }

    pub fn is_readable(&self) -> bool {
        self.file_path().is_ok_and(|p| is_readable_file(&p))
    }

    pub fn is_writable(&self) -> bool {
        self.file_path().is_ok_and(|p| is_writable_file(&p))
    }

    pub fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        open_file(&self.file_path()?, &self.description())
    }

    pub fn open_write(&self) -> Result<Box<dyn Write + Send>> {
        create_file(&self.file_path()?, &self.description())
    }

    pub fn filename(&self) -> Option<String> {
        url_filename(&self.url)
    }

    pub fn last_modified(&self) -> Result<SystemTime> {
        metadata(&self.file_path()?, &self.description())?
            .modified()
            .map_err(|e| ResourceError::from_io(self.description(), e))
    }

    pub fn content_length(&self) -> Result<u64> {
        Ok(metadata(&self.file_path()?, &self.description())?.len())
    }

    pub fn create_relative(&self, relative: &str) -> Result<Self> {
        Ok(Self::new(relative_url(&self.url, relative)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct StaticHandler(&'static [u8], Option<u64>);

    impl UrlStreamHandler for StaticHandler {
        fn open(&self, _url: &Url) -> io::Result<Box<dyn Read + Send>> {
            Ok(Box::new(Cursor::new(self.0)))
        }

        fn content_length(&self, _url: &Url) -> io::Result<Option<u64>> {
            Ok(self.1)
        }
    }

    #[test]
    fn test_jar_url_is_cleaned() {
        let resource = UrlResource::parse("jar:file:/libs/app.jar!/conf/../lib/a.class").unwrap();
        assert_eq!(resource.url().as_str(), "jar:file:///libs/app.jar!/lib/a.class");
        assert_eq!(resource.filename().as_deref(), Some("a.class"));
        assert!(resource.file_path().unwrap_err().to_string().contains("absolute file path"));
    }

    #[test]
    fn test_relative_resolution() {
        let dir = UrlResource::parse("http://example.com/static/").unwrap();
        assert_eq!(
            dir.create_relative("app.js").unwrap().url().as_str(),
            "http://example.com/static/app.js"
        );
        let file = UrlResource::parse("http://example.com/static/index.html").unwrap();
        assert_eq!(
            file.create_relative("/app.js").unwrap().url().as_str(),
            "http://example.com/static/app.js"
        );
        let entry = UrlResource::parse("jar:file:/libs/app.jar!/lib/").unwrap();
        assert_eq!(
            entry.create_relative("sub/b.class").unwrap().url().as_str(),
            "jar:file:///libs/app.jar!/lib/sub/b.class"
        );
    }

    #[test]
    fn test_opaque_url_needs_handler() {
        let bare = UrlResource::parse("http://example.com/data.bin").unwrap();
        assert!(!bare.exists());
        assert!(matches!(
            bare.open_read(),
            Err(ResourceError::UnsupportedCapability { .. })
        ));

        let known = bare
            .clone()
            .with_handler(Some(Arc::new(StaticHandler(b"hello", Some(5)))));
        assert!(known.exists());
        assert!(known.is_readable());
        assert_eq!(known.content_length().unwrap(), 5);

        let empty = bare
            .clone()
            .with_handler(Some(Arc::new(StaticHandler(b"", Some(0)))));
        assert!(empty.exists());
        assert!(!empty.is_readable());

        let unknown = bare.with_handler(Some(Arc::new(StaticHandler(b"abc", None))));
        assert!(unknown.is_readable());
        assert_eq!(unknown.content_length().unwrap(), 3);
        assert!(matches!(
            unknown.last_modified(),
            Err(ResourceError::UnsupportedCapability { .. })
        ));
    }

    #[test]
    fn test_file_url_decoding() {
        let resource = FileUrlResource::parse("file:///opt/my%20data/a%20b.txt").unwrap();
        assert_eq!(resource.filename().as_deref(), Some("a b.txt"));
        assert!(FileUrlResource::parse("http://example.com/").is_err());
    }
}
