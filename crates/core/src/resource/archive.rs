//! Addressing of entries inside zip-structured archives (`jar:`, `war:`,
//! `zip:`, `wsjar:`, `vfszip:` URLs).

use crate::error::{ResourceError, Result};
use crate::util::path::{FOLDER_SEPARATOR, clean_path, to_slash};
use crate::util::url::{
    JAR_URL_PREFIX, JAR_URL_SEPARATOR, SCHEME_JAR, WAR_URL_SEPARATOR, file_url, is_file_url,
    to_file_path,
};
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::PathBuf;
use std::time::SystemTime;
use url::Url;
use zip::ZipArchive;

/// Archive file URL plus the entry offset inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveLocator {
    archive_url: Url,
    entry: String,
}

/// Central-directory metadata of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStat {
    pub is_dir: bool,
    pub size: u64,
    pub last_modified: Option<SystemTime>,
}

impl EntryStat {
    fn directory() -> Self {
        Self {
            is_dir: true,
            size: 0,
            last_modified: None,
        }
    }
}

impl ArchiveLocator {
    pub fn new(archive_url: Url, entry: &str) -> Self {
        Self {
            archive_url,
            entry: normalize_entry(entry),
        }
    }

    /// Parses an archive URL. `jar:` URLs get their inner URL parsed
    /// structurally; other archive schemes are split on the first `*/`, or
    /// failing that the first `!/`.
    pub fn from_url(url: &Url) -> Result<Self> {
        let raw = url.as_str();
        let scheme = url.scheme();
        let rest = &raw[scheme.len() + 1..];

        let split = if scheme == SCHEME_JAR {
            rest.find(JAR_URL_SEPARATOR)
                .map(|idx| (idx, JAR_URL_SEPARATOR.len()))
        } else {
            rest.find(WAR_URL_SEPARATOR)
                .map(|idx| (idx, WAR_URL_SEPARATOR.len()))
                .or_else(|| {
                    rest.find(JAR_URL_SEPARATOR)
                        .map(|idx| (idx, JAR_URL_SEPARATOR.len()))
                })
        };

        let (archive_part, entry_part) = match split {
            Some((idx, len)) => (&rest[..idx], &rest[idx + len..]),
            None if scheme == SCHEME_JAR => {
                return Err(ResourceError::malformed(raw, "no '!/' in jar URL"));
            }
            None => (rest, ""),
        };

        let archive_url = match Url::parse(archive_part) {
            Ok(inner) if inner.scheme().len() > 1 => inner,
            _ if scheme == SCHEME_JAR => {
                return Err(ResourceError::malformed(raw, "invalid archive URL"));
            }
            // `zip:/libs/app.zip!/` style: the archive part is a bare path.
            _ => file_url(PathBuf::from(archive_part).as_path(), false)?,
        };

        let entry = urlencoding::decode(entry_part)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| entry_part.to_string());

        Ok(Self::new(archive_url, &entry))
    }

    /// Locator for the root of a local archive file.
    pub fn for_archive(path: &std::path::Path) -> Result<Self> {
        Ok(Self::new(file_url(path, false)?, ""))
    }

    pub fn archive_url(&self) -> &Url {
        &self.archive_url
    }

    /// Entry offset inside the archive, without a leading separator.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn with_entry(&self, entry: &str) -> Self {
        Self::new(self.archive_url.clone(), entry)
    }

    /// Local path of the archive. Nested archives are not addressable.
    pub fn archive_path(&self) -> Result<PathBuf> {
        if !is_file_url(&self.archive_url) {
            return Err(ResourceError::unsupported(
                "archive path",
                format!("archive [{}] is not a local file", self.archive_url),
            ));
        }
        to_file_path(&self.archive_url)
    }

    /// Canonical `jar:file:...!/entry` URL.
    pub fn to_url(&self) -> Result<Url> {
        let encoded = self
            .entry
            .split(FOLDER_SEPARATOR)
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join(FOLDER_SEPARATOR);
        let raw = format!(
            "{JAR_URL_PREFIX}{}{JAR_URL_SEPARATOR}{encoded}",
            self.archive_url
        );
        Url::parse(&raw).map_err(|e| ResourceError::malformed(raw, e))
    }

    /// Key identifying this archive location regardless of how the archive
    /// path was spelled (symlinks, `..`, relative forms).
    pub fn canonical_key(&self) -> String {
        let archive = match self.archive_path() {
            Ok(path) => fs::canonicalize(&path)
                .map(|p| to_slash(&p))
                .unwrap_or_else(|_| clean_path(&to_slash(&path)).into_owned()),
            Err(_) => self.archive_url.to_string(),
        };
        format!("{archive}{JAR_URL_SEPARATOR}{}", self.entry)
    }

    pub fn open(&self) -> Result<ZipArchive<File>> {
        let path = self.archive_path()?;
        let description = format!("archive [{}]", path.display());
        let file = File::open(&path).map_err(|e| ResourceError::from_io(&description, e))?;
        ZipArchive::new(file).map_err(|e| ResourceError::from_io(description, e.into()))
    }

    /// Looks the entry up, treating the archive root and implied
    /// directories (prefixes of other entries) as directories.
    pub fn stat(&self) -> Result<EntryStat> {
        let mut archive = self.open()?;
        let mut stat = stat_entry(&mut archive, &self.entry)
            .ok_or_else(|| ResourceError::NotFound(self.describe()))?;
        if stat.last_modified.is_none() {
            stat.last_modified = self
                .archive_path()
                .ok()
                .and_then(|p| fs::metadata(p).ok())
                .and_then(|m| m.modified().ok());
        }
        Ok(stat)
    }

    pub fn exists(&self) -> bool {
        self.stat().is_ok()
    }

    /// Reads the entry fully. The archive handle is closed on return.
    pub fn read_entry(&self) -> Result<Vec<u8>> {
        let mut archive = self.open()?;
        let mut file = archive
            .by_name(&self.entry)
            .map_err(|_| ResourceError::NotFound(self.describe()))?;
        if file.is_dir() {
            return Err(ResourceError::from_io(
                self.describe(),
                io::Error::new(io::ErrorKind::IsADirectory, "archive entry is a directory"),
            ));
        }
        let mut bytes = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut bytes)
            .map_err(|e| ResourceError::from_io(self.describe(), e))?;
        Ok(bytes)
    }

    fn describe(&self) -> String {
        format!("entry [{}] in archive [{}]", self.entry, self.archive_url)
    }
}

fn normalize_entry(entry: &str) -> String {
    let cleaned = clean_path(entry.trim_start_matches('/'));
    match cleaned.as_ref() {
        "." | "./" => String::new(),
        other => other.to_string(),
    }
}

/// Metadata of `entry` in an already opened archive.
pub fn stat_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, entry: &str) -> Option<EntryStat> {
    if entry.is_empty() {
        return Some(EntryStat::directory());
    }
    if let Ok(file) = archive.by_name(entry) {
        return Some(EntryStat {
            is_dir: file.is_dir(),
            size: if file.is_dir() { 0 } else { file.size() },
            last_modified: file.last_modified().and_then(to_system_time),
        });
    }

    let dir_prefix = if entry.ends_with('/') {
        entry.to_string()
    } else {
        format!("{entry}/")
    };
    if let Ok(file) = archive.by_name(&dir_prefix) {
        return Some(EntryStat {
            last_modified: file.last_modified().and_then(to_system_time),
            ..EntryStat::directory()
        });
    }
    archive
        .file_names()
        .any(|name| name.starts_with(&dir_prefix))
        .then(EntryStat::directory)
}

/// Zip timestamps carry no zone; they are read as UTC.
fn to_system_time(dt: zip::DateTime) -> Option<SystemTime> {
    let naive = NaiveDate::from_ymd_opt(i32::from(dt.year()), u32::from(dt.month()), u32::from(dt.day()))?
        .and_hms_opt(
            u32::from(dt.hour()),
            u32::from(dt.minute()),
            u32::from(dt.second()),
        )?;
    Some(SystemTime::from(naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_archive(path: &std::path::Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(name.trim_end_matches('/'), options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_parse_jar_url() {
        let url = Url::parse("jar:file:/libs/app.jar!/lib/../conf/a.xml").unwrap();
        let locator = ArchiveLocator::from_url(&url).unwrap();
        assert_eq!(locator.archive_url().as_str(), "file:///libs/app.jar");
        assert_eq!(locator.entry(), "conf/a.xml");
        assert_eq!(
            locator.to_url().unwrap().as_str(),
            "jar:file:///libs/app.jar!/conf/a.xml"
        );
    }

    #[test]
    fn test_two_spellings_collapse() {
        let a = ArchiveLocator::from_url(&Url::parse("jar:file:/x.jar!/").unwrap()).unwrap();
        let b = ArchiveLocator::from_url(&Url::parse("jar:file:///x.jar!/").unwrap()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_url().unwrap(), b.to_url().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_raw_fallback_for_other_schemes() {
        let war = Url::parse("war:file:/apps/shop.war*/WEB-INF/web.xml").unwrap();
        let locator = ArchiveLocator::from_url(&war).unwrap();
        assert_eq!(locator.archive_url().as_str(), "file:///apps/shop.war");
        assert_eq!(locator.entry(), "WEB-INF/web.xml");

        let zip = Url::parse("zip:/apps/data.zip!/rows/").unwrap();
        let locator = ArchiveLocator::from_url(&zip).unwrap();
        assert_eq!(locator.archive_url().as_str(), "file:///apps/data.zip");
        assert_eq!(locator.entry(), "rows/");
    }

    #[test]
    fn test_jar_url_without_separator_is_malformed() {
        let url = Url::parse("jar:file:/libs/app.jar").unwrap();
        assert!(ArchiveLocator::from_url(&url).unwrap_err().is_malformed());
    }

    #[test]
    fn test_entry_with_spaces_round_trips() {
        let locator = ArchiveLocator::new(Url::parse("file:///x.jar").unwrap(), "my dir/a b.txt");
        let url = locator.to_url().unwrap();
        assert_eq!(url.as_str(), "jar:file:///x.jar!/my%20dir/a%20b.txt");
        assert_eq!(ArchiveLocator::from_url(&url).unwrap(), locator);
    }

    #[test]
    fn test_stat_and_read() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("app.jar");
        write_archive(
            &jar,
            &[("lib/a.class", b"abc"), ("lib/sub/b.class", b""), ("META-INF/", b"")],
        );
        let root = ArchiveLocator::for_archive(&jar).unwrap();

        let a = root.with_entry("lib/a.class");
        let stat = a.stat().unwrap();
        assert!(!stat.is_dir);
        assert_eq!(stat.size, 3);
        assert!(stat.last_modified.is_some());
        assert_eq!(a.read_entry().unwrap(), b"abc");

        // Implied and explicit directories.
        assert!(root.with_entry("lib").stat().unwrap().is_dir);
        assert!(root.with_entry("lib/sub/").stat().unwrap().is_dir);
        assert!(root.with_entry("META-INF/").stat().unwrap().is_dir);
        assert!(root.stat().unwrap().is_dir);

        let missing = root.with_entry("lib/none.class");
        assert!(missing.stat().unwrap_err().is_not_found());
        assert!(!missing.exists());
    }

    #[test]
    fn test_canonical_key_ignores_spelling() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("app.jar");
        write_archive(&jar, &[("a.txt", b"x")]);
        fs::create_dir(dir.path().join("sub")).unwrap();
        let direct = ArchiveLocator::for_archive(&jar).unwrap();
        let dotted =
            ArchiveLocator::for_archive(&dir.path().join("sub").join("..").join("app.jar")).unwrap();
        assert_eq!(direct.canonical_key(), dotted.canonical_key());
    }
}
