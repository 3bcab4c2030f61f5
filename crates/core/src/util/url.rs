//! Location prefixes, URL scheme classification and URL/path conversion.

use crate::error::{ResourceError, Result};
use std::path::{Path, PathBuf};
use url::Url;

pub const CLASSPATH_URL_PREFIX: &str = "classpath:";
pub const CLASSPATH_ALL_URL_PREFIX: &str = "classpath*:";
pub const FILE_URL_PREFIX: &str = "file:";
pub const JAR_URL_PREFIX: &str = "jar:";
pub const WAR_URL_PREFIX: &str = "war:";

pub const JAR_URL_SEPARATOR: &str = "!/";
pub const WAR_URL_SEPARATOR: &str = "*/";

pub const SCHEME_FILE: &str = "file";
pub const SCHEME_JAR: &str = "jar";
pub const SCHEME_WAR: &str = "war";
pub const SCHEME_ZIP: &str = "zip";
pub const SCHEME_WSJAR: &str = "wsjar";
pub const SCHEME_VFSZIP: &str = "vfszip";
pub const SCHEME_VFSFILE: &str = "vfsfile";
pub const SCHEME_VFS: &str = "vfs";

const ARCHIVE_SCHEMES: &[&str] = &[
    SCHEME_JAR,
    SCHEME_WAR,
    SCHEME_ZIP,
    SCHEME_VFSZIP,
    SCHEME_WSJAR,
];

/// Scheme of `location` when it looks like a URL. Single-letter schemes are
/// Windows drive letters, not URLs.
pub fn scheme_of(location: &str) -> Option<&str> {
    let idx = location.find(':')?;
    let scheme = &location[..idx];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if scheme.len() < 2 || !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(scheme)
}

/// Whether `location` is a class path pseudo URL or a URL with a real scheme.
pub fn is_url(location: &str) -> bool {
    location.starts_with(CLASSPATH_URL_PREFIX)
        || location.starts_with(CLASSPATH_ALL_URL_PREFIX)
        || (scheme_of(location).is_some() && Url::parse(location).is_ok())
}

pub fn is_file_url(url: &Url) -> bool {
    matches!(url.scheme(), SCHEME_FILE | SCHEME_VFSFILE)
}

pub fn is_jar_url(url: &Url) -> bool {
    ARCHIVE_SCHEMES.contains(&url.scheme())
}

/// Whether the URL points at a file that is itself an archive
/// (`file:/libs/app.jar`).
pub fn is_jar_file_url(url: &Url) -> bool {
    is_file_url(url) && {
        let path = url.path().to_ascii_lowercase();
        path.ends_with(".jar") || path.ends_with(".zip") || path.ends_with(".war")
    }
}

pub fn is_vfs_url(url: &Url, vfs_schemes: &[String]) -> bool {
    vfs_schemes.iter().any(|s| s == url.scheme())
}

/// Local path addressed by a `file:`/`vfsfile:` URL.
pub fn to_file_path(url: &Url) -> Result<PathBuf> {
    if !is_file_url(url) {
        return Err(ResourceError::unsupported(
            "file path",
            format!("URL [{url}] does not reside in the file system"),
        ));
    }
    let file_url = if url.scheme() == SCHEME_FILE {
        url.clone()
    } else {
        let rest = &url.as_str()[url.scheme().len() + 1..];
        Url::parse(&format!("{FILE_URL_PREFIX}{rest}"))
            .map_err(|e| ResourceError::malformed(url.as_str(), e))?
    };
    file_url
        .to_file_path()
        .map_err(|_| ResourceError::malformed(url.as_str(), "not a local file URL"))
}

/// `file:` URL for a local path; relative paths are made absolute against
/// the current directory.
pub fn file_url(path: &Path, directory: bool) -> Result<Url> {
    let absolute = std::path::absolute(path)
        .map_err(|e| ResourceError::from_io(path.display().to_string(), e))?;
    let url = if directory {
        Url::from_directory_path(&absolute)
    } else {
        Url::from_file_path(&absolute)
    };
    url.map_err(|_| ResourceError::malformed(path.display().to_string(), "cannot express as file URL"))
}

/// `jar:file:...!/` URL pointing at the root of a local archive.
pub fn archive_root_url(archive: &Path) -> Result<Url> {
    let file = file_url(archive, false)?;
    Url::parse(&format!("{JAR_URL_PREFIX}{file}{JAR_URL_SEPARATOR}"))
        .map_err(|e| ResourceError::malformed(archive.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_detection() {
        assert_eq!(scheme_of("classpath:config/app.xml"), Some("classpath"));
        assert_eq!(scheme_of("jar:file:/a.jar!/x"), Some("jar"));
        assert_eq!(scheme_of("C:/data/app.xml"), None);
        assert_eq!(scheme_of("/data/app.xml"), None);
        assert_eq!(scheme_of("data/x:y"), None);
        assert!(is_url("classpath*:META-INF/x"));
        assert!(is_url("file:/tmp/x"));
        assert!(!is_url("config/app.xml"));
    }

    #[test]
    fn test_url_classification() {
        let jar = Url::parse("jar:file:/libs/app.jar!/lib/").unwrap();
        assert!(is_jar_url(&jar));
        assert!(!is_file_url(&jar));

        let file = Url::parse("file:///libs/app.jar").unwrap();
        assert!(is_file_url(&file));
        assert!(is_jar_file_url(&file));

        let vfs = Url::parse("vfszip:/deploy/app.war/").unwrap();
        assert!(is_vfs_url(&vfs, &["vfszip".to_string()]));
        assert!(!is_vfs_url(&file, &["vfszip".to_string()]));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_url_round_trip() {
        let url = file_url(Path::new("/opt/app/my file.txt"), false).unwrap();
        assert_eq!(url.as_str(), "file:///opt/app/my%20file.txt");
        assert_eq!(to_file_path(&url).unwrap(), PathBuf::from("/opt/app/my file.txt"));

        let vfsfile = Url::parse("vfsfile:/opt/app/x.txt").unwrap();
        assert_eq!(to_file_path(&vfsfile).unwrap(), PathBuf::from("/opt/app/x.txt"));

        let root = archive_root_url(Path::new("/opt/app/lib.jar")).unwrap();
        assert_eq!(root.as_str(), "jar:file:///opt/app/lib.jar!/");
    }
}
