use super::url::UrlResource;
use crate::error::{ResourceError, Result};
use crate::util::path::{FOLDER_SEPARATOR, apply_relative_path, clean_path, filename};
use crate::util::url::is_file_url;
use rescope_api::ResourceLoader;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use url::Url;

/// A logical program-resource path, looked up through a [`ResourceLoader`]
/// on every access.
#[derive(Clone)]
pub struct ClassPathResource {
    path: String,
    absolute_path: String,
    scope: Option<String>,
    loader: Arc<dyn ResourceLoader>,
}

impl fmt::Debug for ClassPathResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassPathResource")
            .field("path", &self.absolute_path)
            .field("scope", &self.scope)
            .finish()
    }
}

impl ClassPathResource {
    /// Resource relative to the loader roots; a leading `/` is ignored.
    pub fn new(path: &str, loader: Arc<dyn ResourceLoader>) -> Self {
        let cleaned = clean_path(path);
        let path = cleaned
            .strip_prefix(FOLDER_SEPARATOR)
            .unwrap_or(cleaned.as_ref())
            .to_string();
        Self {
            absolute_path: path.clone(),
            path,
            scope: None,
            loader,
        }
    }

    /// Resource relative to a code unit's base path (`com/acme/billing`).
    /// Paths starting with `/` are taken as absolute.
    pub fn scoped(path: &str, scope: &str, loader: Arc<dyn ResourceLoader>) -> Self {
        let path = clean_path(path).into_owned();
        let scope = scope.trim_matches('/').to_string();
        let absolute_path = match path.strip_prefix(FOLDER_SEPARATOR) {
            Some(absolute) => absolute.to_string(),
            None if scope.is_empty() => path.clone(),
            None => clean_path(&format!("{scope}/{path}")).into_owned(),
        };
        Self {
            path,
            absolute_path,
            scope: Some(scope),
            loader,
        }
    }

    pub fn path(&self) -> &str {
        &self.absolute_path
    }

    pub fn loader(&self) -> &Arc<dyn ResourceLoader> {
        &self.loader
    }

    pub fn description(&self) -> String {
        format!("class path resource [{}]", self.absolute_path)
    }

    pub fn resolve(&self) -> Option<Url> {
        self.loader.resolve(&self.absolute_path)
    }

    fn resolved(&self) -> Result<UrlResource> {
        self.resolve().map(UrlResource::new).ok_or_else(|| {
            ResourceError::NotFound(format!(
                "{} cannot be resolved because it does not exist",
                self.description()
            ))
        })
    }

    pub fn exists(&self) -> bool {
        self.resolve().is_some()
    }

    pub fn is_readable(&self) -> bool {
        self.resolved().is_ok_and(|r| r.is_readable())
    }

    pub fn is_file(&self) -> bool {
        self.resolve().is_some_and(|url| is_file_url(&url))
    }

    pub fn open_read(&self) -> Result<Box<dyn Read + Send>> {
        self.resolved()?.open_read()
    }

    pub fn url(&self) -> Result<Url> {
        Ok(self.resolved()?.url().clone())
    }

    pub fn file_path(&self) -> Result<PathBuf> {
        self.resolved()?.file_path()
    }

    pub fn filename(&self) -> Option<String> {
        filename(&self.absolute_path).map(str::to_string)
    }

    pub fn last_modified(&self) -> Result<SystemTime> {
        self.resolved()?.last_modified()
    }

    pub fn content_length(&self) -> Result<u64> {
        self.resolved()?.content_length()
    }

    pub fn create_relative(&self, relative: &str) -> Self {
        let path = apply_relative_path(&self.path, relative);
        match &self.scope {
            Some(scope) => Self::scoped(&path, scope, self.loader.clone()),
            None => Self::new(&path, self.loader.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescope_api::EmptyResourceLoader;

    fn loader() -> Arc<dyn ResourceLoader> {
        Arc::new(EmptyResourceLoader)
    }

    #[test]
    fn test_paths() {
        let resource = ClassPathResource::new("/config/../config/app.xml", loader());
        assert_eq!(resource.path(), "config/app.xml");
        assert_eq!(resource.description(), "class path resource [config/app.xml]");
        assert_eq!(resource.create_relative("db.xml").path(), "config/db.xml");

        let scoped = ClassPathResource::scoped("messages.properties", "com/acme/", loader());
        assert_eq!(scoped.path(), "com/acme/messages.properties");
        let absolute = ClassPathResource::scoped("/root.xml", "com/acme", loader());
        assert_eq!(absolute.path(), "root.xml");
        assert_eq!(
            scoped.create_relative("errors.properties").path(),
            "com/acme/errors.properties"
        );
    }

    #[test]
    fn test_unresolvable_resource() {
        let resource = ClassPathResource::new("missing.xml", loader());
        assert!(!resource.exists());
        assert!(!resource.is_readable());
        assert!(resource.url().unwrap_err().is_not_found());
        assert!(resource.file_path().unwrap_err().is_not_found());
        assert!(resource.open_read().err().unwrap().is_not_found());
        assert_eq!(resource.filename().as_deref(), Some("missing.xml"));
    }
}
