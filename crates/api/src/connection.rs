use std::fmt::Debug;
use std::io::{self, Read};
use std::time::SystemTime;
use url::Url;

/// Byte-stream access for URL schemes that are neither local files nor
/// archives (e.g. `http:`). Injected by the host; without one, such URLs
/// are addressable but cannot be opened.
pub trait UrlStreamHandler: Send + Sync + Debug {
    fn open(&self, url: &Url) -> io::Result<Box<dyn Read + Send>>;

    /// `None` when the length is unknown without reading the stream.
    fn content_length(&self, _url: &Url) -> io::Result<Option<u64>> {
        Ok(None)
    }

    fn last_modified(&self, _url: &Url) -> io::Result<Option<SystemTime>> {
        Ok(None)
    }
}
