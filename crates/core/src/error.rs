pub use rescope_api::error::{PatternError, ResourceError};

pub type Result<T> = std::result::Result<T, ResourceError>;
