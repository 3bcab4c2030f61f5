//! String-level helpers shared by resources, finders and the resolver.
//!
//! Nothing in here performs I/O.

pub mod path;
pub mod url;
