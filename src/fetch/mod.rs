//! Blueprint retrieval boundary.
//!
//! The engine itself only consumes text; a [`BlueprintSource`] turns a
//! service id into that text. `NotFound` is terminal and kept distinct from
//! I/O failures so callers can report it verbatim.

use std::path::PathBuf;
use thiserror::Error;

pub mod directory;

pub use directory::DirectorySource;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no blueprint found for service '{service}'")]
    NotFound { service: String },
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid blueprint glob '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A fetched document plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintText {
    pub service: String,
    pub path: PathBuf,
    pub text: String,
    /// Encoding label the bytes were decoded with.
    pub encoding: String,
}

pub trait BlueprintSource {
    fn fetch(&self, service: &str) -> Result<BlueprintText, FetchError>;

    /// Service ids this source can resolve, sorted.
    fn list_services(&self) -> Result<Vec<String>, FetchError>;
}
