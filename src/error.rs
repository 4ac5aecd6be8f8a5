use thiserror::Error;

/// Errors returned by the digest pipeline.
///
/// The compression algorithm itself is total: every byte sequence pads and
/// hashes. The only failure surface is obtaining the input bytes in the
/// first place.
#[derive(Debug, Error)]
pub enum Error {
    /// The named input file could not be opened or read.
    #[error("can't open file: {path}")]
    Source {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
