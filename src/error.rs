use thiserror::Error;

/// Errors raised while preparing or running a VCF transform.
///
/// All variants are fatal. Unexpected *data* (unknown header prefixes, records on
/// contigs outside the dictionary) is filtered, never reported through this type.
#[derive(Error, Debug)]
pub enum Error {
    /// A required file or argument is missing or unreadable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A malformed row in the contig index
    #[error("Format error: {0}")]
    Format(String),

    /// A read or write failure on the data stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }
}
