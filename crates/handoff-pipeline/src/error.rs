use std::path::PathBuf;

use thiserror::Error;

/// Common error type for pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A scoped temporary directory could not be created under `path`.
    #[error("Failed to create temp directory under {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Channel closed: {0}")]
    ChannelClosed(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_creation_message_names_the_base_path() {
        let err = PipelineError::DirectoryCreation {
            path: PathBuf::from("/no/such/base"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        let msg = err.to_string();
        assert!(msg.contains("/no/such/base"), "unexpected message: {msg}");
        assert!(std::error::Error::source(&err).is_some());
    }
}
