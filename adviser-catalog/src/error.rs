use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("advice root is not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    #[error("walking advice root {root}")]
    Walk {
        root: Utf8PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("advice path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),

    #[error("failed to load advice {name}")]
    Load {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}
