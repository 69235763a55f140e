use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("target is not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    #[error("no python projects found under {0} (looked for pyproject.toml, setup.py, setup.cfg)")]
    NoProjects(Utf8PathBuf),

    #[error("invalid ignore pattern '{pattern}'")]
    IgnorePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("walking {root}")]
    Walk {
        root: Utf8PathBuf,
        #[source]
        source: ignore::Error,
    },
}
