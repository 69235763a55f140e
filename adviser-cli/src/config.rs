//! Configuration file loading for adviser.
//!
//! Loads `adviser.toml` from the target repository root and merges it with
//! CLI arguments. A flag given on the command line (or through its
//! environment variable) always wins over the file.

use adviser_core::settings::{DEFAULT_BRANCH_PREFIX, DEFAULT_REMOTE};
use adviser_types::Confidence;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The config file name looked up in the target repository.
pub const CONFIG_FILE_NAME: &str = "adviser.toml";

/// Top-level configuration from adviser.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdviserConfig {
    /// Where the advice collection comes from.
    pub advice: AdviceConfig,

    /// Default selection for runs and listings.
    pub filter: FilterConfig,

    /// Git workflow settings.
    pub run: RunConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdviceConfig {
    /// Local advice directory. Relative paths resolve against the config
    /// file's directory.
    pub dir: Option<Utf8PathBuf>,

    /// Git URL of an advice repository, checked out into the user cache.
    pub url: Option<String>,

    /// Use the cached checkout as-is instead of pulling.
    pub skip_update: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub confidence: Option<Confidence>,
    pub preview: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub remote: Option<String>,
    pub branch_prefix: Option<String>,
}

/// Path of the config file for `root`, if one exists.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let path = root.join(CONFIG_FILE_NAME);
    path.is_file().then_some(path)
}

pub fn parse_config(contents: &str) -> anyhow::Result<AdviserConfig> {
    toml::from_str(contents).context("parse adviser.toml")
}

/// Load a config file, resolving a relative `advice.dir` against it.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<AdviserConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("read config {}", path))?;
    let mut config = parse_config(&contents).with_context(|| format!("in {}", path))?;
    if let Some(dir) = &config.advice.dir
        && dir.is_relative()
        && let Some(parent) = path.parent()
    {
        config.advice.dir = Some(parent.join(dir));
    }
    Ok(config)
}

/// The config for `root`, or defaults when it has none.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<(AdviserConfig, Option<Utf8PathBuf>)> {
    match discover_config(root) {
        Some(path) => {
            debug!("loading config from {}", path);
            Ok((load_config(&path)?, Some(path)))
        }
        None => {
            debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, root);
            Ok((AdviserConfig::default(), None))
        }
    }
}

/// Values given on the command line. `None` and `false` mean "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub advice_dir: Option<Utf8PathBuf>,
    pub advice_url: Option<String>,
    pub skip_update: bool,
    pub confidence: Option<Confidence>,
    pub preview: bool,
}

/// Effective settings after merging the config file with the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedConfig {
    pub config_file: Option<Utf8PathBuf>,
    pub advice_dir: Option<Utf8PathBuf>,
    pub advice_url: Option<String>,
    pub skip_update: bool,
    pub confidence: Confidence,
    pub preview: bool,
    pub remote: String,
    pub branch_prefix: String,
}

pub struct ConfigMerger {
    config: AdviserConfig,
    config_file: Option<Utf8PathBuf>,
}

impl ConfigMerger {
    pub fn new(config: AdviserConfig) -> Self {
        Self {
            config,
            config_file: None,
        }
    }

    pub fn with_config_file(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    pub fn merge(self, cli: CliOverrides) -> MergedConfig {
        let AdviserConfig {
            advice,
            filter,
            run,
        } = self.config;

        // A directory on the command line beats any URL, and vice versa:
        // only the file's values yield to either.
        let (advice_dir, advice_url) = match (cli.advice_dir, cli.advice_url) {
            (None, None) => (advice.dir, advice.url),
            given => given,
        };

        MergedConfig {
            config_file: self.config_file,
            advice_dir,
            advice_url,
            skip_update: cli.skip_update || advice.skip_update,
            confidence: cli.confidence.or(filter.confidence).unwrap_or_default(),
            preview: cli.preview || filter.preview,
            remote: run.remote.unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            branch_prefix: run
                .branch_prefix
                .unwrap_or_else(|| DEFAULT_BRANCH_PREFIX.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[advice]
url = "https://example.com/acme/python-advice.git"
skip_update = true

[filter]
confidence = "yellow"
preview = true

[run]
remote = "upstream"
branch_prefix = "fix/"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(
            config.advice.url.as_deref(),
            Some("https://example.com/acme/python-advice.git")
        );
        assert!(config.advice.skip_update);
        assert_eq!(config.filter.confidence, Some(Confidence::Yellow));
        assert!(config.filter.preview);
        assert_eq!(config.run.remote.as_deref(), Some("upstream"));
        assert_eq!(config.run.branch_prefix.as_deref(), Some("fix/"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.advice.dir.is_none());
        assert!(config.filter.confidence.is_none());
        assert!(!config.filter.preview);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_config("[filter]\nconfidance = \"red\"\n").is_err());
    }

    #[test]
    fn test_defaults_without_config_or_flags() {
        let merged = ConfigMerger::new(AdviserConfig::default()).merge(CliOverrides::default());
        assert_eq!(merged.confidence, Confidence::Unset);
        assert_eq!(merged.remote, "origin");
        assert_eq!(merged.branch_prefix, "advice-");
        assert!(merged.advice_dir.is_none());
        assert!(merged.advice_url.is_none());
    }

    #[test]
    fn test_cli_wins_over_config() {
        let config = parse_config(
            r#"
[advice]
dir = "/srv/advice"

[filter]
confidence = "red"
"#,
        )
        .unwrap();

        let merged = ConfigMerger::new(config).merge(CliOverrides {
            advice_url: Some("https://example.com/advice.git".into()),
            confidence: Some(Confidence::Green),
            ..Default::default()
        });

        assert_eq!(merged.confidence, Confidence::Green);
        assert_eq!(merged.advice_dir, None);
        assert_eq!(
            merged.advice_url.as_deref(),
            Some("https://example.com/advice.git")
        );
    }

    #[test]
    fn test_config_fills_unset_flags() {
        let config = parse_config(
            r#"
[filter]
confidence = "yellow"
preview = true
"#,
        )
        .unwrap();

        let merged = ConfigMerger::new(config).merge(CliOverrides::default());
        assert_eq!(merged.confidence, Confidence::Yellow);
        assert!(merged.preview);
    }

    #[test]
    fn test_relative_advice_dir_resolves_against_config_file() {
        let tmp = TempDir::new().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        fs::write(root.join(CONFIG_FILE_NAME), "[advice]\ndir = \"tools/advice\"\n").unwrap();

        let (config, path) = load_or_default(root).unwrap();
        assert_eq!(path, Some(root.join(CONFIG_FILE_NAME)));
        assert_eq!(config.advice.dir, Some(root.join("tools/advice")));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        let (config, path) = load_or_default(root).unwrap();
        assert!(path.is_none());
        assert!(config.run.remote.is_none());
    }
}
