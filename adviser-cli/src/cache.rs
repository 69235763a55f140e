//! Local checkouts of remote advice repositories.
//!
//! Each URL gets its own directory under the user cache dir, named after the
//! repository plus a short hash of the full URL so two forks never collide.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use sha2::{Digest, Sha256};
use std::process::Command;
use tracing::{debug, info};

/// Subdirectory of the user cache dir holding advice checkouts.
pub const CACHE_DIR_NAME: &str = "adviser";

const HASH_CHARS: usize = 8;

/// `<repo-name>-<first 8 hex chars of sha256(url)>`.
pub fn cache_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("advice");
    let repo = last.strip_suffix(".git").unwrap_or(last);

    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    format!("{}-{}", repo, &digest[..HASH_CHARS])
}

pub fn cache_root() -> anyhow::Result<Utf8PathBuf> {
    let base = dirs::cache_dir().context("no user cache directory on this platform")?;
    let base = Utf8PathBuf::from_path_buf(base)
        .map_err(|p| anyhow::anyhow!("cache directory is not UTF-8: {}", p.display()))?;
    Ok(base.join(CACHE_DIR_NAME))
}

/// Where `url` is (or would be) checked out.
pub fn checkout_path(url: &str) -> anyhow::Result<Utf8PathBuf> {
    Ok(cache_root()?.join(cache_name(url)))
}

/// Clone `url` into the cache, or pull an existing checkout unless
/// `skip_update` is set. Returns the checkout directory.
pub fn update_checkout(url: &str, skip_update: bool) -> anyhow::Result<Utf8PathBuf> {
    let path = checkout_path(url)?;
    sync_checkout(url, &path, skip_update)?;
    Ok(path)
}

fn sync_checkout(url: &str, path: &Utf8Path, skip_update: bool) -> anyhow::Result<()> {
    if path.join(".git").exists() {
        if skip_update {
            debug!(path = %path, "using cached advice checkout as-is");
            return Ok(());
        }
        info!(path = %path, "updating advice checkout");
        return git(path, &["pull", "--quiet", "--ff-only"]);
    }

    let parent = path
        .parent()
        .with_context(|| format!("checkout path {} has no parent", path))?;
    fs::create_dir_all(parent)?;
    info!(url, path = %path, "cloning advice repository");
    git(parent, &["clone", "--quiet", url, path.as_str()])
}

fn git(cwd: &Utf8Path, args: &[&str]) -> anyhow::Result<()> {
    debug!(cwd = %cwd, "git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to spawn git in {}", cwd))?;
    if !output.status.success() {
        bail!(
            "git {} failed in {}: {}",
            args.join(" "),
            cwd,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cache_name_strips_git_suffix_and_hashes_url() {
        let name = cache_name("https://example.com/acme/python-advice.git");
        assert!(name.starts_with("python-advice-"), "{name}");
        assert_eq!(name.len(), "python-advice-".len() + HASH_CHARS);
    }

    #[test]
    fn cache_name_handles_scp_style_and_trailing_slash() {
        assert!(cache_name("git@example.com:advice.git").starts_with("advice-"));
        assert!(cache_name("https://example.com/acme/advice/").starts_with("advice-"));
    }

    #[test]
    fn same_repo_name_different_urls_do_not_collide() {
        let a = cache_name("https://one.example/acme/advice.git");
        let b = cache_name("https://two.example/acme/advice.git");
        assert_ne!(a, b);
        assert_eq!(a, cache_name("https://one.example/acme/advice.git"));
    }

    #[test]
    fn skip_update_leaves_existing_checkout_alone() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8Path::from_path(tmp.path()).unwrap().join("advice-0000");
        fs::create_dir_all(path.join(".git")).unwrap();

        // Pulling would fail: the checkout is not a real repository.
        sync_checkout("https://example.invalid/advice.git", &path, true).unwrap();
        assert!(sync_checkout("https://example.invalid/advice.git", &path, false).is_err());
    }
}
