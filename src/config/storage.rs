//! Persistence for discovery defaults in `<git-dir>/ibb/`.

use super::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name for ibb metadata within the git directory.
const IBB_DIR: &str = "ibb";

/// Filename for the config.
const CONFIG_FILE: &str = "config.toml";

/// Resolve the git directory for a checkout, handling worktree indirection.
///
/// Walks up from `workdir` to the first `.git`. In linked worktrees (created
/// via `git worktree add`) `.git` is a plain text file reading
/// `gitdir: <path>`; the path is followed, and its `commondir` pointer too,
/// so every worktree shares one config.
///
/// Returns `None` when no `.git` is found.
pub fn resolve_git_dir(workdir: &Path) -> Option<PathBuf> {
    let root = workdir
        .ancestors()
        .find(|dir| dir.join(".git").exists())?;
    let dot_git = root.join(".git");

    if !dot_git.is_file() {
        return Some(dot_git);
    }

    let contents = fs::read_to_string(&dot_git).ok()?;
    let pointer = contents.trim().strip_prefix("gitdir:")?.trim();
    let git_dir = root.join(pointer);

    // Linked worktrees keep shared state in the directory named by `commondir`
    let common = fs::read_to_string(git_dir.join("commondir"))
        .ok()
        .map(|c| git_dir.join(c.trim()))
        .unwrap_or(git_dir);

    Some(fs::canonicalize(&common).unwrap_or(common))
}

/// Get path to the repository config file.
pub fn config_path(workdir: &Path) -> Result<PathBuf> {
    resolve_git_dir(workdir)
        .map(|dir| dir.join(IBB_DIR).join(CONFIG_FILE))
        .ok_or_else(|| Error::NotARepository(workdir.display().to_string()))
}

/// Get path to the user-level config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(IBB_DIR).join(CONFIG_FILE))
}

/// Load one config file.
///
/// Returns `None` if the file doesn't exist.
pub fn load_config_file(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    Ok(Some(config))
}

/// Load the effective config for a checkout.
///
/// The repository file wins; the user file is read only when it is absent.
/// Returns defaults when neither exists or `workdir` is not a repository.
pub fn load_config(workdir: &Path) -> Result<Config> {
    if let Some(path) = resolve_git_dir(workdir).map(|d| d.join(IBB_DIR).join(CONFIG_FILE))
        && let Some(config) = load_config_file(&path)?
    {
        return Ok(config);
    }

    if let Some(path) = user_config_path()
        && let Some(config) = load_config_file(&path)?
    {
        return Ok(config);
    }

    Ok(Config::default())
}

/// Save the repository config to disk.
///
/// Creates the `<git-dir>/ibb/` directory if it doesn't exist.
pub fn save_config(workdir: &Path, config: &Config) -> Result<PathBuf> {
    let path = config_path(workdir)?;
    let dir = path
        .parent()
        .ok_or_else(|| Error::Config(format!("invalid config path {}", path.display())))?;

    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Config(format!("failed to create {}: {e}", dir.display())))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;

    // Add header comment
    let content_with_header = format!(
        "# integration-branch-builder settings\n# Written by `ibb config` - flags override these values\n\n{content}"
    );

    fs::write(&path, content_with_header)
        .map_err(|e| Error::Config(format!("failed to write {}: {e}", path.display())))?;

    Ok(path)
}
