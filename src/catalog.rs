//! Quotes catalog scanning.
//!
//! Each author owns one directory under the quotes root; an author has an
//! avatar when `avatar.<ext>` exists for any recognized extension.
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Must match `AVATAR_EXTENSIONS` in the site's media helper.
pub const AVATAR_EXTENSIONS: [&str; 4] = ["png", "webp", "jpg", "jpeg"];

pub const AVATAR_STEM: &str = "avatar";

/// True when `dir` already holds an avatar in any recognized format.
pub fn has_avatar(dir: &Path) -> bool {
    AVATAR_EXTENSIONS
        .iter()
        .any(|ext| dir.join(format!("{AVATAR_STEM}.{ext}")).exists())
}

/// List author ids under `root` that lack an avatar, sorted by name.
///
/// A missing root is a configuration error and is returned as `Err`; the
/// caller treats it as fatal.
pub fn missing_avatars(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(anyhow!("quotes directory not found: {}", root.display()));
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("read {}", root.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", root.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let id = match entry.file_name().into_string() {
            Ok(id) => id,
            Err(raw) => {
                tracing::warn!(name = ?raw, "skipping author directory with a non-UTF-8 name");
                continue;
            }
        };
        dirs.push((id, path));
    }
    dirs.sort();

    let missing = dirs
        .into_iter()
        .filter(|(_, path)| !has_avatar(path))
        .map(|(id, _)| id)
        .collect::<Vec<_>>();
    tracing::debug!(root = %root.display(), missing = missing.len(), "catalog scanned");
    Ok(missing)
}
