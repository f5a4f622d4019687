//! Caller-supplied path handling.

use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

use k8s_shared_types::{ManagerError, Result};

/// Expand a leading `~`, then make the path absolute with `.` and `..`
/// resolved lexically (symlinks are not followed).
pub fn resolve_directory(raw: &str) -> Result<PathBuf> {
    let expanded = expand_home(raw);
    let absolute = expanded
        .absolutize()
        .map_err(|e| ManagerError::from_io(raw, e))?;
    Ok(absolute.into_owned())
}

fn expand_home(raw: &str) -> PathBuf {
    let home = match dirs::home_dir() {
        Some(home) => home,
        None => return PathBuf::from(raw),
    };

    if raw == "~" {
        home
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    }
}

/// The name a manifest is reported under: everything after the last `/`.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Case-sensitive `.yaml` / `.yml` suffix check.
pub fn is_manifest_name(file_name: &str) -> bool {
    file_name.ends_with(".yaml") || file_name.ends_with(".yml")
}

pub(crate) fn display(path: &Path) -> String {
    path.display().to_string()
}
