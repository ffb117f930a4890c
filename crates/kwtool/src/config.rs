use std::env::VarError;
use std::path::PathBuf;

use tracing::debug;

use crate::KwToolResult;

pub const DEFAULT_REPOSITORY: &str = "/var/db/repos/gentoo";

/// Environment variables naming the repository, in order of preference
pub const REPOSITORY_VARIABLES: [&str; 2] = ["KWTOOL_REPO", "PORTDIR"];

fn var(name: &str) -> KwToolResult<Option<String>> {
    match std::env::var(name) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(VarError::NotPresent) => Ok(None),
        Err(other_err) => Err(other_err.into()),
    }
}

/// The repository to read: `explicit` if given, then the first of [`REPOSITORY_VARIABLES`] that
/// is set, then [`DEFAULT_REPOSITORY`].
pub fn find_repository(explicit: Option<PathBuf>) -> KwToolResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    for name in REPOSITORY_VARIABLES {
        if let Some(val) = var(name)? {
            debug!("repository from {name}: {val}");
            return Ok(PathBuf::from(val));
        }
    }

    Ok(PathBuf::from(DEFAULT_REPOSITORY))
}
