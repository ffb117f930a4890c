use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("invalid version '{0}'")]
    InvalidVersion(String),

    #[error("invalid atom '{atom}': {reason}")]
    InvalidAtom { atom: String, reason: &'static str },

    #[error("{} is not named after its package", path.display())]
    InvalidEbuildName { path: PathBuf },

    #[error("unable to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type RepoResult<T> = anyhow::Result<T>;
