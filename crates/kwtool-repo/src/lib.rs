//! Reads a Gentoo-style ebuild tree and answers [`PackageQuery`](kwtool_keywords::PackageQuery)
//! lookups against it.
pub mod atom;
pub mod ebuild;
pub mod errors;
pub mod repository;
pub mod version;

pub use atom::{Atom, Cpv, Operator, VersionConstraint};
pub use ebuild::{Ebuild, DEPEND_VARIABLES};
pub use errors::{RepoError, RepoResult};
pub use repository::Repository;
pub use version::Version;
