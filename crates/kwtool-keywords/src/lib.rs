//!
//! ## Introduction
//! Every package version in a Gentoo-style repository carries a `KEYWORDS` value listing the
//! architectures it is known to work on, and how much it is trusted there. This crate answers the
//! question: given a dependency specification, what is the best keyword each architecture can
//! achieve for the *whole* specification?
//!
//! ## Keywords
//! ```text
//! KEYWORDS="amd64 ~arm64 -sparc"
//! ```
//!
//! - `amd64` is **stable**.
//! - `~arm64` is **unstable** (soft-masked): usable by those accepting testing packages.
//! - `-sparc` is **hard-masked**: known broken.
//!
//! Stripping the sigil gives the **architecture name**. An architecture missing entirely is
//! simply unsupported. See [`keyword`] for the ordering between the three states.
//!
//! ## Combining
//! A dependency specification mixes two ways of combining requirements:
//!
//! ```text
//! dev-libs/a || ( dev-libs/b dev-libs/c ) ssl? ( dev-libs/openssl )
//! ```
//!
//! - Siblings at the top level, inside plain parentheses and inside use-conditional groups are
//!   **all-of**: every one is needed. An architecture survives only if every sibling supports it,
//!   and it gets the *worst* of their keywords.
//! - Siblings directly inside `|| ( )` are **any-of**: one is enough. Architectures from every
//!   sibling are kept, each with the *best* keyword any sibling offers.
//!
//! A single atom may match several versions. Any of them could be chosen, so the versions of one
//! atom are always merged any-of, regardless of the surrounding mode.
//!
//! ## Package lookup
//! Atoms are resolved through the [`PackageQuery`] trait; this crate does no version matching of
//! its own. `kwtool-repo` provides an implementation backed by an ebuild tree.
pub mod errors;
pub mod evaluate;
pub mod keyword;
pub mod kwmap;
pub mod resolve;

#[cfg(test)]
mod tests;

pub use errors::{KeywordError, KeywordResult};
pub use evaluate::parse_list;
pub use keyword::{best_keyword, make_stable, worst_keyword, Stability};
pub use kwmap::{combine_kwdicts, Combine, KeywordMap};
pub use resolve::{parse_atom, Candidate, PackageQuery};
