use std::borrow::Cow;
use std::fmt::Display;

use tracing::{debug, debug_span, trace};

use crate::errors::{KeywordError, KeywordResult};
use crate::kwmap::{merge_best_keyword, KeywordMap};

/// One package version returned by a [`PackageQuery`].
///
/// The `Ord` implementation ranks versions; the highest ranked candidate is the one a package
/// manager would pick.
pub trait Candidate: Ord + Display {
    /// The raw, space separated `KEYWORDS` value as published by the repository. An installed
    /// copy's keywords must not be preferred over the repository's.
    fn keywords(&self) -> KeywordResult<Option<Cow<'_, str>>>;
}

impl<C: Candidate + ?Sized> Candidate for &C {
    fn keywords(&self) -> KeywordResult<Option<Cow<'_, str>>> {
        (**self).keywords()
    }
}

/// Finds the package versions matching a dependency atom.
pub trait PackageQuery {
    type Candidate<'a>: Candidate
    where
        Self: 'a;

    /// Every version matching `atom`, masked ones included. An atom matching nothing yields an
    /// empty list rather than an error.
    fn find<'a>(&'a self, atom: &str) -> KeywordResult<Vec<Self::Candidate<'a>>>;
}

/// Resolve a single atom to the best keyword each architecture can reach through any matching
/// version.
pub fn parse_atom<Q>(query: &Q, atom: &str) -> KeywordResult<KeywordMap>
where
    Q: PackageQuery + ?Sized,
{
    let _span = debug_span!("atom", %atom).entered();

    let mut matches = query.find(atom)?;
    if matches.is_empty() {
        return Err(KeywordError::NoMatches {
            atom: atom.to_string(),
        }
        .into());
    }

    matches.sort();

    let mut ret = KeywordMap::new();
    for candidate in &matches {
        let keywords = candidate.keywords()?;
        trace!(%candidate, keywords = keywords.as_deref().unwrap_or_default());

        for keyword in keywords.iter().flat_map(|keywords| keywords.split_whitespace()) {
            merge_best_keyword(&mut ret, keyword);
        }
    }

    debug!(result = ?ret);
    Ok(ret)
}
