//! Package versions and their ordering, following the version comparison algorithm of the
//! Package Manager Specification.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use derive_more::Display;
use itertools::EitherOrBoth::{Both, Left, Right};
use itertools::Itertools;
use regex::Regex;

use crate::errors::{RepoError, RepoResult};

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<numbers>[0-9]+(?:\.[0-9]+)*)(?P<letter>[a-z])?(?P<suffixes>(?:_(?:alpha|beta|pre|rc|p)[0-9]*)*)(?:-r(?P<revision>[0-9]+))?$",
    )
    .unwrap()
});

static SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(?P<kind>alpha|beta|pre|rc|p)(?P<number>[0-9]*)").unwrap());

/// Declared in ascending order. A version without a suffix sorts between `Rc` and `P`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash, Display)]
pub enum SuffixKind {
    #[display("alpha")]
    Alpha,
    #[display("beta")]
    Beta,
    #[display("pre")]
    Pre,
    #[display("rc")]
    Rc,
    #[display("p")]
    P,
}

impl SuffixKind {
    fn from_name(s: &str) -> Option<SuffixKind> {
        let ret = match s {
            "alpha" => SuffixKind::Alpha,
            "beta" => SuffixKind::Beta,
            "pre" => SuffixKind::Pre,
            "rc" => SuffixKind::Rc,
            "p" => SuffixKind::P,
            _ => return None,
        };
        Some(ret)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Suffix {
    pub kind: SuffixKind,
    /// Digits following the suffix, possibly empty
    pub number: String,
}

#[derive(Debug, Clone)]
pub struct Version {
    text: String,
    numbers: Vec<String>,
    letter: Option<char>,
    suffixes: Vec<Suffix>,
    /// Digits of `-rN`, empty when there is no revision
    revision: String,
}

/// Compare two digit strings as arbitrarily large integers. The empty string counts as zero.
fn cmp_int(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Components after the first: a leading zero switches to a string comparison with trailing
/// zeros removed, so `1.01 < 1.1` and `1.1 == 1.10` do not both hold as they would numerically.
fn cmp_components(a: &[String], b: &[String]) -> Ordering {
    for pair in a.iter().zip_longest(b) {
        let ord = match pair {
            Both(x, y) if x.starts_with('0') || y.starts_with('0') => {
                x.trim_end_matches('0').cmp(y.trim_end_matches('0'))
            }
            Both(x, y) => cmp_int(x, y),
            Left(_) => Ordering::Greater,
            Right(_) => Ordering::Less,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}

fn cmp_suffixes(a: &[Suffix], b: &[Suffix]) -> Ordering {
    for pair in a.iter().zip_longest(b) {
        let ord = match pair {
            Both(x, y) => x
                .kind
                .cmp(&y.kind)
                .then_with(|| cmp_int(&x.number, &y.number)),
            // Only a patch suffix ranks above no suffix at all
            Left(x) if x.kind == SuffixKind::P => Ordering::Greater,
            Left(_) => Ordering::Less,
            Right(y) if y.kind == SuffixKind::P => Ordering::Less,
            Right(_) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}

impl Version {
    pub fn parse<S: AsRef<str>>(text: S) -> RepoResult<Version> {
        let text = text.as_ref();
        let captures = VERSION_REGEX
            .captures(text)
            .ok_or_else(|| RepoError::InvalidVersion(text.to_string()))?;

        let numbers = captures["numbers"].split('.').map(String::from).collect();
        let letter = captures
            .name("letter")
            .and_then(|letter| letter.as_str().chars().next());
        let suffixes = SUFFIX_REGEX
            .captures_iter(&captures["suffixes"])
            .filter_map(|suffix| {
                Some(Suffix {
                    kind: SuffixKind::from_name(&suffix["kind"])?,
                    number: suffix["number"].to_string(),
                })
            })
            .collect();
        let revision = captures
            .name("revision")
            .map_or_else(String::new, |revision| revision.as_str().to_string());

        Ok(Version {
            text: text.to_string(),
            numbers,
            letter,
            suffixes,
            revision,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn has_revision(&self) -> bool {
        !self.revision.is_empty()
    }

    /// `PR`: the revision as `rN`, `r0` when absent
    pub fn revision(&self) -> String {
        match self.has_revision() {
            true => format!("r{}", self.revision),
            false => "r0".to_string(),
        }
    }

    /// `PV`: the version without its revision
    pub fn without_revision(&self) -> &str {
        match self.text.rfind("-r") {
            Some(idx) if self.has_revision() => &self.text[..idx],
            _ => &self.text,
        }
    }

    pub fn cmp_ignoring_revision(&self, other: &Version) -> Ordering {
        cmp_int(&self.numbers[0], &other.numbers[0])
            .then_with(|| cmp_components(&self.numbers[1..], &other.numbers[1..]))
            .then_with(|| self.letter.cmp(&other.letter))
            .then_with(|| cmp_suffixes(&self.suffixes, &other.suffixes))
    }

    /// Whether `other` matches `self` used as an `=version*` pattern: every component given in
    /// `self` must be present and equal in `other`.
    pub fn glob_matches(&self, other: &Version) -> bool {
        let n = self.numbers.len();
        if other.numbers.len() < n
            || cmp_int(&self.numbers[0], &other.numbers[0]) != Ordering::Equal
            || cmp_components(&self.numbers[1..], &other.numbers[1..n]) != Ordering::Equal
        {
            return false;
        }

        if self.letter.is_none() && self.suffixes.is_empty() && !self.has_revision() {
            return true;
        }

        other.text.starts_with(&self.text)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_ignoring_revision(other)
            .then_with(|| cmp_int(&self.revision, &other.revision))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
