//! Package atoms: `[op]category/package[-version[*]][:slot[/subslot][=|*]][::repo][[use,...]]`.

use std::fmt;
use std::sync::LazyLock;

use derive_more::Display;
use regex::Regex;

use crate::ebuild::Ebuild;
use crate::errors::{RepoError, RepoResult};
use crate::version::Version;

static ATOM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<op><=|>=|<|>|=|~)?",
        r"(?P<category>[A-Za-z0-9_][A-Za-z0-9+_.-]*)/",
        r"(?P<rest>[A-Za-z0-9_][A-Za-z0-9+_.-]*)(?P<glob>\*)?",
        r"(?::(?P<slot>[A-Za-z0-9_][A-Za-z0-9+_.-]*)?(?:/(?P<subslot>[A-Za-z0-9_][A-Za-z0-9+_.-]*))?(?P<slot_op>[=*])?)?",
        r"(?:::(?P<repo>[A-Za-z0-9_][A-Za-z0-9_-]*))?",
        r"(?:\[(?P<use>[^\]]*)\])?$",
    ))
    .unwrap()
});

static PACKAGE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9+_-]*$").unwrap());

/// Split `name-version` on the right-most `-` followed by a valid version.
pub fn split_package_version(text: &str) -> Option<(&str, Version)> {
    text.rmatch_indices('-').find_map(|(idx, _)| {
        let version = Version::parse(&text[idx + 1..]).ok()?;
        let name = &text[..idx];
        PACKAGE_NAME_REGEX.is_match(name).then_some((name, version))
    })
}

#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Display)]
pub enum Operator {
    #[display("<")]
    Less,
    #[display("<=")]
    LessOrEqual,
    #[display("=")]
    Equal,
    #[display("~")]
    AnyRevision,
    #[display(">=")]
    GreaterOrEqual,
    #[display(">")]
    Greater,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Operator> {
        let ret = match symbol {
            "<" => Operator::Less,
            "<=" => Operator::LessOrEqual,
            "=" => Operator::Equal,
            "~" => Operator::AnyRevision,
            ">=" => Operator::GreaterOrEqual,
            ">" => Operator::Greater,
            _ => return None,
        };
        Some(ret)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VersionConstraint {
    pub op: Operator,
    pub version: Version,
    /// `=version*`
    pub glob: bool,
}

impl VersionConstraint {
    pub fn matches(&self, version: &Version) -> bool {
        match self.op {
            Operator::Equal if self.glob => self.version.glob_matches(version),
            Operator::Equal => version == &self.version,
            Operator::AnyRevision => version.cmp_ignoring_revision(&self.version).is_eq(),
            Operator::Less => version < &self.version,
            Operator::LessOrEqual => version <= &self.version,
            Operator::GreaterOrEqual => version >= &self.version,
            Operator::Greater => version > &self.version,
        }
    }
}

/// `category/package-version`
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Cpv {
    pub category: String,
    pub package: String,
    pub version: Version,
}

impl Cpv {
    pub fn new<C: Into<String>, P: Into<String>>(category: C, package: P, version: Version) -> Cpv {
        Cpv {
            category: category.into(),
            package: package.into(),
            version,
        }
    }

    pub fn parse(text: &str) -> RepoResult<Cpv> {
        let invalid = |reason| RepoError::InvalidAtom {
            atom: text.to_string(),
            reason,
        };

        let (category, rest) = text.split_once('/').ok_or_else(|| invalid("missing category"))?;
        let (package, version) =
            split_package_version(rest).ok_or_else(|| invalid("missing version"))?;

        Ok(Cpv::new(category, package, version))
    }

    /// `category/package`
    pub fn cpn(&self) -> String {
        format!("{}/{}", self.category, self.package)
    }
}

impl fmt::Display for Cpv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}-{}", self.category, self.package, self.version)
    }
}

/// A parsed dependency atom. Use dependencies and the repository name are kept but do not take
/// part in matching.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Atom {
    pub category: String,
    pub package: String,
    pub version: Option<VersionConstraint>,
    pub slot: Option<String>,
    pub subslot: Option<String>,
    pub repository: Option<String>,
    pub use_deps: Vec<String>,
    text: String,
}

impl Atom {
    pub fn parse<S: AsRef<str>>(text: S) -> RepoResult<Atom> {
        let text = text.as_ref();
        let invalid = |reason| RepoError::InvalidAtom {
            atom: text.to_string(),
            reason,
        };

        if !text.contains('/') {
            return Err(invalid("missing category").into());
        }

        let captures = ATOM_REGEX
            .captures(text)
            .ok_or_else(|| invalid("malformed atom"))?;

        let op = captures
            .name("op")
            .and_then(|op| Operator::from_symbol(op.as_str()));
        let glob = captures.name("glob").is_some();
        let rest = &captures["rest"];

        let (package, version) = match op {
            Some(op) => {
                let (package, version) =
                    split_package_version(rest).ok_or_else(|| invalid("operator without version"))?;
                if glob && op != Operator::Equal {
                    return Err(invalid("version glob requires '='").into());
                }
                (
                    package.to_string(),
                    Some(VersionConstraint { op, version, glob }),
                )
            }
            None if glob => return Err(invalid("version glob requires '='").into()),
            None if split_package_version(rest).is_some() => {
                return Err(invalid("version without operator").into());
            }
            None if !PACKAGE_NAME_REGEX.is_match(rest) => {
                return Err(invalid("invalid package name").into());
            }
            None => (rest.to_string(), None),
        };

        let use_deps = captures
            .name("use")
            .map(|use_deps| {
                use_deps
                    .as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|flag| !flag.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Atom {
            category: captures["category"].to_string(),
            package,
            version,
            slot: captures.name("slot").map(|slot| slot.as_str().to_string()),
            subslot: captures
                .name("subslot")
                .map(|subslot| subslot.as_str().to_string()),
            repository: captures.name("repo").map(|repo| repo.as_str().to_string()),
            use_deps,
            text: text.to_string(),
        })
    }

    /// `category/package`
    pub fn cpn(&self) -> String {
        format!("{}/{}", self.category, self.package)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, ebuild: &Ebuild) -> bool {
        let cpv = ebuild.cpv();
        if cpv.category != self.category || cpv.package != self.package {
            return false;
        }

        if let Some(constraint) = &self.version {
            if !constraint.matches(&cpv.version) {
                return false;
            }
        }

        if let Some(slot) = &self.slot {
            if ebuild.slot() != slot {
                return false;
            }
        }

        match &self.subslot {
            Some(subslot) => ebuild.subslot() == subslot,
            None => true,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
