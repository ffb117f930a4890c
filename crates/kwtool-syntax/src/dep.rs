use std::fmt;

use itertools::Itertools;

/// One element of a parenthesis-reduced dependency specification.
///
/// Markers (`||` and `flag?`) are kept as separate elements immediately followed by the
/// [`DepToken::Group`] they govern, mirroring the flat-with-nesting layout of the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepToken {
    /// e.g. `>=dev-libs/openssl-3:0=`
    Atom(String),
    /// e.g. `!dev-libs/libressl`, including the leading `!` or `!!`
    Blocker(String),
    /// e.g. `ssl?` or `!test?`, including the trailing `?`
    UseConditional(String),
    /// `||`
    AnyOf,
    /// A parenthesized sub-expression
    Group(Vec<DepToken>),
}

impl DepToken {
    pub fn atom<S: Into<String>>(atom: S) -> Self {
        DepToken::Atom(atom.into())
    }

    pub fn group<I: IntoIterator<Item = DepToken>>(tokens: I) -> Self {
        DepToken::Group(tokens.into_iter().collect())
    }

    /// Name of the flag governing a use-conditional, with the negation reported separately.
    pub fn use_flag(&self) -> Option<(&str, bool)> {
        match self {
            DepToken::UseConditional(text) => {
                let flag = text.strip_suffix('?').unwrap_or(text);
                match flag.strip_prefix('!') {
                    Some(flag) => Some((flag, true)),
                    None => Some((flag, false)),
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for DepToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepToken::Atom(text) | DepToken::Blocker(text) | DepToken::UseConditional(text) => {
                f.write_str(text)
            }
            DepToken::AnyOf => f.write_str("||"),
            DepToken::Group(tokens) if tokens.is_empty() => f.write_str("( )"),
            DepToken::Group(tokens) => write!(f, "( {} )", tokens.iter().join(" ")),
        }
    }
}

/// Render a reduced specification back into normalized source form.
pub fn to_dep_string(tokens: &[DepToken]) -> String {
    tokens.iter().join(" ")
}
