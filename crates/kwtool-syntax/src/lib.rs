//! Parenthesis reduction of package dependency specifications.
//!
//! A specification such as
//!
//! ```text
//! dev-libs/a ssl? ( || ( dev-libs/openssl dev-libs/libressl ) )
//! ```
//!
//! becomes a sequence of [`DepToken`]s in which every parenthesized sub-expression is a nested
//! [`DepToken::Group`]. Nothing is interpreted at this stage: use-conditionals are not evaluated
//! and atoms are not validated.
pub mod dep;
pub mod parser;

pub use dep::{to_dep_string, DepToken};
pub use parser::{paren_reduce, ParseError, ParseErrorKind, SyntaxResult};
