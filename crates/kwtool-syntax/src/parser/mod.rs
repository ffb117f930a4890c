use kwtool_lexer::LexerError;
use thiserror::Error;

pub mod parser;

pub use parser::paren_reduce;

#[derive(Error, Debug, Eq, PartialEq)]
#[error("{offset}: {kind}")]
pub struct ParseError {
    /// Byte offset of the offending token
    pub offset: usize,
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error("unexpected ')'")]
    UnexpectedCloseParenthesis,
    #[error("'(' is never closed")]
    UnbalancedParenthesis,
    #[error("'{0}' must be followed by a parenthesized group")]
    MissingGroup(String),
}

pub type SyntaxResult<T> = Result<T, ParseError>;
