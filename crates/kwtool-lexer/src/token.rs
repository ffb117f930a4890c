use thiserror::Error;

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte length of token
    pub len: usize,
}

impl Token {
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    pub fn is_end_of_input(&self) -> bool {
        self.kind.is_end_of_input()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Error(LexerError),

    /// `||`
    AnyOf,
    /// A package atom, possibly versioned and carrying slot or use dependencies
    Atom,
    /// `!atom` (weak) or `!!atom` (strong)
    Blocker,
    CloseParenthesis,
    EndOfInput,
    OpenParenthesis,
    /// `flag?` or `!flag?`
    UseConditional,
    Whitespace,
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[error("{kind}")]
pub struct LexerError {
    pub kind: LexerErrorKind,
}

#[derive(Error, Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum LexerErrorKind {
    #[error("a single '|' is not an operator; any-of groups are written '||'")]
    LonePipe,
    #[error("blocker has no atom")]
    EmptyBlocker,
    #[error("parentheses must be separated from their contents by whitespace")]
    UnseparatedParenthesis,
    #[error("dependency strings may only contain ASCII characters")]
    NonAscii,
}

impl TokenKind {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self, TokenKind::EndOfInput)
    }
}
