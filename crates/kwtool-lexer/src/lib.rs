pub mod lexer;
pub mod token;

#[cfg(test)]
mod tests;

pub use lexer::{spanned_tokens, tokenize, DepLexer, Span};
pub use token::{LexerError, LexerErrorKind, Token, TokenKind};
