use std::iter::Peekable;
use std::vec::IntoIter;

use kwtool_lexer::{spanned_tokens, TokenKind};

use crate::dep::DepToken;
use crate::parser::{ParseError, ParseErrorKind, SyntaxResult};

struct Parser<'text> {
    /// Token kind, byte offset and text
    iter: Peekable<IntoIter<(TokenKind, usize, &'text str)>>,
}

impl<'text> Parser<'text> {
    fn eat_ws(&mut self) {
        while self
            .iter
            .peek()
            .map(|&(kind, _, _)| kind.is_whitespace())
            .unwrap_or(false)
        {
            self.iter.next();
        }
    }

    /// Markers only make sense in front of a parenthesized group
    fn expect_group(&mut self, marker: &str, offset: usize) -> SyntaxResult<()> {
        self.eat_ws();
        match self.iter.peek() {
            Some(&(TokenKind::OpenParenthesis, _, _)) => Ok(()),
            // Report the bad token itself rather than the marker in front of it
            Some(&(TokenKind::Error(e), offset, _)) => Err(ParseError {
                offset,
                kind: e.into(),
            }),
            _ => Err(ParseError {
                offset,
                kind: ParseErrorKind::MissingGroup(marker.to_string()),
            }),
        }
    }

    /// Parse tokens up to the matching ')' (when `open` holds the offset of the '(' that started
    /// this group) or the end of input.
    fn parse_sequence(&mut self, open: Option<usize>) -> SyntaxResult<Vec<DepToken>> {
        let mut ret = vec![];

        while let Some((kind, offset, text)) = self.iter.next() {
            match kind {
                TokenKind::Whitespace => {}
                TokenKind::OpenParenthesis => {
                    ret.push(DepToken::Group(self.parse_sequence(Some(offset))?));
                }
                TokenKind::CloseParenthesis => {
                    return match open {
                        Some(_) => Ok(ret),
                        None => Err(ParseError {
                            offset,
                            kind: ParseErrorKind::UnexpectedCloseParenthesis,
                        }),
                    };
                }
                TokenKind::AnyOf => {
                    self.expect_group(text, offset)?;
                    ret.push(DepToken::AnyOf);
                }
                TokenKind::UseConditional => {
                    self.expect_group(text, offset)?;
                    ret.push(DepToken::UseConditional(text.to_string()));
                }
                TokenKind::Blocker => ret.push(DepToken::Blocker(text.to_string())),
                TokenKind::Atom => ret.push(DepToken::Atom(text.to_string())),
                TokenKind::Error(e) => {
                    return Err(ParseError {
                        offset,
                        kind: e.into(),
                    });
                }
                TokenKind::EndOfInput => break,
            }
        }

        match open {
            Some(offset) => Err(ParseError {
                offset,
                kind: ParseErrorKind::UnbalancedParenthesis,
            }),
            None => Ok(ret),
        }
    }
}

/// Reduce a raw dependency specification (as found in `DEPEND` and friends) into nested
/// [`DepToken`] sequences, one level of nesting per pair of parentheses.
///
/// # Example
///
/// ```
/// use kwtool_syntax::{paren_reduce, DepToken};
///
/// let tokens = paren_reduce("a || ( b c )").unwrap();
/// assert_eq!(
///     tokens,
///     vec![
///         DepToken::atom("a"),
///         DepToken::AnyOf,
///         DepToken::group([DepToken::atom("b"), DepToken::atom("c")]),
///     ]
/// );
/// ```
pub fn paren_reduce(input: &str) -> SyntaxResult<Vec<DepToken>> {
    let tokens: Vec<_> = spanned_tokens(input)
        .into_iter()
        .map(|(token, span)| (token.kind, span.start, &input[span]))
        .collect();

    let mut parser = Parser {
        iter: tokens.into_iter().peekable(),
    };

    parser.parse_sequence(None)
}
