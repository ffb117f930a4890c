use std::ops::Range;

use muncher::Muncher;

use crate::token::{LexerError, LexerErrorKind, Token, TokenKind};

pub type Span = Range<usize>;

/// Dependency specifications are whitespace separated, and ebuild assignments routinely span
/// several lines, so newlines are ordinary separators here.
pub fn is_dep_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[derive(Debug, Eq, PartialEq)]
enum ScannedWord {
    /// The word ended cleanly; holds its final character
    Complete(char),
    NonAscii,
}

/// Eats the remainder of a whitespace-delimited word. Parentheses inside a word (e.g. the `(+)`
/// default markers in `foo[bar(+)]`) belong to the word; a word may not start with one.
#[inline]
fn scan_word(first_char: char, m: &mut Muncher) -> ScannedWord {
    let mut last_char = first_char;
    loop {
        let next = m.peek().copied();
        m.reset_peek();
        match next {
            None => break,
            Some(c) if is_dep_whitespace(c) => break,
            Some(c) if !c.is_ascii() => return ScannedWord::NonAscii,
            Some(c) => {
                m.eat();
                last_char = c;
            }
        }
    }

    ScannedWord::Complete(last_char)
}

#[inline]
fn at_word_boundary(m: &mut Muncher) -> bool {
    let next = m.peek().copied();
    m.reset_peek();
    next.map_or(true, is_dep_whitespace)
}

pub struct DepLexer<'input> {
    muncher: Muncher<'input>,
    pub(crate) token: Token,
    skip_whitespace: bool,
    /// Set once an error token has been produced; positions past a bad character are not
    /// meaningful so lexing stops there.
    failed: bool,
}

impl<'input> DepLexer<'input> {
    pub fn new(input: &'input str, skip_whitespace: bool) -> DepLexer<'input> {
        let mut ret = DepLexer {
            muncher: Muncher::new(input),
            token: Token {
                kind: TokenKind::EndOfInput,
                len: 0,
            },
            skip_whitespace,
            failed: false,
        };
        ret.advance();
        ret
    }

    pub fn token(&self) -> Token {
        self.token.clone()
    }

    pub fn advance(&mut self) {
        self._advance_internal();

        if self.skip_whitespace && self.token.is_whitespace() {
            self.advance();
        }
    }

    fn _error(&mut self, kind: LexerErrorKind, len: usize) -> Token {
        self.failed = true;
        Token {
            kind: TokenKind::Error(LexerError { kind }),
            len,
        }
    }

    fn _word_token(&mut self, start: usize, word: ScannedWord, kind: TokenKind) -> Token {
        let len = self.muncher.position() - start;
        match word {
            ScannedWord::NonAscii => self._error(LexerErrorKind::NonAscii, len),
            ScannedWord::Complete('?') => Token {
                kind: TokenKind::UseConditional,
                len,
            },
            ScannedWord::Complete(_) => Token { kind, len },
        }
    }

    fn _advance_internal(&mut self) {
        if self.failed {
            self.token = Token {
                kind: TokenKind::EndOfInput,
                len: 0,
            };
            return;
        }

        let start = self.muncher.position();
        let Some(c) = self.muncher.eat() else {
            self.token = Token {
                kind: TokenKind::EndOfInput,
                len: 0,
            };
            return;
        };

        if !c.is_ascii() {
            // Nothing of the offending character is reported so spans stay on char boundaries
            self.token = self._error(LexerErrorKind::NonAscii, 0);
            return;
        }

        if is_dep_whitespace(c) {
            let whitespace = self.muncher.eat_until_count(|c| !is_dep_whitespace(*c));
            self.token = Token {
                kind: TokenKind::Whitespace,
                len: whitespace.1 - start,
            };
            return;
        }

        self.token = match c {
            '(' if at_word_boundary(&mut self.muncher) => Token {
                kind: TokenKind::OpenParenthesis,
                len: 1,
            },
            ')' if at_word_boundary(&mut self.muncher) => Token {
                kind: TokenKind::CloseParenthesis,
                len: 1,
            },
            '(' | ')' => {
                self.muncher.eat_until_count(|c| is_dep_whitespace(*c));
                let len = self.muncher.position() - start;
                self._error(LexerErrorKind::UnseparatedParenthesis, len)
            }
            '|' => {
                let second = self.muncher.peek().copied();
                self.muncher.reset_peek();
                if second == Some('|') {
                    self.muncher.eat();
                    if at_word_boundary(&mut self.muncher) {
                        self.token = Token {
                            kind: TokenKind::AnyOf,
                            len: 2,
                        };
                        return;
                    }
                }

                self.muncher.eat_until_count(|c| is_dep_whitespace(*c));
                let len = self.muncher.position() - start;
                self._error(LexerErrorKind::LonePipe, len)
            }
            '!' => {
                let second = self.muncher.peek().copied();
                self.muncher.reset_peek();
                if second == Some('!') {
                    self.muncher.eat();
                }

                if at_word_boundary(&mut self.muncher) {
                    let len = self.muncher.position() - start;
                    self._error(LexerErrorKind::EmptyBlocker, len)
                } else {
                    // `!flag?` is a negated use-conditional rather than a blocker
                    let word = scan_word(c, &mut self.muncher);
                    self._word_token(start, word, TokenKind::Blocker)
                }
            }
            _ => {
                let word = scan_word(c, &mut self.muncher);
                self._word_token(start, word, TokenKind::Atom)
            }
        };
    }
}

pub fn tokenize(data: &str) -> Vec<Token> {
    let mut lexer = DepLexer::new(data, false);

    let mut ret = vec![];

    while !lexer.token().is_end_of_input() {
        ret.push(lexer.token());
        lexer.advance();
    }

    ret
}

/// Like [`tokenize`], but pairs each token with its byte range in `data`.
pub fn spanned_tokens(data: &str) -> Vec<(Token, Span)> {
    tokenize(data)
        .into_iter()
        .scan(0, |offset, token| {
            let start = *offset;
            *offset += token.len;
            Some((token, start..*offset))
        })
        .collect()
}
