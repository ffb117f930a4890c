use pretty_assertions::assert_eq;

use crate::lexer::{spanned_tokens, tokenize, DepLexer};
use crate::token::{LexerError, LexerErrorKind, TokenKind};

fn lex(input: &str) -> Vec<(TokenKind, &str)> {
    spanned_tokens(input)
        .into_iter()
        .map(|(token, span)| (token.kind, &input[span]))
        .collect()
}

fn error(kind: LexerErrorKind) -> TokenKind {
    TokenKind::Error(LexerError { kind })
}

#[test]
fn empty() {
    assert!(tokenize("").is_empty());
}

#[test]
fn plain_atoms() {
    assert_eq!(
        lex("dev-libs/a  >=dev-libs/b-1.0:2="),
        vec![
            (TokenKind::Atom, "dev-libs/a"),
            (TokenKind::Whitespace, "  "),
            (TokenKind::Atom, ">=dev-libs/b-1.0:2="),
        ]
    );
}

#[test]
fn any_of_group() {
    assert_eq!(
        lex("|| ( a b )"),
        vec![
            (TokenKind::AnyOf, "||"),
            (TokenKind::Whitespace, " "),
            (TokenKind::OpenParenthesis, "("),
            (TokenKind::Whitespace, " "),
            (TokenKind::Atom, "a"),
            (TokenKind::Whitespace, " "),
            (TokenKind::Atom, "b"),
            (TokenKind::Whitespace, " "),
            (TokenKind::CloseParenthesis, ")"),
        ]
    );
}

#[test]
fn use_conditionals() {
    assert_eq!(
        lex("ssl? ( a ) !test? ( b )"),
        vec![
            (TokenKind::UseConditional, "ssl?"),
            (TokenKind::Whitespace, " "),
            (TokenKind::OpenParenthesis, "("),
            (TokenKind::Whitespace, " "),
            (TokenKind::Atom, "a"),
            (TokenKind::Whitespace, " "),
            (TokenKind::CloseParenthesis, ")"),
            (TokenKind::Whitespace, " "),
            (TokenKind::UseConditional, "!test?"),
            (TokenKind::Whitespace, " "),
            (TokenKind::OpenParenthesis, "("),
            (TokenKind::Whitespace, " "),
            (TokenKind::Atom, "b"),
            (TokenKind::Whitespace, " "),
            (TokenKind::CloseParenthesis, ")"),
        ]
    );
}

#[test]
fn blockers() {
    assert_eq!(
        lex("!dev-libs/a !!<dev-libs/b-2"),
        vec![
            (TokenKind::Blocker, "!dev-libs/a"),
            (TokenKind::Whitespace, " "),
            (TokenKind::Blocker, "!!<dev-libs/b-2"),
        ]
    );
}

#[test]
fn parentheses_inside_use_deps() {
    assert_eq!(
        lex("dev-libs/a[foo(+),-bar(-)]"),
        vec![(TokenKind::Atom, "dev-libs/a[foo(+),-bar(-)]")]
    );
}

#[test]
fn multiline() {
    assert_eq!(
        lex("\n\ta\n\tb\n"),
        vec![
            (TokenKind::Whitespace, "\n\t"),
            (TokenKind::Atom, "a"),
            (TokenKind::Whitespace, "\n\t"),
            (TokenKind::Atom, "b"),
            (TokenKind::Whitespace, "\n"),
        ]
    );
}

#[test]
fn skip_whitespace() {
    let mut lexer = DepLexer::new("  a   ( b ) ", true);
    let mut kinds = vec![];
    while !lexer.token().is_end_of_input() {
        kinds.push(lexer.token().kind);
        lexer.advance();
    }

    assert_eq!(
        kinds,
        vec![
            TokenKind::Atom,
            TokenKind::OpenParenthesis,
            TokenKind::Atom,
            TokenKind::CloseParenthesis,
        ]
    );
}

#[test]
fn lone_pipe() {
    assert_eq!(
        lex("a | b"),
        vec![
            (TokenKind::Atom, "a"),
            (TokenKind::Whitespace, " "),
            (error(LexerErrorKind::LonePipe), "|"),
        ]
    );

    assert_eq!(lex("||a"), vec![(error(LexerErrorKind::LonePipe), "||a")]);
}

#[test]
fn empty_blocker() {
    assert_eq!(lex("!"), vec![(error(LexerErrorKind::EmptyBlocker), "!")]);
    assert_eq!(
        lex("!! a"),
        vec![(error(LexerErrorKind::EmptyBlocker), "!!")]
    );
}

#[test]
fn non_ascii_stops_lexing() {
    assert_eq!(
        lex("a \u{fc}ber b"),
        vec![
            (TokenKind::Atom, "a"),
            (TokenKind::Whitespace, " "),
            (error(LexerErrorKind::NonAscii), ""),
        ]
    );

    assert_eq!(
        lex("ab\u{fc}"),
        vec![(error(LexerErrorKind::NonAscii), "ab")]
    );
}

#[test]
fn unseparated_parenthesis() {
    assert_eq!(
        lex("( a )b"),
        vec![
            (TokenKind::OpenParenthesis, "("),
            (TokenKind::Whitespace, " "),
            (TokenKind::Atom, "a"),
            (TokenKind::Whitespace, " "),
            (error(LexerErrorKind::UnseparatedParenthesis), ")b"),
        ]
    );

    assert_eq!(
        lex("|| (a b )"),
        vec![
            (TokenKind::AnyOf, "||"),
            (TokenKind::Whitespace, " "),
            (error(LexerErrorKind::UnseparatedParenthesis), "(a"),
        ]
    );
}
