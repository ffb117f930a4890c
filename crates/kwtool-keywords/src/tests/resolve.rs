use pretty_assertions::assert_eq;

use crate::errors::KeywordError;
use crate::resolve::parse_atom;
use crate::tests::expected;
use crate::tests::mock::test_repository;

#[test]
fn all_stable() {
    let repo = test_repository();
    let kwd = parse_atom(&repo, "dev-test/dep-a").unwrap();
    assert_eq!(
        kwd,
        expected(&[("alpha", "alpha"), ("arm", "arm"), ("x86", "x86")])
    );
}

#[test]
fn partly_unstable() {
    let repo = test_repository();
    assert_eq!(
        parse_atom(&repo, "dev-test/dep-b").unwrap(),
        expected(&[("alpha", "~alpha"), ("arm", "arm"), ("x86", "x86")])
    );
    assert_eq!(
        parse_atom(&repo, "dev-test/dep-c").unwrap(),
        expected(&[("alpha", "~alpha"), ("arm", "~arm"), ("x86", "x86")])
    );
}

#[test_log::test]
fn best_across_versions() {
    let repo = test_repository();
    let kwd = parse_atom(&repo, "dev-test/dep-d").unwrap();

    assert_eq!(
        kwd,
        expected(&[("alpha", "alpha"), ("arm", "~arm"), ("ppc", "~ppc")])
    );

    // Versions are visited oldest first, so the architectures appear in that order
    assert_eq!(kwd.keys().collect::<Vec<_>>(), vec!["alpha", "arm", "ppc"]);
}

#[test]
fn no_keywords_is_not_an_error() {
    let repo = test_repository();
    assert!(parse_atom(&repo, "dev-test/no-keywords").unwrap().is_empty());
}

#[test]
fn no_matches() {
    let repo = test_repository();
    let err = parse_atom(&repo, "dev-test/missing").unwrap_err();
    assert_eq!(
        err.downcast_ref::<KeywordError>(),
        Some(&KeywordError::NoMatches {
            atom: "dev-test/missing".into()
        })
    );
}

#[test]
fn backend_errors_propagate() {
    let repo = test_repository().broken("dev-test/dep-a");
    let err = parse_atom(&repo, "dev-test/dep-a").unwrap_err();
    assert!(err.downcast_ref::<KeywordError>().is_none());
    assert!(err.to_string().contains("backend unavailable"));
}
