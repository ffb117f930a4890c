use anyhow::Context;
use itertools::Itertools;
use kwtool_keywords::{parse_list, Combine, KeywordError, KeywordMap};
use kwtool_repo::Repository;
use kwtool_syntax::paren_reduce;
use tracing::{debug, debug_span};

use crate::KwToolResult;

/// The best keyword each architecture can reach for the newest version matching `query`, given
/// everything that version depends on. `None` when it has no dependencies.
pub fn best_keywords(repo: &Repository, query: &str) -> KwToolResult<Option<KeywordMap>> {
    let _span = debug_span!("best_keywords", %query).entered();

    let ebuild = repo
        .lookup(query)?
        .into_iter()
        .max()
        .ok_or_else(|| KeywordError::NoMatches {
            atom: query.to_string(),
        })?;
    debug!(%ebuild, "selected");

    let depends = ebuild.all_depends();
    let tokens =
        paren_reduce(&depends).with_context(|| format!("invalid dependencies in {ebuild}"))?;

    parse_list(repo, &tokens, Combine::All)
}

/// The keywords separated by spaces, in architecture order of first appearance
pub fn render(keywords: Option<&KeywordMap>) -> String {
    keywords
        .map(|keywords| keywords.values().join(" "))
        .unwrap_or_default()
}
