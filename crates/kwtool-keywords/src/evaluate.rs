use kwtool_syntax::DepToken;
use tracing::{debug, debug_span, trace};

use crate::errors::{KeywordError, KeywordResult};
use crate::kwmap::{combine_kwdicts, Combine, KeywordMap};
use crate::resolve::{parse_atom, PackageQuery};

/// The group a marker governs must come right after it
fn expect_group<'t>(marker: &str, next: Option<&'t DepToken>) -> KeywordResult<&'t [DepToken]> {
    match next {
        Some(DepToken::Group(tokens)) => Ok(tokens),
        _ => Err(KeywordError::MissingGroup {
            marker: marker.to_string(),
        }
        .into()),
    }
}

/// Evaluate a reduced dependency specification into the best jointly achievable keyword for each
/// architecture.
///
/// Sibling results are folded with `combine`; nested groups pick their own mode (`||` groups are
/// [`Combine::Any`], everything else [`Combine::All`]). Returns `None` when nothing in `tokens`
/// contributed a result, e.g. an empty list or one holding only blockers.
///
/// Use-conditional groups are always required, whatever the flag: the flag itself is never
/// evaluated, so the result is the conservative requirement of having every conditional enabled.
pub fn parse_list<Q>(
    query: &Q,
    tokens: &[DepToken],
    combine: Combine,
) -> KeywordResult<Option<KeywordMap>>
where
    Q: PackageQuery + ?Sized,
{
    let _span = debug_span!("list", %combine).entered();

    let mut ret: Option<KeywordMap> = None;
    let mut cursor = tokens.iter();

    while let Some(token) = cursor.next() {
        let sub = match token {
            DepToken::Blocker(atom) => {
                trace!(%atom, "ignoring blocker");
                continue;
            }
            DepToken::UseConditional(marker) => {
                let group = expect_group(marker, cursor.next())?;
                if let Some((flag, negated)) = token.use_flag() {
                    debug!(flag, negated, "use-conditional group, required either way");
                }
                parse_list(query, group, Combine::All)?
            }
            DepToken::AnyOf => {
                let group = expect_group("||", cursor.next())?;
                parse_list(query, group, Combine::Any)?
            }
            DepToken::Group(group) => parse_list(query, group, Combine::All)?,
            DepToken::Atom(atom) => Some(parse_atom(query, atom)?),
        };

        // An empty nested group has nothing to contribute
        let Some(sub) = sub else {
            continue;
        };

        ret = Some(match ret.take() {
            // The first result stands as is
            None => sub,
            Some(mut acc) => {
                combine_kwdicts(&mut acc, &sub, combine);
                acc
            }
        });
    }

    debug!(result = ?ret);
    Ok(ret)
}
