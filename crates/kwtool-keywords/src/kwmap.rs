use derive_more::Display;
use indexmap::IndexMap;

use crate::keyword::{best_keyword, make_stable, worst_keyword};

/// Architecture name (without sigil) mapped to the keyword chosen for it. Iteration follows the
/// order in which architectures were first seen.
pub type KeywordMap = IndexMap<String, String>;

/// How sibling results at one nesting level are merged.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Display)]
pub enum Combine {
    /// Every operand is required: intersect architectures, keep the worst keyword
    #[display("all-of")]
    All,
    /// Any operand suffices: unite architectures, keep the best keyword
    #[display("any-of")]
    Any,
}

impl From<bool> for Combine {
    fn from(combine: bool) -> Self {
        match combine {
            true => Combine::Any,
            false => Combine::All,
        }
    }
}

/// Merge `other` into `target`. Only `target` is modified.
pub fn combine_kwdicts(target: &mut KeywordMap, other: &KeywordMap, combine: Combine) {
    match combine {
        Combine::Any => {
            for (arch, keyword) in other {
                match target.get_mut(arch) {
                    Some(existing) => {
                        let best = best_keyword(existing, keyword).to_string();
                        *existing = best;
                    }
                    None => {
                        target.insert(arch.clone(), keyword.clone());
                    }
                }
            }
        }
        Combine::All => {
            // An architecture missing from either side cannot satisfy both. Removal is deferred
            // until the scan is done.
            let mut unsupported = vec![];
            for (arch, existing) in target.iter_mut() {
                match other.get(arch) {
                    Some(keyword) => {
                        let worst = worst_keyword(keyword, existing).to_string();
                        *existing = worst;
                    }
                    None => unsupported.push(arch.clone()),
                }
            }

            for arch in unsupported {
                target.shift_remove(&arch);
            }
        }
    }
}

/// Record one keyword, keeping the better of it and any keyword already held for the same
/// architecture.
pub fn merge_best_keyword(target: &mut KeywordMap, keyword: &str) {
    let arch = make_stable(keyword);
    match target.get_mut(arch) {
        Some(existing) => {
            let best = best_keyword(existing, keyword).to_string();
            *existing = best;
        }
        None => {
            target.insert(arch.to_string(), keyword.to_string());
        }
    }
}
