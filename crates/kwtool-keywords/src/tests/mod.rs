mod resolve;

use indexmap::IndexMap;

use crate::kwmap::KeywordMap;

/// Build an expected map from `(arch, keyword)` pairs
pub(crate) fn expected(pairs: &[(&str, &str)]) -> KeywordMap {
    pairs
        .iter()
        .map(|(arch, keyword)| (arch.to_string(), keyword.to_string()))
        .collect::<IndexMap<_, _>>()
}
