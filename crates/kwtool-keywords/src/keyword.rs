use derive_more::Display;

/// Mask state carried by a keyword's leading sigil.
///
/// Variants are declared worst to best, so the derived `Ord` ranks `Stable` highest.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash, Display)]
pub enum Stability {
    /// `-arch`
    #[display("hard-masked")]
    HardMasked,
    /// `~arch`
    #[display("unstable")]
    Unstable,
    /// `arch`
    #[display("stable")]
    Stable,
}

impl Stability {
    pub fn of(keyword: &str) -> Stability {
        match keyword.chars().next() {
            Some('-') => Stability::HardMasked,
            Some('~') => Stability::Unstable,
            _ => Stability::Stable,
        }
    }
}

/// Returns whichever of two keywords for the same architecture is least restrictive.
///
/// When both rank the same, `kw1` is returned.
pub fn best_keyword<'a>(kw1: &'a str, kw2: &'a str) -> &'a str {
    match (Stability::of(kw1), Stability::of(kw2)) {
        // Nothing beats an unmasked keyword
        (Stability::Stable, _) => kw1,
        (Stability::HardMasked, other) if other != Stability::HardMasked => kw2,
        (Stability::Unstable, Stability::Stable) => kw2,
        _ => kw1,
    }
}

/// Returns whichever of two keywords for the same architecture is most restrictive.
///
/// When both rank the same, `kw2` is returned.
pub fn worst_keyword<'a>(kw1: &'a str, kw2: &'a str) -> &'a str {
    match (Stability::of(kw1), Stability::of(kw2)) {
        (Stability::HardMasked, _) => kw1,
        (Stability::Unstable, Stability::Stable) => kw1,
        _ => kw2,
    }
}

/// Strips the mask sigil, leaving the architecture name.
pub fn make_stable(keyword: &str) -> &str {
    keyword
        .strip_prefix(|c| c == '~' || c == '-')
        .unwrap_or(keyword)
}
