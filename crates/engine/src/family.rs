//! Pattern families.
//!
//! A family is a group of entries that the reconciler knows how to
//! regenerate as a whole. New entries carry their [`PatternKind`], so the
//! family is a direct match. Records persisted before the pattern was stored
//! only have a display `summary`; [`infer_from_summary`] guesses the family
//! from that text.
//!
//! The summary heuristic is known to be ambiguous: a swapped addition range
//! (`12+34R`) ends in `R` like a reverse pair, and the power alias (`ပါဝါ`)
//! contains the inclusion marker `ပါ`. It is kept as it is for backward
//! compatibility with already persisted records.

use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::{BetEntry, Digit, DigitWidth, Number, PatternKind, WildSlot};

const LEADING_MARKER: &str = "ပိတ်";
const TRAILING_MARKER: &str = "ထိပ်";
const BREAK_MARKER: &str = "ဘရိတ်";
const INCLUDE_MARKER: &str = "ပါ";

/// A regenerable family, with the data needed to rebuild it around a new number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Number plus its digit reversal.
    Reverse,
    /// Every permutation (3D).
    Permute,
    /// Every permutation except `original` (3D).
    PermuteExcluding { original: Number },
    /// `*N`
    LeadingWildcard,
    /// `N*`
    TrailingWildcard,
    Break,
    Include { digit: Digit },
    Wildcard { slot: WildSlot },
}

/// Where the family came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FamilySource {
    Pattern,
    Summary,
}

impl Family {
    /// Family of a stored pattern; `None` for patterns that are not regenerated.
    #[must_use]
    pub fn from_pattern(kind: &PatternKind) -> Option<Self> {
        match kind {
            PatternKind::Reverse { .. } => Some(Family::Reverse),
            PatternKind::Permute { .. } => Some(Family::Permute),
            PatternKind::PermuteExcluding { number } => {
                Some(Family::PermuteExcluding { original: *number })
            }
            PatternKind::LeadingWildcard { .. } => Some(Family::LeadingWildcard),
            PatternKind::TrailingWildcard { .. } => Some(Family::TrailingWildcard),
            PatternKind::Break { .. } => Some(Family::Break),
            PatternKind::Include { digit } => Some(Family::Include { digit: *digit }),
            PatternKind::Wildcard { slot, .. } => Some(Family::Wildcard { slot: *slot }),
            PatternKind::Bare { .. }
            | PatternKind::Triple
            | PatternKind::HeadParity { .. }
            | PatternKind::TailParity { .. }
            | PatternKind::Alias { .. }
            | PatternKind::DigitCombos { .. }
            | PatternKind::Addition { .. } => None,
        }
    }

    /// Reverse pair or permutation families.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(
            self,
            Family::Reverse | Family::Permute | Family::PermuteExcluding { .. }
        )
    }

    /// Pattern regenerated around `new`, when `old -> new` only touches the
    /// positions this family is parameterized by.
    #[must_use]
    pub fn retarget(self, old: Number, new: Number) -> Option<PatternKind> {
        let changed = old.differing_positions(&new);
        if changed.is_empty() {
            return None;
        }
        let last = new.width().len() - 1;
        match self {
            Family::Reverse => Some(PatternKind::Reverse { number: new }),
            Family::Permute => Some(PatternKind::Permute { number: new }),
            Family::PermuteExcluding { original } => moved_like(old, original, new)
                .map(|number| PatternKind::PermuteExcluding { number }),
            Family::LeadingWildcard => (changed == [last])
                .then(|| PatternKind::LeadingWildcard {
                    digit: new.digits()[last],
                }),
            Family::TrailingWildcard => (changed == [0])
                .then(|| PatternKind::TrailingWildcard {
                    digit: new.digits()[0],
                }),
            Family::Break => Digit::new((new.digit_sum() % 10) as u8)
                .map(|digit| PatternKind::Break { digit }),
            Family::Include { digit } => {
                let owned: Vec<usize> = (0..new.width().len())
                    .filter(|p| old.digit(*p) == Some(digit))
                    .collect();
                if !changed.iter().all(|p| owned.contains(p)) {
                    return None;
                }
                let replacement = new.digit(changed[0])?;
                changed
                    .iter()
                    .all(|p| new.digit(*p) == Some(replacement))
                    .then_some(PatternKind::Include { digit: replacement })
            }
            Family::Wildcard { slot } => {
                let fixed = slot.fixed_positions();
                if !changed.iter().all(|p| fixed.contains(p)) {
                    return None;
                }
                Some(PatternKind::Wildcard {
                    slot,
                    fixed: [new.digit(fixed[0])?, new.digit(fixed[1])?],
                })
            }
        }
    }
}

/// Applies to `new` the digit arrangement that turns `old` into `original`.
fn moved_like(old: Number, original: Number, new: Number) -> Option<Number> {
    let len = old.width().len();
    let mut used = vec![false; len];
    let mut moved = Vec::with_capacity(len);
    for target in original.digits() {
        let source = (0..len).find(|i| !used[*i] && old.digit(*i) == Some(*target))?;
        used[source] = true;
        moved.push(new.digit(source)?);
    }
    Number::from_digits(&moved, new.width())
}

/// Family of a stored group.
///
/// Uses the stored pattern of the first member; falls back to the summary
/// text for legacy records.
#[must_use]
pub fn family_of(members: &[BetEntry]) -> Option<(Family, FamilySource)> {
    let first = members.first()?;
    if let Some(kind) = &first.pattern {
        return Family::from_pattern(kind).map(|family| (family, FamilySource::Pattern));
    }
    let family = infer_from_summary(&first.summary, members, first.number.width());
    if let Some(family) = family {
        warn!(summary = %first.summary, ?family, "pattern family inferred from summary text");
    }
    family.map(|family| (family, FamilySource::Summary))
}

/// Guesses a family from a display summary.
#[must_use]
pub fn infer_from_summary(
    summary: &str,
    members: &[BetEntry],
    width: DigitWidth,
) -> Option<Family> {
    let summary: String = summary.trim().nfc().collect();

    if let Some(prefix) = summary.strip_suffix("RR")
        && width == DigitWidth::Three
    {
        return Number::parse_with_width(prefix, width)
            .map(|original| Family::PermuteExcluding { original });
    }
    if summary.ends_with('R') {
        return Some(match width {
            DigitWidth::Two => Family::Reverse,
            DigitWidth::Three => Family::Permute,
        });
    }
    if summary.contains(LEADING_MARKER) {
        return Some(Family::LeadingWildcard);
    }
    if summary.ends_with('B') || summary.contains(BREAK_MARKER) {
        return Some(Family::Break);
    }
    if summary.contains(TRAILING_MARKER) {
        return Some(Family::TrailingWildcard);
    }
    if summary.contains(INCLUDE_MARKER) {
        return common_digit(&summary, members).map(|digit| Family::Include { digit });
    }
    wildcard_shape(&summary).map(|slot| Family::Wildcard { slot })
}

/// The digit every member contains, preferring the one the summary starts with.
fn common_digit(summary: &str, members: &[BetEntry]) -> Option<Digit> {
    let in_all = |digit: &Digit| members.iter().all(|m| m.number.contains(*digit));
    summary
        .chars()
        .next()
        .and_then(Digit::from_char)
        .filter(in_all)
        .or_else(|| Digit::ALL.into_iter().find(in_all))
}

/// `*DD`, `D*D`, `DD*`.
fn wildcard_shape(summary: &str) -> Option<WildSlot> {
    let chars: Vec<char> = summary.chars().collect();
    let is_digit = |c: &char| c.is_ascii_digit();
    match chars.as_slice() {
        ['*', a, b] if is_digit(a) && is_digit(b) => Some(WildSlot::Head),
        [a, '*', b] if is_digit(a) && is_digit(b) => Some(WildSlot::Middle),
        [a, b, '*'] if is_digit(a) && is_digit(b) => Some(WildSlot::Tail),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> Number {
        s.parse().unwrap()
    }

    fn d(value: u8) -> Digit {
        Digit::new(value).unwrap()
    }

    #[test]
    fn infers_families_from_summaries() {
        let two = DigitWidth::Two;
        assert_eq!(infer_from_summary("12R", &[], two), Some(Family::Reverse));
        assert_eq!(
            infer_from_summary("123R", &[], DigitWidth::Three),
            Some(Family::Permute)
        );
        assert_eq!(
            infer_from_summary("123RR", &[], DigitWidth::Three),
            Some(Family::PermuteExcluding { original: n("123") })
        );
        assert_eq!(infer_from_summary("5ပိတ်", &[], two), Some(Family::LeadingWildcard));
        assert_eq!(infer_from_summary("5ထိပ်", &[], two), Some(Family::TrailingWildcard));
        assert_eq!(infer_from_summary("3B", &[], two), Some(Family::Break));
        assert_eq!(infer_from_summary("3ဘရိတ်", &[], two), Some(Family::Break));
        assert_eq!(
            infer_from_summary("1*3", &[], DigitWidth::Three),
            Some(Family::Wildcard {
                slot: WildSlot::Middle
            })
        );
        assert_eq!(infer_from_summary("12", &[], two), None);
        assert_eq!(infer_from_summary("s5", &[], two), None);
    }

    #[test]
    fn retarget_wildcards_only_on_parameter_position() {
        let family = Family::LeadingWildcard;
        assert_eq!(
            family.retarget(n("35"), n("37")),
            Some(PatternKind::LeadingWildcard { digit: d(7) })
        );
        assert_eq!(family.retarget(n("35"), n("45")), None);

        let family = Family::Wildcard {
            slot: WildSlot::Middle,
        };
        assert_eq!(
            family.retarget(n("153"), n("154")),
            Some(PatternKind::Wildcard {
                slot: WildSlot::Middle,
                fixed: [d(1), d(4)]
            })
        );
        assert_eq!(family.retarget(n("153"), n("163")), None);
    }

    #[test]
    fn retarget_include_follows_the_included_digit() {
        let family = Family::Include { digit: d(5) };
        assert_eq!(
            family.retarget(n("35"), n("37")),
            Some(PatternKind::Include { digit: d(7) })
        );
        assert_eq!(
            family.retarget(n("55"), n("77")),
            Some(PatternKind::Include { digit: d(7) })
        );
        assert_eq!(family.retarget(n("35"), n("45")), None);
        assert_eq!(family.retarget(n("55"), n("78")), None);
    }

    #[test]
    fn retarget_permute_excluding_keeps_arrangement() {
        let family = Family::PermuteExcluding { original: n("123") };
        // 132 -> 142: the 3 became a 4, so the excluded number becomes 124.
        assert_eq!(
            family.retarget(n("132"), n("142")),
            Some(PatternKind::PermuteExcluding { number: n("124") })
        );
    }

    #[test]
    fn retarget_break_uses_new_digit_sum() {
        assert_eq!(
            Family::Break.retarget(n("12"), n("14")),
            Some(PatternKind::Break { digit: d(5) })
        );
    }
}
