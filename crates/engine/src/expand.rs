//! Pattern expander.
//!
//! Given a classified [`Atom`] and an amount, produces the ordered list of
//! [`BetEntry`] for that atom. Every entry of one expansion shares a fresh
//! [`GroupId`](crate::GroupId), the same summary label and, except for paired
//! reverse amounts, the same amount. Only the first entry is primary.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    AliasSet, AmountSpec, Atom, BetEntry, Digit, DigitWidth, ExpandError, IdGenerator, Number,
    PatternKind, ResultEngine, parse,
};

const NAKHAT: [u16; 10] = [7, 18, 24, 35, 69, 70, 81, 42, 53, 96];
const BROTHERS: [u16; 20] = [
    1, 12, 23, 34, 45, 56, 67, 78, 89, 90, 10, 21, 32, 43, 54, 65, 76, 87, 98, 9,
];
const POWER: [u16; 10] = [5, 16, 27, 38, 49, 50, 61, 72, 83, 94];

/// Numbers generated by `kind`, in generation order, duplicates removed.
#[must_use]
pub fn members(kind: &PatternKind, width: DigitWidth) -> Vec<Number> {
    let numbers: Vec<Number> = match kind {
        PatternKind::Bare { number } => vec![*number],
        PatternKind::Reverse { number } => vec![*number, number.reversed()],
        PatternKind::Permute { number } => number.permutations(),
        PatternKind::PermuteExcluding { number } => number
            .permutations()
            .into_iter()
            .filter(|n| n != number)
            .collect(),
        PatternKind::LeadingWildcard { digit } => Digit::ALL
            .iter()
            .filter_map(|head| Number::from_digits(&[*head, *digit], width))
            .collect(),
        PatternKind::TrailingWildcard { digit } => Digit::ALL
            .iter()
            .filter_map(|tail| Number::from_digits(&[*digit, *tail], width))
            .collect(),
        PatternKind::Break { digit } => width
            .numbers()
            .filter(|n| n.digit_sum() % 10 == u32::from(digit.value()))
            .collect(),
        PatternKind::Include { digit } => {
            width.numbers().filter(|n| n.contains(*digit)).collect()
        }
        PatternKind::Triple => Digit::ALL
            .iter()
            .filter_map(|d| Number::from_digits(&vec![*d; width.len()], width))
            .collect(),
        PatternKind::Wildcard { slot, fixed } => {
            let [a, b] = slot.fixed_positions();
            Digit::ALL
                .iter()
                .filter_map(|wild| {
                    let mut digits = [*wild; 3];
                    digits[a] = fixed[0];
                    digits[b] = fixed[1];
                    Number::from_digits(&digits, width)
                })
                .collect()
        }
        PatternKind::HeadParity { even, tail } => Digit::ALL
            .iter()
            .filter(|head| head.is_even() == *even)
            .filter_map(|head| Number::from_digits(&[*head, *tail], width))
            .collect(),
        PatternKind::TailParity { head, even } => Digit::ALL
            .iter()
            .filter(|tail| tail.is_even() == *even)
            .filter_map(|tail| Number::from_digits(&[*head, *tail], width))
            .collect(),
        PatternKind::Alias { set } => alias_members(*set, width),
        PatternKind::DigitCombos {
            digits,
            exclude_repdigits,
        } => combinations(digits, width)
            .into_iter()
            .filter(|n| !(*exclude_repdigits && n.is_repdigit()))
            .collect(),
        PatternKind::Addition {
            heads,
            tails,
            swapped,
        } => {
            let mut out = cross(heads, tails, width);
            if *swapped {
                out.extend(cross(tails, heads, width));
            }
            out
        }
    };
    dedup(numbers)
}

fn alias_members(set: AliasSet, width: DigitWidth) -> Vec<Number> {
    let parity = |head_even: bool, tail_even: bool| -> Vec<Number> {
        width
            .numbers()
            .filter(|n| {
                let digits = n.digits();
                digits[0].is_even() == head_even && digits[digits.len() - 1].is_even() == tail_even
            })
            .collect()
    };
    let doubles = |keep: fn(Digit) -> bool| -> Vec<Number> {
        Digit::ALL
            .iter()
            .filter(|d| keep(**d))
            .filter_map(|d| Number::from_digits(&[*d, *d], width))
            .collect()
    };
    let table = |values: &[u16]| -> Vec<Number> {
        values
            .iter()
            .map(|v| Number::from_value(*v, width))
            .collect()
    };

    match set {
        AliasSet::Doubles => doubles(|_| true),
        AliasSet::EvenDoubles => doubles(Digit::is_even),
        AliasSet::OddDoubles => doubles(|d| !d.is_even()),
        AliasSet::EvenEven => parity(true, true),
        AliasSet::OddOdd => parity(false, false),
        AliasSet::EvenOdd => parity(true, false),
        AliasSet::OddEven => parity(false, true),
        AliasSet::Nakhat => table(&NAKHAT),
        AliasSet::Brothers => table(&BROTHERS),
        AliasSet::Power => table(&POWER),
    }
}

/// Every `width`-length sequence over `digits`, in input-digit order.
fn combinations(digits: &[Digit], width: DigitWidth) -> Vec<Number> {
    let mut sequences: Vec<Vec<Digit>> = vec![Vec::new()];
    for _ in 0..width.len() {
        sequences = sequences
            .into_iter()
            .flat_map(|prefix| {
                digits.iter().map(move |d| {
                    let mut next = prefix.clone();
                    next.push(*d);
                    next
                })
            })
            .collect();
    }
    sequences
        .iter()
        .filter_map(|seq| Number::from_digits(seq, width))
        .collect()
}

fn cross(heads: &[Digit], tails: &[Digit], width: DigitWidth) -> Vec<Number> {
    heads
        .iter()
        .flat_map(|h| tails.iter().map(move |t| [*h, *t]))
        .filter_map(|pair| Number::from_digits(&pair, width))
        .collect()
}

fn dedup(numbers: Vec<Number>) -> Vec<Number> {
    let mut seen = HashSet::with_capacity(numbers.len());
    numbers.into_iter().filter(|n| seen.insert(*n)).collect()
}

/// Builds the entries of a new group for `kind`.
///
/// Fails with [`ExpandError::AmountRequiresPositive`] on a zero amount and
/// with [`ExpandError::PairedAmountUnsupported`] when a paired amount is
/// used with anything but a reverse pattern.
pub fn build_group(
    kind: &PatternKind,
    width: DigitWidth,
    amount: AmountSpec,
    ids: &dyn IdGenerator,
) -> Result<Vec<BetEntry>, ExpandError> {
    let positive = match amount {
        AmountSpec::Uniform(value) => value > 0,
        AmountSpec::Paired { base, reversed } => base > 0 && reversed > 0,
    };
    if !positive {
        return Err(ExpandError::AmountRequiresPositive);
    }
    if let AmountSpec::Paired { base, reversed } = amount
        && !matches!(
            kind,
            PatternKind::Reverse { .. } | PatternKind::Permute { .. }
        )
    {
        return Err(ExpandError::PairedAmountUnsupported(format!(
            "{base}r{reversed}"
        )));
    }

    let numbers = members(kind, width);
    if numbers.is_empty() {
        return Err(ExpandError::EmptyExpansion(kind.summary()));
    }

    let group_id = ids.group_id();
    let summary = kind.summary();
    let entries: Vec<BetEntry> = numbers
        .into_iter()
        .enumerate()
        .map(|(index, number)| BetEntry {
            id: ids.entry_id(),
            number,
            amount: amount.for_index(index),
            summary: summary.clone(),
            is_primary: index == 0,
            group_id,
            external_id: None,
            pattern: Some(kind.clone()),
            finalized: false,
        })
        .collect();
    debug!(%summary, entries = entries.len(), %group_id, "expanded group");
    Ok(entries)
}

/// Expands one atom with the given amount token.
pub fn expand(
    atom: &Atom,
    amount_token: &str,
    ids: &dyn IdGenerator,
) -> Result<Vec<BetEntry>, ExpandError> {
    let amount: AmountSpec = amount_token.parse()?;
    build_group(&atom.kind, atom.width, amount, ids)
}

/// Parses `raw` and expands every atom with the same amount token.
///
/// Either all atoms expand or nothing is returned.
pub fn expand_notation(
    raw: &str,
    amount_token: &str,
    width: DigitWidth,
    ids: &dyn IdGenerator,
) -> ResultEngine<Vec<BetEntry>> {
    let atoms = parse(raw, width)?;
    let amount: AmountSpec = amount_token.parse()?;
    let mut entries = Vec::new();
    for atom in &atoms {
        entries.extend(build_group(&atom.kind, atom.width, amount, ids)?);
    }
    Ok(entries)
}
