//! Notation parser.
//!
//! A clerk types a compact shorthand such as `12r`, `*5`, `3b` or
//! `12.34.56r`. The parser splits it on `.` into atoms and classifies each
//! atom into a [`PatternKind`]. Classification is ordered: the first matching
//! rule wins. If any atom fails, the whole string is rejected.
//!
//! Two shapes are not split: a digit run followed by one dot (`123.`, AP)
//! or two dots (`123..`, AP-), when that is the whole input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Digit, DigitWidth, Number, ParseError,
    digits::digit_run,
};

/// Which position of a 3D number is the wildcard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildSlot {
    /// `*NN`
    Head,
    /// `N*M`
    Middle,
    /// `NN*`
    Tail,
}

impl WildSlot {
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            WildSlot::Head => 0,
            WildSlot::Middle => 1,
            WildSlot::Tail => 2,
        }
    }

    /// The two positions that stay fixed, left to right.
    #[must_use]
    pub const fn fixed_positions(self) -> [usize; 2] {
        match self {
            WildSlot::Head => [1, 2],
            WildSlot::Middle => [0, 2],
            WildSlot::Tail => [0, 1],
        }
    }
}

/// Named 2D sets looked up verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasSet {
    /// `p`, `**`
    Doubles,
    /// `sp`, `+*`
    EvenDoubles,
    /// `mp`, `-*`
    OddDoubles,
    /// `ss`, `++`
    EvenEven,
    /// `mm`, `--`
    OddOdd,
    /// `sm`, `+-`
    EvenOdd,
    /// `ms`, `-+`
    OddEven,
    /// `nk`, `nn`, `n`
    Nakhat,
    /// `k`
    Brothers,
    /// `w`
    Power,
}

impl AliasSet {
    fn lookup(text: &str) -> Option<Self> {
        let set = match text {
            "p" | "**" => AliasSet::Doubles,
            "sp" | "+*" => AliasSet::EvenDoubles,
            "mp" | "-*" => AliasSet::OddDoubles,
            "ss" | "++" => AliasSet::EvenEven,
            "mm" | "--" => AliasSet::OddOdd,
            "sm" | "+-" => AliasSet::EvenOdd,
            "ms" | "-+" => AliasSet::OddEven,
            "nk" | "nn" | "n" => AliasSet::Nakhat,
            "k" => AliasSet::Brothers,
            "w" => AliasSet::Power,
            _ => return None,
        };
        Some(set)
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AliasSet::Doubles => "အပူး",
            AliasSet::EvenDoubles => "စုံပူး",
            AliasSet::OddDoubles => "မပူး",
            AliasSet::EvenEven => "စုံစုံ",
            AliasSet::OddOdd => "မမ",
            AliasSet::EvenOdd => "စုံမ",
            AliasSet::OddEven => "မစုံ",
            AliasSet::Nakhat => "နက္ခတ်",
            AliasSet::Brothers => "ညီကို",
            AliasSet::Power => "ပါဝါ",
        }
    }
}

/// A classified atom, with everything needed to regenerate its members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternKind {
    /// `NN` / `NNN`
    Bare { number: Number },
    /// `NNr`, or any number of a reversed group-dot list.
    Reverse { number: Number },
    /// `NNNr`: every distinct permutation (3D).
    Permute { number: Number },
    /// `NNNrr`: every distinct permutation except the number itself (3D).
    PermuteExcluding { number: Number },
    /// `*N`: `N` in the last position (2D).
    LeadingWildcard { digit: Digit },
    /// `N*`: `N` in the first position (2D).
    TrailingWildcard { digit: Digit },
    /// `Nb`, `N-`: digit sum mod 10 equals `N`.
    Break { digit: Digit },
    /// `Np`, `N+`, `Npx+`: contains `N` anywhere.
    Include { digit: Digit },
    /// `T`: `000, 111, …, 999` (3D).
    Triple,
    /// `*NN`, `N*M`, `NN*` (3D).
    Wildcard { slot: WildSlot, fixed: [Digit; 2] },
    /// `sN` (even head), `mN` (odd head), tail fixed to `N` (2D).
    HeadParity { even: bool, tail: Digit },
    /// `Ns` (even tail), `Nm` (odd tail), head fixed to `N` (2D).
    TailParity { head: Digit, even: bool },
    /// Named sets (2D).
    Alias { set: AliasSet },
    /// `NNN.` (AP) and `NNN..` (AP-).
    DigitCombos {
        digits: Vec<Digit>,
        exclude_repdigits: bool,
    },
    /// `A+B`, `A+Br`: cross product of digit sets (2D).
    Addition {
        heads: Vec<Digit>,
        tails: Vec<Digit>,
        swapped: bool,
    },
}

fn digits_label(digits: &[Digit]) -> String {
    digits.iter().map(|d| d.as_char()).collect()
}

impl PatternKind {
    /// Display label written to the `summary` of every generated entry.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            PatternKind::Bare { number } => number.to_string(),
            PatternKind::Reverse { number } | PatternKind::Permute { number } => {
                format!("{number}R")
            }
            PatternKind::PermuteExcluding { number } => format!("{number}RR"),
            PatternKind::LeadingWildcard { digit } => format!("{digit}ပိတ်"),
            PatternKind::TrailingWildcard { digit } => format!("{digit}ထိပ်"),
            PatternKind::Break { digit } => format!("{digit}B"),
            PatternKind::Include { digit } => format!("{digit}ပါ"),
            PatternKind::Triple => "T".to_string(),
            PatternKind::Wildcard { slot, fixed } => {
                let [a, b] = fixed;
                match slot {
                    WildSlot::Head => format!("*{a}{b}"),
                    WildSlot::Middle => format!("{a}*{b}"),
                    WildSlot::Tail => format!("{a}{b}*"),
                }
            }
            PatternKind::HeadParity { even, tail } => {
                format!("{}{tail}", if *even { 's' } else { 'm' })
            }
            PatternKind::TailParity { head, even } => {
                format!("{head}{}", if *even { 's' } else { 'm' })
            }
            PatternKind::Alias { set } => set.label().to_string(),
            PatternKind::DigitCombos {
                digits,
                exclude_repdigits,
            } => {
                let suffix = if *exclude_repdigits { "AP-" } else { "AP" };
                format!("{}{suffix}", digits_label(digits))
            }
            PatternKind::Addition {
                heads,
                tails,
                swapped,
            } => {
                let suffix = if *swapped { "R" } else { "" };
                format!("{}+{}{suffix}", digits_label(heads), digits_label(tails))
            }
        }
    }
}

/// One `.`-separated token of the notation once classified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub text: String,
    pub width: DigitWidth,
    pub kind: PatternKind,
}

/// Splits `raw` into atoms and classifies each one.
///
/// ```rust
/// use engine::{DigitWidth, PatternKind, parse};
///
/// let atoms = parse("12r.*5", DigitWidth::Two).unwrap();
/// assert_eq!(atoms.len(), 2);
/// assert!(matches!(atoms[1].kind, PatternKind::LeadingWildcard { .. }));
/// ```
pub fn parse(raw: &str, width: DigitWidth) -> Result<Vec<Atom>, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let lowered = raw.to_lowercase();

    if let Some(kind) = dot_combination(&lowered) {
        debug!(raw, %width, "classified digit combination");
        return Ok(vec![Atom {
            text: lowered,
            width,
            kind,
        }]);
    }

    let parts: Vec<&str> = lowered.split('.').map(str::trim).collect();
    if parts.len() > 1
        && let Some(atoms) = reversed_list(&parts, width)
    {
        debug!(raw, %width, atoms = atoms.len(), "classified reversed list");
        return Ok(atoms);
    }

    let atoms = parts
        .iter()
        .map(|part| classify(part, width))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(raw, %width, atoms = atoms.len(), "classified notation");
    Ok(atoms)
}

/// `NN.NN.NNr`: every listed number plus its reversal.
fn reversed_list(parts: &[&str], width: DigitWidth) -> Option<Vec<Atom>> {
    let (last, rest) = parts.split_last()?;
    let last_number = last
        .strip_suffix(['r', '/'])
        .and_then(|s| Number::parse_with_width(s, width))?;

    let mut atoms = Vec::with_capacity(parts.len());
    for part in rest {
        let number = Number::parse_with_width(part, width)?;
        atoms.push(Atom {
            text: (*part).to_string(),
            width,
            kind: PatternKind::Reverse { number },
        });
    }
    atoms.push(Atom {
        text: (*last).to_string(),
        width,
        kind: PatternKind::Reverse {
            number: last_number,
        },
    });
    Some(atoms)
}

fn dot_combination(raw: &str) -> Option<PatternKind> {
    let (body, exclude_repdigits) = if let Some(body) = raw.strip_suffix("..") {
        (body, true)
    } else {
        (raw.strip_suffix('.')?, false)
    };
    let digits = digit_run(body)?;
    Some(PatternKind::DigitCombos {
        digits: dedup_digits(digits),
        exclude_repdigits,
    })
}

fn dedup_digits(digits: Vec<Digit>) -> Vec<Digit> {
    let mut out: Vec<Digit> = Vec::with_capacity(digits.len());
    for digit in digits {
        if !out.contains(&digit) {
            out.push(digit);
        }
    }
    out
}

/// Classifies a single atom. `NNN.` and `NNN..` are accepted too, as
/// [`parse`] keeps them whole.
pub fn classify(text: &str, width: DigitWidth) -> Result<Atom, ParseError> {
    if text.is_empty() {
        return Err(ParseError::unrecognized(text, "empty atom"));
    }
    match dot_combination(text).or_else(|| classify_kind(text, width)) {
        Some(kind) => {
            debug!(atom = text, summary = %kind.summary(), "classified atom");
            Ok(Atom {
                text: text.to_string(),
                width,
                kind,
            })
        }
        None => Err(ParseError::unrecognized(text, failure_reason(text, width))),
    }
}

fn failure_reason(text: &str, width: DigitWidth) -> String {
    let other = match width {
        DigitWidth::Two => DigitWidth::Three,
        DigitWidth::Three => DigitWidth::Two,
    };
    if text.chars().all(|c| c.is_ascii_digit()) {
        format!("expected {} digits", width.len())
    } else if classify_kind(text, other).is_some() {
        format!("pattern is only valid for {other}")
    } else {
        "no pattern matches".to_string()
    }
}

fn classify_kind(text: &str, width: DigitWidth) -> Option<PatternKind> {
    let rules: [fn(&str, DigitWidth) -> Option<PatternKind>; 11] = [
        alias,
        triple,
        permute_excluding,
        reverse,
        single_wildcard,
        slot_wildcard,
        digit_break,
        include,
        parity,
        addition,
        bare,
    ];
    rules.iter().find_map(|rule| rule(text, width))
}

fn single_digit(text: &str) -> Option<Digit> {
    let mut chars = text.chars();
    let digit = Digit::from_char(chars.next()?)?;
    chars.next().is_none().then_some(digit)
}

fn alias(text: &str, width: DigitWidth) -> Option<PatternKind> {
    (width == DigitWidth::Two)
        .then(|| AliasSet::lookup(text))
        .flatten()
        .map(|set| PatternKind::Alias { set })
}

fn triple(text: &str, width: DigitWidth) -> Option<PatternKind> {
    (width == DigitWidth::Three && text == "t").then_some(PatternKind::Triple)
}

fn permute_excluding(text: &str, width: DigitWidth) -> Option<PatternKind> {
    if width != DigitWidth::Three {
        return None;
    }
    let number = Number::parse_with_width(text.strip_suffix("rr")?, width)?;
    Some(PatternKind::PermuteExcluding { number })
}

fn reverse(text: &str, width: DigitWidth) -> Option<PatternKind> {
    let number = Number::parse_with_width(text.strip_suffix(['r', '/'])?, width)?;
    Some(match width {
        DigitWidth::Two => PatternKind::Reverse { number },
        DigitWidth::Three => PatternKind::Permute { number },
    })
}

fn single_wildcard(text: &str, width: DigitWidth) -> Option<PatternKind> {
    if width != DigitWidth::Two {
        return None;
    }
    if let Some(digit) = text.strip_prefix('*').and_then(single_digit) {
        return Some(PatternKind::LeadingWildcard { digit });
    }
    let digit = text.strip_suffix('*').and_then(single_digit)?;
    Some(PatternKind::TrailingWildcard { digit })
}

fn slot_wildcard(text: &str, width: DigitWidth) -> Option<PatternKind> {
    if width != DigitWidth::Three {
        return None;
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.len() != 3 || chars.iter().filter(|c| **c == '*').count() != 1 {
        return None;
    }
    let slot = match chars.iter().position(|c| *c == '*')? {
        0 => WildSlot::Head,
        1 => WildSlot::Middle,
        _ => WildSlot::Tail,
    };
    let [a, b] = slot.fixed_positions();
    let fixed = [Digit::from_char(chars[a])?, Digit::from_char(chars[b])?];
    Some(PatternKind::Wildcard { slot, fixed })
}

fn digit_break(text: &str, _: DigitWidth) -> Option<PatternKind> {
    let digit = text
        .strip_suffix('b')
        .or_else(|| text.strip_suffix('-'))
        .and_then(single_digit)?;
    Some(PatternKind::Break { digit })
}

fn include(text: &str, _: DigitWidth) -> Option<PatternKind> {
    let digit = ["px+", "p", "+"]
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .and_then(single_digit)?;
    Some(PatternKind::Include { digit })
}

fn parity(text: &str, width: DigitWidth) -> Option<PatternKind> {
    if width != DigitWidth::Two {
        return None;
    }
    if let Some(tail) = text.strip_prefix('s').and_then(single_digit) {
        return Some(PatternKind::HeadParity { even: true, tail });
    }
    if let Some(tail) = text.strip_prefix('m').and_then(single_digit) {
        return Some(PatternKind::HeadParity { even: false, tail });
    }
    if let Some(head) = text.strip_suffix('s').and_then(single_digit) {
        return Some(PatternKind::TailParity { head, even: true });
    }
    let head = text.strip_suffix('m').and_then(single_digit)?;
    Some(PatternKind::TailParity { head, even: false })
}

fn addition(text: &str, width: DigitWidth) -> Option<PatternKind> {
    if width != DigitWidth::Two {
        return None;
    }
    let (heads, rest) = text.split_once('+')?;
    let (tails, swapped) = match rest.strip_suffix(['r', '/']) {
        Some(tails) => (tails, true),
        None => (rest, false),
    };
    Some(PatternKind::Addition {
        heads: dedup_digits(digit_run(heads)?),
        tails: dedup_digits(digit_run(tails)?),
        swapped,
    })
}

fn bare(text: &str, width: DigitWidth) -> Option<PatternKind> {
    Number::parse_with_width(text, width).map(|number| PatternKind::Bare { number })
}
