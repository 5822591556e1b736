//! The digit-number space.
//!
//! Every other component is parameterized by a [`DigitWidth`]: it fixes how
//! long a [`Number`] is (`00..99` for 2D, `000..999` for 3D) and which pattern
//! kinds a clerk may type.
//!
//! A [`Number`] is built from [`Digit`]s only, so an out-of-range digit or a
//! number of the wrong length cannot be represented.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Width of the lottery product.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DigitWidth {
    #[default]
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
}

impl DigitWidth {
    /// Number of digits in a number of this width.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            DigitWidth::Two => 2,
            DigitWidth::Three => 3,
        }
    }

    /// Count of legal numbers (`100` or `1000`).
    #[must_use]
    pub const fn size(self) -> u16 {
        match self {
            DigitWidth::Two => 100,
            DigitWidth::Three => 1000,
        }
    }

    /// Every legal number in ascending order.
    pub fn numbers(self) -> impl Iterator<Item = Number> {
        (0..self.size()).map(move |value| Number::from_value(value, self))
    }
}

impl fmt::Display for DigitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigitWidth::Two => f.write_str("2D"),
            DigitWidth::Three => f.write_str("3D"),
        }
    }
}

impl TryFrom<u8> for DigitWidth {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(DigitWidth::Two),
            3 => Ok(DigitWidth::Three),
            other => Err(EngineError::InvalidWidth(other.to_string())),
        }
    }
}

impl FromStr for DigitWidth {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "2" | "2D" => Ok(DigitWidth::Two),
            "3" | "3D" => Ok(DigitWidth::Three),
            other => Err(EngineError::InvalidWidth(other.to_string())),
        }
    }
}

/// A single decimal digit `0..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const ALL: [Digit; 10] = [
        Digit(0),
        Digit(1),
        Digit(2),
        Digit(3),
        Digit(4),
        Digit(5),
        Digit(6),
        Digit(7),
        Digit(8),
        Digit(9),
    ];

    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 { Some(Self(value)) } else { None }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_even(self) -> bool {
        self.0 % 2 == 0
    }

    #[must_use]
    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Digit::new(value).ok_or_else(|| EngineError::InvalidNumber(value.to_string()))
    }
}

impl From<Digit> for u8 {
    fn from(value: Digit) -> Self {
        value.0
    }
}

/// Parses a run of ASCII digits; `None` if the run is empty or has any other char.
pub(crate) fn digit_run(input: &str) -> Option<Vec<Digit>> {
    if input.is_empty() {
        return None;
    }
    input.chars().map(Digit::from_char).collect()
}

/// A zero-padded lottery number of a fixed width.
///
/// Stored as digits, most significant first. Only the first `width.len()`
/// slots are meaningful; the rest are always zero so derived equality holds.
///
/// ```rust
/// use engine::{DigitWidth, Number};
///
/// let n: Number = "07".parse().unwrap();
/// assert_eq!(n.width(), DigitWidth::Two);
/// assert_eq!(n.to_string(), "07");
/// assert_eq!(n.reversed().to_string(), "70");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Number {
    width: DigitWidth,
    digits: [Digit; 3],
}

impl Number {
    /// Builds a number from exactly `width.len()` digits.
    #[must_use]
    pub fn from_digits(digits: &[Digit], width: DigitWidth) -> Option<Self> {
        if digits.len() != width.len() {
            return None;
        }
        let mut slots = [Digit(0); 3];
        slots[..digits.len()].copy_from_slice(digits);
        Some(Self {
            width,
            digits: slots,
        })
    }

    pub(crate) fn from_value(value: u16, width: DigitWidth) -> Self {
        let mut slots = [Digit(0); 3];
        let mut rest = value;
        for slot in slots[..width.len()].iter_mut().rev() {
            *slot = Digit((rest % 10) as u8);
            rest /= 10;
        }
        Self {
            width,
            digits: slots,
        }
    }

    /// Parses a zero-padded number of the given width.
    pub fn parse_with_width(input: &str, width: DigitWidth) -> Option<Self> {
        digit_run(input.trim()).and_then(|digits| Self::from_digits(&digits, width))
    }

    #[must_use]
    pub const fn width(&self) -> DigitWidth {
        self.width
    }

    #[must_use]
    pub fn digits(&self) -> &[Digit] {
        &self.digits[..self.width.len()]
    }

    #[must_use]
    pub fn digit(&self, position: usize) -> Option<Digit> {
        self.digits().get(position).copied()
    }

    /// Numeric value, e.g. `"07"` is `7`.
    #[must_use]
    pub fn value(&self) -> u16 {
        self.digits()
            .iter()
            .fold(0, |acc, d| acc * 10 + u16::from(d.value()))
    }

    #[must_use]
    pub fn digit_sum(&self) -> u32 {
        self.digits().iter().map(|d| u32::from(d.value())).sum()
    }

    #[must_use]
    pub fn contains(&self, digit: Digit) -> bool {
        self.digits().contains(&digit)
    }

    /// `true` when every digit is the same (`11`, `555`).
    #[must_use]
    pub fn is_repdigit(&self) -> bool {
        let digits = self.digits();
        digits.iter().all(|d| *d == digits[0])
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut out = *self;
        out.digits[..self.width.len()].reverse();
        out
    }

    /// All distinct digit permutations, starting with `self`.
    #[must_use]
    pub fn permutations(&self) -> Vec<Number> {
        let orders: &[&[usize]] = match self.width {
            DigitWidth::Two => &[&[0, 1], &[1, 0]],
            DigitWidth::Three => &[
                &[0, 1, 2],
                &[0, 2, 1],
                &[1, 0, 2],
                &[1, 2, 0],
                &[2, 0, 1],
                &[2, 1, 0],
            ],
        };
        let source = self.digits();
        let mut out: Vec<Number> = Vec::with_capacity(orders.len());
        for order in orders {
            let digits: Vec<Digit> = order.iter().map(|&i| source[i]).collect();
            if let Some(number) = Number::from_digits(&digits, self.width)
                && !out.contains(&number)
            {
                out.push(number);
            }
        }
        out
    }

    /// Positions at which `self` and `other` differ.
    #[must_use]
    pub fn differing_positions(&self, other: &Number) -> Vec<usize> {
        self.digits()
            .iter()
            .zip(other.digits())
            .enumerate()
            .filter_map(|(i, (a, b))| (a != b).then_some(i))
            .collect()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.digits() {
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({self})")
    }
}

impl FromStr for Number {
    type Err = EngineError;

    /// Infers the width from the length (2 or 3 digits).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidNumber(s.to_string());
        let digits = digit_run(s.trim()).ok_or_else(invalid)?;
        let width = match digits.len() {
            2 => DigitWidth::Two,
            3 => DigitWidth::Three,
            _ => return Err(invalid()),
        };
        Number::from_digits(&digits, width).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Number {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Number> for String {
    fn from(value: Number) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> Number {
        s.parse().unwrap()
    }

    #[test]
    fn parse_keeps_zero_padding() {
        assert_eq!(n("07").to_string(), "07");
        assert_eq!(n("007").to_string(), "007");
        assert_eq!(n("007").value(), 7);
        assert!("7".parse::<Number>().is_err());
        assert!("1234".parse::<Number>().is_err());
        assert!("1a".parse::<Number>().is_err());
    }

    #[test]
    fn parse_with_width_rejects_wrong_length() {
        assert!(Number::parse_with_width("123", DigitWidth::Two).is_none());
        assert_eq!(
            Number::parse_with_width("123", DigitWidth::Three).map(|n| n.value()),
            Some(123)
        );
    }

    #[test]
    fn permutations_are_distinct_and_start_with_self() {
        let perms = n("123").permutations();
        assert_eq!(perms.len(), 6);
        assert_eq!(perms[0], n("123"));
        assert_eq!(n("112").permutations().len(), 3);
        assert_eq!(n("111").permutations(), vec![n("111")]);
        assert_eq!(n("12").permutations(), vec![n("12"), n("21")]);
    }

    #[test]
    fn width_enumerates_full_range() {
        let all: Vec<Number> = DigitWidth::Three.numbers().collect();
        assert_eq!(all.len(), 1000);
        assert_eq!(all[0].to_string(), "000");
        assert_eq!(all[999].to_string(), "999");
    }

    #[test]
    fn differing_positions_and_repdigits() {
        assert_eq!(n("35").differing_positions(&n("37")), vec![1]);
        assert_eq!(n("135").differing_positions(&n("735")), vec![0]);
        assert!(n("35").differing_positions(&n("35")).is_empty());
        assert!(n("555").is_repdigit());
        assert!(!n("556").is_repdigit());
    }

    #[test]
    fn numbers_sort_by_width_then_value() {
        let mut numbers = vec![n("907"), n("21"), n("012"), n("05")];
        numbers.sort();
        let sorted: Vec<String> = numbers.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, ["05", "21", "012", "907"]);
        assert!(DigitWidth::Two < DigitWidth::Three);
    }

    #[test]
    fn serde_uses_plain_string() {
        let json = serde_json::to_string(&n("05")).unwrap();
        assert_eq!(json, "\"05\"");
        let back: Number = serde_json::from_str("\"905\"").unwrap();
        assert_eq!(back, n("905"));
        assert!(serde_json::from_str::<Number>("\"5\"").is_err());
    }
}
