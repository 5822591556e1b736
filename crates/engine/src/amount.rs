//! Amount resolver.
//!
//! Turns the amount text field into an [`AmountSpec`]:
//!
//! ```rust
//! use engine::AmountSpec;
//!
//! assert_eq!("50+75".parse::<AmountSpec>().unwrap(), AmountSpec::Uniform(125));
//! assert_eq!(
//!     "100r50".parse::<AmountSpec>().unwrap(),
//!     AmountSpec::Paired { base: 100, reversed: 50 }
//! );
//! assert!("0".parse::<AmountSpec>().is_err());
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ExpandError;

/// A resolved amount token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSpec {
    /// Same amount on every generated entry.
    Uniform(u32),
    /// `ArB` / `A/B`: the base number gets `base`, every other member of a
    /// reverse group gets `reversed`. The only non-uniform group amount.
    Paired { base: u32, reversed: u32 },
}

impl AmountSpec {
    /// Amount for the entry at `index` in generation order.
    #[must_use]
    pub const fn for_index(self, index: usize) -> u32 {
        match self {
            AmountSpec::Uniform(amount) => amount,
            AmountSpec::Paired { base, reversed } => {
                if index == 0 {
                    base
                } else {
                    reversed
                }
            }
        }
    }
}

impl FromStr for AmountSpec {
    type Err = ExpandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let invalid = || ExpandError::InvalidAmount(s.to_string());

        let lowered = token.to_ascii_lowercase();
        let mut sides = lowered.split(['r', '/']);
        let first = sides.next().ok_or_else(invalid)?;
        let second = sides.next();
        if sides.next().is_some() {
            return Err(invalid());
        }

        let base = resolve_sum(first).ok_or_else(invalid)?;
        match second {
            None => Ok(AmountSpec::Uniform(base)),
            Some(side) => {
                let reversed = resolve_sum(side).ok_or_else(invalid)?;
                Ok(AmountSpec::Paired { base, reversed })
            }
        }
    }
}

/// Resolves a plain amount token (`100`, `50+75`) into its total.
pub fn resolve_amount(token: &str) -> Result<u32, ExpandError> {
    resolve_sum(token.trim()).ok_or_else(|| ExpandError::InvalidAmount(token.to_string()))
}

/// Sum of `+`-joined non-negative integers; `None` if any part is invalid,
/// the total overflows, or the total is zero.
fn resolve_sum(token: &str) -> Option<u32> {
    let mut total: u32 = 0;
    for part in token.split('+') {
        let part = part.trim();
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let value: u32 = part.parse().ok()?;
        total = total.checked_add(value)?;
    }
    (total > 0).then_some(total)
}
