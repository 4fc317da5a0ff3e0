//! Pick one move among the book entries of a position.

use std::str::FromStr;

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::encoding::BookEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Every candidate equally likely; stored weights are ignored.
    #[default]
    Uniform,
    /// Probability proportional to the stored weight.
    Weighted,
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(SelectionPolicy::Uniform),
            "weighted" => Ok(SelectionPolicy::Weighted),
            other => Err(format!("unknown selection policy '{other}' (expected uniform|weighted)")),
        }
    }
}

/// Choose one entry. Returns `None` only for an empty slice.
pub fn select_entry<'a, R: Rng + ?Sized>(
    entries: &'a [BookEntry],
    policy: SelectionPolicy,
    rng: &mut R,
) -> Option<&'a BookEntry> {
    if entries.len() <= 1 {
        return entries.first();
    }

    match policy {
        SelectionPolicy::Uniform => entries.choose(rng),
        SelectionPolicy::Weighted => {
            // Summed in u32: two saturated u16 weights already overflow u16.
            let weights = entries.iter().map(|e| u32::from(e.weight));
            match WeightedIndex::new(weights) {
                Ok(dist) => entries.get(dist.sample(rng)),
                // all weights zero
                Err(_) => entries.choose(rng),
            }
        }
    }
}
