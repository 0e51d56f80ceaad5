//! Value transforms applied by action cards.
//!
//! Every transform maps the position-ordered values of the selected cards to a
//! new sequence of the same length, or rejects the selection. A rejection never
//! changes card state.

use crate::{value_in_range, RequiresCount, RngState, CARD_VALUE_MAX, CARD_VALUE_MIN};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformKind {
    Modify { delta: i32 },
    Shift { offset: i32 },
    Reverse,
    Swap,
    RandomDerangement,
    SplitSwap,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("{transform} cannot act on {actual} selected card(s)")]
    SelectionSize {
        transform: &'static str,
        actual: usize,
    },
    #[error("action requires {requires:?} but {actual} card(s) are selected")]
    Requires {
        requires: RequiresCount,
        actual: usize,
    },
    #[error("value {value} is outside {min}..={max}", min = CARD_VALUE_MIN, max = CARD_VALUE_MAX)]
    OutOfRange { value: i32 },
}

impl TransformKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Modify { .. } => "modify",
            Self::Shift { .. } => "shift",
            Self::Reverse => "reverse",
            Self::Swap => "swap",
            Self::RandomDerangement => "random_derangement",
            Self::SplitSwap => "split_swap",
        }
    }

    /// Smallest selection the transform accepts.
    pub fn min_selection(self) -> usize {
        match self {
            Self::Modify { .. } | Self::Shift { .. } | Self::Reverse => 1,
            Self::Swap | Self::RandomDerangement | Self::SplitSwap => 2,
        }
    }

    pub fn apply(self, values: &[i32], rng: &mut RngState) -> Result<Vec<i32>, TransformError> {
        match self {
            Self::Modify { delta } => modify(values, delta),
            Self::Shift { offset } => shift(values, offset),
            Self::Reverse => reverse(values),
            Self::Swap => swap(values),
            Self::RandomDerangement => derange(values, rng),
            Self::SplitSwap => split_swap(values),
        }
    }
}

fn require_at_least(
    transform: &'static str,
    values: &[i32],
    min: usize,
) -> Result<(), TransformError> {
    if values.len() < min {
        return Err(TransformError::SelectionSize {
            transform,
            actual: values.len(),
        });
    }
    Ok(())
}

pub fn modify(values: &[i32], delta: i32) -> Result<Vec<i32>, TransformError> {
    let [value] = values else {
        return Err(TransformError::SelectionSize {
            transform: "modify",
            actual: values.len(),
        });
    };
    let next = value.saturating_add(delta);
    if !value_in_range(next) {
        return Err(TransformError::OutOfRange { value: next });
    }
    Ok(vec![next])
}

/// Rotates by `offset`; positive moves elements toward the end and wraps the
/// tail to the front, negative is the inverse. Offsets wrap modulo the length.
pub fn shift(values: &[i32], offset: i32) -> Result<Vec<i32>, TransformError> {
    require_at_least("shift", values, 1)?;
    let len = values.len() as i64;
    let steps = (offset as i64).rem_euclid(len) as usize;
    let mut shifted = values.to_vec();
    shifted.rotate_right(steps);
    Ok(shifted)
}

pub fn reverse(values: &[i32]) -> Result<Vec<i32>, TransformError> {
    require_at_least("reverse", values, 1)?;
    Ok(values.iter().rev().copied().collect())
}

pub fn swap(values: &[i32]) -> Result<Vec<i32>, TransformError> {
    require_at_least("swap", values, 2)?;
    let mut swapped = values.to_vec();
    let last = swapped.len() - 1;
    swapped.swap(0, last);
    Ok(swapped)
}

/// Random permutation in which no value stays at its original index.
///
/// Builds the permutation position by position, picking uniformly among the
/// unused source indices that are neither the position itself nor already
/// known to dead-end there. On a dead end the previous position is released
/// and its source is marked as tried for that position. The search is
/// exhaustive, so it always terminates with a derangement for two or more
/// values.
pub fn derange(values: &[i32], rng: &mut RngState) -> Result<Vec<i32>, TransformError> {
    require_at_least("random_derangement", values, 2)?;
    let len = values.len();
    let mut picks: Vec<usize> = Vec::with_capacity(len);
    let mut used = vec![false; len];
    let mut tried = vec![vec![false; len]; len];

    while picks.len() < len {
        let position = picks.len();
        let choices: Vec<usize> = (0..len)
            .filter(|&source| source != position && !used[source] && !tried[position][source])
            .collect();
        if let Some(pick) = rng.index(choices.len()) {
            let source = choices[pick];
            used[source] = true;
            picks.push(source);
            continue;
        }
        tried[position].iter_mut().for_each(|flag| *flag = false);
        match picks.pop() {
            Some(source) => {
                used[source] = false;
                tried[picks.len()][source] = true;
            }
            // Unreachable for two or more values; a one-step rotation is still a derangement.
            None => {
                let mut rotated = values.to_vec();
                rotated.rotate_left(1);
                return Ok(rotated);
            }
        }
    }

    Ok(picks.into_iter().map(|source| values[source]).collect())
}

/// Swaps the halves; with an odd length the middle value belongs to the right half.
pub fn split_swap(values: &[i32]) -> Result<Vec<i32>, TransformError> {
    require_at_least("split_swap", values, 2)?;
    let (left, right) = values.split_at(values.len() / 2);
    Ok(right.iter().chain(left).copied().collect())
}

/// Derangement of `0..len`, expressed as source indices.
pub fn derangement_indices(len: usize, rng: &mut RngState) -> Result<Vec<usize>, TransformError> {
    let positions: Vec<i32> = (0..len as i32).collect();
    let shuffled = derange(&positions, rng)?;
    Ok(shuffled.into_iter().map(|source| source as usize).collect())
}
