use crate::RngState;
use serde::{Deserialize, Serialize};

pub const CARD_VALUE_MIN: i32 = 1;
pub const CARD_VALUE_MAX: i32 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub index: usize,
    pub value: i32,
    #[serde(default)]
    pub selected: bool,
}

impl Card {
    pub fn new(index: usize, value: i32) -> Self {
        Self {
            index,
            value,
            selected: false,
        }
    }
}

pub fn value_in_range(value: i32) -> bool {
    (CARD_VALUE_MIN..=CARD_VALUE_MAX).contains(&value)
}

/// Deals `count` cards with distinct values drawn from `1..=pool_max`.
/// The caller guarantees `count <= pool_max`; a short pool yields fewer cards.
pub fn deal_cards(count: usize, pool_max: i32, rng: &mut RngState) -> Vec<Card> {
    let mut pool: Vec<i32> = (CARD_VALUE_MIN..=pool_max).collect();
    rng.shuffle(&mut pool);
    pool.into_iter()
        .take(count)
        .enumerate()
        .map(|(index, value)| Card::new(index, value))
        .collect()
}

pub fn cards_from_values(values: &[i32]) -> Vec<Card> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| Card::new(index, value))
        .collect()
}

/// Non-decreasing by value in index order. Empty and single-card rows count as sorted.
pub fn is_sorted(cards: &[Card]) -> bool {
    cards.windows(2).all(|pair| pair[0].value <= pair[1].value)
}

/// Positions of the selected cards, ascending.
pub fn selected_indices(cards: &[Card]) -> Vec<usize> {
    cards
        .iter()
        .enumerate()
        .filter(|(_, card)| card.selected)
        .map(|(position, _)| position)
        .collect()
}
