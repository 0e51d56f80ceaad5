use crate::{selected_indices, ActionDeck, ActionInstance, Card, RngState, TransformError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("invalid bank slot {0}")]
    InvalidSlot(usize),
    #[error("bank slot {0} is empty")]
    EmptySlot(usize),
}

/// Actions currently on offer for the round. A slot is empty only when the
/// deck had nothing left to draw.
#[derive(Debug, Clone, Default)]
pub struct ActionBank {
    slots: Vec<Option<ActionInstance>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFill {
    pub slot: usize,
    pub drawn: Option<String>,
    pub reshuffled: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Applied(Vec<i32>),
    Rejected(TransformError),
}

impl TransformOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Result of consuming one bank slot.
#[derive(Debug, Clone)]
pub struct ActionUse {
    pub slot: usize,
    pub action: ActionInstance,
    pub indices: Vec<usize>,
    pub before: Vec<i32>,
    pub outcome: TransformOutcome,
    pub refill: SlotFill,
}

impl ActionBank {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<ActionInstance>] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&ActionInstance> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn live(&self) -> impl Iterator<Item = &ActionInstance> + '_ {
        self.slots.iter().flatten()
    }

    /// Returns the held cards to the caller and empties every slot.
    pub fn clear(&mut self) -> Vec<ActionInstance> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    pub fn fill(&mut self, deck: &mut ActionDeck, rng: &mut RngState) -> Vec<SlotFill> {
        (0..self.slots.len())
            .map(|slot| self.refill(slot, deck, rng))
            .collect()
    }

    pub fn is_playable(&self, slot: usize, selected: usize) -> bool {
        self.get(slot)
            .map(|action| action.template.requires.accepts(selected))
            .unwrap_or(false)
    }

    /// Consumes the action in `slot` against the selected cards. The action is
    /// discarded and replaced whether or not its transform accepts the
    /// selection; the caller writes `Applied` values back to the cards.
    pub fn use_slot(
        &mut self,
        slot: usize,
        cards: &[Card],
        deck: &mut ActionDeck,
        rng: &mut RngState,
    ) -> Result<ActionUse, BankError> {
        let held = self.slots.get_mut(slot).ok_or(BankError::InvalidSlot(slot))?;
        let action = held.take().ok_or(BankError::EmptySlot(slot))?;

        let indices = selected_indices(cards);
        let before: Vec<i32> = indices.iter().map(|&index| cards[index].value).collect();
        let requires = action.template.requires;
        let outcome = if !requires.accepts(before.len()) {
            TransformOutcome::Rejected(TransformError::Requires {
                requires,
                actual: before.len(),
            })
        } else {
            match action.template.transform.apply(&before, rng) {
                Ok(after) if after.len() == before.len() => TransformOutcome::Applied(after),
                Ok(_) => TransformOutcome::Rejected(TransformError::SelectionSize {
                    transform: action.template.transform.name(),
                    actual: before.len(),
                }),
                Err(err) => TransformOutcome::Rejected(err),
            }
        };

        deck.discard(action.clone());
        let refill = self.refill(slot, deck, rng);
        Ok(ActionUse {
            slot,
            action,
            indices,
            before,
            outcome,
            refill,
        })
    }

    fn refill(&mut self, slot: usize, deck: &mut ActionDeck, rng: &mut RngState) -> SlotFill {
        let reshuffled = if deck.draw.is_empty() {
            deck.discard.len()
        } else {
            0
        };
        let drawn = deck.draw_or_reshuffle(rng).ok();
        let fill = SlotFill {
            slot,
            drawn: drawn.as_ref().map(|action| action.id().to_string()),
            reshuffled,
        };
        if let Some(held) = self.slots.get_mut(slot) {
            *held = drawn;
        }
        fill
    }
}
