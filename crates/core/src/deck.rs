use crate::{ActionInstance, ActionTemplate, Catalog, RngState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("draw and discard piles are both empty")]
    Exhausted,
    #[error("unknown action id {0}")]
    UnknownAction(String),
}

#[derive(Debug, Default, Clone)]
pub struct ActionDeck {
    pub owned: Vec<ActionInstance>,
    pub draw: Vec<ActionInstance>,
    pub discard: Vec<ActionInstance>,
    next_uid: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckStats {
    pub owned: usize,
    pub draw: usize,
    pub discard: usize,
    pub by_id: BTreeMap<String, usize>,
}

impl ActionDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a round: seeds the owned deck from the base composition on
    /// first use, then rebuilds the draw pile as a shuffled copy of it.
    pub fn initialize(&mut self, catalog: &Catalog, rng: &mut RngState) -> Result<(), DeckError> {
        if self.owned.is_empty() {
            for template in Self::base_templates(catalog)? {
                let instance = self.instance_of(template);
                self.owned.push(instance);
            }
        }
        self.draw = self.owned.clone();
        rng.shuffle(&mut self.draw);
        self.discard.clear();
        Ok(())
    }

    /// Resolves the catalog's base deck, failing on the first unknown id.
    pub fn base_templates(catalog: &Catalog) -> Result<Vec<ActionTemplate>, DeckError> {
        catalog
            .base_deck
            .iter()
            .map(|id| {
                catalog
                    .get(id)
                    .cloned()
                    .ok_or_else(|| DeckError::UnknownAction(id.clone()))
            })
            .collect()
    }

    /// Removes a uniformly random card from the draw pile.
    pub fn draw(&mut self, rng: &mut RngState) -> Option<ActionInstance> {
        let index = rng.index(self.draw.len())?;
        Some(self.draw.swap_remove(index))
    }

    pub fn discard(&mut self, instance: ActionInstance) {
        self.discard.push(instance);
    }

    pub fn reshuffle_discard(&mut self, rng: &mut RngState) -> usize {
        if self.discard.is_empty() {
            return 0;
        }
        let moved = self.discard.len();
        rng.shuffle(&mut self.discard);
        self.draw.append(&mut self.discard);
        moved
    }

    /// Draws, reshuffling the discard pile once if the draw pile is empty.
    pub fn draw_or_reshuffle(&mut self, rng: &mut RngState) -> Result<ActionInstance, DeckError> {
        if let Some(instance) = self.draw(rng) {
            return Ok(instance);
        }
        self.reshuffle_discard(rng);
        self.draw(rng).ok_or(DeckError::Exhausted)
    }

    /// Adds a purchased card to the owned deck and to the live draw pile.
    pub fn add_owned(&mut self, template: &ActionTemplate) -> ActionInstance {
        let instance = self.instance_of(template.clone());
        self.owned.push(instance.clone());
        self.draw.push(instance.clone());
        instance
    }

    pub fn reset(&mut self) {
        self.owned.clear();
        self.draw.clear();
        self.discard.clear();
    }

    /// `by_id` counts the draw and discard piles only; cards held in the
    /// bank show up in `owned` but not per id.
    pub fn stats(&self) -> DeckStats {
        let mut by_id = BTreeMap::new();
        for instance in self.draw.iter().chain(&self.discard) {
            *by_id.entry(instance.id().to_string()).or_insert(0) += 1;
        }
        DeckStats {
            owned: self.owned.len(),
            draw: self.draw.len(),
            discard: self.discard.len(),
            by_id,
        }
    }

    fn instance_of(&mut self, template: ActionTemplate) -> ActionInstance {
        self.next_uid = self.next_uid.saturating_add(1);
        ActionInstance {
            uid: self.next_uid,
            template,
        }
    }
}
