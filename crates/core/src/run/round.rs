use super::*;
use crate::*;

impl RunState {
    /// Deals a new row and rebuilds the piles and bank from the owned deck.
    /// A row dealt already sorted is only noticed after the first action.
    pub fn start_round(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.deck.initialize(&self.catalog, &mut self.rng)?;
        self.cancel_pending(events);
        self.bank.clear();
        self.shop = None;
        self.round_stats = None;

        let count = self.config.number_of_cards;
        self.cards = deal_cards(count, self.config.value_pool_max, &mut self.rng);
        self.state.begin_round(count as u32);
        self.set_phase(Phase::Sorting, events);

        events.push(Event::RoundStarted {
            round: self.state.current_round,
            hands: self.state.starting_hands,
            deck_size: self.deck.owned.len(),
        });
        events.push(Event::CardsDealt {
            values: self.cards.iter().map(|card| card.value).collect(),
        });
        let fills = self.bank.fill(&mut self.deck, &mut self.rng);
        for fill in &fills {
            push_fill(fill, events);
        }
        Ok(())
    }

    /// Re-deals the current round, keeping cash, round number and owned deck.
    pub fn reset_round(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        if self.state.phase != Phase::Sorting {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        self.start_round(events)
    }

    pub fn select_card(&mut self, index: usize) -> Result<bool, RunError> {
        self.ensure_sorting()?;
        let card = self
            .cards
            .get_mut(index)
            .ok_or(RunError::InvalidCardIndex(index))?;
        card.selected = !card.selected;
        Ok(card.selected)
    }

    pub fn deselect_all(&mut self) {
        for card in &mut self.cards {
            card.selected = false;
        }
    }

    pub fn selection_size(&self) -> usize {
        self.cards.iter().filter(|card| card.selected).count()
    }

    pub fn is_slot_playable(&self, slot: usize) -> bool {
        self.bank.is_playable(slot, self.selection_size())
    }

    /// Plays the action in `slot` on the current selection. Applied or
    /// rejected, the use costs one hand and clears the selection.
    pub fn use_action(&mut self, slot: usize, events: &mut EventBus) -> Result<ActionUse, RunError> {
        self.ensure_sorting()?;
        let used = self
            .bank
            .use_slot(slot, &self.cards, &mut self.deck, &mut self.rng)?;

        match &used.outcome {
            TransformOutcome::Applied(after) => {
                for (&index, &value) in used.indices.iter().zip(after) {
                    self.cards[index].value = value;
                }
                events.push(Event::ActionApplied {
                    slot,
                    id: used.action.id().to_string(),
                    indices: used.indices.clone(),
                    before: used.before.clone(),
                    after: after.clone(),
                });
            }
            TransformOutcome::Rejected(reason) => {
                events.push(Event::ActionRejected {
                    slot,
                    id: used.action.id().to_string(),
                    reason: reason.to_string(),
                });
            }
        }
        push_fill(&used.refill, events);

        self.state.use_hand();
        self.deselect_all();
        self.check_round_end(events);
        Ok(used)
    }

    pub fn is_sorted(&self) -> bool {
        is_sorted(&self.cards)
    }

    fn check_round_end(&mut self, events: &mut EventBus) {
        if self.is_sorted() {
            self.state.won = true;
            events.push(Event::RoundWon {
                round: self.state.current_round,
                hands_remaining: self.state.remaining_hands,
            });
            self.schedule_reward(events);
        } else if self.state.remaining_hands == 0 {
            events.push(Event::HandsExhausted {
                round: self.state.current_round,
            });
            self.complete_round(RoundOutcome::OutOfHands, events);
        }
    }

    fn ensure_sorting(&self) -> Result<(), RunError> {
        if self.state.phase != Phase::Sorting {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        if self.state.won || self.pending_reward.is_some() {
            return Err(RunError::RewardPending);
        }
        Ok(())
    }
}

fn push_fill(fill: &SlotFill, events: &mut EventBus) {
    if fill.reshuffled > 0 {
        events.push(Event::DeckReshuffled {
            moved: fill.reshuffled,
        });
    }
    match &fill.drawn {
        Some(id) => events.push(Event::ActionDrawn {
            slot: fill.slot,
            id: id.clone(),
        }),
        None => events.push(Event::SlotLeftEmpty { slot: fill.slot }),
    }
}
