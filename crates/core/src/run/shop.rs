use super::*;
use crate::*;

impl RunState {
    pub(super) fn enter_shop(&mut self, events: &mut EventBus) {
        let rule = &self.config.shop;
        let shop = ShopState::generate(
            &self.catalog,
            rule.max_rarity,
            rule.items_per_round,
            rule.refresh_cost,
            &mut self.rng,
        );
        let offers = shop.offers.len();
        self.shop = Some(shop);
        self.set_phase(Phase::Shop, events);
        events.push(Event::ShopEntered { offers });
    }

    pub(super) fn leave_shop(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        self.state.current_round = self.state.current_round.saturating_add(1);
        if let Err(err) = self.start_round(events) {
            self.state.current_round -= 1;
            return Err(err);
        }
        Ok(())
    }

    /// Buys offer `slot`: charges its cost and adds a fresh copy to the owned
    /// deck and the live draw pile.
    pub fn purchase(&mut self, slot: usize, events: &mut EventBus) -> Result<ActionInstance, RunError> {
        if self.state.phase != Phase::Shop {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        let shop = self
            .shop
            .as_mut()
            .ok_or(RunError::InvalidPhase(self.state.phase))?;
        let cost = shop.offer(slot)?.template.cost;
        if self.state.cash < cost {
            return Err(RunError::NotEnoughCash {
                cost,
                cash: self.state.cash,
            });
        }
        let template = shop.purchase(slot)?;
        self.state.cash -= cost;
        let instance = self.deck.add_owned(&template);
        events.push(Event::ShopBought {
            slot,
            id: template.id,
            cost,
            cash: self.state.cash,
        });
        Ok(instance)
    }

    /// Pays the refresh cost and restocks the offers.
    pub fn refresh_shop(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        if self.state.phase != Phase::Shop {
            return Err(RunError::InvalidPhase(self.state.phase));
        }
        let shop = self
            .shop
            .as_mut()
            .ok_or(RunError::InvalidPhase(self.state.phase))?;
        let cost = shop.refresh_cost;
        if self.state.cash < cost {
            return Err(RunError::NotEnoughCash {
                cost,
                cash: self.state.cash,
            });
        }
        self.state.cash -= cost;
        let rule = &self.config.shop;
        shop.restock(&self.catalog, rule.max_rarity, rule.items_per_round, &mut self.rng);
        events.push(Event::ShopRefreshed {
            offers: shop.offers.len(),
            cost,
            cash: self.state.cash,
        });
        Ok(())
    }
}
