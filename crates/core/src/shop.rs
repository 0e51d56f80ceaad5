use crate::{ActionTemplate, Catalog, Rarity, RngState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("shop offer {0} not found")]
    NotFound(usize),
    #[error("shop offer {0} already purchased")]
    AlreadyPurchased(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopOffer {
    pub slot: usize,
    pub template: ActionTemplate,
}

#[derive(Debug, Clone, Default)]
pub struct ShopState {
    pub offers: Vec<ShopOffer>,
    pub purchased: BTreeSet<usize>,
    pub refresh_cost: i64,
}

impl ShopState {
    pub fn generate(
        catalog: &Catalog,
        max_rarity: Rarity,
        count: usize,
        refresh_cost: i64,
        rng: &mut RngState,
    ) -> Self {
        let mut shop = Self {
            offers: Vec::new(),
            purchased: BTreeSet::new(),
            refresh_cost,
        };
        shop.restock(catalog, max_rarity, count, rng);
        shop
    }

    /// Replaces the offers with `count` distinct purchasable templates at or
    /// below `max_rarity`, and forgets earlier purchases.
    pub fn restock(
        &mut self,
        catalog: &Catalog,
        max_rarity: Rarity,
        count: usize,
        rng: &mut RngState,
    ) {
        let pool = catalog.shop_pool(max_rarity);
        self.offers = rng
            .sample(&pool, count)
            .into_iter()
            .enumerate()
            .map(|(slot, template)| ShopOffer {
                slot,
                template: template.clone(),
            })
            .collect();
        self.purchased.clear();
    }

    pub fn offer(&self, slot: usize) -> Result<&ShopOffer, ShopError> {
        let offer = self
            .offers
            .iter()
            .find(|offer| offer.slot == slot)
            .ok_or(ShopError::NotFound(slot))?;
        if self.purchased.contains(&slot) {
            return Err(ShopError::AlreadyPurchased(slot));
        }
        Ok(offer)
    }

    /// Marks `slot` as bought and hands back its template.
    pub fn purchase(&mut self, slot: usize) -> Result<ActionTemplate, ShopError> {
        let template = self.offer(slot)?.template.clone();
        self.purchased.insert(slot);
        Ok(template)
    }

    pub fn is_purchased(&self, slot: usize) -> bool {
        self.purchased.contains(&slot)
    }
}
