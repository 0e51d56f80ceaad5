use crate::{Rarity, CARD_VALUE_MAX, CARD_VALUE_MIN};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRule {
    pub cash_per_hand: i64,
}

impl Default for EconomyRule {
    fn default() -> Self {
        Self { cash_per_hand: 1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopRule {
    pub items_per_round: usize,
    pub max_rarity: Rarity,
    pub refresh_cost: i64,
}

impl Default for ShopRule {
    fn default() -> Self {
        Self {
            items_per_round: 4,
            max_rarity: Rarity::Epic,
            refresh_cost: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cards dealt per round; also the hand budget for the round.
    pub number_of_cards: usize,
    /// Card values are dealt distinct from `1..=value_pool_max`.
    pub value_pool_max: i32,
    pub bank_size: usize,
    /// Celebration delay between sorting the row and paying the reward.
    pub reward_delay_ms: u64,
    pub economy: EconomyRule,
    pub shop: ShopRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            number_of_cards: 9,
            value_pool_max: 10,
            bank_size: 3,
            reward_delay_ms: 2000,
            economy: EconomyRule::default(),
            shop: ShopRule::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.value_pool_max < CARD_VALUE_MIN || self.value_pool_max > CARD_VALUE_MAX {
            return Err(format!(
                "value_pool_max {} outside {}..={}",
                self.value_pool_max, CARD_VALUE_MIN, CARD_VALUE_MAX
            ));
        }
        let pool = (self.value_pool_max - CARD_VALUE_MIN + 1) as usize;
        if self.number_of_cards > pool {
            return Err(format!(
                "number_of_cards {} exceeds the {} distinct values available",
                self.number_of_cards, pool
            ));
        }
        if self.bank_size == 0 {
            return Err("bank_size must be at least 1".to_string());
        }
        if self.economy.cash_per_hand < 0 || self.shop.refresh_cost < 0 {
            return Err("economy values must not be negative".to_string());
        }
        Ok(())
    }
}
