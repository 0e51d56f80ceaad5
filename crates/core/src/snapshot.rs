use crate::{
    Card, DeckStats, PendingReward, Phase, RequiresCount, RoundStats, RunState, RunStats,
    ShopOffer,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BankSlotView {
    pub slot: usize,
    pub id: Option<String>,
    pub name: Option<String>,
    pub requires: Option<RequiresCount>,
    pub playable: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShopView {
    pub offers: Vec<ShopOffer>,
    pub purchased: Vec<usize>,
    pub refresh_cost: i64,
}

/// Read-only view of everything a front end renders.
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub round: u32,
    pub phase: Phase,
    pub cash: i64,
    pub starting_hands: u32,
    pub remaining_hands: u32,
    pub action_count: u32,
    pub won: bool,
    pub pending_reward: Option<PendingReward>,
    pub cards: Vec<Card>,
    pub bank: Vec<BankSlotView>,
    pub shop: Option<ShopView>,
    pub deck: DeckStats,
    pub round_stats: Option<RoundStats>,
    pub run_stats: RunStats,
}

impl RunState {
    pub fn snapshot(&self) -> RunSnapshot {
        let selected = self.selection_size();
        let sorting = self.state.phase == Phase::Sorting && self.pending_reward().is_none();
        let bank = self
            .bank
            .slots()
            .iter()
            .enumerate()
            .map(|(slot, held)| BankSlotView {
                slot,
                id: held.as_ref().map(|action| action.id().to_string()),
                name: held.as_ref().map(|action| action.name().to_string()),
                requires: held.as_ref().map(|action| action.template.requires),
                playable: sorting && self.bank.is_playable(slot, selected),
            })
            .collect();
        let shop = self.shop.as_ref().map(|shop| ShopView {
            offers: shop.offers.clone(),
            purchased: shop.purchased.iter().copied().collect(),
            refresh_cost: shop.refresh_cost,
        });
        RunSnapshot {
            round: self.state.current_round,
            phase: self.state.phase,
            cash: self.state.cash,
            starting_hands: self.state.starting_hands,
            remaining_hands: self.state.remaining_hands,
            action_count: self.state.action_count,
            won: self.state.won,
            pending_reward: self.pending_reward(),
            cards: self.cards.clone(),
            bank,
            shop,
            deck: self.deck.stats(),
            round_stats: self.round_stats.clone(),
            run_stats: self.run_stats.clone(),
        }
    }
}
