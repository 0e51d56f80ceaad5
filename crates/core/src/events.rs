use crate::{Phase, RoundOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    RoundStarted {
        round: u32,
        hands: u32,
        deck_size: usize,
    },
    CardsDealt {
        values: Vec<i32>,
    },
    ActionDrawn {
        slot: usize,
        id: String,
    },
    SlotLeftEmpty {
        slot: usize,
    },
    DeckReshuffled {
        moved: usize,
    },
    ActionApplied {
        slot: usize,
        id: String,
        indices: Vec<usize>,
        before: Vec<i32>,
        after: Vec<i32>,
    },
    ActionRejected {
        slot: usize,
        id: String,
        reason: String,
    },
    HandsExhausted {
        round: u32,
    },
    RoundWon {
        round: u32,
        hands_remaining: u32,
    },
    RewardScheduled {
        ticket: u64,
        delay_ms: u64,
    },
    RewardCancelled {
        ticket: u64,
    },
    RoundCompleted {
        round: u32,
        outcome: RoundOutcome,
        cash_earned: i64,
        cash: i64,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    ShopEntered {
        offers: usize,
    },
    ShopRefreshed {
        offers: usize,
        cost: i64,
        cash: i64,
    },
    ShopBought {
        slot: usize,
        id: String,
        cost: i64,
        cash: i64,
    },
    RunReset,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
