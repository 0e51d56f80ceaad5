use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Sorting,
    Reward,
    Shop,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Sorted,
    OutOfHands,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: Phase,
    pub starting_hands: u32,
    pub remaining_hands: u32,
    pub action_count: u32,
    pub cash: i64,
    pub current_round: u32,
    pub won: bool,
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Sorting,
            starting_hands: 0,
            remaining_hands: 0,
            action_count: 0,
            cash: 0,
            current_round: 1,
            won: false,
        }
    }

    pub fn begin_round(&mut self, hands: u32) {
        self.phase = Phase::Sorting;
        self.starting_hands = hands;
        self.remaining_hands = hands;
        self.action_count = 0;
        self.won = false;
    }

    /// Spends one hand; the budget never goes below zero.
    pub fn use_hand(&mut self) {
        self.action_count = self.action_count.saturating_add(1);
        self.remaining_hands = self.remaining_hands.saturating_sub(1);
    }

    pub fn hands_used(&self) -> u32 {
        self.starting_hands.saturating_sub(self.remaining_hands)
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundStats {
    pub round: u32,
    pub outcome: RoundOutcome,
    pub hands_used: u32,
    pub hands_remaining: u32,
    pub cash_earned: i64,
    pub actions_taken: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunStats {
    pub total_rounds: u32,
    pub total_cash_earned: i64,
    pub total_actions_used: u32,
    /// Most hands left over in any sorted round.
    pub best_efficiency: u32,
}

impl RunStats {
    pub fn record(&mut self, round: &RoundStats) {
        self.total_rounds = self.total_rounds.saturating_add(1);
        self.total_cash_earned += round.cash_earned;
        self.total_actions_used = self.total_actions_used.saturating_add(round.actions_taken);
        if round.outcome == RoundOutcome::Sorted {
            self.best_efficiency = self.best_efficiency.max(round.hands_remaining);
        }
    }
}
