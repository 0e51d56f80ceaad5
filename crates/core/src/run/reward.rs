use super::*;
use crate::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reward payout waiting out the celebration delay after a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReward {
    pub ticket: u64,
    pub remaining_ms: u64,
}

impl RunState {
    pub(super) fn schedule_reward(&mut self, events: &mut EventBus) {
        let delay_ms = self.config.reward_delay_ms;
        if delay_ms == 0 {
            self.complete_round(RoundOutcome::Sorted, events);
            return;
        }
        self.next_ticket = self.next_ticket.wrapping_add(1);
        let ticket = self.next_ticket;
        self.pending_reward = Some(PendingReward {
            ticket,
            remaining_ms: delay_ms,
        });
        events.push(Event::RewardScheduled { ticket, delay_ms });
    }

    /// Advances the reward clock; pays out once the delay has elapsed.
    pub fn tick(&mut self, elapsed: Duration, events: &mut EventBus) -> Option<RoundStats> {
        let pending = self.pending_reward.as_mut()?;
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        pending.remaining_ms = pending.remaining_ms.saturating_sub(elapsed_ms);
        if pending.remaining_ms > 0 {
            return None;
        }
        self.settle_pending(events)
    }

    /// Pays a pending reward immediately.
    pub fn settle_pending(&mut self, events: &mut EventBus) -> Option<RoundStats> {
        self.pending_reward.take()?;
        Some(self.complete_round(RoundOutcome::Sorted, events))
    }

    pub(super) fn cancel_pending(&mut self, events: &mut EventBus) {
        if let Some(pending) = self.pending_reward.take() {
            events.push(Event::RewardCancelled {
                ticket: pending.ticket,
            });
        }
    }

    pub(super) fn complete_round(
        &mut self,
        outcome: RoundOutcome,
        events: &mut EventBus,
    ) -> RoundStats {
        let cash_earned = match outcome {
            RoundOutcome::Sorted => {
                self.state.remaining_hands as i64 * self.config.economy.cash_per_hand
            }
            RoundOutcome::OutOfHands => 0,
        };
        self.state.cash += cash_earned;
        let stats = RoundStats {
            round: self.state.current_round,
            outcome,
            hands_used: self.state.hands_used(),
            hands_remaining: self.state.remaining_hands,
            cash_earned,
            actions_taken: self.state.action_count,
        };
        self.run_stats.record(&stats);
        self.round_stats = Some(stats.clone());
        events.push(Event::RoundCompleted {
            round: stats.round,
            outcome,
            cash_earned,
            cash: self.state.cash,
        });
        self.set_phase(Phase::Reward, events);
        stats
    }
}
