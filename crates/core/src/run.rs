use crate::{
    ActionBank, ActionDeck, BankError, Card, Catalog, DeckError, EventBus, GameConfig, Phase,
    RngState, RoundState, RoundStats, RunStats, ShopError, ShopState,
};
use thiserror::Error;

mod reward;
mod round;
mod shop;

pub use reward::PendingReward;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("round reward is pending")]
    RewardPending,
    #[error("invalid card index {0}")]
    InvalidCardIndex(usize),
    #[error("not enough cash: need {cost}, have {cash}")]
    NotEnoughCash { cost: i64, cash: i64 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("bank error: {0}")]
    Bank(#[from] BankError),
    #[error("shop error: {0}")]
    Shop(#[from] ShopError),
    #[error("deck error: {0}")]
    Deck(#[from] DeckError),
}

/// Whole-run state. Every operation takes `&mut self` and an event sink and
/// either completes or returns an error without touching state.
#[derive(Debug)]
pub struct RunState {
    pub config: GameConfig,
    pub catalog: Catalog,
    pub rng: RngState,
    pub deck: ActionDeck,
    pub bank: ActionBank,
    pub cards: Vec<Card>,
    pub state: RoundState,
    pub shop: Option<ShopState>,
    pub round_stats: Option<RoundStats>,
    pub run_stats: RunStats,
    pending_reward: Option<PendingReward>,
    next_ticket: u64,
}

impl RunState {
    pub fn new(config: GameConfig, catalog: Catalog, seed: u64) -> Result<Self, RunError> {
        config.validate().map_err(RunError::InvalidConfig)?;
        ActionDeck::base_templates(&catalog)?;
        let bank = ActionBank::new(config.bank_size);
        Ok(Self {
            config,
            catalog,
            rng: RngState::from_seed(seed),
            deck: ActionDeck::new(),
            bank,
            cards: Vec::new(),
            state: RoundState::new(),
            shop: None,
            round_stats: None,
            run_stats: RunStats::default(),
            pending_reward: None,
            next_ticket: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn pending_reward(&self) -> Option<PendingReward> {
        self.pending_reward
    }

    /// Reward → Shop and Shop → Sorting (next round). Leaving Sorting only
    /// happens through the win check or an exhausted hand budget.
    pub fn advance_phase(&mut self, events: &mut EventBus) -> Result<Phase, RunError> {
        match self.state.phase {
            Phase::Sorting if self.pending_reward.is_some() => Err(RunError::RewardPending),
            Phase::Sorting => Err(RunError::InvalidPhase(Phase::Sorting)),
            Phase::Reward => {
                self.enter_shop(events);
                Ok(self.state.phase)
            }
            Phase::Shop => {
                self.leave_shop(events)?;
                Ok(self.state.phase)
            }
        }
    }

    /// Starts a fresh run: round 1, no cash, owned deck back to the base set.
    pub fn reset_run(&mut self, events: &mut EventBus) -> Result<(), RunError> {
        ActionDeck::base_templates(&self.catalog)?;
        self.cancel_pending(events);
        self.state = RoundState::new();
        self.run_stats = RunStats::default();
        self.round_stats = None;
        self.shop = None;
        self.bank.clear();
        self.deck.reset();
        events.push(crate::Event::RunReset);
        self.start_round(events)
    }

    /// Uids of every card circulating this round: draw, discard and bank.
    pub fn circulating_uids(&self) -> Vec<u32> {
        let mut uids: Vec<u32> = self
            .deck
            .draw
            .iter()
            .chain(&self.deck.discard)
            .chain(self.bank.live())
            .map(|action| action.uid)
            .collect();
        uids.sort_unstable();
        uids
    }

    pub fn owned_uids(&self) -> Vec<u32> {
        let mut uids: Vec<u32> = self.deck.owned.iter().map(|action| action.uid).collect();
        uids.sort_unstable();
        uids
    }

    fn set_phase(&mut self, to: Phase, events: &mut EventBus) {
        let from = self.state.phase;
        self.state.phase = to;
        if from != to {
            events.push(crate::Event::PhaseChanged { from, to });
        }
    }
}
