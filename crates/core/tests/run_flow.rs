use sortdeck_core::{
    cards_from_values, is_sorted, ActionTemplate, Card, Catalog, DeckError, Event, EventBus,
    GameConfig, Phase, Rarity, RequiresCount, RoundOutcome, RunError, RunState, ShopError,
    TransformKind,
};
use std::time::Duration;

fn template(
    id: &str,
    requires: RequiresCount,
    cost: i64,
    rarity: Rarity,
    transform: TransformKind,
) -> ActionTemplate {
    ActionTemplate {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        requires,
        cost,
        rarity,
        transform,
    }
}

fn catalog(base: &[&str]) -> Catalog {
    use RequiresCount::*;
    Catalog {
        actions: vec![
            template("add", ExactlyOne, 2, Rarity::Common, TransformKind::Modify { delta: 1 }),
            template("subtract", ExactlyOne, 2, Rarity::Common, TransformKind::Modify { delta: -1 }),
            template("upshift", TwoOrMore, 4, Rarity::Common, TransformKind::Shift { offset: 1 }),
            template("double_upshift", TwoOrMore, 7, Rarity::Rare, TransformKind::Shift { offset: 2 }),
            template("reverse", TwoOrMore, 4, Rarity::Common, TransformKind::Reverse),
            template("swap", TwoOrMore, -1, Rarity::Common, TransformKind::Swap),
            template("random_swap", TwoOrMore, 4, Rarity::Common, TransformKind::RandomDerangement),
            template("split_swap", TwoOrMore, 4, Rarity::Common, TransformKind::SplitSwap),
            template("mirror", AnyNonzero, 12, Rarity::Legendary, TransformKind::Reverse),
        ],
        base_deck: base.iter().map(|id| id.to_string()).collect(),
    }
}

fn new_run(base: &[&str]) -> (RunState, EventBus) {
    let mut events = EventBus::default();
    let mut run = RunState::new(GameConfig::default(), catalog(base), 12345).expect("run");
    run.start_round(&mut events).expect("start round");
    (run, events)
}

fn swap_run() -> (RunState, EventBus) {
    new_run(&["swap", "swap", "swap", "swap", "swap"])
}

fn assert_piles_consistent(run: &RunState) {
    assert_eq!(run.circulating_uids(), run.owned_uids());
}

fn select(run: &mut RunState, indices: &[usize]) {
    for &index in indices {
        assert!(run.select_card(index).expect("select"));
    }
}

/// Swaps cards 0 and 1 of `[2, 1, 3, ..]`, which sorts the row.
fn win_round(run: &mut RunState, events: &mut EventBus) {
    run.cards = cards_from_values(&[2, 1, 3, 4, 5, 6, 7, 8, 9]);
    select(run, &[0, 1]);
    run.use_action(0, events).expect("use swap");
}

fn values(cards: &[Card]) -> Vec<i32> {
    cards.iter().map(|card| card.value).collect()
}

#[test]
fn round_starts_with_full_budget_and_bank() {
    let (run, mut events) = new_run(&["swap", "swap", "swap", "swap", "reverse"]);
    assert_eq!(run.phase(), Phase::Sorting);
    assert_eq!(run.state.current_round, 1);
    assert_eq!(run.state.starting_hands, 9);
    assert_eq!(run.state.remaining_hands, 9);
    assert_eq!(run.cards.len(), 9);
    let mut dealt = values(&run.cards);
    dealt.sort_unstable();
    dealt.dedup();
    assert_eq!(dealt.len(), 9);
    assert!(dealt.iter().all(|value| (1..=10).contains(value)));
    for (position, card) in run.cards.iter().enumerate() {
        assert_eq!(card.index, position);
        assert!(!card.selected);
    }
    assert_eq!(run.bank.live().count(), 3);
    assert_eq!(run.deck.draw.len(), 2);
    assert_piles_consistent(&run);

    let drained: Vec<Event> = events.drain().collect();
    assert!(matches!(drained[0], Event::RoundStarted { round: 1, hands: 9, deck_size: 5 }));
    assert_eq!(
        drained
            .iter()
            .filter(|event| matches!(event, Event::ActionDrawn { .. }))
            .count(),
        3
    );
}

#[test]
fn each_use_costs_a_hand_and_clears_selection() {
    let (mut run, mut events) = swap_run();
    run.cards = cards_from_values(&[5, 9, 1, 3, 7, 2, 8, 6, 4]);
    select(&mut run, &[0, 2]);
    let used = run.use_action(1, &mut events).expect("use");
    assert!(used.outcome.is_applied());
    assert_eq!(values(&run.cards), vec![1, 9, 5, 3, 7, 2, 8, 6, 4]);
    assert_eq!(run.state.action_count, 1);
    assert_eq!(run.state.remaining_hands, 8);
    assert_eq!(run.selection_size(), 0);
    assert_eq!(run.deck.discard.len(), 1);
    assert_piles_consistent(&run);
}

#[test]
fn rejected_action_is_consumed() {
    let (mut run, mut events) = swap_run();
    run.cards = cards_from_values(&[5, 9, 1, 3, 7, 2, 8, 6, 4]);
    let before = values(&run.cards);
    let held = run.bank.get(2).expect("slot").uid;
    select(&mut run, &[4]);
    assert!(!run.is_slot_playable(2));

    let used = run.use_action(2, &mut events).expect("use");
    assert!(!used.outcome.is_applied());
    assert_eq!(values(&run.cards), before);
    assert_eq!(run.state.remaining_hands, 8);
    assert_eq!(run.state.action_count, 1);
    assert_eq!(run.selection_size(), 0);
    assert_ne!(run.bank.get(2).expect("refilled").uid, held);
    assert!(run.deck.discard.iter().any(|action| action.uid == held));
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::ActionRejected { slot: 2, .. })));
    assert_piles_consistent(&run);
}

#[test]
fn pile_invariant_holds_through_a_long_round() {
    let (mut run, mut events) = new_run(&["swap", "reverse", "upshift", "split_swap", "random_swap"]);
    run.cards = cards_from_values(&[9, 8, 7, 6, 5, 4, 3, 2, 1]);
    run.state.remaining_hands = 40;
    for turn in 0..30 {
        if run.phase() != Phase::Sorting || run.pending_reward().is_some() {
            break;
        }
        select(&mut run, &[turn % 9, (turn + 4) % 9]);
        run.use_action(turn % 3, &mut events).expect("use");
        assert_piles_consistent(&run);
        assert_eq!(
            run.deck.draw.len() + run.deck.discard.len() + run.bank.live().count(),
            5
        );
    }
}

#[test]
fn win_schedules_reward_and_freezes_sorting() {
    let (mut run, mut events) = swap_run();
    run.state.remaining_hands = 5;
    win_round(&mut run, &mut events);

    assert!(run.is_sorted());
    assert!(run.state.won);
    assert_eq!(run.phase(), Phase::Sorting);
    let pending = run.pending_reward().expect("pending reward");
    assert_eq!(pending.remaining_ms, 2000);

    assert!(matches!(run.select_card(0), Err(RunError::RewardPending)));
    assert!(matches!(run.use_action(0, &mut events), Err(RunError::RewardPending)));
    assert!(matches!(run.advance_phase(&mut events), Err(RunError::RewardPending)));
    assert_eq!(run.state.remaining_hands, 4);

    assert!(run.tick(Duration::from_millis(1500), &mut events).is_none());
    let stats = run
        .tick(Duration::from_millis(500), &mut events)
        .expect("reward paid");
    assert_eq!(stats.outcome, RoundOutcome::Sorted);
    assert_eq!(stats.cash_earned, 4);
    assert_eq!(stats.hands_used, 5);
    assert_eq!(stats.hands_remaining, 4);
    assert_eq!(stats.actions_taken, 1);
    assert_eq!(run.state.cash, 4);
    assert_eq!(run.phase(), Phase::Reward);
    assert!(run.pending_reward().is_none());
    assert_eq!(run.round_stats.as_ref(), Some(&stats));
}

#[test]
fn cash_accumulates_across_rounds() {
    let (mut run, mut events) = swap_run();
    run.state.remaining_hands = 5;
    win_round(&mut run, &mut events);
    run.settle_pending(&mut events).expect("reward");
    assert_eq!(run.state.cash, 4);

    assert_eq!(run.advance_phase(&mut events).expect("shop"), Phase::Shop);
    assert_eq!(run.advance_phase(&mut events).expect("sorting"), Phase::Sorting);
    assert_eq!(run.state.current_round, 2);
    assert_eq!(run.state.remaining_hands, 9);
    assert!(!run.state.won);
    assert_piles_consistent(&run);

    run.state.remaining_hands = 4;
    win_round(&mut run, &mut events);
    let stats = run.settle_pending(&mut events).expect("reward");
    assert_eq!(stats.cash_earned, 3);
    assert_eq!(run.state.cash, 7);
    assert_eq!(run.run_stats.total_rounds, 2);
    assert_eq!(run.run_stats.total_cash_earned, 7);
    assert_eq!(run.run_stats.total_actions_used, 2);
    assert_eq!(run.run_stats.best_efficiency, 4);
}

#[test]
fn zero_delay_pays_immediately() {
    let mut config = GameConfig::default();
    config.reward_delay_ms = 0;
    let mut events = EventBus::default();
    let mut run = RunState::new(config, catalog(&["swap"; 5]), 1).expect("run");
    run.start_round(&mut events).expect("start");
    win_round(&mut run, &mut events);
    assert_eq!(run.phase(), Phase::Reward);
    assert_eq!(run.state.cash, 8);
    assert!(run.pending_reward().is_none());
}

#[test]
fn running_out_of_hands_ends_round_without_cash() {
    let (mut run, mut events) = swap_run();
    run.cards = cards_from_values(&[5, 9, 1, 3, 7, 2, 8, 6, 4]);
    run.state.remaining_hands = 1;
    select(&mut run, &[0, 1]);
    run.use_action(0, &mut events).expect("use");

    assert_eq!(run.phase(), Phase::Reward);
    assert!(!run.state.won);
    assert_eq!(run.state.remaining_hands, 0);
    let stats = run.round_stats.clone().expect("stats");
    assert_eq!(stats.outcome, RoundOutcome::OutOfHands);
    assert_eq!(stats.cash_earned, 0);
    assert_eq!(run.state.cash, 0);
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::HandsExhausted { round: 1 })));
}

#[test]
fn sorting_only_operations_reject_other_phases() {
    let (mut run, mut events) = swap_run();
    assert!(matches!(
        run.advance_phase(&mut events),
        Err(RunError::InvalidPhase(Phase::Sorting))
    ));
    assert!(matches!(
        run.purchase(0, &mut events),
        Err(RunError::InvalidPhase(Phase::Sorting))
    ));
    assert!(matches!(
        run.refresh_shop(&mut events),
        Err(RunError::InvalidPhase(Phase::Sorting))
    ));
    assert!(matches!(run.select_card(40), Err(RunError::InvalidCardIndex(40))));

    win_round(&mut run, &mut events);
    run.settle_pending(&mut events).expect("reward");
    run.advance_phase(&mut events).expect("shop");

    let cards = run.cards.clone();
    let remaining = run.state.remaining_hands;
    assert!(matches!(
        run.use_action(0, &mut events),
        Err(RunError::InvalidPhase(Phase::Shop))
    ));
    assert!(matches!(
        run.select_card(0),
        Err(RunError::InvalidPhase(Phase::Shop))
    ));
    assert!(matches!(
        run.reset_round(&mut events),
        Err(RunError::InvalidPhase(Phase::Shop))
    ));
    assert_eq!(run.cards, cards);
    assert_eq!(run.state.remaining_hands, remaining);
}

#[test]
fn reset_run_cancels_pending_reward() {
    let (mut run, mut events) = swap_run();
    run.state.cash = 3;
    win_round(&mut run, &mut events);
    let ticket = run.pending_reward().expect("pending").ticket;
    events.drain().for_each(drop);

    run.reset_run(&mut events).expect("reset");
    assert!(run.pending_reward().is_none());
    assert!(run.tick(Duration::from_secs(5), &mut events).is_none());
    assert_eq!(run.state.cash, 0);
    assert_eq!(run.state.current_round, 1);
    assert_eq!(run.phase(), Phase::Sorting);
    assert_eq!(run.deck.owned.len(), 5);
    assert_piles_consistent(&run);

    let drained: Vec<Event> = events.drain().collect();
    assert_eq!(drained[0], Event::RewardCancelled { ticket });
    assert!(drained.contains(&Event::RunReset));
}

#[test]
fn reset_round_redeals_and_keeps_cash() {
    let (mut run, mut events) = swap_run();
    run.state.cash = 6;
    select(&mut run, &[0, 1]);
    run.use_action(0, &mut events).expect("use");
    run.reset_round(&mut events).expect("reset round");
    assert_eq!(run.state.cash, 6);
    assert_eq!(run.state.remaining_hands, 9);
    assert_eq!(run.state.action_count, 0);
    assert_eq!(run.selection_size(), 0);
    assert!(run.deck.discard.is_empty());
    assert_piles_consistent(&run);
}

#[test]
fn shop_offers_respect_rarity_and_cost() {
    let (mut run, mut events) = swap_run();
    win_round(&mut run, &mut events);
    run.settle_pending(&mut events).expect("reward");
    run.advance_phase(&mut events).expect("shop");

    let shop = run.shop.as_ref().expect("shop");
    assert_eq!(shop.offers.len(), 4);
    assert!(shop.purchased.is_empty());
    for offer in &shop.offers {
        assert!(offer.template.cost >= 0);
        assert!(offer.template.rarity <= Rarity::Epic);
        assert_ne!(offer.template.id, "swap");
        assert_ne!(offer.template.id, "mirror");
    }
    let mut ids: Vec<&str> = shop.offers.iter().map(|offer| offer.template.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn purchase_adds_to_owned_deck_and_draw_pile() {
    let (mut run, mut events) = swap_run();
    win_round(&mut run, &mut events);
    run.settle_pending(&mut events).expect("reward");
    run.advance_phase(&mut events).expect("shop");
    run.state.cash = 20;

    let circulating = run.circulating_uids().len();
    let offer = run.shop.as_ref().expect("shop").offers[0].clone();
    let bought = run.purchase(0, &mut events).expect("purchase");
    assert_eq!(bought.template, offer.template);
    assert_eq!(run.state.cash, 20 - offer.template.cost);
    assert_eq!(run.deck.owned.len(), 6);
    assert_eq!(run.circulating_uids().len(), circulating + 1);
    assert!(run.deck.draw.iter().any(|action| action.uid == bought.uid));
    assert_piles_consistent(&run);

    let cash = run.state.cash;
    assert!(matches!(
        run.purchase(0, &mut events),
        Err(RunError::Shop(ShopError::AlreadyPurchased(0)))
    ));
    assert!(matches!(
        run.purchase(17, &mut events),
        Err(RunError::Shop(ShopError::NotFound(17)))
    ));
    assert_eq!(run.state.cash, cash);
    assert_eq!(run.deck.owned.len(), 6);

    run.advance_phase(&mut events).expect("next round");
    assert_eq!(run.deck.owned.len(), 6);
    assert_eq!(run.deck.draw.len() + run.bank.live().count(), 6);
    assert_piles_consistent(&run);
}

#[test]
fn purchase_requires_enough_cash() {
    let (mut run, mut events) = swap_run();
    win_round(&mut run, &mut events);
    run.settle_pending(&mut events).expect("reward");
    run.advance_phase(&mut events).expect("shop");
    run.state.cash = 1;

    assert!(matches!(
        run.purchase(0, &mut events),
        Err(RunError::NotEnoughCash { cash: 1, .. })
    ));
    assert_eq!(run.state.cash, 1);
    assert_eq!(run.deck.owned.len(), 5);
    assert!(!run.shop.as_ref().expect("shop").is_purchased(0));
}

#[test]
fn refresh_shop_charges_and_restocks() {
    let (mut run, mut events) = swap_run();
    win_round(&mut run, &mut events);
    run.settle_pending(&mut events).expect("reward");
    run.advance_phase(&mut events).expect("shop");
    run.state.cash = 10;
    run.purchase(1, &mut events).expect("purchase");
    let cash = run.state.cash;

    run.refresh_shop(&mut events).expect("refresh");
    assert_eq!(run.state.cash, cash - 2);
    let shop = run.shop.as_ref().expect("shop");
    assert!(shop.purchased.is_empty());
    assert_eq!(shop.offers.len(), 4);

    run.state.cash = 1;
    assert!(matches!(
        run.refresh_shop(&mut events),
        Err(RunError::NotEnoughCash { cost: 2, cash: 1 })
    ));
}

#[test]
fn snapshot_reports_playability() {
    let (mut run, _events) = swap_run();
    let snapshot = run.snapshot();
    assert_eq!(snapshot.phase, Phase::Sorting);
    assert_eq!(snapshot.bank.len(), 3);
    assert!(snapshot.bank.iter().all(|slot| !slot.playable));

    select(&mut run, &[2, 3]);
    let snapshot = run.snapshot();
    assert!(snapshot.bank.iter().all(|slot| slot.playable));
    assert_eq!(snapshot.cards.iter().filter(|card| card.selected).count(), 2);
    assert_eq!(snapshot.deck.owned, 5);
    assert!(snapshot.shop.is_none());
}

#[test]
fn win_detection_on_plain_rows() {
    assert!(is_sorted(&cards_from_values(&[1, 2, 3, 4, 5, 6, 7, 8, 9])));
    assert!(!is_sorted(&cards_from_values(&[1, 3, 2, 4, 5, 6, 7, 8, 9])));
    assert!(is_sorted(&cards_from_values(&[2, 2, 5])));
    assert!(is_sorted(&cards_from_values(&[7])));
    assert!(is_sorted(&[]));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = GameConfig::default();
    config.number_of_cards = 11;
    assert!(matches!(
        RunState::new(config, catalog(&["swap"]), 1),
        Err(RunError::InvalidConfig(_))
    ));
}

#[test]
fn unknown_base_action_is_rejected_at_construction() {
    assert!(matches!(
        RunState::new(GameConfig::default(), catalog(&["swap", "ghost"]), 1),
        Err(RunError::Deck(DeckError::UnknownAction(id))) if id == "ghost"
    ));
}

#[test]
fn failed_reset_run_leaves_run_untouched() {
    let (mut run, mut events) = swap_run();
    run.state.cash = 7;
    let dealt = values(&run.cards);
    let owned = run.owned_uids();
    events.drain().for_each(drop);

    run.catalog.base_deck = vec!["ghost".to_string()];
    assert!(matches!(
        run.reset_run(&mut events),
        Err(RunError::Deck(DeckError::UnknownAction(_)))
    ));
    assert_eq!(run.state.cash, 7);
    assert_eq!(run.owned_uids(), owned);
    assert_eq!(run.bank.live().count(), 3);
    assert_eq!(values(&run.cards), dealt);
    assert_eq!(run.phase(), Phase::Sorting);
    assert_piles_consistent(&run);
    assert!(events.drain().next().is_none());
}

#[test]
fn reset_round_cancels_pending_reward() {
    let (mut run, mut events) = swap_run();
    run.state.cash = 3;
    win_round(&mut run, &mut events);
    let ticket = run.pending_reward().expect("pending").ticket;
    events.drain().for_each(drop);

    run.reset_round(&mut events).expect("reset round");
    assert!(run.pending_reward().is_none());
    assert!(!run.state.won);
    assert_eq!(run.state.cash, 3);
    assert_eq!(run.phase(), Phase::Sorting);
    assert!(run.tick(Duration::from_secs(5), &mut events).is_none());
    assert_eq!(run.state.cash, 3);
    assert_piles_consistent(&run);

    let drained: Vec<Event> = events.drain().collect();
    assert_eq!(drained[0], Event::RewardCancelled { ticket });
}

#[test]
fn sorted_deal_is_detected_on_first_action() {
    let (mut run, mut events) = swap_run();
    run.cards = cards_from_values(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(run.phase(), Phase::Sorting);
    assert!(!run.state.won);
    assert!(run.pending_reward().is_none());

    let used = run.use_action(0, &mut events).expect("use");
    assert!(!used.outcome.is_applied());
    assert!(run.state.won);
    assert!(run.pending_reward().is_some());
    assert_eq!(run.state.remaining_hands, 8);
}
