mod command;

use anyhow::Context;
use clap::Parser;
use command::Command;
use serde::Serialize;
use sortdeck_core::{
    Event, EventBus, Phase, RoundOutcome, RunError, RunState, RunStats, TransformKind,
    TransformOutcome,
};
use sortdeck_data::load_game_data;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_RUN_SEED: u64 = 0xC0FFEE;

#[derive(Debug, Parser)]
#[command(author, version, about = "Sort a row of cards with a deck of actions")]
struct Args {
    /// Directory holding config.json and actions.json.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    #[arg(long, default_value_t = DEFAULT_RUN_SEED)]
    seed: u64,
    /// Play this many rounds unattended and print a summary.
    #[arg(long)]
    auto: Option<u32>,
}

#[derive(Debug, Serialize)]
struct AutoSummary {
    seed: u64,
    rounds_played: u32,
    rounds_sorted: u32,
    cash: i64,
    owned_actions: usize,
    stats: RunStats,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let data = load_game_data(&args.assets)
        .with_context(|| format!("load assets from {}", args.assets.display()))?;
    log::info!(
        "loaded {} actions, base deck of {}",
        data.catalog.actions.len(),
        data.catalog.base_deck.len()
    );
    let mut run = RunState::new(data.config, data.catalog, args.seed)?;
    let mut events = EventBus::default();
    run.start_round(&mut events)?;
    log_events(&mut events);

    match args.auto {
        Some(rounds) => run_auto(&mut run, rounds, &mut events),
        None => run_repl(&mut run, &mut events),
    }
}

fn run_repl(run: &mut RunState, events: &mut EventBus) -> anyhow::Result<()> {
    print_table(run);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse_line(&line) {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        if matches!(command, Command::Quit) {
            break;
        }
        if let Err(err) = handle(run, command, events) {
            eprintln!("error: {err}");
        }
        log_events(events);
    }
    Ok(())
}

fn handle(run: &mut RunState, command: Command, events: &mut EventBus) -> anyhow::Result<()> {
    match command {
        Command::Sel { indices } => {
            for index in indices {
                run.select_card(index)?;
            }
            print_table(run);
        }
        Command::Clear => {
            run.deselect_all();
            print_table(run);
        }
        Command::Use { slot } => {
            let used = run.use_action(slot, events)?;
            if let TransformOutcome::Rejected(reason) = &used.outcome {
                println!("{} fizzled: {reason}", used.action.name());
            }
            print_table(run);
        }
        Command::Next => {
            run.advance_phase(events)?;
            print_table(run);
        }
        Command::Buy { slot } => {
            let bought = run.purchase(slot, events)?;
            println!("bought {} (cash {})", bought.name(), run.state.cash);
        }
        Command::Refresh => {
            run.refresh_shop(events)?;
            print_table(run);
        }
        Command::State => print_table(run),
        Command::Json => println!("{}", serde_json::to_string_pretty(&run.snapshot())?),
        Command::Deck => {
            let stats = run.deck.stats();
            println!(
                "owned {} | draw {} | discard {}",
                stats.owned, stats.draw, stats.discard
            );
            for (id, count) in &stats.by_id {
                println!("  {id} x{count}");
            }
        }
        Command::Tick { ms } => {
            if run.tick(Duration::from_millis(ms), events).is_some() {
                print_table(run);
            }
        }
        Command::Settle => {
            if run.settle_pending(events).is_some() {
                print_table(run);
            }
        }
        Command::ResetRound => {
            run.reset_round(events)?;
            print_table(run);
        }
        Command::Reset => {
            run.reset_run(events)?;
            print_table(run);
        }
        Command::Help => print_help(),
        Command::Quit => {}
    }
    Ok(())
}

fn print_help() {
    println!("sel <i>..     toggle card selection");
    println!("clear         clear selection");
    println!("use <slot>    play a bank slot on the selection");
    println!("next          reward -> shop -> next round");
    println!("buy <slot>    buy a shop offer");
    println!("refresh       restock the shop");
    println!("state | json | deck");
    println!("tick <ms> | settle");
    println!("reset-round | reset | quit");
}

fn print_table(run: &RunState) {
    let snapshot = run.snapshot();
    println!(
        "round {} | {:?} | cash {} | hands {}/{}",
        snapshot.round,
        snapshot.phase,
        snapshot.cash,
        snapshot.remaining_hands,
        snapshot.starting_hands
    );
    let row: Vec<String> = snapshot
        .cards
        .iter()
        .enumerate()
        .map(|(index, card)| {
            if card.selected {
                format!("{index}:[{}]", card.value)
            } else {
                format!("{index}:{}", card.value)
            }
        })
        .collect();
    println!("cards: {}", row.join(" "));
    if snapshot.phase == Phase::Sorting {
        for view in &snapshot.bank {
            match &view.name {
                Some(name) => println!(
                    "  slot {}: {}{}",
                    view.slot,
                    name,
                    if view.playable { "" } else { " (not playable)" }
                ),
                None => println!("  slot {}: empty", view.slot),
            }
        }
    }
    if let Some(pending) = snapshot.pending_reward {
        println!("reward pending: {} ms", pending.remaining_ms);
    }
    if let Some(shop) = &snapshot.shop {
        for offer in &shop.offers {
            let sold = if shop.purchased.contains(&offer.slot) {
                " (sold)"
            } else {
                ""
            };
            println!(
                "  offer {}: {} [{:?}] ${}{}",
                offer.slot, offer.template.name, offer.template.rarity, offer.template.cost, sold
            );
        }
        println!("  refresh: ${}", shop.refresh_cost);
    }
}

fn run_auto(run: &mut RunState, rounds: u32, events: &mut EventBus) -> anyhow::Result<()> {
    let mut rounds_sorted = 0;
    for _ in 0..rounds {
        while run.phase() == Phase::Sorting {
            auto_step(run, events)?;
            run.settle_pending(events);
            log_events(events);
        }
        if run
            .round_stats
            .as_ref()
            .is_some_and(|stats| stats.outcome == RoundOutcome::Sorted)
        {
            rounds_sorted += 1;
        }
        run.advance_phase(events)?;
        auto_shop(run, events);
        log_events(events);
        run.advance_phase(events)?;
        log_events(events);
    }
    let summary = AutoSummary {
        seed: run.rng.seed(),
        rounds_played: rounds,
        rounds_sorted,
        cash: run.state.cash,
        owned_actions: run.deck.owned.len(),
        stats: run.run_stats.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Fixes the leftmost adjacent inversion with any held action that swaps a
/// pair, or burns a hand to cycle the bank when none is held.
fn auto_step(run: &mut RunState, events: &mut EventBus) -> Result<(), RunError> {
    run.deselect_all();
    let inversion = run
        .cards
        .windows(2)
        .position(|pair| pair[0].value > pair[1].value);
    let swapper = (0..run.bank.size()).find(|&slot| {
        run.bank
            .get(slot)
            .is_some_and(|action| swaps_pair(&action.template.transform))
    });
    let slot = match (inversion, swapper) {
        (Some(index), Some(slot)) => {
            run.select_card(index)?;
            run.select_card(index + 1)?;
            slot
        }
        _ => (0..run.bank.size())
            .find(|&slot| run.bank.get(slot).is_some())
            .unwrap_or(0),
    };
    run.use_action(slot, events)?;
    Ok(())
}

fn swaps_pair(transform: &TransformKind) -> bool {
    match transform {
        TransformKind::Modify { .. } => false,
        TransformKind::Shift { offset } => offset.rem_euclid(2) == 1,
        TransformKind::Reverse
        | TransformKind::Swap
        | TransformKind::RandomDerangement
        | TransformKind::SplitSwap => true,
    }
}

/// Buys the cheapest offer that swaps a pair, if affordable.
fn auto_shop(run: &mut RunState, events: &mut EventBus) {
    let Some(shop) = run.shop.as_ref() else {
        return;
    };
    let pick = shop
        .offers
        .iter()
        .filter(|offer| swaps_pair(&offer.template.transform))
        .filter(|offer| offer.template.cost <= run.state.cash)
        .min_by_key(|offer| offer.template.cost)
        .map(|offer| offer.slot);
    if let Some(slot) = pick {
        if let Err(err) = run.purchase(slot, events) {
            log::warn!("auto purchase of offer {slot} failed: {err}");
        }
    }
}

fn log_events(events: &mut EventBus) {
    for event in events.drain() {
        match event {
            Event::RoundStarted {
                round,
                hands,
                deck_size,
            } => log::info!("round {round} started: {hands} hands, {deck_size} actions owned"),
            Event::CardsDealt { values } => log::info!("dealt {values:?}"),
            Event::ActionDrawn { slot, id } => log::debug!("slot {slot} drew {id}"),
            Event::SlotLeftEmpty { slot } => log::warn!("slot {slot} left empty"),
            Event::DeckReshuffled { moved } => log::debug!("reshuffled {moved} discards"),
            Event::ActionApplied {
                slot,
                id,
                indices,
                before,
                after,
            } => log::info!("slot {slot} {id} at {indices:?}: {before:?} -> {after:?}"),
            Event::ActionRejected { slot, id, reason } => {
                log::info!("slot {slot} {id} rejected: {reason}")
            }
            Event::HandsExhausted { round } => log::info!("round {round}: out of hands"),
            Event::RoundWon {
                round,
                hands_remaining,
            } => log::info!("round {round} sorted with {hands_remaining} hands left"),
            Event::RewardScheduled { ticket, delay_ms } => {
                log::debug!("reward #{ticket} in {delay_ms} ms")
            }
            Event::RewardCancelled { ticket } => log::debug!("reward #{ticket} cancelled"),
            Event::RoundCompleted {
                round,
                outcome,
                cash_earned,
                cash,
            } => log::info!("round {round} {outcome:?}: +{cash_earned} (cash {cash})"),
            Event::PhaseChanged { from, to } => log::debug!("phase {from:?} -> {to:?}"),
            Event::ShopEntered { offers } => log::info!("shop open with {offers} offers"),
            Event::ShopRefreshed { offers, cost, cash } => {
                log::info!("shop restocked {offers} offers for {cost} (cash {cash})")
            }
            Event::ShopBought {
                slot,
                id,
                cost,
                cash,
            } => log::info!("bought {id} from offer {slot} for {cost} (cash {cash})"),
            Event::RunReset => log::info!("run reset"),
        }
    }
}
