use clap::Parser;

/// One line of REPL input.
#[derive(Debug, Parser)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
pub enum Command {
    #[command(about = "Toggle selection of card positions", alias = "s")]
    Sel {
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    #[command(about = "Clear the card selection", alias = "c")]
    Clear,
    #[command(about = "Play the action held in a bank slot", alias = "u")]
    Use { slot: usize },
    #[command(about = "Advance Reward -> Shop -> next round", alias = "n")]
    Next,
    #[command(about = "Buy a shop offer", alias = "b")]
    Buy { slot: usize },
    #[command(about = "Pay to restock the shop", alias = "r")]
    Refresh,
    #[command(about = "Print the table", alias = "st")]
    State,
    #[command(about = "Print the full snapshot as JSON")]
    Json,
    #[command(about = "Print pile counts")]
    Deck,
    #[command(about = "Let time pass for the pending reward")]
    Tick { ms: u64 },
    #[command(about = "Pay the pending reward now")]
    Settle,
    #[command(about = "Re-deal the current round")]
    ResetRound,
    #[command(about = "Start the run over")]
    Reset,
    #[command(about = "List commands", alias = "?")]
    Help,
    #[command(about = "Leave", alias = "exit", alias = "q")]
    Quit,
}

impl Command {
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(line.split_whitespace())
    }
}
