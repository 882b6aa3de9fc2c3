//! Command-line surface of the `coinduel` binary.

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "coinduel",
    version,
    about = "Coinflip duels and middleman ticket desk"
)]
pub struct CoinduelCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flip a single coin
    Flip {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Coinflip duel: cf <user1> vs <user2> [ft|bo] <rounds>
    Cf(CfArgs),
    /// Re-run recorded matches from their draws and check the results
    Replay {
        #[arg(long)]
        input: String,
    },
    /// Aggregate match records into a summary
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show resolved configuration and where each value came from
    Cfg,
    /// Desk settings (key/value)
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
        #[arg(long, global = true)]
        db: Option<String>,
    },
    /// Ticket ledger
    Ticket {
        #[command(subcommand)]
        action: TicketAction,
        #[arg(long, global = true)]
        db: Option<String>,
    },
    /// Completed tickets and rank of one responder
    Mmstats {
        user: String,
        #[arg(long)]
        db: Option<String>,
    },
    /// Responders with the most completed tickets
    Leaderboard {
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: u32,
        #[arg(long)]
        db: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CfArgs {
    pub user1: String,
    pub vs: String,
    pub user2: String,
    /// ft/firstto, bo/bestof, or a bare number for best-of
    pub mode: Option<String>,
    pub rounds: Option<String>,
    #[arg(long)]
    pub side_a: Option<String>,
    #[arg(long)]
    pub side_b: Option<String>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Delay between rounds in milliseconds
    #[arg(long)]
    pub pace_ms: Option<u64>,
    /// Append the finished match to this JSONL file
    #[arg(long)]
    pub output: Option<String>,
    /// Print each snapshot as a JSON line
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Get { key: String },
    Set { key: String, value: String },
    List,
}

#[derive(Subcommand, Debug)]
pub enum TicketAction {
    /// Open a middleman ticket
    OpenMm {
        #[arg(long)]
        channel: String,
        #[arg(long)]
        creator: String,
        /// 1_50, 50_100, 100_250 or 250_plus
        #[arg(long)]
        tier: String,
        #[arg(long)]
        trader: String,
        #[arg(long)]
        giving: String,
        #[arg(long)]
        receiving: String,
        #[arg(long)]
        both_join: bool,
        #[arg(long)]
        tip: Option<String>,
    },
    /// Open a support ticket
    OpenSupport {
        #[arg(long)]
        channel: String,
        #[arg(long)]
        creator: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        details: Option<String>,
    },
    Claim {
        #[arg(long)]
        channel: String,
        #[arg(long)]
        user: String,
    },
    Unclaim {
        #[arg(long)]
        channel: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        admin: bool,
    },
    /// Record a completed trade for the responder
    Complete {
        #[arg(long)]
        channel: String,
        #[arg(long)]
        user: String,
    },
    Close {
        #[arg(long)]
        channel: String,
    },
    Show {
        #[arg(long)]
        channel: String,
    },
}
