use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod config;
mod error;
mod format;
mod logger;
mod ui;
mod version;

mod auth;
mod client;
mod financial;
mod refresh;
mod session;
mod transport;

#[cfg(test)]
mod tests;

use cli::CliHandler;
use version::CURRENT_VERSION;

#[derive(Parser)]
#[command(
    name = "findash",
    about = "FinDash terminal client for the FinDash financial dashboard",
    long_about = "FinDash - Terminal client for the FinDash financial dashboard

OVERVIEW:
  Sign in to your FinDash account and read your dashboard from the terminal:
  balances, recent transactions, scheduled transfers, working capital and
  wallet cards.

WORKFLOW:
  1. Login with your email and password
  2. Query the dashboard views
  3. Logout when you are done

QUICK START:
  findash login                         # Authenticate with your credentials
  findash summary                       # Balance, expense and savings totals
  findash transactions --limit 10       # Latest transactions
  findash transfers                     # Upcoming scheduled transfers
  findash capital --period 6m           # Monthly income/expense/net series
  findash wallet                        # Your cards
  findash status                        # Check session and configuration",
    version = CURRENT_VERSION,
    author = "FinDash Team",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use an alternate config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login,

    /// Create a new account
    Register,

    /// Sign out and clear the stored session
    Logout,

    /// Show session and configuration status
    #[command(aliases = &["st"])]
    Status,

    /// Show the current user profile
    Profile,

    /// Force-renew the access token
    Refresh,

    /// Show balance, expense and savings totals
    Summary,

    /// List recent transactions
    #[command(aliases = &["tx"])]
    Transactions(TransactionsArgs),

    /// List scheduled transfers
    #[command(aliases = &["tf"])]
    Transfers(TransfersArgs),

    /// Show the monthly working-capital series
    #[command(aliases = &["wc"])]
    Capital(CapitalArgs),

    /// List wallet cards
    Wallet,

    /// Inspect this invocation's error log
    Errors(ErrorsArgs),

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct TransactionsArgs {
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Args)]
pub struct TransfersArgs {
    #[arg(short, long)]
    pub limit: Option<u32>,
}

#[derive(Args)]
pub struct CapitalArgs {
    /// Period selector understood by the backend, e.g. 6m or 1y
    #[arg(short, long)]
    pub period: Option<String>,
}

#[derive(Args)]
pub struct ErrorsArgs {
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetEndpoint { url: String },
    SetTimeout { seconds: u64 },
    SetVerbose { enabled: bool },
    Reset,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(format!("findash={}", log_level));
    subscriber.init();

    let mut handler = CliHandler::with_config_path(cli.config);

    if let Err(e) = handler.execute(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
