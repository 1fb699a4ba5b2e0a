//! # Pahana Storefront
//!
//! The `pahana` command-line storefront: cart, wishlist, checkout and
//! invoices over a local data directory.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging to stderr)
//! 2. Parse the command line
//! 3. Load [`ShopConfig`] from the environment, apply `--data-dir`
//! 4. Open the cart, wishlist and order history in the data directory
//! 5. Run the command and print its output
//! 6. Print the notifications the command raised
//!
//! ## Data Directory
//! ```text
//! <data dir>/
//! ├── cart.json                   persisted cart
//! ├── wishlist.json               saved books
//! ├── lastOrder.json              most recent order (for `invoice last`)
//! ├── orders/ORD-XXXXXXXX.json    submitted checkout payloads
//! └── invoices/invoice-ORD-XXXXXXXX.pdf
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use pahana_store::{FileStore, KeyValueStore};
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

use crate::cli::{CartCommand, Cli, Command, InvoiceCommand, WishlistCommand};
use crate::commands::format_notification;
use crate::config::ShopConfig;
use crate::error::AppResult;
use crate::state::AppState;

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pahana_store=trace` - Show trace for the store only
/// - Default: INFO level, DEBUG for the pahana crates
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pahana=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command end to end and reports how it went.
pub async fn run(cli: Cli) -> ExitCode {
    let mut state = match open_state(cli.data_dir).await {
        Ok(state) => state,
        Err(err) => {
            error!(error = %err, "Startup failed");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let status = match dispatch(&mut state, cli.command).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.field_errors() {
                Some(fields) => {
                    for (field, message) in fields.iter() {
                        state.notifications.error(format!("{field}: {message}"));
                    }
                }
                None => {
                    state.notifications.error(err.to_string());
                }
            }
            ExitCode::FAILURE
        }
    };

    for notification in state.notifications.drain() {
        println!("{}", format_notification(&notification));
    }
    status
}

async fn open_state(data_dir: Option<PathBuf>) -> AppResult<AppState<FileStore>> {
    let mut config = ShopConfig::from_env()?;
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    }
    AppState::open_data_dir(config).await
}

/// Routes a parsed command to its handler.
pub async fn dispatch<S: KeyValueStore>(state: &mut AppState<S>, command: Command) -> AppResult<String> {
    match command {
        Command::Cart(cart) => match cart {
            CartCommand::Show => commands::cart::show(state).await,
            CartCommand::Add(book) => commands::cart::add(state, book.into()).await,
            CartCommand::Update { id, qty } => commands::cart::update(state, &id, qty).await,
            CartCommand::Remove { id } => commands::cart::remove(state, &id).await,
            CartCommand::Clear => commands::cart::clear(state).await,
        },
        Command::Wishlist(wishlist) => match wishlist {
            WishlistCommand::Toggle(book) => commands::wishlist::toggle(state, book.into()).await,
            WishlistCommand::ToCart { id } => commands::wishlist::to_cart(state, &id).await,
            WishlistCommand::Show => commands::wishlist::show(state).await,
        },
        Command::Checkout(opts) => commands::checkout::checkout(state, opts.into()).await,
        Command::Invoice(InvoiceCommand::Last { out }) => commands::invoice::last(state, out).await,
        Command::Config => Ok(serde_json::to_string_pretty(&state.config)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{memory_state, messages};
    use clap::Parser;

    async fn run_args(state: &mut AppState<pahana_store::MemoryStore>, args: &[&str]) -> AppResult<String> {
        let cli = Cli::try_parse_from(std::iter::once("pahana").chain(args.iter().copied())).unwrap();
        dispatch(state, cli.command).await
    }

    #[tokio::test]
    async fn test_dispatch_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;

        run_args(&mut state, &["cart", "add", "--id", "1", "--title", "Dune", "--price", "10"])
            .await
            .unwrap();
        run_args(&mut state, &["cart", "update", "--id", "1", "--qty", "2"])
            .await
            .unwrap();
        run_args(&mut state, &["wishlist", "toggle", "--id", "2", "--title", "Emma", "--price", "5.50"])
            .await
            .unwrap();

        let output = run_args(
            &mut state,
            &[
                "checkout", "--name", "A Reader", "--address", "Colombo", "--phone", "077",
                "--email", "a@b.lk", "--payment", "cashOnDelivery",
            ],
        )
        .await
        .unwrap();
        assert!(output.lines().any(|l| l.starts_with("Total") && l.ends_with("Rs.370.16")));
        assert!(state.cart.read().await.is_empty());
        assert_eq!(state.wishlist.items().await.len(), 1);
        assert_eq!(messages(&mut state).len(), 3);
    }

    #[tokio::test]
    async fn test_config_command_prints_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = memory_state(dir.path()).await;

        let output = run_args(&mut state, &["config"]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["currencySymbol"], "Rs.");
        assert_eq!(value["storeName"], "Pahana Bookshop");
    }
}
