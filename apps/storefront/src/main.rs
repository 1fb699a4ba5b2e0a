//! # Pahana Storefront Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        pahana (this binary)                             │
//! │                                                                         │
//! │  main.rs ─────► tracing, argument parsing                               │
//! │  lib.rs ──────► config, state, dispatch, output                         │
//! │  commands/ ───► cart, wishlist, checkout, invoice                       │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        Data Directory                            │  │
//! │  │  cart.json, wishlist.json, lastOrder.json, orders/, invoices/    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;
use pahana_storefront::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    pahana_storefront::init_tracing();
    let cli = Cli::parse();
    pahana_storefront::run(cli).await
}
