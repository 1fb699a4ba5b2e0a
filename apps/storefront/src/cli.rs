//! # Command Line
//!
//! ```text
//! pahana [--data-dir DIR] <command>
//!
//!   cart show
//!   cart add      --id ID --title TITLE --price 12.99 [--author NAME]
//!   cart update   --id ID --qty N
//!   cart remove   --id ID
//!   cart clear
//!   wishlist toggle --id ID --title TITLE --price 12.99 [--author NAME]
//!   wishlist to-cart --id ID
//!   wishlist show
//!   checkout      --tier standard|express|overnight
//!                 --name .. --address .. --phone .. --email ..
//!                 --payment creditCard|paypal|cashOnDelivery
//!                 [--card-number .. --expiry .. --cvv .. --card-holder ..]
//!                 [--out DIR] [--dry-run]
//!   invoice last  [--out DIR]
//!   config
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::cart::BookArgs;
use crate::commands::checkout::CheckoutArgs;

#[derive(Parser)]
#[command(name = "pahana", version, about = "Pahana Bookshop storefront")]
pub struct Cli {
    /// Data directory; overrides PAHANA_DATA_DIR
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show or change the cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Save books for later
    #[command(subcommand)]
    Wishlist(WishlistCommand),

    /// Place an order for everything in the cart
    Checkout(CheckoutOpts),

    /// Invoices for placed orders
    #[command(subcommand)]
    Invoice(InvoiceCommand),

    /// Print the effective configuration as JSON
    Config,
}

#[derive(Subcommand)]
pub enum CartCommand {
    Show,
    /// Add one copy of a book
    Add(BookOpts),
    /// Set the number of copies of a book
    Update {
        #[arg(long)]
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        qty: i64,
    },
    Remove {
        #[arg(long)]
        id: String,
    },
    Clear,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Add the book, or remove it if already saved
    Toggle(BookOpts),
    /// Add a saved book to the cart
    ToCart {
        #[arg(long)]
        id: String,
    },
    Show,
}

#[derive(Subcommand)]
pub enum InvoiceCommand {
    /// Write the invoice of the last placed order again
    Last {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct BookOpts {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub title: String,
    /// Unit price as a decimal, e.g. 12.99
    #[arg(long)]
    pub price: String,
    #[arg(long)]
    pub author: Option<String>,
}

impl From<BookOpts> for BookArgs {
    fn from(opts: BookOpts) -> Self {
        BookArgs {
            id: opts.id,
            title: opts.title,
            price: opts.price,
            author: opts.author,
        }
    }
}

/// Form fields default to empty so the form check can report every missing
/// one at once.
#[derive(Args)]
pub struct CheckoutOpts {
    #[arg(long, default_value = "standard")]
    pub tier: String,
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "creditCard")]
    pub payment: String,
    #[arg(long)]
    pub card_number: Option<String>,
    /// MM/YY
    #[arg(long)]
    pub expiry: Option<String>,
    #[arg(long)]
    pub cvv: Option<String>,
    #[arg(long)]
    pub card_holder: Option<String>,
    /// Invoice directory (default: <data dir>/invoices)
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Print the order and its payload without placing it
    #[arg(long)]
    pub dry_run: bool,
}

impl From<CheckoutOpts> for CheckoutArgs {
    fn from(opts: CheckoutOpts) -> Self {
        CheckoutArgs {
            tier: opts.tier,
            name: opts.name,
            address: opts.address,
            phone: opts.phone,
            email: opts.email,
            payment: opts.payment,
            card_number: opts.card_number,
            expiry: opts.expiry,
            cvv: opts.cvv,
            card_holder: opts.card_holder,
            out: opts.out,
            dry_run: opts.dry_run,
        }
    }
}
