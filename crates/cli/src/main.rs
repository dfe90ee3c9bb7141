//! MAGE CLI - Cart and checkout from the command line.
//!
//! Stands in for the shop's browser UI: every subcommand is one of the
//! events the page used to emit, driving the same cart library.
//!
//! # Usage
//!
//! ```bash
//! # Add two Signature Decks at $10 each
//! mage add --sku signature --name "Signature Deck" --price 10 --qty 2
//!
//! # Show the cart with US shipping and gift wrap
//! mage show --country US --gift-wrap
//!
//! # Decrease a line (by rendered index, or by its ts hint)
//! mage decrease --index 0
//!
//! # Hand off to the payment backend
//! mage checkout --country US --name "Ada" --email ada@example.com \
//!     --address "1 Card St"
//! ```
//!
//! # Commands
//!
//! - `add` - Append a line item to the cart
//! - `decrease` - Decrement a line's quantity (removes at quantity 1)
//! - `show` - Render the cart summary
//! - `checkout` - Create a checkout session and print the redirect URL

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use mage_cart::analytics::LogSink;
use mage_cart::cart::{CartRepository, LineRef};
use mage_cart::checkout::{
    CheckoutOrchestrator, CheckoutOutcome, Customer, HttpGateway, PAYMENT_UNAVAILABLE_MESSAGE,
    SubmitError,
};
use mage_cart::config::CartConfig;
use mage_cart::pricing::Destination;
use mage_cart::store::CartStore;
use mage_cart::view::{CartView, EMPTY_CART_MESSAGE};
use mage_core::Money;
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "mage")]
#[command(author, version, about = "MAGE shop cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a line item to the cart
    Add {
        /// Product SKU
        #[arg(short, long)]
        sku: String,

        /// Product display name
        #[arg(short, long)]
        name: String,

        /// Unit price in dollars
        #[arg(short, long)]
        price: Decimal,

        /// Quantity (floored at 1)
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Decrement a line's quantity, removing it at quantity 1
    Decrease {
        /// The line's ts hint from `show`
        #[arg(long)]
        ts: Option<i64>,

        /// The line's index from `show`
        #[arg(long)]
        index: Option<usize>,
    },
    /// Render the cart summary
    Show {
        /// Destination country code (US, CN, ...)
        #[arg(short, long, default_value = "")]
        country: String,

        /// Include the $5 gift wrap fee
        #[arg(short, long)]
        gift_wrap: bool,
    },
    /// Create a checkout session with the payment backend
    Checkout {
        /// Destination country code (US, CN, ...)
        #[arg(short, long, default_value = "")]
        country: String,

        /// Include the $5 gift wrap fee
        #[arg(short, long)]
        gift_wrap: bool,

        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer email
        #[arg(short, long)]
        email: String,

        /// Shipping address
        #[arg(short, long)]
        address: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let mut cart = CartRepository::new(CartStore::file(&config.store_path))
        .with_analytics(Arc::new(LogSink));

    match cli.command {
        Commands::Add {
            sku,
            name,
            price,
            qty,
        } => {
            cart.add(&sku, &name, Money::new(price), qty);
            print_view(&CartView::render(cart.items(), Destination::Unselected, false));
        }
        Commands::Decrease { ts, index } => {
            let line = LineRef {
                ts: ts.and_then(parse_ts),
                index,
            };
            cart.decrement_or_remove(line);
            print_view(&CartView::render(cart.items(), Destination::Unselected, false));
        }
        Commands::Show { country, gift_wrap } => {
            let destination = Destination::from_code(&country);
            print_view(&CartView::render(cart.items(), destination, gift_wrap));
        }
        Commands::Checkout {
            country,
            gift_wrap,
            name,
            email,
            address,
        } => {
            let destination = Destination::from_code(&country);
            let customer = Customer {
                name,
                email,
                address,
            };

            let gateway = HttpGateway::new(&config)?;
            let orchestrator = CheckoutOrchestrator::new(gateway).with_analytics(Arc::new(LogSink));

            match orchestrator
                .submit(cart.items(), destination, gift_wrap, customer)
                .await
            {
                Ok(CheckoutOutcome::Redirected { checkout_url }) => {
                    println!("Open this link to complete payment:\n{checkout_url}");
                }
                Ok(CheckoutOutcome::Fallback { reason }) => {
                    tracing::warn!(error = %reason, "Checkout fell back to manual payment");
                    println!("{PAYMENT_UNAVAILABLE_MESSAGE}");
                }
                Err(e @ SubmitError::EmptyCart) => println!("{e}"),
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

/// Interpret a `ts` hint as epoch milliseconds.
fn parse_ts(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Print a cart view the way the cart page rendered it.
fn print_view(view: &CartView) {
    if view.is_empty() {
        println!("{EMPTY_CART_MESSAGE}");
    } else {
        for line in &view.lines {
            println!("[{}] (ts {}) {}", line.index, line.ts, line.label);
        }
    }
    println!("Subtotal: {}", view.subtotal);
    println!("Shipping: {}", view.shipping);
    println!("Total:    {}", view.total);
}
