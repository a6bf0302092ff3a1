//! # Cart Commands
//!
//! Single-shot commands refresh the cart, apply one optimistic mutation
//! through [`CartStore`], and print the result. `cart shell` keeps one store
//! alive and fires mutations without waiting for the previous one.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart> + 11          ──► spawn(store.increment(11))   (returns at once) │
//! │  cart> + 11          ──► ignored: item 11 is pending                    │
//! │  cart> ls            ──► optimistic view, pending items marked *        │
//! │        [11] updated  ◄── server answered                                │
//! │  cart> set 12 50     ──► clamped to stock before sending                │
//! │        [12] rolled back: Insufficient stock                             │
//! │  cart> quit          ──► waits for in-flight requests, prints the cart  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Subcommand;
use portos_client::{CartStore, MutationOutcome, StorefrontClient};
use portos_core::{CartLine, CartTotals, Id};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::debug;

use crate::app::App;
use crate::error::{CliError, CliResult};
use crate::output::Output;
use crate::{prompt, render};

#[derive(Debug, Clone, Subcommand)]
pub enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a product
    Add {
        product_id: Id,
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Set an item's quantity (clamped to stock)
    Set {
        item_id: Id,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// One more
    Inc { item_id: Id },
    /// One fewer (not below 1)
    Dec { item_id: Id },
    /// Remove an item
    Remove { item_id: Id },
    /// Interactive cart with concurrent updates
    Shell,
}

/// The cart as printed with `--json`.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
}

impl CartView {
    fn of(store: &CartStore<StorefrontClient>) -> Self {
        CartView {
            items: store.lines(),
            totals: store.totals(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutate {
    Set(Id, i64),
    Inc(Id),
    Dec(Id),
    Remove(Id),
}

impl Mutate {
    fn item_id(self) -> Id {
        match self {
            Mutate::Set(id, _) | Mutate::Inc(id) | Mutate::Dec(id) | Mutate::Remove(id) => id,
        }
    }

    async fn apply(self, store: &CartStore<StorefrontClient>) -> MutationOutcome {
        match self {
            Mutate::Set(id, quantity) => store.update_quantity(id, quantity).await,
            Mutate::Inc(id) => store.increment(id).await,
            Mutate::Dec(id) => store.decrement(id).await,
            Mutate::Remove(id) => store.remove_item(id).await,
        }
    }
}

/// Why a mutation was not attempted, worded for the user.
fn ignored_reason(line: Option<&CartLine>, pending: bool, action: Mutate) -> String {
    let id = action.item_id();
    match line {
        None => format!("No item {id} in your cart"),
        Some(_) if pending => format!("Item {id} is still updating"),
        Some(line) => match action {
            Mutate::Inc(_) => format!("Only {} of {} in stock", line.max_quantity, line.name),
            Mutate::Dec(_) => format!("Quantity is already 1; use `remove {id}` instead"),
            _ => format!("Item {id} was not changed"),
        },
    }
}

pub async fn run(app: &App, action: CartAction) -> CliResult<()> {
    let mutate = match action {
        CartAction::Show => return show(app).await,
        CartAction::Add {
            product_id,
            quantity,
        } => return add(app, product_id, quantity).await,
        CartAction::Shell => return shell(app).await,
        CartAction::Set { item_id, quantity } => Mutate::Set(item_id, quantity),
        CartAction::Inc { item_id } => Mutate::Inc(item_id),
        CartAction::Dec { item_id } => Mutate::Dec(item_id),
        CartAction::Remove { item_id } => Mutate::Remove(item_id),
    };

    let store = app.cart_store();
    if let Err(e) = store.refresh().await {
        return app.out.emit(Err::<CartView, _>(e), |_| {});
    }

    let line = store.with_ledger(|l| l.line(mutate.item_id()).cloned());
    let result = match mutate.apply(&store).await {
        MutationOutcome::Applied => Ok(CartView::of(&store)),
        MutationOutcome::Ignored => Err(CliError::input(ignored_reason(line.as_ref(), false, mutate))),
        MutationOutcome::RolledBack(e) => Err(e.into()),
    };
    app.out
        .emit(result, |view| render::cart(&app.out, &view.items, &[]))
}

async fn show(app: &App) -> CliResult<()> {
    let result = app.client.cart().await.map(|items| CartView {
        totals: CartTotals::from_lines(&items),
        items,
    });
    app.out
        .emit(result, |view| render::cart(&app.out, &view.items, &[]))
}

async fn add(app: &App, product_id: Id, quantity: i64) -> CliResult<()> {
    if let Err(e) = app.client.add_to_cart(product_id, quantity).await {
        return app.out.emit(Err::<CartView, _>(e), |_| {});
    }
    debug!(product_id, quantity, "Added to cart");
    show(app).await
}

// =============================================================================
// Interactive Shell
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellCommand {
    List,
    Refresh,
    Mutate(Mutate),
    Help,
    Quit,
}

const SHELL_HELP: &str = "\
  ls                 show the cart (* = request in flight)
  + ID   | inc ID    one more
  - ID   | dec ID    one fewer
  set ID QTY         set quantity (clamped to stock)
  rm ID              remove item
  refresh            reload from the server
  quit               wait for pending requests and exit";

fn parse_id(token: Option<&str>) -> Result<Id, String> {
    let token = token.ok_or("missing item id")?;
    token
        .parse()
        .map_err(|_| format!("not an item id: {token:?}"))
}

fn parse_shell_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb {
        "ls" | "list" | "show" => ShellCommand::List,
        "refresh" => ShellCommand::Refresh,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        "+" | "inc" => ShellCommand::Mutate(Mutate::Inc(parse_id(words.next())?)),
        "-" | "dec" => ShellCommand::Mutate(Mutate::Dec(parse_id(words.next())?)),
        "rm" | "remove" => ShellCommand::Mutate(Mutate::Remove(parse_id(words.next())?)),
        "set" => {
            let id = parse_id(words.next())?;
            let quantity = words
                .next()
                .ok_or("missing quantity")?
                .parse()
                .map_err(|_| "quantity must be a whole number".to_string())?;
            ShellCommand::Mutate(Mutate::Set(id, quantity))
        }
        other => return Err(format!("unknown command {other:?}, try `help`")),
    };

    if words.next().is_some() {
        return Err("too many arguments".to_string());
    }
    Ok(Some(command))
}

fn print_store(out: &Output, store: &CartStore<StorefrontClient>) {
    let (lines, pending) = store.with_ledger(|l| (l.lines().to_vec(), l.pending_ids()));
    render::cart(out, &lines, &pending);
}

fn report(item_id: Id, outcome: &MutationOutcome) {
    match outcome {
        MutationOutcome::Applied => println!("  [{item_id}] saved"),
        MutationOutcome::Ignored => {}
        MutationOutcome::RolledBack(e) => {
            println!("  [{item_id}] rolled back: {}", e.user_message())
        }
    }
}

async fn shell(app: &App) -> CliResult<()> {
    let store = app.cart_store();
    store.refresh().await?;
    print_store(&app.out, &store);
    println!("\nType `help` for commands.");

    let mut in_flight = JoinSet::new();
    loop {
        // Surface answers that arrived while we were waiting for input.
        while let Some(done) = in_flight.try_join_next() {
            if let Err(e) = done {
                debug!(error = %e, "Cart task failed");
            }
        }

        let Some(line) = prompt::read_line().await? else {
            break;
        };

        let command = match parse_shell_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("  {message}");
                continue;
            }
        };

        match command {
            ShellCommand::List => print_store(&app.out, &store),
            ShellCommand::Help => println!("{SHELL_HELP}"),
            ShellCommand::Quit => break,
            ShellCommand::Refresh => match store.refresh().await {
                Ok(()) => print_store(&app.out, &store),
                Err(e) => println!("  refresh failed: {}", e.user_message()),
            },
            ShellCommand::Mutate(action) => {
                let item_id = action.item_id();
                let (line, pending) = store.with_ledger(|l| (l.line(item_id).cloned(), l.is_pending(item_id)));
                let controls_enabled = match action {
                    Mutate::Inc(_) => store.can_increment(item_id),
                    Mutate::Dec(_) => store.can_decrement(item_id),
                    Mutate::Set(..) | Mutate::Remove(_) => line.is_some() && !pending,
                };
                if !controls_enabled {
                    println!("  {}", ignored_reason(line.as_ref(), pending, action));
                    continue;
                }

                let store = store.clone();
                in_flight.spawn(async move {
                    let outcome = action.apply(&store).await;
                    report(item_id, &outcome);
                });
            }
        }
    }

    if !in_flight.is_empty() {
        println!("  waiting for {} pending update(s)…", in_flight.len());
    }
    while let Some(done) = in_flight.join_next().await {
        if let Err(e) = done {
            debug!(error = %e, "Cart task failed");
        }
    }
    print_store(&app.out, &store);
    Ok(())
}
