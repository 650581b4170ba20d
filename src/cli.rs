// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use clap::Subcommand;
use env_logger::Env;

use crate::clock::SystemClock;
use crate::cmd::card::add_cards;
use crate::cmd::card::remove_card;
use crate::cmd::deck::create_deck;
use crate::cmd::deck::list_decks;
use crate::cmd::due::print_due;
use crate::cmd::review::review_deck;
use crate::cmd::schedule::print_schedule;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(short, long, global = true)]
    directory: Option<String>,
    /// Print debug logs.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage decks.
    Deck {
        #[command(subcommand)]
        command: DeckCommand,
    },
    /// Manage cards.
    Card {
        #[command(subcommand)]
        command: CardCommand,
    },
    /// List the cards due today, most urgent first.
    Due,
    /// Review a deck.
    Review {
        /// The deck to review.
        deck: String,
    },
    /// Print collection statistics as JSON.
    Stats,
    /// Print the upcoming review calendar as JSON.
    Schedule {
        /// How many days ahead to look.
        #[arg(long)]
        days: Option<u32>,
    },
}

#[derive(Subcommand)]
enum DeckCommand {
    /// Create an empty deck.
    Create { deck: String },
    /// List all decks.
    List,
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add cards to a deck.
    Add {
        deck: String,
        #[arg(required = true)]
        cards: Vec<String>,
    },
    /// Remove a card and its history.
    Remove { card: String },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let mut collection = Collection::open(cli.directory)?;
    let clock = SystemClock;
    match cli.command {
        Command::Deck { command } => match command {
            DeckCommand::Create { deck } => create_deck(&mut collection.db, deck),
            DeckCommand::List => list_decks(&collection.db),
        },
        Command::Card { command } => match command {
            CardCommand::Add { deck, cards } => add_cards(&mut collection.db, deck, cards, &clock),
            CardCommand::Remove { card } => remove_card(&mut collection.db, card),
        },
        Command::Due => print_due(&collection.db, &clock),
        Command::Review { deck } => review_deck(&mut collection, deck, &clock),
        Command::Stats => print_stats(&collection, &clock),
        Command::Schedule { days } => {
            let days = days.unwrap_or(collection.config.schedule_days);
            print_schedule(&collection.db, days, &clock)
        }
    }
}
