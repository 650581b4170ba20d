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

use crate::clock::Clock;
use crate::error::Fallible;
use crate::store::ProgressStore;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;

pub fn add_cards(
    store: &mut dyn ProgressStore,
    deck: String,
    cards: Vec<String>,
    clock: &dyn Clock,
) -> Fallible<()> {
    let deck_id = DeckId::new(deck)?;
    // Validate every id before adding any.
    let card_ids = cards
        .into_iter()
        .map(CardId::new)
        .collect::<Fallible<Vec<CardId>>>()?;
    let now = clock.now();
    for card_id in card_ids {
        let progress = store.add_card(&deck_id, card_id, now)?;
        println!(
            "Added {} to {deck_id}, first due {}.",
            progress.card_id,
            progress.next_review_date.date()
        );
    }
    Ok(())
}

pub fn remove_card(store: &mut dyn ProgressStore, card: String) -> Fallible<()> {
    let card_id = CardId::new(card)?;
    store.remove_card(&card_id)?;
    println!("Removed {card_id}.");
    Ok(())
}
