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

use crate::error::Fallible;
use crate::store::ProgressStore;
use crate::types::ids::DeckId;

pub fn create_deck(store: &mut dyn ProgressStore, deck: String) -> Fallible<()> {
    let deck_id = DeckId::new(deck)?;
    store.create_deck(&deck_id)?;
    println!("Created deck {deck_id}.");
    Ok(())
}

pub fn list_decks(store: &dyn ProgressStore) -> Fallible<()> {
    for (deck_id, count) in deck_sizes(store)? {
        println!("{deck_id}\t{count} cards");
    }
    Ok(())
}

fn deck_sizes(store: &dyn ProgressStore) -> Fallible<Vec<(DeckId, usize)>> {
    let mut sizes = Vec::new();
    for deck_id in store.deck_ids()? {
        let count = store.deck_cards(&deck_id)?.map_or(0, |cards| cards.len());
        sizes.push((deck_id, count));
    }
    Ok(sizes)
}
