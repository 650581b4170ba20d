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

use serde::Serialize;

use crate::clock::Clock;
use crate::collection::Collection;
use crate::config::Config;
use crate::error::Fallible;
use crate::queue::get_due_cards;
use crate::queue::get_optimal_daily_load;
use crate::store::ProgressStore;
use crate::types::learner::LearnerProgress;

pub fn print_stats(collection: &Collection, clock: &dyn Clock) -> Fallible<()> {
    let stats = collect_stats(&collection.db, &collection.config, clock)?;
    let stats_json = serde_json::to_string_pretty(&stats)?;
    println!("{}", stats_json);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    deck_count: usize,
    card_count: usize,
    new_card_count: usize,
    due_today_count: usize,
    recommended_daily_load: usize,
    average_success_rate: f64,
    session_count: usize,
    learner: LearnerProgress,
}

fn collect_stats(store: &dyn ProgressStore, config: &Config, clock: &dyn Clock) -> Fallible<Stats> {
    let now = clock.now();
    let progress = store.all_progress()?;
    let reviewed: Vec<f64> = progress
        .iter()
        .filter(|p| !p.is_new())
        .map(|p| p.success_rate())
        .collect();
    let average_success_rate = if reviewed.is_empty() {
        100.0
    } else {
        reviewed.iter().sum::<f64>() / reviewed.len() as f64
    };
    Ok(Stats {
        deck_count: store.deck_ids()?.len(),
        card_count: progress.len(),
        new_card_count: progress.iter().filter(|p| p.is_new()).count(),
        due_today_count: get_due_cards(&progress, now).len(),
        recommended_daily_load: get_optimal_daily_load(&progress, config.available_minutes, now),
        average_success_rate,
        session_count: store.sessions()?.len(),
        learner: store.learner()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::memory::MemoryStore;
    use crate::types::ids::CardId;
    use crate::types::ids::DeckId;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_collect_stats() -> Fallible<()> {
        let mut clock = FixedClock::new(Timestamp::parse("2025-03-01T10:00:00Z")?);
        let mut store = MemoryStore::new();
        let deck = DeckId::new("deck")?;
        store.create_deck(&deck)?;
        for id in ["a", "b", "c"] {
            store.add_card(&deck, CardId::new(id)?, clock.now())?;
        }
        let stats = collect_stats(&store, &Config::default(), &clock)?;
        assert_eq!(stats.card_count, 3);
        assert_eq!(stats.new_card_count, 3);
        assert_eq!(stats.due_today_count, 0);
        assert_eq!(stats.average_success_rate, 100.0);

        clock.advance_days(1);
        let stats = collect_stats(&store, &Config::default(), &clock)?;
        assert_eq!(stats.due_today_count, 3);
        assert_eq!(stats.recommended_daily_load, 3);
        let json = serde_json::to_value(&stats)?;
        assert_eq!(json["deckCount"], 1);
        assert_eq!(json["learner"]["totalXp"], 0);
        Ok(())
    }
}
