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

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::error::Fallible;
use crate::error::fail;
use crate::error::invalid;
use crate::error::missing;
use crate::store::ProgressStore;
use crate::store::SessionSummary;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::ids::SessionId;
use crate::types::learner::LearnerProgress;
use crate::types::progress::CardProgress;
use crate::types::review::ReviewMetrics;
use crate::types::timestamp::Timestamp;

/// A progress store that lives entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    decks: BTreeMap<DeckId, Vec<CardId>>,
    progress: HashMap<CardId, CardProgress>,
    learner: LearnerProgress,
    reviews: Vec<(SessionId, ReviewMetrics)>,
    sessions: Vec<SessionSummary>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn create_deck(&mut self, deck_id: &DeckId) -> Fallible<()> {
        if self.decks.contains_key(deck_id) {
            return fail(format!("deck '{deck_id}' already exists."));
        }
        self.decks.insert(deck_id.clone(), Vec::new());
        Ok(())
    }

    fn deck_ids(&self) -> Fallible<Vec<DeckId>> {
        Ok(self.decks.keys().cloned().collect())
    }

    fn deck_cards(&self, deck_id: &DeckId) -> Fallible<Option<Vec<CardId>>> {
        Ok(self.decks.get(deck_id).cloned())
    }

    fn add_card(
        &mut self,
        deck_id: &DeckId,
        card_id: CardId,
        created_at: Timestamp,
    ) -> Fallible<CardProgress> {
        if self.progress.contains_key(&card_id) {
            return fail(format!("card '{card_id}' already exists."));
        }
        let Some(cards) = self.decks.get_mut(deck_id) else {
            return missing(format!("no deck named '{deck_id}'."));
        };
        cards.push(card_id.clone());
        let progress = CardProgress::new(card_id.clone(), created_at);
        self.progress.insert(card_id, progress.clone());
        Ok(progress)
    }

    fn remove_card(&mut self, card_id: &CardId) -> Fallible<()> {
        if self.progress.remove(card_id).is_none() {
            return missing(format!("no card named '{card_id}'."));
        }
        for cards in self.decks.values_mut() {
            cards.retain(|id| id != card_id);
        }
        self.reviews.retain(|(_, review)| &review.card_id != card_id);
        Ok(())
    }

    fn get_progress(&self, card_id: &CardId) -> Fallible<Option<CardProgress>> {
        Ok(self.progress.get(card_id).cloned())
    }

    fn put_progress(&mut self, progress: &CardProgress) -> Fallible<()> {
        match self.progress.get_mut(&progress.card_id) {
            Some(slot) => {
                *slot = progress.clone();
                Ok(())
            }
            None => missing(format!("no card named '{}'.", progress.card_id)),
        }
    }

    fn all_progress(&self) -> Fallible<Vec<CardProgress>> {
        let mut all: Vec<CardProgress> = self.progress.values().cloned().collect();
        all.sort_by(|a, b| a.card_id.cmp(&b.card_id));
        Ok(all)
    }

    fn learner(&self) -> Fallible<LearnerProgress> {
        Ok(self.learner.clone())
    }

    fn put_learner(&mut self, learner: &LearnerProgress) -> Fallible<()> {
        self.learner = learner.clone();
        Ok(())
    }

    fn append_review(&mut self, session_id: &SessionId, review: &ReviewMetrics) -> Fallible<()> {
        self.reviews.push((session_id.clone(), review.clone()));
        Ok(())
    }

    fn commit_review(
        &mut self,
        progress: &CardProgress,
        session_id: &SessionId,
        review: &ReviewMetrics,
        learner: &LearnerProgress,
    ) -> Fallible<()> {
        if review.card_id != progress.card_id {
            return invalid(format!(
                "review of card '{}' does not match progress of card '{}'.",
                review.card_id, progress.card_id
            ));
        }
        let Some(slot) = self.progress.get_mut(&progress.card_id) else {
            return missing(format!("no card named '{}'.", progress.card_id));
        };
        // Nothing below can fail.
        *slot = progress.clone();
        self.reviews.push((session_id.clone(), review.clone()));
        self.learner = learner.clone();
        Ok(())
    }

    fn reviews_for(&self, card_id: &CardId) -> Fallible<Vec<ReviewMetrics>> {
        Ok(self
            .reviews
            .iter()
            .filter(|(_, review)| &review.card_id == card_id)
            .map(|(_, review)| review.clone())
            .collect())
    }

    fn save_session(&mut self, summary: &SessionSummary) -> Fallible<()> {
        self.sessions.push(summary.clone());
        Ok(())
    }

    fn sessions(&self) -> Fallible<Vec<SessionSummary>> {
        Ok(self.sessions.clone())
    }
}
