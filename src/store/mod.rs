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

//! The progress store: durable per-card progress, the deck registry, the
//! learner record, and the review log.
//!
//! The engine never talks to storage itself. Callers read records out of a
//! store, run them through the scheduler and session machinery, and write
//! the results back. Writes are plain upserts, so two writers racing on the
//! same card end up with whichever wrote last. Everything a single review
//! changes goes through `commit_review`, which stores all of it or none of
//! it.

pub mod memory;
pub mod sqlite;

use serde::Serialize;

use crate::error::Fallible;
use crate::session::stats::SessionStats;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::ids::SessionId;
use crate::types::learner::LearnerProgress;
use crate::types::progress::CardProgress;
use crate::types::review::ReviewMetrics;
use crate::types::timestamp::Timestamp;

/// What is kept of a session once it is over.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub deck_id: DeckId,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub stats: SessionStats,
}

pub trait ProgressStore {
    /// Register a new, empty deck. Fails if the deck exists.
    fn create_deck(&mut self, deck_id: &DeckId) -> Fallible<()>;

    /// All registered decks, sorted.
    fn deck_ids(&self) -> Fallible<Vec<DeckId>>;

    /// The cards of a deck in the order they were added, or `None` if there
    /// is no such deck.
    fn deck_cards(&self, deck_id: &DeckId) -> Fallible<Option<Vec<CardId>>>;

    /// Add a card to a deck, creating its initial progress record. Fails if
    /// the deck does not exist or the card is already known.
    fn add_card(
        &mut self,
        deck_id: &DeckId,
        card_id: CardId,
        created_at: Timestamp,
    ) -> Fallible<CardProgress>;

    /// Delete a card along with its progress and review history.
    fn remove_card(&mut self, card_id: &CardId) -> Fallible<()>;

    fn get_progress(&self, card_id: &CardId) -> Fallible<Option<CardProgress>>;

    /// Overwrite a card's progress. Fails if the card is unknown.
    fn put_progress(&mut self, progress: &CardProgress) -> Fallible<()>;

    /// Progress of every card, sorted by card id.
    fn all_progress(&self) -> Fallible<Vec<CardProgress>>;

    fn learner(&self) -> Fallible<LearnerProgress>;

    fn put_learner(&mut self, learner: &LearnerProgress) -> Fallible<()>;

    /// Append a review to the log.
    fn append_review(&mut self, session_id: &SessionId, review: &ReviewMetrics) -> Fallible<()>;

    /// Store everything one review changes: the card's new progress, the
    /// review itself, and the learner record. Fails with a missing-entity
    /// error if the card is unknown, in which case nothing is written.
    fn commit_review(
        &mut self,
        progress: &CardProgress,
        session_id: &SessionId,
        review: &ReviewMetrics,
        learner: &LearnerProgress,
    ) -> Fallible<()>;

    /// The logged reviews of a card, oldest first.
    fn reviews_for(&self, card_id: &CardId) -> Fallible<Vec<ReviewMetrics>>;

    fn save_session(&mut self, summary: &SessionSummary) -> Fallible<()>;

    /// Saved sessions, oldest first.
    fn sessions(&self) -> Fallible<Vec<SessionSummary>>;
}
