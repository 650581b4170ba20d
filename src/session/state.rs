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

use crate::error::Fallible;
use crate::error::invalid;
use crate::sm2::schedule_review;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::ids::SessionId;
use crate::types::quality::Quality;
use crate::types::review::ReviewMetrics;
use crate::types::schedule::CardScheduleState;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Paused,
    /// Terminal.
    Completed,
}

/// A single review session over a fixed, ordered list of cards.
///
/// Transitions consume the session and return the updated one, except for
/// `record_review`, which borrows it so that a rejected review leaves the
/// caller's session as it was. The card list never changes after
/// initialization; only the cursor moves.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    id: SessionId,
    deck_id: DeckId,
    card_ids: Vec<CardId>,
    current_index: usize,
    start_time: Timestamp,
    end_time: Option<Timestamp>,
    paused_at: Option<Timestamp>,
    reviews: Vec<ReviewMetrics>,
    status: SessionStatus,
}

impl ReviewSession {
    /// Create a session over `card_ids`, which should already be in review
    /// order. If `max_cards` is given, only the first `max_cards` ids are
    /// kept.
    pub fn initialize(
        deck_id: DeckId,
        mut card_ids: Vec<CardId>,
        max_cards: Option<usize>,
        now: Timestamp,
    ) -> Self {
        if let Some(max_cards) = max_cards {
            card_ids.truncate(max_cards);
        }
        let id = SessionId::generate();
        log::debug!(
            "Initialized session {id} over deck {deck_id} with {} cards.",
            card_ids.len()
        );
        Self {
            id,
            deck_id,
            card_ids,
            current_index: 0,
            start_time: now,
            end_time: None,
            paused_at: None,
            reviews: Vec::new(),
            status: SessionStatus::NotStarted,
        }
    }

    /// Mark the session as in progress. Only has an effect on a session
    /// that has not started yet.
    pub fn start(mut self) -> Self {
        if self.status == SessionStatus::NotStarted {
            log::debug!("Session {} started.", self.id);
            self.status = SessionStatus::InProgress;
        }
        self
    }

    /// Schedule a review of `card_id` and return the session with the review
    /// appended. This does not move the cursor.
    pub fn record_review(
        &self,
        card_id: &CardId,
        quality: Quality,
        current: CardScheduleState,
        reviewed_at: Timestamp,
        time_taken: Option<u32>,
    ) -> Fallible<Self> {
        match self.status {
            SessionStatus::Completed => {
                return invalid("cannot record a review in a completed session.");
            }
            SessionStatus::Paused => {
                return invalid("cannot record a review in a paused session.");
            }
            SessionStatus::NotStarted | SessionStatus::InProgress => {}
        }
        if !self.card_ids.contains(card_id) {
            return invalid(format!("card '{card_id}' is not part of this session."));
        }
        let review = schedule_review(card_id, quality, current, reviewed_at, time_taken);
        let mut next = self.clone();
        next.reviews.push(review);
        next.status = SessionStatus::InProgress;
        Ok(next)
    }

    /// Advance the cursor. Advancing past the last card completes the
    /// session. Calling this on a completed session does nothing.
    pub fn move_to_next_card(mut self, now: Timestamp) -> Self {
        match self.status {
            SessionStatus::Completed => {}
            SessionStatus::Paused => {
                log::warn!("Ignoring move to next card: session {} is paused.", self.id);
            }
            SessionStatus::NotStarted | SessionStatus::InProgress => {
                if self.current_index + 1 >= self.card_ids.len() {
                    self.current_index = self.card_ids.len();
                    self.status = SessionStatus::Completed;
                    self.end_time = Some(now);
                    log::debug!("Session {} completed.", self.id);
                } else {
                    self.current_index += 1;
                }
            }
        }
        self
    }

    pub fn pause(mut self, now: Timestamp) -> Self {
        match self.status {
            SessionStatus::NotStarted | SessionStatus::InProgress => {
                self.status = SessionStatus::Paused;
                self.paused_at = Some(now);
            }
            SessionStatus::Paused => {}
            SessionStatus::Completed => {
                log::warn!("Ignoring pause: session {} is completed.", self.id);
            }
        }
        self
    }

    pub fn resume(mut self) -> Self {
        match self.status {
            SessionStatus::Paused => {
                self.status = SessionStatus::InProgress;
                self.paused_at = None;
            }
            SessionStatus::Completed => {
                log::warn!("Ignoring resume: session {} is completed.", self.id);
            }
            SessionStatus::NotStarted | SessionStatus::InProgress => {}
        }
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn deck_id(&self) -> &DeckId {
        &self.deck_id
    }

    pub fn card_ids(&self) -> &[CardId] {
        &self.card_ids
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The card under the cursor, or `None` once the session is complete.
    pub fn current_card_id(&self) -> Option<&CardId> {
        self.card_ids.get(self.current_index)
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }

    pub fn paused_at(&self) -> Option<Timestamp> {
        self.paused_at
    }

    pub fn reviews(&self) -> &[ReviewMetrics] {
        &self.reviews
    }

    pub fn last_review(&self) -> Option<&ReviewMetrics> {
        self.reviews.last()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }
}
