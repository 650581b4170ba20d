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

//! Running review sessions against a progress store.
//!
//! This is the loop that ties the pieces together: build the card order
//! from stored progress, feed each rating through the scheduler, and write
//! the updated records back as they are produced. Since every review is
//! persisted as soon as it is submitted, abandoning a session needs no
//! cleanup.

use crate::clock::Clock;
use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::error::missing;
use crate::queue::get_card_order;
use crate::session::state::ReviewSession;
use crate::session::stats::SessionStats;
use crate::session::stats::calculate_session_stats;
use crate::store::ProgressStore;
use crate::store::SessionSummary;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::quality::Quality;

/// Start a session over a deck.
pub fn start_session(
    store: &dyn ProgressStore,
    deck_id: &DeckId,
    config: &Config,
    clock: &dyn Clock,
) -> Fallible<ReviewSession> {
    let Some(cards) = store.deck_cards(deck_id)? else {
        return missing(format!("no deck named '{deck_id}'."));
    };
    if cards.is_empty() {
        return missing(format!("deck '{deck_id}' has no cards."));
    }
    let now = clock.now();
    let progress = store.all_progress()?;
    let order = get_card_order(&progress, &cards, config.new_cards_per_session, now);
    let session =
        ReviewSession::initialize(deck_id.clone(), order, config.max_cards, now).start();
    log::debug!(
        "Started session {} with {} of {} cards.",
        session.id(),
        session.card_ids().len(),
        cards.len()
    );
    Ok(session)
}

/// Record a rating for a card and persist everything it changes: the card's
/// progress, the review log, and the learner's XP and streak. Returns the
/// updated session; the cursor is not advanced. On error nothing is stored
/// and `session` is unchanged.
pub fn submit_review(
    store: &mut dyn ProgressStore,
    session: &ReviewSession,
    card_id: &CardId,
    quality: Quality,
    time_taken: Option<u32>,
    clock: &dyn Clock,
) -> Fallible<ReviewSession> {
    let Some(progress) = store.get_progress(card_id)? else {
        return missing(format!("card '{card_id}' has no progress record."));
    };
    let now = clock.now();
    let next = session.record_review(card_id, quality, progress.schedule, now, time_taken)?;
    let Some(review) = next.last_review() else {
        return fail("review was not recorded.");
    };
    let updated = progress.apply_review(review)?;
    let learner = store.learner()?.record_review(quality, clock.today());
    store.commit_review(&updated, next.id(), review, &learner)?;
    Ok(next)
}

/// Compute the session's statistics and keep a summary of it.
pub fn finish_session(
    store: &mut dyn ProgressStore,
    session: &ReviewSession,
    clock: &dyn Clock,
) -> Fallible<SessionStats> {
    let stats = calculate_session_stats(session, clock.now());
    let summary = SessionSummary {
        session_id: session.id().clone(),
        deck_id: session.deck_id().clone(),
        started_at: session.start_time(),
        ended_at: session.end_time(),
        stats: stats.clone(),
    };
    store.save_session(&summary)?;
    log::debug!(
        "Saved session {}: {} reviews, {} XP.",
        session.id(),
        stats.total_cards_reviewed,
        stats.xp_earned
    );
    Ok(stats)
}
