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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::session::state::ReviewSession;
use crate::types::timestamp::Timestamp;

/// Sessions longer than this many seconds suggest a break.
const BREAK_AFTER_SECONDS: u64 = 25 * 60;

/// Reviewing this many cards in one sitting suggests a break.
const BREAK_AFTER_CARDS: usize = 20;

/// XP awarded per card reviewed, before the quality bonus.
const XP_PER_CARD: u64 = 10;

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_cards_reviewed: usize,
    /// Mean quality over the session's reviews; 0 when there are none.
    pub average_quality: f64,
    /// Reviews rated 5.
    pub cards_mastered: usize,
    /// Reviews rated below 3.
    pub cards_needing_review: usize,
    /// Elapsed seconds from start to end (or now, if still running).
    pub session_duration: u64,
    /// 0 when no time has elapsed.
    pub cards_per_minute: f64,
    pub xp_earned: u64,
    /// Reviews that took a card to its first successful repetition.
    pub new_cards_learned: usize,
}

/// Summarize a session. Works on sessions that are still running, for live
/// displays.
pub fn calculate_session_stats(session: &ReviewSession, now: Timestamp) -> SessionStats {
    let reviews = session.reviews();
    let total = reviews.len();
    let quality_sum: f64 = reviews.iter().map(|r| r.quality.as_f64()).sum();
    let average_quality = if total == 0 {
        0.0
    } else {
        quality_sum / total as f64
    };
    let end = session.end_time().unwrap_or(now);
    let session_duration = end.seconds_since(session.start_time()).max(0) as u64;
    let cards_per_minute = if session_duration == 0 {
        0.0
    } else {
        total as f64 / (session_duration as f64 / 60.0)
    };
    SessionStats {
        total_cards_reviewed: total,
        average_quality,
        cards_mastered: reviews.iter().filter(|r| r.quality.is_perfect()).count(),
        cards_needing_review: reviews.iter().filter(|r| !r.quality.is_success()).count(),
        session_duration,
        cards_per_minute,
        xp_earned: calculate_session_xp(total, average_quality),
        new_cards_learned: reviews.iter().filter(|r| r.repetitions == 1).count(),
    }
}

/// XP for reviewing `cards_reviewed` cards at the given average quality.
///
/// Summing this over single reviews gives the same total as applying it to
/// the whole session at once.
pub fn calculate_session_xp(cards_reviewed: usize, average_quality: f64) -> u64 {
    let cards = cards_reviewed as f64;
    let bonus = (average_quality / 5.0 * cards * 5.0).round().max(0.0) as u64;
    cards_reviewed as u64 * XP_PER_CARD + bonus
}

/// Percentage of the session's cards the cursor has moved past. An empty
/// session counts as fully done.
pub fn get_session_progress(session: &ReviewSession) -> f64 {
    let total = session.card_ids().len();
    if total == 0 {
        return 100.0;
    }
    (session.current_index() as f64 / total as f64 * 100.0).min(100.0)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakReason {
    LongSession,
    ManyCards,
}

impl Display for BreakReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakReason::LongSession => {
                write!(f, "You've been studying for over 25 minutes. Take a short break!")
            }
            BreakReason::ManyCards => {
                write!(f, "You've reviewed {BREAK_AFTER_CARDS} cards. Time for a quick break!")
            }
        }
    }
}

/// Advice on whether to take a break. Never enforced.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakAdvice {
    pub should_break: bool,
    pub reason: Option<BreakReason>,
}

pub fn should_break(cards_reviewed: usize, session_duration_seconds: u64) -> BreakAdvice {
    let reason = if session_duration_seconds > BREAK_AFTER_SECONDS {
        Some(BreakReason::LongSession)
    } else if cards_reviewed >= BREAK_AFTER_CARDS {
        Some(BreakReason::ManyCards)
    } else {
        None
    };
    BreakAdvice {
        should_break: reason.is_some(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::types::ids::CardId;
    use crate::types::ids::DeckId;
    use crate::types::quality::Quality;
    use crate::types::schedule::CardScheduleState;

    fn start() -> Timestamp {
        Timestamp::parse("2025-08-01T08:00:00Z").unwrap()
    }

    fn reviewed_session(qualities: &[i64]) -> Fallible<ReviewSession> {
        let ids = (0..qualities.len())
            .map(|i| CardId::new(format!("c{i}")))
            .collect::<Fallible<Vec<_>>>()?;
        let mut session =
            ReviewSession::initialize(DeckId::new("deck")?, ids.clone(), None, start()).start();
        for (i, (id, quality)) in ids.iter().zip(qualities).enumerate() {
            let at = start().plus_seconds(30 * (i as i64 + 1));
            session = session.record_review(
                id,
                Quality::new(*quality)?,
                CardScheduleState::default(),
                at,
                None,
            )?;
            session = session.move_to_next_card(at);
        }
        Ok(session)
    }

    #[test]
    fn test_stats() -> Fallible<()> {
        let session = reviewed_session(&[5, 4, 2, 1])?;
        assert!(session.is_completed());
        let stats = calculate_session_stats(&session, start().plus_seconds(9999));
        assert_eq!(stats.total_cards_reviewed, 4);
        assert_eq!(stats.average_quality, 3.0);
        assert_eq!(stats.cards_mastered, 1);
        assert_eq!(stats.cards_needing_review, 2);
        // Uses the end time, not `now`.
        assert_eq!(stats.session_duration, 120);
        assert_eq!(stats.cards_per_minute, 2.0);
        assert_eq!(stats.xp_earned, 40 + 12);
        assert_eq!(stats.new_cards_learned, 2);
        Ok(())
    }

    #[test]
    fn test_live_stats() -> Fallible<()> {
        let session = ReviewSession::initialize(DeckId::new("deck")?, vec![], None, start());
        let stats = calculate_session_stats(&session, start());
        assert_eq!(stats.total_cards_reviewed, 0);
        assert_eq!(stats.average_quality, 0.0);
        assert_eq!(stats.cards_per_minute, 0.0);
        assert_eq!(stats.xp_earned, 0);
        let stats = calculate_session_stats(&session, start().plus_seconds(45));
        assert_eq!(stats.session_duration, 45);
        Ok(())
    }

    #[test]
    fn test_xp() {
        assert_eq!(calculate_session_xp(0, 0.0), 0);
        assert_eq!(calculate_session_xp(1, 5.0), 15);
        assert_eq!(calculate_session_xp(4, 3.5), 54);
    }

    #[test]
    fn test_xp_per_review_matches_session_xp() -> Fallible<()> {
        let qualities = [5, 3, 3, 1, 4, 2, 5];
        let session = reviewed_session(&qualities)?;
        let per_review: u64 = session
            .reviews()
            .iter()
            .map(|r| calculate_session_xp(1, r.quality.as_f64()))
            .sum();
        let stats = calculate_session_stats(&session, start());
        assert_eq!(per_review, stats.xp_earned);
        Ok(())
    }

    #[test]
    fn test_progress() -> Fallible<()> {
        let empty = ReviewSession::initialize(DeckId::new("deck")?, vec![], None, start());
        assert_eq!(get_session_progress(&empty), 100.0);
        let ids = vec![CardId::new("a")?, CardId::new("b")?, CardId::new("c")?, CardId::new("d")?];
        let session = ReviewSession::initialize(DeckId::new("deck")?, ids, None, start());
        assert_eq!(get_session_progress(&session), 0.0);
        let session = session.move_to_next_card(start());
        assert_eq!(get_session_progress(&session), 25.0);
        let session = session
            .move_to_next_card(start())
            .move_to_next_card(start())
            .move_to_next_card(start());
        assert!(session.is_completed());
        assert_eq!(get_session_progress(&session), 100.0);
        Ok(())
    }

    #[test]
    fn test_should_break() {
        let advice = should_break(20, 600);
        assert!(advice.should_break);
        assert_eq!(advice.reason, Some(BreakReason::ManyCards));
        let advice = should_break(3, 1501);
        assert_eq!(advice.reason, Some(BreakReason::LongSession));
        let advice = should_break(19, 1500);
        assert!(!advice.should_break);
        assert_eq!(advice.reason, None);
    }
}
