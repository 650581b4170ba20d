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

//! Choosing which cards to review, and in what order.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;

use serde::Serialize;

use crate::types::date::Date;
use crate::types::ids::CardId;
use crate::types::progress::CardProgress;
use crate::types::timestamp::Timestamp;

/// The most cards a session built by [`get_card_order`] can hold.
pub const MAX_SESSION_CARDS: usize = 20;

/// How many never-reviewed cards a session takes in by default.
pub const DEFAULT_NEW_CARDS_PER_SESSION: usize = 3;

/// Average time spent per card, in minutes.
const MINUTES_PER_CARD: f64 = 0.5;

/// The daily load recommendation never goes below this, unless fewer cards
/// are due.
const MIN_DAILY_LOAD: usize = 10;

/// The cards due on the day of `now`.
pub fn get_due_cards(progress: &[CardProgress], now: Timestamp) -> Vec<&CardProgress> {
    let today = now.date();
    progress.iter().filter(|p| p.is_due(today)).collect()
}

/// The due cards, most urgent first.
pub fn get_review_queue(progress: &[CardProgress], now: Timestamp) -> Vec<&CardProgress> {
    let mut due = get_due_cards(progress, now);
    sort_by_urgency(&mut due, now);
    due
}

/// Build the card order for a session over `candidates`.
///
/// Due cards come first, lowest retention first. Then up to
/// `new_cards_per_session` never-reviewed cards. If that leaves room, the
/// session is topped up with cards that are not yet due, again lowest
/// retention first. The result never holds more than
/// [`MAX_SESSION_CARDS`] ids.
pub fn get_card_order(
    progress: &[CardProgress],
    candidates: &[CardId],
    new_cards_per_session: usize,
    now: Timestamp,
) -> Vec<CardId> {
    let today = now.date();
    let by_id: HashMap<&CardId, &CardProgress> =
        progress.iter().map(|p| (&p.card_id, p)).collect();

    let mut seen: HashSet<&CardId> = HashSet::new();
    let mut pool: Vec<&CardProgress> = Vec::new();
    for id in candidates {
        if !seen.insert(id) {
            continue;
        }
        match by_id.get(id) {
            Some(p) => pool.push(*p),
            None => log::warn!("Card {id} has no progress record, leaving it out of the session."),
        }
    }

    let (mut due, rest): (Vec<&CardProgress>, Vec<&CardProgress>) =
        pool.into_iter().partition(|p| p.is_due(today));
    let (new, mut not_due): (Vec<&CardProgress>, Vec<&CardProgress>) =
        rest.into_iter().partition(|p| p.is_new());
    sort_by_retention(&mut due, now);
    sort_by_retention(&mut not_due, now);

    let mut order: Vec<CardId> = Vec::new();
    order.extend(due.iter().map(|p| p.card_id.clone()));
    order.extend(
        new.iter()
            .take(new_cards_per_session)
            .map(|p| p.card_id.clone()),
    );
    if order.len() < MAX_SESSION_CARDS {
        let room = MAX_SESSION_CARDS - order.len();
        order.extend(not_due.iter().take(room).map(|p| p.card_id.clone()));
    }
    order.truncate(MAX_SESSION_CARDS);
    log::debug!(
        "Session order: {} due, {} new, {} total.",
        due.len(),
        new.len().min(new_cards_per_session),
        order.len()
    );
    order
}

/// How many cards to review today, given the time available. This is a
/// recommendation only.
pub fn get_optimal_daily_load(
    progress: &[CardProgress],
    available_minutes: u32,
    now: Timestamp,
) -> usize {
    let due = get_due_cards(progress, now).len();
    let by_time = (available_minutes as f64 / MINUTES_PER_CARD).floor() as usize;
    due.min(by_time.max(MIN_DAILY_LOAD))
}

/// A card in the review calendar.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCard {
    pub card_id: CardId,
    pub interval: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
}

/// Bucket cards by the day they are next due, for calendar views. Cards due
/// more than `days` days after `today` are left out; overdue cards stay
/// under their own (past) due date.
pub fn generate_review_schedule(
    progress: &[CardProgress],
    days: u32,
    today: Date,
) -> BTreeMap<Date, Vec<ScheduledCard>> {
    let horizon = today.plus_days(days as i64);
    let mut schedule: BTreeMap<Date, Vec<ScheduledCard>> = BTreeMap::new();
    for p in progress {
        let due = p.next_review_date.date();
        if due > horizon {
            continue;
        }
        schedule.entry(due).or_default().push(ScheduledCard {
            card_id: p.card_id.clone(),
            interval: p.schedule.interval,
            ease_factor: p.schedule.ease_factor,
            repetitions: p.schedule.repetitions,
        });
    }
    for cards in schedule.values_mut() {
        cards.sort_by(|a, b| a.card_id.cmp(&b.card_id));
    }
    schedule
}

/// Ascending retention; ties go to the longer interval.
fn sort_by_urgency(cards: &mut [&CardProgress], now: Timestamp) {
    cards.sort_by(|a, b| {
        compare_retention(a, b, now).then_with(|| b.schedule.interval.cmp(&a.schedule.interval))
    });
}

/// Ascending retention. The sort is stable so ties keep the caller's order.
fn sort_by_retention(cards: &mut [&CardProgress], now: Timestamp) {
    cards.sort_by(|a, b| compare_retention(a, b, now));
}

fn compare_retention(a: &CardProgress, b: &CardProgress, now: Timestamp) -> Ordering {
    a.retention(now).total_cmp(&b.retention(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::helper::progress_due_on;
    use crate::helper::reviewed_progress;

    fn now() -> Timestamp {
        Timestamp::parse("2025-06-15T14:00:00Z").unwrap()
    }

    fn ids(cards: &[&CardProgress]) -> Vec<String> {
        cards.iter().map(|p| p.card_id.to_string()).collect()
    }

    #[test]
    fn test_due_cards_truncate_to_midnight() -> Fallible<()> {
        let cards = vec![
            progress_due_on("yesterday", "2025-06-14T23:00:00Z")?,
            // Later in the day than `now`, but still today.
            progress_due_on("today", "2025-06-15T22:00:00Z")?,
            progress_due_on("tomorrow", "2025-06-16T00:30:00Z")?,
        ];
        let due = get_due_cards(&cards, now());
        assert_eq!(ids(&due), vec!["yesterday", "today"]);
        Ok(())
    }

    #[test]
    fn test_review_queue_orders_by_retention() -> Fallible<()> {
        let cards = vec![
            // Reviewed 2 days ago with a 10 day interval: high retention.
            reviewed_progress("fresh", "2025-06-13T14:00:00Z", 10, "2025-06-15T00:00:00Z")?,
            // Reviewed 6 days ago with a 1 day interval: very low retention.
            reviewed_progress("stale", "2025-06-09T14:00:00Z", 1, "2025-06-10T00:00:00Z")?,
            reviewed_progress("middle", "2025-06-09T14:00:00Z", 6, "2025-06-15T00:00:00Z")?,
            reviewed_progress("later", "2025-06-14T14:00:00Z", 6, "2025-06-20T00:00:00Z")?,
        ];
        let queue = get_review_queue(&cards, now());
        assert_eq!(ids(&queue), vec!["stale", "middle", "fresh"]);
        Ok(())
    }

    #[test]
    fn test_review_queue_ties_prefer_longer_interval() -> Fallible<()> {
        // Same retention (never decayed), different intervals.
        let cards = vec![
            reviewed_progress("short", "2025-06-15T14:00:00Z", 2, "2025-06-15T00:00:00Z")?,
            reviewed_progress("long", "2025-06-15T14:00:00Z", 30, "2025-06-15T00:00:00Z")?,
        ];
        let queue = get_review_queue(&cards, now());
        assert_eq!(ids(&queue), vec!["long", "short"]);
        Ok(())
    }

    #[test]
    fn test_card_order_policy() -> Fallible<()> {
        let mut cards = Vec::new();
        let mut candidates = Vec::new();
        for i in 0..5 {
            let id = format!("due{i}");
            let last = "2025-06-10T14:00:00Z";
            cards.push(reviewed_progress(&id, last, 2 + i, "2025-06-12T00:00:00Z")?);
            candidates.push(CardId::new(id)?);
        }
        for i in 0..5 {
            let id = format!("new{i}");
            cards.push(progress_due_on(&id, "2025-06-16T12:00:00Z")?);
            candidates.push(CardId::new(id)?);
        }
        for i in 0..20 {
            let id = format!("later{i:02}");
            cards.push(reviewed_progress(&id, "2025-06-14T14:00:00Z", 10, "2025-06-24T00:00:00Z")?);
            candidates.push(CardId::new(id)?);
        }
        let order = get_card_order(&cards, &candidates, 3, now());
        assert_eq!(order.len(), MAX_SESSION_CARDS);
        let names: Vec<&str> = order.iter().map(|id| id.as_str()).collect();
        // Lower interval decays faster, so due0 is the least retained.
        assert_eq!(&names[..5], &["due0", "due1", "due2", "due3", "due4"]);
        assert_eq!(&names[5..8], &["new0", "new1", "new2"]);
        assert!(names[8..].iter().all(|name| name.starts_with("later")));
        Ok(())
    }

    #[test]
    fn test_card_order_never_exceeds_cap() -> Fallible<()> {
        let mut cards = Vec::new();
        let mut candidates = Vec::new();
        for i in 0..30 {
            let id = format!("due{i}");
            cards.push(reviewed_progress(&id, "2025-06-10T14:00:00Z", 3, "2025-06-13T00:00:00Z")?);
            candidates.push(CardId::new(id)?);
        }
        let order = get_card_order(&cards, &candidates, 3, now());
        assert_eq!(order.len(), MAX_SESSION_CARDS);
        Ok(())
    }

    #[test]
    fn test_card_order_skips_unknown_and_duplicate_ids() -> Fallible<()> {
        let cards = vec![progress_due_on("a", "2025-06-15T00:00:00Z")?];
        let candidates = vec![CardId::new("a")?, CardId::new("ghost")?, CardId::new("a")?];
        let order = get_card_order(&cards, &candidates, 3, now());
        assert_eq!(order, vec![CardId::new("a")?]);
        Ok(())
    }

    #[test]
    fn test_optimal_daily_load() -> Fallible<()> {
        let mut cards = Vec::new();
        for i in 0..80 {
            cards.push(progress_due_on(&format!("c{i}"), "2025-06-15T00:00:00Z")?);
        }
        assert_eq!(get_optimal_daily_load(&cards, 30, now()), 60);
        // Never below ten when enough cards are due.
        assert_eq!(get_optimal_daily_load(&cards, 1, now()), 10);
        assert_eq!(get_optimal_daily_load(&cards[..4], 30, now()), 4);
        assert_eq!(get_optimal_daily_load(&[], 30, now()), 0);
        Ok(())
    }

    #[test]
    fn test_review_schedule() -> Fallible<()> {
        let cards = vec![
            progress_due_on("overdue", "2025-06-01T10:00:00Z")?,
            progress_due_on("b", "2025-06-20T10:00:00Z")?,
            progress_due_on("a", "2025-06-20T18:00:00Z")?,
            progress_due_on("far", "2025-09-01T10:00:00Z")?,
        ];
        let schedule = generate_review_schedule(&cards, 30, now().date());
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[&Date::parse("2025-06-01")?].len(), 1);
        let names: Vec<&str> = schedule[&Date::parse("2025-06-20")?]
            .iter()
            .map(|c| c.card_id.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        Ok(())
    }
}
