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

use flashrep::CardId;
use flashrep::Clock;
use flashrep::DeckId;
use flashrep::Fallible;
use flashrep::FixedClock;
use flashrep::MemoryStore;
use flashrep::ProgressStore;
use flashrep::Quality;
use flashrep::SessionStatus;
use flashrep::Timestamp;
use flashrep::config::Config;
use flashrep::session::stats::calculate_session_xp;
use flashrep::study::finish_session;
use flashrep::study::start_session;
use flashrep::study::submit_review;

/// Review every card in a session with the same quality.
fn review_all(
    store: &mut MemoryStore,
    deck: &DeckId,
    quality: i64,
    clock: &mut FixedClock,
) -> Fallible<u64> {
    let mut session = start_session(store, deck, &Config::default(), clock)?;
    while let Some(card_id) = session.current_card_id().cloned() {
        clock.advance_seconds(15);
        let quality = Quality::new(quality)?;
        session = submit_review(store, &session, &card_id, quality, Some(15), clock)?;
        session = session.move_to_next_card(clock.now());
    }
    assert_eq!(session.status(), SessionStatus::Completed);
    let stats = finish_session(store, &session, clock)?;
    Ok(stats.xp_earned)
}

#[test]
fn test_days_of_study() -> Fallible<()> {
    let mut clock = FixedClock::new(Timestamp::parse("2025-01-06T08:00:00Z")?);
    let mut store = MemoryStore::new();
    let deck = DeckId::new("capitals")?;
    store.create_deck(&deck)?;
    for id in ["paris", "rome", "lima"] {
        store.add_card(&deck, CardId::new(id)?, clock.now())?;
    }
    let paris = CardId::new("paris")?;

    // Day one: everything is due for the first time.
    clock.advance_days(1);
    let xp_day_one = review_all(&mut store, &deck, 4, &mut clock)?;
    let progress = store.get_progress(&paris)?.unwrap();
    assert_eq!(progress.schedule.repetitions, 1);
    assert_eq!(progress.schedule.interval, 6);
    assert!((progress.schedule.ease_factor - 2.5).abs() < 1e-9);
    assert_eq!(xp_day_one, calculate_session_xp(3, 4.0));

    // Day seven: due again; a perfect review grows the interval to 16 days.
    clock.advance_days(6);
    review_all(&mut store, &deck, 5, &mut clock)?;
    let progress = store.get_progress(&paris)?.unwrap();
    assert_eq!(progress.schedule.repetitions, 2);
    assert!((progress.schedule.ease_factor - 2.6).abs() < 1e-9);
    assert_eq!(progress.schedule.interval, 16);
    assert_eq!(progress.next_review_date.date(), clock.today().plus_days(16));
    assert_eq!(progress.total_reviews, 2);
    assert_eq!(progress.average_quality, 4.5);

    // A six-day gap broke the streak.
    let learner = store.learner()?;
    assert_eq!(learner.streak, 1);
    assert_eq!(learner.total_reviews, 6);

    // The next day nothing is due, so the session backfills with the
    // not-yet-due cards; forgetting them resets their schedule.
    clock.advance_days(1);
    review_all(&mut store, &deck, 1, &mut clock)?;
    let progress = store.get_progress(&paris)?.unwrap();
    assert_eq!(progress.schedule.repetitions, 0);
    assert_eq!(progress.schedule.interval, 1);
    assert!((progress.schedule.ease_factor - 2.6).abs() < 1e-9);
    assert_eq!(progress.failed_reviews, 1);
    assert_eq!(store.learner()?.streak, 2);

    // XP on the learner equals the sum over the saved sessions.
    let session_xp: u64 = store.sessions()?.iter().map(|s| s.stats.xp_earned).sum();
    assert_eq!(store.learner()?.total_xp, session_xp);
    assert_eq!(store.reviews_for(&paris)?.len(), 3);
    Ok(())
}
