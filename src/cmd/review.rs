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

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use crate::clock::Clock;
use crate::collection::Collection;
use crate::config::Config;
use crate::error::Fallible;
use crate::session::stats::SessionStats;
use crate::session::stats::calculate_session_stats;
use crate::session::stats::get_session_progress;
use crate::session::stats::should_break;
use crate::store::ProgressStore;
use crate::study::finish_session;
use crate::study::start_session;
use crate::study::submit_review;
use crate::types::ids::DeckId;
use crate::types::quality::Quality;

pub fn review_deck(collection: &mut Collection, deck: String, clock: &dyn Clock) -> Fallible<()> {
    let deck_id = DeckId::new(deck)?;
    let input = stdin().lock();
    let output = stdout().lock();
    run_review(
        &mut collection.db,
        &deck_id,
        &collection.config,
        clock,
        input,
        output,
    )?;
    Ok(())
}

enum Action {
    Rate(Quality),
    Pause,
    Quit,
}

/// Drive a session from a line-based input. Returns the final statistics,
/// or `None` if the session was abandoned.
fn run_review(
    store: &mut dyn ProgressStore,
    deck_id: &DeckId,
    config: &Config,
    clock: &dyn Clock,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Fallible<Option<SessionStats>> {
    let mut session = start_session(store, deck_id, config, clock)?;
    let total = session.card_ids().len();
    writeln!(output, "Reviewing {total} cards from {deck_id}.")?;
    let mut advised = false;

    while let Some(card_id) = session.current_card_id().cloned() {
        writeln!(
            output,
            "[{}/{total}, {:.0}%] {card_id}",
            session.current_index() + 1,
            get_session_progress(&session)
        )?;
        let shown_at = clock.now();
        match read_action(&mut input, &mut output)? {
            Action::Quit => {
                writeln!(output, "Session abandoned.")?;
                return Ok(None);
            }
            Action::Pause => {
                session = session.pause(clock.now());
                writeln!(output, "Paused. Press enter to resume.")?;
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    writeln!(output, "Session abandoned.")?;
                    return Ok(None);
                }
                session = session.resume();
            }
            Action::Rate(quality) => {
                let taken = clock.now().seconds_since(shown_at).max(0) as u32;
                session = submit_review(store, &session, &card_id, quality, Some(taken), clock)?;
                if let Some(review) = session.last_review() {
                    writeln!(
                        output,
                        "Next review in {} day(s), on {}.",
                        review.interval,
                        review.next_review_date.date()
                    )?;
                }
                session = session.move_to_next_card(clock.now());
                if !advised {
                    let stats = calculate_session_stats(&session, clock.now());
                    let advice = should_break(stats.total_cards_reviewed, stats.session_duration);
                    if let Some(reason) = advice.reason {
                        writeln!(output, "{reason}")?;
                        advised = true;
                    }
                }
            }
        }
    }

    let stats = finish_session(store, &session, clock)?;
    writeln!(output, "Session complete.")?;
    writeln!(output, "Cards reviewed: {}", stats.total_cards_reviewed)?;
    writeln!(output, "Average quality: {:.2}", stats.average_quality)?;
    writeln!(output, "Mastered: {}", stats.cards_mastered)?;
    writeln!(output, "Needing review: {}", stats.cards_needing_review)?;
    writeln!(output, "New cards learned: {}", stats.new_cards_learned)?;
    writeln!(output, "Duration: {}s", stats.session_duration)?;
    writeln!(output, "XP earned: {}", stats.xp_earned)?;
    Ok(Some(stats))
}

fn read_action(input: &mut impl BufRead, output: &mut impl Write) -> Fallible<Action> {
    loop {
        writeln!(output, "Rate 1-5 (1 = forgot, 5 = perfect), p = pause, q = quit:")?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Action::Quit);
        }
        match line.trim() {
            "p" => return Ok(Action::Pause),
            "q" => return Ok(Action::Quit),
            text => match text.parse::<Quality>() {
                Ok(quality) => return Ok(Action::Rate(quality)),
                Err(e) => writeln!(output, "{e}")?,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::clock::FixedClock;
    use crate::store::memory::MemoryStore;
    use crate::types::ids::CardId;
    use crate::types::timestamp::Timestamp;

    fn setup() -> Fallible<(MemoryStore, FixedClock, DeckId)> {
        let mut clock = FixedClock::new(Timestamp::parse("2025-03-01T10:00:00Z")?);
        let mut store = MemoryStore::new();
        let deck = DeckId::new("deck")?;
        store.create_deck(&deck)?;
        store.add_card(&deck, CardId::new("a")?, clock.now())?;
        store.add_card(&deck, CardId::new("b")?, clock.now())?;
        clock.advance_days(1);
        Ok((store, clock, deck))
    }

    #[test]
    fn test_full_session() -> Fallible<()> {
        let (mut store, clock, deck) = setup()?;
        let input = Cursor::new("seven\n3.5\n4\np\n\n2\n");
        let mut output = Vec::new();
        let stats = run_review(&mut store, &deck, &Config::default(), &clock, input, &mut output)?;
        let stats = stats.unwrap();
        assert_eq!(stats.total_cards_reviewed, 2);
        assert_eq!(stats.cards_needing_review, 1);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("quality must be an integer between 1 and 5"));
        assert!(text.contains("Paused."));
        assert!(text.contains("Session complete."));
        assert_eq!(store.sessions()?.len(), 1);
        assert_eq!(store.learner()?.total_reviews, 2);
        Ok(())
    }

    #[test]
    fn test_quit_keeps_submitted_reviews() -> Fallible<()> {
        let (mut store, clock, deck) = setup()?;
        let input = Cursor::new("5\nq\n");
        let mut output = Vec::new();
        let stats = run_review(&mut store, &deck, &Config::default(), &clock, input, &mut output)?;
        assert!(stats.is_none());
        assert!(store.sessions()?.is_empty());
        assert_eq!(store.learner()?.total_reviews, 1);
        Ok(())
    }

    #[test]
    fn test_end_of_input_abandons() -> Fallible<()> {
        let (mut store, clock, deck) = setup()?;
        let input = Cursor::new("");
        let mut output = Vec::new();
        let stats = run_review(&mut store, &deck, &Config::default(), &clock, input, &mut output)?;
        assert!(stats.is_none());
        Ok(())
    }
}
