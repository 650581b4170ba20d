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

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::error::fail;
use crate::error::invalid;
use crate::error::missing;
use crate::session::stats::SessionStats;
use crate::store::ProgressStore;
use crate::store::SessionSummary;
use crate::types::ids::CardId;
use crate::types::ids::DeckId;
use crate::types::ids::SessionId;
use crate::types::learner::LearnerProgress;
use crate::types::progress::CardProgress;
use crate::types::review::ReviewMetrics;
use crate::types::schedule::CardScheduleState;
use crate::types::timestamp::Timestamp;

const PROGRESS_COLUMNS: &str = "card_id, ease_factor, interval_days, repetitions, next_review_date, total_reviews, successful_reviews, failed_reviews, average_quality, last_reviewed, retention_score";

/// A progress store backed by a SQLite database.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating database schema in {database_path}.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    fn card_exists(&self, card_id: &CardId) -> Fallible<bool> {
        let sql = "select count(*) from cards where card_id = ?;";
        let count: i64 = self.conn.query_row(sql, [card_id], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn deck_exists(&self, deck_id: &DeckId) -> Fallible<bool> {
        let sql = "select count(*) from decks where deck_id = ?;";
        let count: i64 = self.conn.query_row(sql, [deck_id], |row| row.get(0))?;
        Ok(count > 0)
    }
}

impl ProgressStore for Database {
    fn create_deck(&mut self, deck_id: &DeckId) -> Fallible<()> {
        if self.deck_exists(deck_id)? {
            return fail(format!("deck '{deck_id}' already exists."));
        }
        self.conn
            .execute("insert into decks (deck_id) values (?);", [deck_id])?;
        Ok(())
    }

    fn deck_ids(&self) -> Fallible<Vec<DeckId>> {
        let mut stmt = self
            .conn
            .prepare("select deck_id from decks order by deck_id;")?;
        let mut rows = stmt.query([])?;
        let mut decks = Vec::new();
        while let Some(row) = rows.next()? {
            decks.push(row.get(0)?);
        }
        Ok(decks)
    }

    fn deck_cards(&self, deck_id: &DeckId) -> Fallible<Option<Vec<CardId>>> {
        if !self.deck_exists(deck_id)? {
            return Ok(None);
        }
        let mut stmt = self
            .conn
            .prepare("select card_id from cards where deck_id = ? order by position;")?;
        let mut rows = stmt.query([deck_id])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(row.get(0)?);
        }
        Ok(Some(cards))
    }

    fn add_card(
        &mut self,
        deck_id: &DeckId,
        card_id: CardId,
        created_at: Timestamp,
    ) -> Fallible<CardProgress> {
        if self.card_exists(&card_id)? {
            return fail(format!("card '{card_id}' already exists."));
        }
        if !self.deck_exists(deck_id)? {
            return missing(format!("no deck named '{deck_id}'."));
        }
        log::debug!("Adding card {card_id} to deck {deck_id}.");
        let progress = CardProgress::new(card_id, created_at);
        let tx = self.conn.transaction()?;
        let position: i64 = tx.query_row(
            "select coalesce(max(position), -1) + 1 from cards where deck_id = ?;",
            [deck_id],
            |row| row.get(0),
        )?;
        tx.execute(
            "insert into cards (card_id, deck_id, position) values (?, ?, ?);",
            (&progress.card_id, deck_id, position),
        )?;
        upsert_progress(&tx, &progress)?;
        tx.commit()?;
        Ok(progress)
    }

    fn remove_card(&mut self, card_id: &CardId) -> Fallible<()> {
        let deleted = self
            .conn
            .execute("delete from cards where card_id = ?;", [card_id])?;
        if deleted == 0 {
            return missing(format!("no card named '{card_id}'."));
        }
        log::debug!("Removed card {card_id}.");
        Ok(())
    }

    fn get_progress(&self, card_id: &CardId) -> Fallible<Option<CardProgress>> {
        let sql = format!("select {PROGRESS_COLUMNS} from progress where card_id = ?;");
        let progress = self
            .conn
            .query_row(&sql, [card_id], read_progress)
            .optional()?;
        Ok(progress)
    }

    fn put_progress(&mut self, progress: &CardProgress) -> Fallible<()> {
        if !self.card_exists(&progress.card_id)? {
            return missing(format!("no card named '{}'.", progress.card_id));
        }
        let tx = self.conn.transaction()?;
        upsert_progress(&tx, progress)?;
        tx.commit()?;
        Ok(())
    }

    fn all_progress(&self) -> Fallible<Vec<CardProgress>> {
        let sql = format!("select {PROGRESS_COLUMNS} from progress order by card_id;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut all = Vec::new();
        while let Some(row) = rows.next()? {
            all.push(read_progress(row)?);
        }
        Ok(all)
    }

    fn learner(&self) -> Fallible<LearnerProgress> {
        let sql = "select total_xp, streak, last_review_date, total_reviews from learner where learner_id = 1;";
        let learner = self
            .conn
            .query_row(sql, [], |row| {
                let total_xp: i64 = row.get(0)?;
                let total_reviews: i64 = row.get(3)?;
                Ok(LearnerProgress {
                    total_xp: total_xp as u64,
                    streak: row.get(1)?,
                    last_review_date: row.get(2)?,
                    total_reviews: total_reviews as u64,
                })
            })
            .optional()?;
        Ok(learner.unwrap_or_default())
    }

    fn put_learner(&mut self, learner: &LearnerProgress) -> Fallible<()> {
        upsert_learner(&self.conn, learner)
    }

    fn append_review(&mut self, session_id: &SessionId, review: &ReviewMetrics) -> Fallible<()> {
        insert_review(&self.conn, session_id, review)
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
        if !self.card_exists(&progress.card_id)? {
            return missing(format!("no card named '{}'.", progress.card_id));
        }
        let tx = self.conn.transaction()?;
        upsert_progress(&tx, progress)?;
        insert_review(&tx, session_id, review)?;
        upsert_learner(&tx, learner)?;
        tx.commit()?;
        log::debug!("Committed review of card {}.", progress.card_id);
        Ok(())
    }

    fn reviews_for(&self, card_id: &CardId) -> Fallible<Vec<ReviewMetrics>> {
        let sql = "select card_id, quality, ease_factor, interval_days, repetitions, reviewed_at, next_review_date, time_taken from reviews where card_id = ? order by review_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([card_id])?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(ReviewMetrics {
                card_id: row.get(0)?,
                quality: row.get(1)?,
                ease_factor: row.get(2)?,
                interval: row.get(3)?,
                repetitions: row.get(4)?,
                review_date: row.get(5)?,
                next_review_date: row.get(6)?,
                time_taken: row.get(7)?,
            });
        }
        Ok(reviews)
    }

    fn save_session(&mut self, summary: &SessionSummary) -> Fallible<()> {
        let stats = &summary.stats;
        let sql = "insert into sessions (session_id, deck_id, started_at, ended_at, cards_reviewed, average_quality, cards_mastered, cards_needing_review, duration, cards_per_minute, xp_earned, new_cards_learned) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);";
        self.conn.execute(
            sql,
            (
                &summary.session_id,
                &summary.deck_id,
                summary.started_at,
                summary.ended_at,
                stats.total_cards_reviewed as i64,
                stats.average_quality,
                stats.cards_mastered as i64,
                stats.cards_needing_review as i64,
                stats.session_duration as i64,
                stats.cards_per_minute,
                stats.xp_earned as i64,
                stats.new_cards_learned as i64,
            ),
        )?;
        Ok(())
    }

    fn sessions(&self) -> Fallible<Vec<SessionSummary>> {
        let sql = "select session_id, deck_id, started_at, ended_at, cards_reviewed, average_quality, cards_mastered, cards_needing_review, duration, cards_per_minute, xp_earned, new_cards_learned from sessions order by started_at, rowid;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            let reviewed: i64 = row.get(4)?;
            let mastered: i64 = row.get(6)?;
            let needing_review: i64 = row.get(7)?;
            let duration: i64 = row.get(8)?;
            let xp: i64 = row.get(10)?;
            let new_cards: i64 = row.get(11)?;
            sessions.push(SessionSummary {
                session_id: row.get(0)?,
                deck_id: row.get(1)?,
                started_at: row.get(2)?,
                ended_at: row.get(3)?,
                stats: SessionStats {
                    total_cards_reviewed: reviewed as usize,
                    average_quality: row.get(5)?,
                    cards_mastered: mastered as usize,
                    cards_needing_review: needing_review as usize,
                    session_duration: duration as u64,
                    cards_per_minute: row.get(9)?,
                    xp_earned: xp as u64,
                    new_cards_learned: new_cards as usize,
                },
            });
        }
        Ok(sessions)
    }
}

fn upsert_progress(tx: &Transaction, progress: &CardProgress) -> Fallible<()> {
    let sql = format!(
        "insert or replace into progress ({PROGRESS_COLUMNS}) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);"
    );
    tx.execute(
        &sql,
        (
            &progress.card_id,
            progress.schedule.ease_factor,
            progress.schedule.interval,
            progress.schedule.repetitions,
            progress.next_review_date,
            progress.total_reviews,
            progress.successful_reviews,
            progress.failed_reviews,
            progress.average_quality,
            progress.last_reviewed,
            progress.retention_score,
        ),
    )?;
    Ok(())
}

fn upsert_learner(conn: &Connection, learner: &LearnerProgress) -> Fallible<()> {
    let sql = "insert or replace into learner (learner_id, total_xp, streak, last_review_date, total_reviews) values (1, ?, ?, ?, ?);";
    conn.execute(
        sql,
        (
            learner.total_xp as i64,
            learner.streak,
            learner.last_review_date,
            learner.total_reviews as i64,
        ),
    )?;
    Ok(())
}

fn insert_review(
    conn: &Connection,
    session_id: &SessionId,
    review: &ReviewMetrics,
) -> Fallible<()> {
    let sql = "insert into reviews (session_id, card_id, quality, ease_factor, interval_days, repetitions, reviewed_at, next_review_date, time_taken) values (?, ?, ?, ?, ?, ?, ?, ?, ?);";
    conn.execute(
        sql,
        (
            session_id,
            &review.card_id,
            review.quality,
            review.ease_factor,
            review.interval,
            review.repetitions,
            review.review_date,
            review.next_review_date,
            review.time_taken,
        ),
    )?;
    Ok(())
}

fn read_progress(row: &Row<'_>) -> rusqlite::Result<CardProgress> {
    Ok(CardProgress {
        card_id: row.get(0)?,
        schedule: CardScheduleState {
            ease_factor: row.get(1)?,
            interval: row.get(2)?,
            repetitions: row.get(3)?,
        },
        next_review_date: row.get(4)?,
        total_reviews: row.get(5)?,
        successful_reviews: row.get(6)?,
        failed_reviews: row.get(7)?,
        average_quality: row.get(8)?,
        last_reviewed: row.get(9)?,
        retention_score: row.get(10)?,
    })
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}
