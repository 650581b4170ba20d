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
use crate::sm2::estimate_retention;
use crate::types::date::Date;
use crate::types::ids::CardId;
use crate::types::review::ReviewMetrics;
use crate::types::schedule::CardScheduleState;
use crate::types::timestamp::Timestamp;

/// Everything the store knows about how a card has been studied.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProgress {
    pub card_id: CardId,
    pub schedule: CardScheduleState,
    pub next_review_date: Timestamp,
    pub total_reviews: u32,
    pub successful_reviews: u32,
    pub failed_reviews: u32,
    /// Running mean of every quality rating submitted for this card.
    pub average_quality: f64,
    /// When the card was last reviewed, or created if it never was.
    pub last_reviewed: Timestamp,
    /// Estimated retention (0-100) at the time of the last review.
    pub retention_score: f64,
}

impl CardProgress {
    /// Progress for a freshly created card. It first comes due a day after
    /// creation.
    pub fn new(card_id: CardId, created_at: Timestamp) -> Self {
        Self {
            card_id,
            schedule: CardScheduleState::default(),
            next_review_date: created_at.plus_days(1),
            total_reviews: 0,
            successful_reviews: 0,
            failed_reviews: 0,
            average_quality: 0.0,
            last_reviewed: created_at,
            retention_score: 100.0,
        }
    }

    /// Whether the card has never been reviewed.
    pub fn is_new(&self) -> bool {
        self.total_reviews == 0
    }

    /// Whether the card is due on the given day.
    pub fn is_due(&self, today: Date) -> bool {
        self.next_review_date.date() <= today
    }

    /// Percentage of successful reviews; 100 for a card never reviewed.
    pub fn success_rate(&self) -> f64 {
        if self.total_reviews == 0 {
            return 100.0;
        }
        self.successful_reviews as f64 / self.total_reviews as f64 * 100.0
    }

    /// Estimated retention at `now`.
    pub fn retention(&self, now: Timestamp) -> f64 {
        estimate_retention(self.last_reviewed, self.schedule.interval, now)
    }

    /// Fold a review of this card into its progress. The retention score is
    /// what the card had decayed to just before the review.
    pub fn apply_review(&self, review: &ReviewMetrics) -> Fallible<CardProgress> {
        if review.card_id != self.card_id {
            return invalid(format!(
                "review of card '{}' applied to progress of card '{}'.",
                review.card_id, self.card_id
            ));
        }
        let success = review.quality.is_success();
        let total_reviews = self.total_reviews + 1;
        let quality_sum = self.average_quality * self.total_reviews as f64;
        let average_quality = (quality_sum + review.quality.as_f64()) / total_reviews as f64;
        Ok(CardProgress {
            card_id: self.card_id.clone(),
            schedule: review.schedule(),
            next_review_date: review.next_review_date,
            total_reviews,
            successful_reviews: self.successful_reviews + success as u32,
            failed_reviews: self.failed_reviews + !success as u32,
            average_quality,
            last_reviewed: review.review_date,
            retention_score: self.retention(review.review_date),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sm2::schedule_review;
    use crate::types::quality::Quality;

    fn card(id: &str) -> Fallible<CardProgress> {
        let created = Timestamp::parse("2025-01-01T09:00:00Z")?;
        Ok(CardProgress::new(CardId::new(id)?, created))
    }

    #[test]
    fn test_new_card() -> Fallible<()> {
        let progress = card("a")?;
        assert_eq!(progress.schedule, CardScheduleState::default());
        assert_eq!(progress.next_review_date.date(), Date::parse("2025-01-02")?);
        assert!(progress.is_new());
        assert_eq!(progress.success_rate(), 100.0);
        assert!(!progress.is_due(Date::parse("2025-01-01")?));
        assert!(progress.is_due(Date::parse("2025-01-02")?));
        Ok(())
    }

    #[test]
    fn test_apply_reviews() -> Fallible<()> {
        let progress = card("a")?;
        let at = Timestamp::parse("2025-01-02T09:00:00Z")?;
        let review =
            schedule_review(&progress.card_id, Quality::new(4)?, progress.schedule, at, None);
        let progress = progress.apply_review(&review)?;
        assert_eq!(progress.total_reviews, 1);
        assert_eq!(progress.successful_reviews, 1);
        assert_eq!(progress.schedule.interval, 6);
        assert_eq!(progress.last_reviewed, at);
        assert_eq!(progress.next_review_date, at.plus_days(6));

        let at = at.plus_days(6);
        let review =
            schedule_review(&progress.card_id, Quality::new(1)?, progress.schedule, at, Some(12));
        let progress = progress.apply_review(&review)?;
        assert_eq!(progress.total_reviews, 2);
        assert_eq!(progress.failed_reviews, 1);
        assert_eq!(progress.total_reviews, progress.successful_reviews + progress.failed_reviews);
        assert_eq!(progress.average_quality, 2.5);
        assert_eq!(progress.success_rate(), 50.0);
        assert_eq!(progress.schedule.repetitions, 0);
        Ok(())
    }

    #[test]
    fn test_retention_score_is_decay_before_review() -> Fallible<()> {
        let progress = card("a")?;
        // One full interval after creation: 100 * e^-1.
        let at = progress.last_reviewed.plus_days(1);
        let review =
            schedule_review(&progress.card_id, Quality::new(5)?, progress.schedule, at, None);
        let progress = progress.apply_review(&review)?;
        assert!((progress.retention_score - 100.0 * (-1.0f64).exp()).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_review_for_other_card_is_rejected() -> Fallible<()> {
        let a = card("a")?;
        let b = card("b")?;
        let review =
            schedule_review(&b.card_id, Quality::new(3)?, b.schedule, b.last_reviewed, None);
        assert!(a.apply_review(&review).is_err());
        Ok(())
    }
}
