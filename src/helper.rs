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

use crate::error::Fallible;
use crate::types::ids::CardId;
use crate::types::progress::CardProgress;
use crate::types::schedule::CardScheduleState;
use crate::types::timestamp::Timestamp;

/// A never-reviewed card, created a day before it comes due.
pub fn progress_due_on(card_id: &str, next_review: &str) -> Fallible<CardProgress> {
    let next_review = Timestamp::parse(next_review)?;
    Ok(CardProgress::new(CardId::new(card_id)?, next_review.plus_days(-1)))
}

/// A card reviewed once, successfully.
pub fn reviewed_progress(
    card_id: &str,
    last_reviewed: &str,
    interval: u32,
    next_review: &str,
) -> Fallible<CardProgress> {
    let last_reviewed = Timestamp::parse(last_reviewed)?;
    let mut progress = CardProgress::new(CardId::new(card_id)?, last_reviewed);
    progress.schedule = CardScheduleState {
        interval,
        repetitions: 1,
        ..CardScheduleState::default()
    };
    progress.next_review_date = Timestamp::parse(next_review)?;
    progress.total_reviews = 1;
    progress.successful_reviews = 1;
    progress.average_quality = 4.0;
    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures() -> Fallible<()> {
        let new = progress_due_on("a", "2025-01-02T00:00:00Z")?;
        assert!(new.is_new());
        let old = reviewed_progress("b", "2025-01-01T00:00:00Z", 4, "2025-01-05T00:00:00Z")?;
        assert!(!old.is_new());
        assert_eq!(old.success_rate(), 100.0);
        Ok(())
    }
}
