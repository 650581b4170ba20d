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

use crate::session::stats::calculate_session_xp;
use crate::streak::update_streak;
use crate::types::date::Date;
use crate::types::quality::Quality;

/// Study-wide progress of the learner, kept by the progress store.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProgress {
    pub total_xp: u64,
    pub streak: u32,
    pub last_review_date: Option<Date>,
    pub total_reviews: u64,
}

impl LearnerProgress {
    /// Account for one review done on `today`.
    pub fn record_review(&self, quality: Quality, today: Date) -> LearnerProgress {
        let xp = calculate_session_xp(1, quality.as_f64());
        LearnerProgress {
            total_xp: self.total_xp + xp,
            streak: update_streak(self.streak, self.last_review_date, today),
            last_review_date: Some(today),
            total_reviews: self.total_reviews + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_record_reviews() -> Fallible<()> {
        let day = Date::parse("2025-05-01")?;
        let learner = LearnerProgress::default();
        let learner = learner.record_review(Quality::new(5)?, day);
        assert_eq!(learner.total_xp, 15);
        assert_eq!(learner.streak, 1);
        let learner = learner.record_review(Quality::new(2)?, day);
        assert_eq!(learner.total_xp, 27);
        assert_eq!(learner.streak, 1);
        let learner = learner.record_review(Quality::new(3)?, day.plus_days(1));
        assert_eq!(learner.streak, 2);
        assert_eq!(learner.total_reviews, 3);
        assert_eq!(learner.last_review_date, Some(day.plus_days(1)));
        Ok(())
    }
}
