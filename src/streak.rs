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

//! Daily study streaks.

use crate::types::date::Date;

/// The streak after reviewing on `today`, given the current streak and the
/// day of the previous review.
///
/// Reviewing again on the same day leaves the streak alone, reviewing on the
/// following day extends it, and any longer gap (or no previous review)
/// starts a new streak of one.
pub fn update_streak(streak: u32, last_review: Option<Date>, today: Date) -> u32 {
    match last_review {
        None => 1,
        Some(last) => match today.days_since(last) {
            0 => streak,
            1 => streak + 1,
            _ => 1,
        },
    }
}
