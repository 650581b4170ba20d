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

use crate::types::ids::CardId;
use crate::types::quality::Quality;
use crate::types::schedule::CardScheduleState;
use crate::types::timestamp::Timestamp;

/// The record of a single review. Scheduling fields hold the values after
/// the review was applied.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMetrics {
    pub card_id: CardId,
    pub quality: Quality,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub review_date: Timestamp,
    pub next_review_date: Timestamp,
    /// Seconds the user took to answer, if measured.
    pub time_taken: Option<u32>,
}

impl ReviewMetrics {
    /// The card's scheduling state after this review.
    pub fn schedule(&self) -> CardScheduleState {
        CardScheduleState {
            ease_factor: self.ease_factor,
            interval: self.interval,
            repetitions: self.repetitions,
        }
    }
}
