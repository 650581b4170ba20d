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

/// The lowest ease factor a card can have.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// The ease factor every card starts with.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// The SM-2 scheduling parameters of a single card.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardScheduleState {
    /// Multiplier controlling interval growth. Never below
    /// [`MIN_EASE_FACTOR`].
    pub ease_factor: f64,
    /// Days until the next review. Never below 1.
    pub interval: u32,
    /// Number of consecutive successful reviews.
    pub repetitions: u32,
}

impl Default for CardScheduleState {
    fn default() -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 1,
            repetitions: 0,
        }
    }
}
