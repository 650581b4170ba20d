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

//! The SM-2 scheduler. Everything here is a pure function of its inputs.

use crate::types::ids::CardId;
use crate::types::quality::Quality;
use crate::types::review::ReviewMetrics;
use crate::types::schedule::CardScheduleState;
use crate::types::schedule::MIN_EASE_FACTOR;
use crate::types::timestamp::Timestamp;

/// Interval after the first successful repetition, in days.
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second successful repetition, in days.
const SECOND_INTERVAL: u32 = 6;

/// The ease factor after a successful review of the given quality.
pub fn calculate_ease_factor(current_ease: f64, quality: Quality) -> f64 {
    let q = 5.0 - quality.as_f64();
    let ease = current_ease + (0.1 - q * (0.08 + q * 0.02));
    ease.max(MIN_EASE_FACTOR)
}

/// The interval in days for a card with the given number of consecutive
/// successful repetitions.
pub fn calculate_interval(repetitions: u32, ease_factor: f64) -> u32 {
    match repetitions {
        0 => FIRST_INTERVAL,
        1 => SECOND_INTERVAL,
        n => {
            let growth = ease_factor.powi(n as i32 - 1);
            let interval = (SECOND_INTERVAL as f64 * growth).round();
            // Saturate rather than wrap for absurdly long histories.
            interval.clamp(1.0, u32::MAX as f64) as u32
        }
    }
}

/// Apply a review of the given quality to a card's schedule.
///
/// A failed review (quality below 3) resets the repetition count and
/// interval but leaves the ease factor alone. A successful one bumps the
/// repetition count, recomputes the ease factor, and grows the interval from
/// the new values.
pub fn schedule_review(
    card_id: &CardId,
    quality: Quality,
    current: CardScheduleState,
    reviewed_at: Timestamp,
    time_taken: Option<u32>,
) -> ReviewMetrics {
    let next = if quality.is_success() {
        let repetitions = current.repetitions + 1;
        let ease_factor = calculate_ease_factor(current.ease_factor, quality);
        CardScheduleState {
            ease_factor,
            interval: calculate_interval(repetitions, ease_factor),
            repetitions,
        }
    } else {
        CardScheduleState {
            ease_factor: current.ease_factor,
            interval: 1,
            repetitions: 0,
        }
    };
    log::debug!(
        "Scheduled card {card_id} (quality {quality}): interval {} -> {}, ease {:.2} -> {:.2}.",
        current.interval,
        next.interval,
        current.ease_factor,
        next.ease_factor
    );
    ReviewMetrics {
        card_id: card_id.clone(),
        quality,
        ease_factor: next.ease_factor,
        interval: next.interval,
        repetitions: next.repetitions,
        review_date: reviewed_at,
        next_review_date: reviewed_at.plus_days(next.interval as i64),
        time_taken,
    }
}

/// Estimated probability of recall, as a percentage, for a card last
/// reviewed at `last_reviewed` with the given interval.
///
/// This is an exponential forgetting curve, `100 * e^(-t / interval)`. It is
/// a ranking heuristic, not a measurement.
pub fn estimate_retention(last_reviewed: Timestamp, interval: u32, now: Timestamp) -> f64 {
    let days = now.days_since(last_reviewed);
    if days <= 0.0 {
        return 100.0;
    }
    let interval = interval.max(1) as f64;
    (100.0 * (-days / interval).exp()).clamp(0.0, 100.0)
}
