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

use crate::clock::Clock;
use crate::error::Fallible;
use crate::queue::get_review_queue;
use crate::store::ProgressStore;
use crate::types::progress::CardProgress;
use crate::types::timestamp::Timestamp;

pub fn print_due(store: &dyn ProgressStore, clock: &dyn Clock) -> Fallible<()> {
    let progress = store.all_progress()?;
    let lines = due_lines(&progress, clock.now());
    if lines.is_empty() {
        println!("No cards due today.");
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn due_lines(progress: &[CardProgress], now: Timestamp) -> Vec<String> {
    get_review_queue(progress, now)
        .into_iter()
        .map(|p| {
            format!(
                "{}\tretention {:.0}%\tinterval {}d\tsuccess {:.0}%",
                p.card_id,
                p.retention(now),
                p.schedule.interval,
                p.success_rate()
            )
        })
        .collect()
}
