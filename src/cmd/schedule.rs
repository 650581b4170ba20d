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
use crate::queue::generate_review_schedule;
use crate::store::ProgressStore;

pub fn print_schedule(store: &dyn ProgressStore, days: u32, clock: &dyn Clock) -> Fallible<()> {
    let progress = store.all_progress()?;
    let schedule = generate_review_schedule(&progress, days, clock.today());
    let json = serde_json::to_string_pretty(&schedule)?;
    println!("{json}");
    Ok(())
}
