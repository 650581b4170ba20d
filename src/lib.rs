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

//! flashrep: an SM-2 spaced repetition engine.
//!
//! This library provides:
//! - The SM-2 scheduler (ease factors, intervals, retention estimates)
//! - Review queue and session order construction
//! - The review session state machine and session statistics
//! - A progress store interface, with in-memory and SQLite implementations

pub mod cli;
pub mod clock;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod error;
pub mod queue;
pub mod session;
pub mod sm2;
pub mod store;
pub mod streak;
pub mod study;
pub mod types;

#[cfg(test)]
mod helper;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ErrorKind, ErrorReport, Fallible, fail};
pub use session::state::{ReviewSession, SessionStatus};
pub use session::stats::{BreakAdvice, BreakReason, SessionStats};
pub use store::ProgressStore;
pub use store::memory::MemoryStore;
pub use store::sqlite::Database;
pub use types::date::Date;
pub use types::ids::{CardId, DeckId, SessionId};
pub use types::learner::LearnerProgress;
pub use types::progress::CardProgress;
pub use types::quality::Quality;
pub use types::review::ReviewMetrics;
pub use types::schedule::CardScheduleState;
pub use types::timestamp::Timestamp;
