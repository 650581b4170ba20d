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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::invalid;
use crate::queue::DEFAULT_NEW_CARDS_PER_SESSION;

/// The name of the configuration file inside a collection directory.
pub const CONFIG_FILE: &str = "flashrep.toml";

#[derive(Deserialize, Clone, PartialEq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How many never-reviewed cards a session takes in.
    pub new_cards_per_session: usize,
    /// Cut every session down to at most this many cards.
    pub max_cards: Option<usize>,
    /// Daily study time, used for the load recommendation.
    pub available_minutes: u32,
    /// How far ahead `schedule` looks by default.
    pub schedule_days: u32,
    /// Database file name, relative to the collection directory.
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            new_cards_per_session: DEFAULT_NEW_CARDS_PER_SESSION,
            max_cards: None,
            available_minutes: 30,
            schedule_days: 30,
            database: "flashrep.db".to_string(),
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        if config.max_cards == Some(0) {
            return invalid("max_cards must be at least 1.");
        }
        if config.database.trim().is_empty() {
            return invalid("database must not be blank.");
        }
        Ok(config)
    }

    /// Load the configuration from a collection directory. A missing file
    /// gives the defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE} found, using defaults.");
            return Ok(Config::default());
        }
        log::debug!("Loading configuration from {}.", path.display());
        let text = read_to_string(path)?;
        Config::parse(&text)
    }
}
