// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file. Command line
//! options are applied on top of the loaded values.

use serde::{Deserialize, Serialize};

use crate::game::{GameSettings, rounds::OffsetRange};

const CONFIG_NAME: &str = "photoquiz";

/// How the watcher merges directory changes into the listing.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WatchStrategy {
    /// Mirror the directory: sorted, deleted files dropped.
    #[default]
    Full,
    /// Only append new files.
    Incremental,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,
    pub(crate) photos_dir: String,
    pub(crate) listing_file: String,
    pub(crate) src_prefix: String,
    pub(crate) allow_short_game: bool,
    pub(crate) offset_min: i32,
    pub(crate) offset_max: i32,
    pub(crate) debounce_ms: u64,
    pub(crate) poll_interval_ms: u64,
    pub(crate) watch_strategy: WatchStrategy,
    pub(crate) log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let offsets = OffsetRange::default();

        Self {
            version: 1,
            photos_dir: "photos".to_string(),
            listing_file: "data.js".to_string(),
            src_prefix: "photos/".to_string(),
            allow_short_game: false,
            offset_min: offsets.min,
            offset_max: offsets.max,
            debounce_ms: 500,
            poll_interval_ms: 250,
            watch_strategy: WatchStrategy::Full,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub(crate) fn offsets(&self) -> OffsetRange {
        OffsetRange {
            min: self.offset_min,
            max: self.offset_max,
        }
    }

    pub(crate) fn game_settings(&self) -> GameSettings {
        GameSettings {
            offsets: self.offsets(),
            allow_short_game: self.allow_short_game,
        }
    }
}

pub(crate) fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}
