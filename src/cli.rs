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

//! Command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, WatchStrategy};

/// Guess the year a photo was taken, and keep the photo listing up to date.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// What to do, playing the quiz if omitted
    #[clap(subcommand)]
    pub(crate) mode: Option<Mode>,
    /// Directory holding the photos
    #[clap(long, global = true)]
    pub(crate) photos_dir: Option<PathBuf>,
    /// Photo listing file
    #[clap(long, global = true)]
    pub(crate) listing: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Play the quiz
    Play,
    /// Rebuild the listing from the photo directory once
    Regenerate,
    /// Keep the listing up to date as photos are added and removed
    Watch {
        /// Only append new photos, never reorder or remove
        #[clap(long, default_value_t = false)]
        incremental: bool,
    },
}

impl Cli {
    pub(crate) fn mode(&self) -> Mode {
        self.mode.unwrap_or(Mode::Play)
    }

    /// Applies command line overrides to the loaded configuration.
    pub(crate) fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.photos_dir {
            config.photos_dir = dir.to_string_lossy().into_owned();
        }
        if let Some(listing) = &self.listing {
            config.listing_file = listing.to_string_lossy().into_owned();
        }
        if let Some(Mode::Watch { incremental: true }) = self.mode {
            config.watch_strategy = WatchStrategy::Incremental;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_play() {
        let cli = Cli::parse_from(["photoquiz"]);

        assert_eq!(cli.mode(), Mode::Play);
    }

    #[test]
    fn overrides_configuration() {
        let cli = Cli::parse_from([
            "photoquiz",
            "watch",
            "--incremental",
            "--photos-dir",
            "/srv/pics",
            "--listing",
            "site/data.js",
        ]);
        let mut config = AppConfig::default();

        cli.apply(&mut config);

        assert_eq!(cli.mode(), Mode::Watch { incremental: true });
        assert_eq!(config.photos_dir, "/srv/pics");
        assert_eq!(config.listing_file, "site/data.js");
        assert_eq!(config.watch_strategy, WatchStrategy::Incremental);
    }
}
