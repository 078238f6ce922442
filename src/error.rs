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

//! Domain error types.
//!
//! Application plumbing uses `anyhow`; the quiz engine and the listing
//! synchroniser report typed errors so callers can decide which failures are
//! recoverable.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::game::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum QuizError {
    #[error("not enough photos to play: {available} available, {required} required")]
    InsufficientData { available: usize, required: usize },

    #[error("year offset range {min}..={max} has fewer than 3 non-zero offsets")]
    OffsetRange { min: i32, max: i32 },

    #[error("cannot {action} while {phase:?}")]
    InvalidTransition { action: &'static str, phase: Phase },

    #[error("year {0} is too large to derive answer options")]
    YearOutOfRange(i32),

    #[error("{0} is not one of the options for this round")]
    UnknownOption(i32),

    #[error("the photo for this round has not loaded")]
    PhotoNotReady,
}

/// Every candidate for a photo failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not load {path} (tried: {})", attempted.join(", "))]
pub(crate) struct ImageLoadFailure {
    pub(crate) path: String,
    pub(crate) attempted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ListingError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("no `const photos = [` array found")]
    MissingArray,
}

#[derive(Debug, Error)]
pub(crate) enum SyncError {
    #[error("cannot read photo directory {}: {source}", path.display())]
    FilesystemAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write listing {}: {source}", path.display())]
    ListingWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
