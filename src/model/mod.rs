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

//! Domain models and core data structures.
//!
//! This module defines the photo record, the unit of metadata shared between
//! the quiz and the listing synchroniser, and the [`Listing`] collection that
//! is persisted to disk.

pub(crate) mod listing;

pub(crate) use listing::Listing;

/// Year written for a new photo when none can be detected from its name.
pub(crate) const PLACEHOLDER_YEAR: i32 = 2020;

/// Caption written for a new photo, to be replaced by a human.
pub(crate) const DEFAULT_CAPTION: &str = "Your caption here.";

/// Metadata for a single photo.
///
/// The `path` is relative to the photo directory and is the unique key of a
/// record within a [`Listing`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PhotoRecord {
    pub(crate) path: String,
    pub(crate) year: i32,
    pub(crate) caption: String,
    /// False when the listing file wrote this `src` without the configured
    /// prefix. Such a path is written back exactly as it was read.
    pub(crate) prefixed: bool,
}

impl PhotoRecord {
    pub(crate) fn new(path: impl Into<String>, year: i32, caption: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            year,
            caption: caption.into(),
            prefixed: true,
        }
    }

    /// Marks the path as written without the listing prefix.
    pub(crate) fn unprefixed(self) -> Self {
        Self {
            prefixed: false,
            ..self
        }
    }

    /// Creates a record for a newly discovered file.
    ///
    /// Uses the detected year if there is one, otherwise the placeholder, and
    /// the default caption.
    pub(crate) fn discovered(path: impl Into<String>, detected_year: Option<i32>) -> Self {
        Self::new(
            path,
            detected_year.unwrap_or(PLACEHOLDER_YEAR),
            DEFAULT_CAPTION,
        )
    }
}
