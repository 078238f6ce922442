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

//! Ordered photo listing.
//!
//! A listing keeps records in insertion order and guarantees that no two
//! records share the same path.

use std::collections::HashMap;

use crate::model::PhotoRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Listing {
    records: Vec<PhotoRecord>,
    index: HashMap<String, usize>,
}

impl Listing {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a record, unless a record with the same path is present.
    ///
    /// Returns `false` if the record was rejected as a duplicate.
    pub(crate) fn push(&mut self, record: PhotoRecord) -> bool {
        if self.index.contains_key(&record.path) {
            return false;
        }

        self.index.insert(record.path.clone(), self.records.len());
        self.records.push(record);

        true
    }

    pub(crate) fn get(&self, path: &str) -> Option<&PhotoRecord> {
        self.index.get(path).map(|&idx| &self.records[idx])
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub(crate) fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub(crate) fn paths(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.path.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn into_records(self) -> Vec<PhotoRecord> {
        self.records
    }
}

impl FromIterator<PhotoRecord> for Listing {
    /// Collects records, keeping the first of any duplicated path.
    fn from_iter<T: IntoIterator<Item = PhotoRecord>>(iter: T) -> Self {
        let mut listing = Listing::new();
        for record in iter {
            listing.push(record);
        }
        listing
    }
}
