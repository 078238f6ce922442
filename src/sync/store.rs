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

//! Persistence of the listing file.
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the listing, so a reader never sees a partially written file.

use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::{
    error::SyncError,
    model::Listing,
    sync::codec::{emit_listing, parse_listing},
};

pub(crate) struct ListingStore {
    path: PathBuf,
    src_prefix: String,
}

impl ListingStore {
    pub(crate) fn new(path: impl Into<PathBuf>, src_prefix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            src_prefix: src_prefix.into(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the listing, treating a missing or unreadable file as empty.
    ///
    /// Problems are logged rather than returned: without a usable previous
    /// listing, synchronisation simply starts from scratch.
    pub(crate) fn load(&self) -> Listing {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No existing {} found, will create a new one", self.path.display());
                return Listing::new();
            }
            Err(e) => {
                warn!("Cannot read {}, starting fresh: {}", self.path.display(), e);
                return Listing::new();
            }
        };

        match parse_listing(&text, &self.src_prefix) {
            Ok(listing) => {
                debug!("Loaded {} records from {}", listing.len(), self.path.display());
                listing
            }
            Err(e) => {
                warn!("Cannot parse {}, starting fresh: {}", self.path.display(), e);
                Listing::new()
            }
        }
    }

    /// Writes the listing atomically.
    ///
    /// Returns `false` without touching the file if its content would not
    /// change.
    pub(crate) fn save(&self, listing: &Listing) -> Result<bool, SyncError> {
        let text = emit_listing(listing, &self.src_prefix);

        if fs::read_to_string(&self.path).is_ok_and(|current| current == text) {
            debug!("{} is up to date", self.path.display());
            return Ok(false);
        }

        self.write_atomically(&text)
            .map_err(|source| SyncError::ListingWrite {
                path: self.path.clone(),
                source,
            })?;

        Ok(true)
    }

    fn write_atomically(&self, text: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(text.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}
