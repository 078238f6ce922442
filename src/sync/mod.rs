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

//! Photo listing synchronisation.
//!
//! Keeps the listing file in step with the photo directory. It is the only
//! writer of the listing; the quiz only ever reads it.
//!
//! # Organization
//!
//! * [`scan`]: Lists the photo directory.
//! * [`reconcile`]: Merges scanned names into a listing.
//! * [`codec`]: Reads and writes the listing file format.
//! * [`store`]: Loads and atomically saves the listing file.
//! * [`watch`]: Re-synchronises whenever the directory changes.

pub(crate) mod codec;
pub(crate) mod reconcile;
pub(crate) mod scan;
pub(crate) mod store;
pub(crate) mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    config::{AppConfig, WatchStrategy},
    error::SyncError,
    sync::{
        reconcile::{Reconciliation, extract_year, merge_new, reconcile},
        scan::scan_directory,
        store::ListingStore,
    },
};

/// Scans the photo directory and merges the result into the stored listing.
pub(crate) struct Synchroniser {
    photos_dir: PathBuf,
    store: ListingStore,
}

impl Synchroniser {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self {
            photos_dir: PathBuf::from(&config.photos_dir),
            store: ListingStore::new(&config.listing_file, config.src_prefix.clone()),
        }
    }

    /// Computes the new listing without writing it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FilesystemAccess`] if the photo directory cannot
    /// be read.
    pub(crate) fn prepare(&self, strategy: WatchStrategy) -> Result<Reconciliation, SyncError> {
        let scanned = scan_directory(&self.photos_dir)?;
        let previous = self.store.load();

        Ok(match strategy {
            WatchStrategy::Full => reconcile(&scanned, &previous),
            WatchStrategy::Incremental => merge_new(&scanned, &previous),
        })
    }

    /// Writes a prepared listing. Returns whether the file changed.
    pub(crate) fn commit(&self, reconciliation: &Reconciliation) -> Result<bool, SyncError> {
        let written = self.store.save(&reconciliation.listing)?;
        if written {
            info!(
                "Updated {} with {} photos ({} added, {} removed)",
                self.store.path().display(),
                reconciliation.listing.len(),
                reconciliation.added.len(),
                reconciliation.removed.len()
            );
        }

        Ok(written)
    }

    pub(crate) fn run(&self, strategy: WatchStrategy) -> Result<Reconciliation, SyncError> {
        let reconciliation = self.prepare(strategy)?;
        self.commit(&reconciliation)?;
        Ok(reconciliation)
    }

    pub(crate) fn photos_dir(&self) -> &PathBuf {
        &self.photos_dir
    }

    pub(crate) fn listing_path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }
}

/// Rebuilds the listing once from the current directory contents and prints
/// a report.
///
/// # Errors
///
/// Fails if the photo directory cannot be read or the listing cannot be
/// written.
pub(crate) fn regenerate(config: &AppConfig) -> Result<()> {
    let synchroniser = Synchroniser::new(config);

    let reconciliation = synchroniser
        .run(WatchStrategy::Full)
        .context("Failed to regenerate photo listing")?;

    println!(
        "Generated {} with {} photos:",
        synchroniser.listing_path().display(),
        reconciliation.listing.len()
    );
    for (idx, record) in reconciliation.listing.records().iter().enumerate() {
        let detected = match extract_year(&record.path) {
            Some(year) => format!(" (detected year: {year})"),
            None => String::new(),
        };
        let new = if reconciliation.added.contains(&record.path) {
            " [new]"
        } else {
            ""
        };
        println!("   {}. {}{}{}", idx + 1, record.path, detected, new);
    }
    for path in &reconciliation.removed {
        println!("   - {} (removed)", path);
    }

    if !reconciliation.added.is_empty() {
        println!();
        println!("Next steps:");
        println!("   1. Review {}", synchroniser.listing_path().display());
        println!("   2. Fill in the correct years for photos without detected years");
        println!("   3. Add meaningful captions for each photo");
    }

    Ok(())
}
