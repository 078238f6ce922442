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

//! Photo directory scanning.

use std::{
    collections::BTreeMap,
    path::Path,
    time::SystemTime,
};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::SyncError;

/// Lists the names of the files directly inside `dir`.
///
/// Sub-directories are not entered. Entries whose names are not valid UTF-8
/// are skipped with a warning.
///
/// # Errors
///
/// Returns [`SyncError::FilesystemAccess`] if the directory itself cannot be
/// read.
pub(crate) fn scan_directory(dir: &Path) -> Result<Vec<String>, SyncError> {
    Ok(snapshot_directory(dir)?.into_keys().collect())
}

/// Like [`scan_directory`], but also records each file's modification time so
/// that successive snapshots can be compared.
pub(crate) fn snapshot_directory(
    dir: &Path,
) -> Result<BTreeMap<String, Option<SystemTime>>, SyncError> {
    let access_error = |source: walkdir::Error| SyncError::FilesystemAccess {
        path: dir.to_path_buf(),
        source: source.into(),
    };

    let mut files = BTreeMap::new();

    for entry in WalkDir::new(dir).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(access_error(e)),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.depth() == 0 {
            if !entry.file_type().is_dir() {
                return Err(SyncError::FilesystemAccess {
                    path: dir.to_path_buf(),
                    source: std::io::Error::other("not a directory"),
                });
            }
            continue;
        }

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) => {
                let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
                files.insert(name.to_string(), modified);
            }
            None => warn!("Skipping non UTF-8 file name: {:?}", entry.file_name()),
        }
    }

    Ok(files)
}
