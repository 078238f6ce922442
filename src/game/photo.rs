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

//! Photo loading with extension fallback.
//!
//! A listing may record a photo under an extension that no longer matches
//! the file on disk (for example after a conversion from PNG to JPEG). When
//! loading a round's photo the recorded path is tried first, then the same
//! base name with each of the canonical image extensions in a fixed order.
//!
//! Attempts are strictly one at a time: the next candidate is only tried
//! after the previous one has failed.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::error::ImageLoadFailure;

/// Extensions tried, in order, after the recorded one.
pub(crate) const FALLBACK_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// A photo that loaded successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadedPhoto {
    /// The candidate path that succeeded.
    pub(crate) path: String,
    pub(crate) mime_type: String,
    pub(crate) size: u64,
}

/// Somewhere photos can be loaded from.
pub(crate) trait PhotoSource {
    fn load(&self, path: &str) -> io::Result<LoadedPhoto>;
}

/// Loads photos from a directory on the local filesystem.
///
/// A file only counts as loaded if its content is recognised as an image, so
/// a truncated or mis-named file fails the same way a missing one does.
pub(crate) struct FsPhotoSource {
    root: PathBuf,
}

impl FsPhotoSource {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PhotoSource for FsPhotoSource {
    fn load(&self, path: &str) -> io::Result<LoadedPhoto> {
        let full_path = self.root.join(path);
        let bytes = fs::read(&full_path)?;

        let kind = infer::get(&bytes)
            .filter(|k| k.matcher_type() == infer::MatcherType::Image)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} is not a recognised image", full_path.display()),
                )
            })?;

        Ok(LoadedPhoto {
            path: path.to_string(),
            mime_type: kind.mime_type().to_string(),
            size: bytes.len() as u64,
        })
    }
}

/// Splits a path into its base name and recognised image extension.
fn split_image_extension(path: &str) -> (&str, Option<&str>) {
    let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) else {
        return (path, None);
    };

    if FALLBACK_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
    {
        (&path[..path.len() - ext.len() - 1], Some(ext))
    } else {
        (path, None)
    }
}

/// Lists the paths to try for a recorded photo path, in order.
///
/// The recorded path always comes first, followed by the base name with each
/// of the [`FALLBACK_EXTENSIONS`] other than the recorded one.
pub(crate) fn candidate_paths(recorded: &str) -> Vec<String> {
    let (base, recorded_ext) = split_image_extension(recorded);

    let mut candidates = vec![recorded.to_string()];
    candidates.extend(
        FALLBACK_EXTENSIONS
            .iter()
            .filter(|ext| !recorded_ext.is_some_and(|r| r.eq_ignore_ascii_case(ext)))
            .map(|ext| format!("{base}.{ext}")),
    );

    candidates
}

/// Tries each candidate for `recorded` in turn, stopping at the first that
/// loads.
///
/// # Errors
///
/// Returns an [`ImageLoadFailure`] listing every attempted path if none of
/// them loaded.
pub(crate) fn resolve(
    source: &dyn PhotoSource,
    recorded: &str,
) -> Result<LoadedPhoto, ImageLoadFailure> {
    let mut attempted = Vec::new();

    for candidate in candidate_paths(recorded) {
        debug!("Trying to load: {}", candidate);
        match source.load(&candidate) {
            Ok(photo) => {
                debug!("Successfully loaded: {}", candidate);
                return Ok(photo);
            }
            Err(e) => {
                debug!("Failed to load {}: {}", candidate, e);
                attempted.push(candidate);
            }
        }
    }

    warn!("Failed to load image after trying: {:?}", attempted);

    Err(ImageLoadFailure {
        path: recorded.to_string(),
        attempted,
    })
}
