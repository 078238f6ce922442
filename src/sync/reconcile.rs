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

//! Merging scanned file names into a curated listing.
//!
//! Years and captions in an existing listing are edited by hand, so neither
//! strategy here ever replaces a value carried by an existing record. New
//! files get a year detected from their name (or the placeholder) and the
//! default caption.

use std::collections::BTreeSet;

use crate::model::{Listing, PhotoRecord};

/// File name suffixes recognised as photos, compared case-insensitively.
///
/// `.mp.jpg` is the suffix of "motion photo" stills.
pub(crate) const IMAGE_SUFFIXES: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".mp.jpg"];

/// The result of merging a scan into a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reconciliation {
    pub(crate) listing: Listing,
    pub(crate) added: Vec<String>,
    pub(crate) removed: Vec<String>,
}

impl Reconciliation {
    pub(crate) fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub(crate) fn is_image_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Finds the first year between 2000 and 2099 written in a file name.
///
/// Any run of four characters `20dd` counts, even inside a longer number, so
/// `IMG_20190704.jpg` yields 2019.
pub(crate) fn extract_year(name: &str) -> Option<i32> {
    name.as_bytes().windows(4).find_map(|w| match w {
        [b'2', b'0', d1, d2] if d1.is_ascii_digit() && d2.is_ascii_digit() => {
            Some(2000 + i32::from(d1 - b'0') * 10 + i32::from(d2 - b'0'))
        }
        _ => None,
    })
}

/// The image files in a scan, de-duplicated and sorted.
fn sorted_images<S: AsRef<str>>(scanned: &[S]) -> BTreeSet<&str> {
    scanned
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| is_image_file(name))
        .collect()
}

/// Rebuilds the listing so that it mirrors the scanned files.
///
/// The result is sorted by path. Records for files that are still present
/// are carried over unchanged, files that are new get a fresh record, and
/// records for files that are gone are dropped.
///
/// Reconciling the result again against the same scan returns it unchanged.
pub(crate) fn reconcile<S: AsRef<str>>(scanned: &[S], previous: &Listing) -> Reconciliation {
    let images = sorted_images(scanned);

    let mut added = vec![];
    let listing: Listing = images
        .iter()
        .map(|&name| match previous.get(name) {
            Some(existing) => existing.clone(),
            None => {
                added.push(name.to_string());
                PhotoRecord::discovered(name, extract_year(name))
            }
        })
        .collect();

    let removed = previous
        .paths()
        .filter(|path| !listing.contains(path))
        .map(str::to_string)
        .collect();

    Reconciliation {
        listing,
        added,
        removed,
    }
}

/// Appends records for new files only.
///
/// Existing records keep their position, and records for missing files are
/// kept, so this never rewrites anything already in the listing. New files
/// are appended in sorted order.
pub(crate) fn merge_new<S: AsRef<str>>(scanned: &[S], previous: &Listing) -> Reconciliation {
    let mut listing = previous.clone();
    let mut added = vec![];

    for name in sorted_images(scanned) {
        if listing.push(PhotoRecord::discovered(name, extract_year(name))) {
            added.push(name.to_string());
        }
    }

    Reconciliation {
        listing,
        added,
        removed: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_CAPTION, PLACEHOLDER_YEAR};

    fn listing(records: &[(&str, i32, &str)]) -> Listing {
        records
            .iter()
            .map(|&(p, y, c)| PhotoRecord::new(p, y, c))
            .collect()
    }

    #[test]
    fn recognises_image_suffixes_in_any_case() {
        assert!(is_image_file("a.jpg"));
        assert!(is_image_file("B.JPEG"));
        assert!(is_image_file("c.Png"));
        assert!(is_image_file("d.gif"));
        assert!(is_image_file("e.WEBP"));
        assert!(is_image_file("PXL_2023.MP.jpg"));

        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("clip.mp4"));
        assert!(!is_image_file("jpg"));
        assert!(!is_image_file(".DS_Store"));
    }

    #[test]
    fn extracts_first_year_in_range() {
        assert_eq!(extract_year("b_2021.png"), Some(2021));
        assert_eq!(extract_year("IMG_20190704_120000.jpg"), Some(2019));
        assert_eq!(extract_year("1999_then_2005.jpg"), Some(2005));
        assert_eq!(extract_year("x12024.jpg"), Some(2024));
        assert_eq!(extract_year("1999.jpg"), None);
        assert_eq!(extract_year("beach.jpg"), None);
        assert_eq!(extract_year("20a1.jpg"), None);
    }

    #[test]
    fn merges_scan_with_curated_listing() {
        let previous = listing(&[("a.jpg", 2019, "Beach")]);

        let result = reconcile(&["a.jpg", "b_2021.png"], &previous);

        assert_eq!(
            result.listing.records(),
            [
                PhotoRecord::new("a.jpg", 2019, "Beach"),
                PhotoRecord::new("b_2021.png", 2021, "Your caption here."),
            ]
        );
        assert_eq!(result.added, ["b_2021.png"]);
        assert!(result.removed.is_empty());
    }

    #[test]
    fn curated_values_are_never_overwritten() {
        // The name suggests 2018 but a human said 2015.
        let previous = listing(&[("trip_2018.jpg", 2015, "Actually 2015"), ("z.png", 2020, "Placeholder")]);

        let result = reconcile(&["z.png", "trip_2018.jpg"], &previous);

        assert_eq!(result.listing.get("trip_2018.jpg").unwrap().year, 2015);
        assert_eq!(result.listing.get("trip_2018.jpg").unwrap().caption, "Actually 2015");
        assert_eq!(result.listing.get("z.png").unwrap().caption, "Placeholder");
        assert!(result.is_unchanged());
    }

    #[test]
    fn deleted_files_are_dropped() {
        let previous = listing(&[("a.jpg", 2019, "Beach"), ("gone.jpg", 2003, "Old")]);

        let result = reconcile(&["a.jpg"], &previous);

        assert!(!result.listing.contains("gone.jpg"));
        assert_eq!(result.removed, ["gone.jpg"]);
    }

    #[test]
    fn output_is_sorted_filtered_and_unique() {
        let scan = ["c.jpg", "notes.txt", "a.png", "b.gif", "a.png"];

        let result = reconcile(&scan, &Listing::new());

        assert_eq!(result.listing.paths().collect::<Vec<_>>(), ["a.png", "b.gif", "c.jpg"]);
        let c = result.listing.get("c.jpg").unwrap();
        assert_eq!(c.year, PLACEHOLDER_YEAR);
        assert_eq!(c.caption, DEFAULT_CAPTION);
    }

    #[test]
    fn reconciling_twice_changes_nothing() {
        let previous = listing(&[("m.jpg", 2011, "Mountains"), ("old.png", 2001, "Gone")]);
        let scan = ["x_2022.webp", "m.jpg", "k.gif"];

        let once = reconcile(&scan, &previous);
        let twice = reconcile(&scan, &once.listing);

        assert_eq!(once.listing, twice.listing);
        assert!(twice.is_unchanged());
    }

    #[test]
    fn merge_new_only_appends() {
        let previous = listing(&[("z.jpg", 2001, "Zed"), ("gone.jpg", 2002, "Gone")]);

        let result = merge_new(&["z.jpg", "b_2012.png", "a.jpg", "readme.md"], &previous);

        assert_eq!(
            result.listing.paths().collect::<Vec<_>>(),
            ["z.jpg", "gone.jpg", "a.jpg", "b_2012.png"]
        );
        assert_eq!(result.listing.get("z.jpg").unwrap().caption, "Zed");
        assert_eq!(result.listing.get("b_2012.png").unwrap().year, 2012);
        assert_eq!(result.added, ["a.jpg", "b_2012.png"]);
        assert!(result.removed.is_empty());

        let again = merge_new(&["z.jpg", "b_2012.png", "a.jpg"], &result.listing);
        assert!(again.is_unchanged());
        assert_eq!(again.listing, result.listing);
    }
}
