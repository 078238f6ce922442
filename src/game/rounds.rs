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

//! Round selection and answer option generation.
//!
//! Both algorithms take the random number generator as a parameter so that
//! tests can drive them with a seeded generator.

use std::collections::HashSet;

use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};
use tracing::{debug, warn};

use crate::{error::QuizError, model::PhotoRecord};

/// Number of options presented each round, including the correct year.
pub(crate) const OPTION_COUNT: usize = 4;

/// Inclusive range of offsets used to derive wrong answers from the correct
/// year. Zero is never used as an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OffsetRange {
    pub(crate) min: i32,
    pub(crate) max: i32,
}

impl Default for OffsetRange {
    fn default() -> Self {
        Self { min: -3, max: 2 }
    }
}

impl OffsetRange {
    fn offsets(&self) -> Vec<i32> {
        (self.min..=self.max).collect()
    }

    /// Fails if the range cannot supply enough distinct non-zero offsets.
    pub(crate) fn validate(&self) -> Result<(), QuizError> {
        let usable = (self.min..=self.max).filter(|&o| o != 0).count();
        if usable < OPTION_COUNT - 1 {
            return Err(QuizError::OffsetRange {
                min: self.min,
                max: self.max,
            });
        }

        Ok(())
    }
}

/// Picks up to `rounds` photos for a game, preferring distinct years.
///
/// The pool is shuffled and walked once collecting photos with unused years.
/// If the pool has too few distinct years the remaining slots are filled
/// from the same shuffled order with any photo not already picked. The
/// result is shuffled again so the presentation order carries no trace of the
/// selection order.
///
/// A pool smaller than `rounds` yields every photo it has; checking that
/// enough photos exist is the caller's job.
pub(crate) fn select_rounds<R: Rng + ?Sized>(
    pool: &[PhotoRecord],
    rounds: usize,
    rng: &mut R,
) -> Vec<PhotoRecord> {
    let mut order: Vec<&PhotoRecord> = pool.iter().collect();
    order.shuffle(rng);

    let mut selected: Vec<&PhotoRecord> = Vec::with_capacity(rounds);
    let mut used_years = HashSet::new();
    let mut used_paths = HashSet::new();

    for &photo in &order {
        if selected.len() == rounds {
            break;
        }
        if !used_years.contains(&photo.year) && !used_paths.contains(photo.path.as_str()) {
            used_years.insert(photo.year);
            used_paths.insert(photo.path.as_str());
            selected.push(photo);
        }
    }

    if selected.len() < rounds {
        warn!(
            "Only found {} unique years, filling with additional photos",
            selected.len()
        );
        for &photo in &order {
            if selected.len() == rounds {
                break;
            }
            if used_paths.insert(photo.path.as_str()) {
                selected.push(photo);
            }
        }
    }

    selected.shuffle(rng);

    debug!(
        "Selected photos: {:?}",
        selected
            .iter()
            .map(|p| format!("{} ({})", p.path, p.year))
            .collect::<Vec<_>>()
    );

    selected.into_iter().cloned().collect()
}

/// Generates the shuffled answer options for a round.
///
/// Offsets are drawn at random from `range` until three distinct non-zero
/// offsets have been found, so every option is distinct and the correct year
/// appears exactly once. Offsets that would overflow `i32` are never drawn.
///
/// # Errors
///
/// Returns [`QuizError::OffsetRange`] if `range` has fewer than three
/// non-zero offsets, which would otherwise never terminate, and
/// [`QuizError::YearOutOfRange`] if too few of them can be added to
/// `correct_year` without overflowing.
pub(crate) fn generate_options<R: Rng + ?Sized>(
    correct_year: i32,
    range: &OffsetRange,
    rng: &mut R,
) -> Result<[i32; OPTION_COUNT], QuizError> {
    range.validate()?;

    // Years reachable from the correct one by a usable non-zero offset.
    let candidates: Vec<i32> = range
        .offsets()
        .into_iter()
        .filter(|&offset| offset != 0)
        .filter_map(|offset| correct_year.checked_add(offset))
        .collect();
    if candidates.len() < OPTION_COUNT - 1 {
        return Err(QuizError::YearOutOfRange(correct_year));
    }

    let mut options = [correct_year; OPTION_COUNT];
    let mut found = 1;

    while found < OPTION_COUNT {
        let Some(&year) = candidates.choose(rng) else {
            break;
        };
        if !options[..found].contains(&year) {
            options[found] = year;
            found += 1;
        }
    }

    options.shuffle(rng);

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn photo(path: &str, year: i32) -> PhotoRecord {
        PhotoRecord::new(path, year, "caption")
    }

    fn distinct_year_pool() -> Vec<PhotoRecord> {
        (0..12)
            .map(|i| photo(&format!("p{i}.jpg"), 2000 + (i % 8)))
            .collect()
    }

    #[test]
    fn selects_five_distinct_years_when_available() {
        let pool = distinct_year_pool();

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = select_rounds(&pool, 5, &mut rng);

            assert_eq!(selected.len(), 5);
            let years: HashSet<i32> = selected.iter().map(|p| p.year).collect();
            assert_eq!(years.len(), 5, "seed {seed}");
        }
    }

    #[test]
    fn fills_with_duplicate_years_without_repeating_paths() {
        let pool = vec![
            photo("a.jpg", 2001),
            photo("b.jpg", 2001),
            photo("c.jpg", 2002),
            photo("d.jpg", 2002),
            photo("e.jpg", 2001),
            photo("f.jpg", 2003),
        ];

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = select_rounds(&pool, 5, &mut rng);

            assert_eq!(selected.len(), 5);
            let paths: HashSet<&str> = selected.iter().map(|p| p.path.as_str()).collect();
            assert_eq!(paths.len(), 5, "seed {seed}");
            let years: HashSet<i32> = selected.iter().map(|p| p.year).collect();
            assert_eq!(years.len(), 3, "every distinct year is used first");
        }
    }

    #[test]
    fn small_pool_returns_everything_it_has() {
        let pool = vec![photo("a.jpg", 2001), photo("b.jpg", 2001)];
        let mut rng = StdRng::seed_from_u64(7);

        let selected = select_rounds(&pool, 5, &mut rng);

        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn duplicate_paths_in_pool_are_never_selected_twice() {
        let pool = vec![
            photo("a.jpg", 2001),
            photo("a.jpg", 2002),
            photo("b.jpg", 2003),
            photo("c.jpg", 2004),
            photo("d.jpg", 2005),
            photo("e.jpg", 2006),
        ];

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = select_rounds(&pool, 5, &mut rng);
            let paths: HashSet<&str> = selected.iter().map(|p| p.path.as_str()).collect();
            assert_eq!(paths.len(), 5);
        }
    }

    #[test]
    fn options_are_four_distinct_years_near_the_answer() {
        let range = OffsetRange::default();

        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let correct = 2000 + (seed as i32 % 60);
            let options = generate_options(correct, &range, &mut rng).unwrap();

            let distinct: HashSet<i32> = options.iter().copied().collect();
            assert_eq!(distinct.len(), 4);
            assert!(options.contains(&correct));
            for option in options.iter().filter(|&&o| o != correct) {
                let offset = option - correct;
                assert!((-3..=2).contains(&offset) && offset != 0, "offset {offset}");
            }
        }
    }

    #[test]
    fn correct_answer_position_varies() {
        let range = OffsetRange::default();
        let mut rng = StdRng::seed_from_u64(42);

        let positions: HashSet<usize> = (0..100)
            .map(|_| {
                let options = generate_options(2010, &range, &mut rng).unwrap();
                options.iter().position(|&o| o == 2010).unwrap()
            })
            .collect();

        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn years_at_the_top_of_the_range_do_not_overflow() {
        let range = OffsetRange::default();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let options = generate_options(i32::MAX, &range, &mut rng).unwrap();

            let mut sorted = options;
            sorted.sort_unstable();
            assert_eq!(sorted, [i32::MAX - 3, i32::MAX - 2, i32::MAX - 1, i32::MAX]);
        }

        let upward = OffsetRange { min: 0, max: 4 };
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(
                generate_options(i32::MAX - 2, &upward, &mut rng),
                Err(QuizError::YearOutOfRange(i32::MAX - 2))
            );
        }
    }

    #[test]
    fn narrow_offset_range_is_rejected() {
        let range = OffsetRange { min: -1, max: 1 };
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            generate_options(2010, &range, &mut rng),
            Err(QuizError::OffsetRange { min: -1, max: 1 })
        );
    }

    #[test]
    fn exact_offset_range_uses_every_offset() {
        let range = OffsetRange { min: 0, max: 3 };
        let mut rng = StdRng::seed_from_u64(3);

        let mut options = generate_options(2010, &range, &mut rng).unwrap();
        options.sort();

        assert_eq!(options, [2010, 2011, 2012, 2013]);
    }
}
