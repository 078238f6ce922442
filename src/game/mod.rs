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

//! The quiz engine.
//!
//! A game is a sequence of rounds, each showing one photo and four candidate
//! years. The whole state of a play session lives in a [`GameState`] value;
//! every player action is a transition that takes the current state by
//! reference and returns the next one, leaving the original untouched if
//! the action is not allowed.
//!
//! # Lifecycle
//!
//! ```text
//! NotStarted -> RoundActive -> RoundResolved -> RoundActive ... -> Finished
//! ```
//!
//! Photo loading happens outside the engine. A round starts with its photo
//! [`PhotoStatus::Loading`]; the UI reports the outcome with
//! [`GameState::photo_loaded`] or [`GameState::photo_failed`], and answers
//! are only accepted once the photo is ready.

pub(crate) mod photo;
pub(crate) mod rounds;

use rand::Rng;
use tracing::info;

use crate::{
    error::{ImageLoadFailure, QuizError},
    game::{
        photo::LoadedPhoto,
        rounds::{OPTION_COUNT, OffsetRange, generate_options, select_rounds},
    },
    model::PhotoRecord,
};

/// Number of rounds in a full game.
pub(crate) const TOTAL_ROUNDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    NotStarted,
    RoundActive,
    RoundResolved,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PhotoStatus {
    Loading,
    Ready(LoadedPhoto),
    Failed(ImageLoadFailure),
}

/// Outcome of a resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Answer {
    /// The year chosen, or `None` if the round was skipped.
    pub(crate) selected: Option<i32>,
    pub(crate) correct: bool,
}

/// Settings that shape a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GameSettings {
    pub(crate) offsets: OffsetRange,
    /// Play with fewer rounds when the pool has fewer photos than a full
    /// game needs.
    pub(crate) allow_short_game: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            offsets: OffsetRange::default(),
            allow_short_game: false,
        }
    }
}

/// The state of a single play session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GameState {
    phase: Phase,
    round_index: usize,
    score: usize,
    selected_photos: Vec<PhotoRecord>,
    options: [i32; OPTION_COUNT],
    photo: PhotoStatus,
    answer: Option<Answer>,
    offsets: OffsetRange,
}

/// Everything the UI needs to draw the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoundView<'a> {
    /// 1-based round number.
    pub(crate) number: usize,
    pub(crate) total: usize,
    pub(crate) score: usize,
    pub(crate) photo: &'a PhotoRecord,
    pub(crate) status: &'a PhotoStatus,
    pub(crate) options: &'a [i32],
    pub(crate) answer: Option<Answer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SummaryTier {
    Top,
    Mid,
    Low,
}

/// The final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) score: usize,
    pub(crate) total: usize,
    pub(crate) tier: SummaryTier,
}

impl Summary {
    /// Summarises a full game's score.
    pub(crate) fn for_score(score: usize) -> Self {
        Self::for_score_out_of(score, TOTAL_ROUNDS)
    }

    /// Summarises a score out of `total` rounds.
    ///
    /// A perfect score is the top tier, at least 60% of the rounds is the
    /// middle tier (3 or 4 out of 5), anything less is the low tier.
    pub(crate) fn for_score_out_of(score: usize, total: usize) -> Self {
        let tier = if score >= total {
            SummaryTier::Top
        } else if score * 5 >= total * 3 {
            SummaryTier::Mid
        } else {
            SummaryTier::Low
        };

        Self { score, total, tier }
    }

    pub(crate) fn message(&self) -> &'static str {
        match self.tier {
            SummaryTier::Top => "Photographic memory",
            SummaryTier::Mid => "Pretty impressive",
            SummaryTier::Low => "Time flies, huh?",
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A state that has not started a game.
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::NotStarted,
            round_index: 0,
            score: 0,
            selected_photos: vec![],
            options: [0; OPTION_COUNT],
            photo: PhotoStatus::Loading,
            answer: None,
            offsets: OffsetRange::default(),
        }
    }

    /// Starts a new game from `pool`, discarding any game in progress.
    ///
    /// This is also "play again".
    ///
    /// # Errors
    ///
    /// * [`QuizError::InsufficientData`] if the pool has fewer photos than a
    ///   full game and short games are not allowed, or the pool is empty.
    /// * [`QuizError::OffsetRange`] if the configured offsets are unusable.
    pub(crate) fn start_game<R: Rng + ?Sized>(
        pool: &[PhotoRecord],
        settings: &GameSettings,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        settings.offsets.validate()?;

        if pool.is_empty() || (pool.len() < TOTAL_ROUNDS && !settings.allow_short_game) {
            return Err(QuizError::InsufficientData {
                available: pool.len(),
                required: TOTAL_ROUNDS,
            });
        }

        let selected_photos = select_rounds(pool, TOTAL_ROUNDS, rng);

        let options = generate_options(selected_photos[0].year, &settings.offsets, rng)?;

        info!("Starting game with {} rounds", selected_photos.len());

        Ok(Self {
            phase: Phase::RoundActive,
            round_index: 0,
            score: 0,
            selected_photos,
            options,
            photo: PhotoStatus::Loading,
            answer: None,
            offsets: settings.offsets,
        })
    }

    /// Resolves the current round with the player's choice.
    ///
    /// The score increases only if `year` is the photo's year.
    pub(crate) fn submit_answer(&self, year: i32) -> Result<Self, QuizError> {
        self.expect_phase(Phase::RoundActive, "answer")?;

        if !matches!(self.photo, PhotoStatus::Ready(_)) {
            return Err(QuizError::PhotoNotReady);
        }
        if !self.options.contains(&year) {
            return Err(QuizError::UnknownOption(year));
        }

        let correct = year == self.current_photo().year;

        Ok(Self {
            phase: Phase::RoundResolved,
            score: self.score + usize::from(correct),
            answer: Some(Answer {
                selected: Some(year),
                correct,
            }),
            ..self.clone()
        })
    }

    /// Gives up on a round whose photo could not be loaded, scoring it as a
    /// miss.
    pub(crate) fn skip_round(&self) -> Result<Self, QuizError> {
        self.expect_phase(Phase::RoundActive, "skip")?;

        if !matches!(self.photo, PhotoStatus::Failed(_)) {
            return Err(QuizError::InvalidTransition {
                action: "skip a loadable round",
                phase: self.phase,
            });
        }

        Ok(Self {
            phase: Phase::RoundResolved,
            answer: Some(Answer {
                selected: None,
                correct: false,
            }),
            ..self.clone()
        })
    }

    /// Moves on from a resolved round to the next one, or to the end of the
    /// game after the last round.
    pub(crate) fn advance_round<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self, QuizError> {
        self.expect_phase(Phase::RoundResolved, "advance")?;

        let round_index = self.round_index + 1;

        if round_index >= self.total_rounds() {
            info!("Game finished with score {}/{}", self.score, self.total_rounds());
            return Ok(Self {
                phase: Phase::Finished,
                ..self.clone()
            });
        }

        let year = self.selected_photos[round_index].year;
        let options = generate_options(year, &self.offsets, rng)?;

        Ok(Self {
            phase: Phase::RoundActive,
            round_index,
            options,
            photo: PhotoStatus::Loading,
            answer: None,
            ..self.clone()
        })
    }

    /// Records that the current round's photo loaded.
    pub(crate) fn photo_loaded(&self, photo: LoadedPhoto) -> Result<Self, QuizError> {
        self.expect_phase(Phase::RoundActive, "load a photo")?;

        Ok(Self {
            photo: PhotoStatus::Ready(photo),
            ..self.clone()
        })
    }

    /// Records that the current round's photo could not be loaded.
    pub(crate) fn photo_failed(&self, failure: ImageLoadFailure) -> Result<Self, QuizError> {
        self.expect_phase(Phase::RoundActive, "fail a photo")?;

        Ok(Self {
            photo: PhotoStatus::Failed(failure),
            ..self.clone()
        })
    }

    /// Puts a failed photo back into the loading state so it can be tried
    /// again.
    pub(crate) fn retry_photo(&self) -> Result<Self, QuizError> {
        self.expect_phase(Phase::RoundActive, "retry a photo")?;

        Ok(Self {
            photo: PhotoStatus::Loading,
            ..self.clone()
        })
    }

    /// The view of the round in play, if a round is active or resolved.
    pub(crate) fn current_round_view(&self) -> Option<RoundView<'_>> {
        if !matches!(self.phase, Phase::RoundActive | Phase::RoundResolved) {
            return None;
        }

        Some(RoundView {
            number: self.round_index + 1,
            total: self.total_rounds(),
            score: self.score,
            photo: self.current_photo(),
            status: &self.photo,
            options: &self.options,
            answer: self.answer,
        })
    }

    /// The final result, once the game has finished.
    pub(crate) fn final_summary(&self) -> Option<Summary> {
        if self.phase != Phase::Finished {
            return None;
        }

        let total = self.total_rounds();
        Some(if total == TOTAL_ROUNDS {
            Summary::for_score(self.score)
        } else {
            Summary::for_score_out_of(self.score, total)
        })
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn round_index(&self) -> usize {
        self.round_index
    }

    pub(crate) fn score(&self) -> usize {
        self.score
    }

    pub(crate) fn total_rounds(&self) -> usize {
        self.selected_photos.len()
    }

    pub(crate) fn current_photo(&self) -> &PhotoRecord {
        &self.selected_photos[self.round_index]
    }

    fn expect_phase(&self, phase: Phase, action: &'static str) -> Result<(), QuizError> {
        if self.phase != phase {
            return Err(QuizError::InvalidTransition {
                action,
                phase: self.phase,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn pool() -> Vec<PhotoRecord> {
        (0..8)
            .map(|i| PhotoRecord::new(format!("p{i}.jpg"), 2010 + i, format!("Caption {i}")))
            .collect()
    }

    fn loaded(state: &GameState) -> GameState {
        let photo = LoadedPhoto {
            path: state.current_photo().path.clone(),
            mime_type: "image/jpeg".into(),
            size: 10,
        };
        state.photo_loaded(photo).unwrap()
    }

    fn wrong_option(state: &GameState) -> i32 {
        let correct = state.current_photo().year;
        *state
            .current_round_view()
            .unwrap()
            .options
            .iter()
            .find(|&&o| o != correct)
            .unwrap()
    }

    #[test]
    fn start_game_enters_the_first_round() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = GameState::start_game(&pool(), &GameSettings::default(), &mut rng).unwrap();

        assert_eq!(state.phase(), Phase::RoundActive);
        assert_eq!(state.round_index(), 0);
        assert_eq!(state.score(), 0);
        assert_eq!(state.total_rounds(), TOTAL_ROUNDS);

        let view = state.current_round_view().unwrap();
        assert_eq!(view.number, 1);
        assert_eq!(*view.status, PhotoStatus::Loading);
        assert!(view.options.contains(&view.photo.year));
    }

    #[test]
    fn mixed_answers_give_a_mid_tier_summary() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = GameState::start_game(&pool(), &GameSettings::default(), &mut rng).unwrap();

        for round in 1..=TOTAL_ROUNDS {
            state = loaded(&state);
            let year = if round % 2 == 1 {
                state.current_photo().year
            } else {
                wrong_option(&state)
            };
            state = state.submit_answer(year).unwrap();
            assert_eq!(state.current_round_view().unwrap().answer.unwrap().correct, round % 2 == 1);
            state = state.advance_round(&mut rng).unwrap();
        }

        assert_eq!(state.phase(), Phase::Finished);
        let summary = state.final_summary().unwrap();
        assert_eq!(summary.score, 3);
        assert_eq!(summary.tier, SummaryTier::Mid);
        assert_eq!(summary.message(), "Pretty impressive");
        assert_eq!(summary, Summary::for_score(3));
        assert!(state.current_round_view().is_none());
    }

    #[test]
    fn short_game_summary_is_out_of_its_own_rounds() {
        let small: Vec<PhotoRecord> = pool().into_iter().take(3).collect();
        let settings = GameSettings {
            allow_short_game: true,
            ..GameSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = GameState::start_game(&small, &settings, &mut rng).unwrap();

        while state.phase() != Phase::Finished {
            state = loaded(&state);
            let year = state.current_photo().year;
            state = state.submit_answer(year).unwrap().advance_round(&mut rng).unwrap();
        }

        let summary = state.final_summary().unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.tier, SummaryTier::Top);
        assert_ne!(summary, Summary::for_score(3));
    }

    #[test]
    fn summary_depends_only_on_score() {
        assert_eq!(Summary::for_score(5).message(), "Photographic memory");
        assert_eq!(Summary::for_score(4).tier, SummaryTier::Mid);
        assert_eq!(Summary::for_score(3).tier, SummaryTier::Mid);
        assert_eq!(Summary::for_score(2).message(), "Time flies, huh?");
        assert_eq!(Summary::for_score(0).tier, SummaryTier::Low);
    }

    #[test]
    fn small_pool_is_insufficient_unless_allowed() {
        let small: Vec<PhotoRecord> = pool().into_iter().take(3).collect();
        let mut rng = StdRng::seed_from_u64(2);

        let err = GameState::start_game(&small, &GameSettings::default(), &mut rng).unwrap_err();
        assert_eq!(
            err,
            QuizError::InsufficientData {
                available: 3,
                required: TOTAL_ROUNDS
            }
        );

        let settings = GameSettings {
            allow_short_game: true,
            ..GameSettings::default()
        };
        let state = GameState::start_game(&small, &settings, &mut rng).unwrap();
        assert_eq!(state.total_rounds(), 3);

        assert!(matches!(
            GameState::start_game(&[], &settings, &mut rng),
            Err(QuizError::InsufficientData { available: 0, .. })
        ));
    }

    #[test]
    fn answers_wait_for_the_photo() {
        let mut rng = StdRng::seed_from_u64(3);
        let state = GameState::start_game(&pool(), &GameSettings::default(), &mut rng).unwrap();
        let year = state.current_photo().year;

        assert_eq!(state.submit_answer(year), Err(QuizError::PhotoNotReady));

        let state = loaded(&state);
        assert_eq!(state.submit_answer(1850), Err(QuizError::UnknownOption(1850)));
        assert_eq!(state.submit_answer(year).unwrap().score(), 1);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let idle = GameState::new();

        assert!(matches!(
            idle.submit_answer(2010),
            Err(QuizError::InvalidTransition { phase: Phase::NotStarted, .. })
        ));
        assert!(idle.advance_round(&mut rng).is_err());
        assert!(idle.final_summary().is_none());

        let state = GameState::start_game(&pool(), &GameSettings::default(), &mut rng).unwrap();
        assert!(matches!(
            state.advance_round(&mut rng),
            Err(QuizError::InvalidTransition { phase: Phase::RoundActive, .. })
        ));

        let state = loaded(&state);
        let resolved = state.submit_answer(state.current_photo().year).unwrap();
        assert!(resolved.submit_answer(state.current_photo().year).is_err());
    }

    #[test]
    fn failed_photo_can_be_retried_or_skipped() {
        let mut rng = StdRng::seed_from_u64(5);
        let state = GameState::start_game(&pool(), &GameSettings::default(), &mut rng).unwrap();
        let failure = ImageLoadFailure {
            path: state.current_photo().path.clone(),
            attempted: vec!["p.jpg".into(), "p.jpeg".into()],
        };

        assert!(state.skip_round().is_err());

        let failed = state.photo_failed(failure.clone()).unwrap();
        assert_eq!(
            *failed.current_round_view().unwrap().status,
            PhotoStatus::Failed(failure)
        );

        let retried = failed.retry_photo().unwrap();
        assert_eq!(*retried.current_round_view().unwrap().status, PhotoStatus::Loading);

        let skipped = failed.skip_round().unwrap();
        assert_eq!(skipped.phase(), Phase::RoundResolved);
        assert_eq!(skipped.score(), 0);
        assert_eq!(
            skipped.current_round_view().unwrap().answer,
            Some(Answer {
                selected: None,
                correct: false
            })
        );

        let next = skipped.advance_round(&mut rng).unwrap();
        assert_eq!(next.round_index(), 1);
        assert_eq!(*next.current_round_view().unwrap().status, PhotoStatus::Loading);
    }

    #[test]
    fn play_again_resets_the_game() {
        let mut rng = StdRng::seed_from_u64(6);
        let settings = GameSettings::default();
        let mut state = GameState::start_game(&pool(), &settings, &mut rng).unwrap();

        while state.phase() != Phase::Finished {
            state = loaded(&state);
            state = state.submit_answer(state.current_photo().year).unwrap();
            state = state.advance_round(&mut rng).unwrap();
        }
        assert_eq!(state.final_summary().unwrap().tier, SummaryTier::Top);

        let again = GameState::start_game(&pool(), &settings, &mut rng).unwrap();
        assert_eq!(again.score(), 0);
        assert_eq!(again.round_index(), 0);
        assert_eq!(again.phase(), Phase::RoundActive);
    }
}
