use std::collections::BTreeSet;

use itertools::Itertools;
use log::{debug, info, warn};
use thiserror::Error;

use crate::candidate::{match_pairs, unique_games, unique_matches, Candidate, Window};
use crate::facing::{build_background, FacingCounts};
use crate::model::entity::Team;
use crate::model::group::Schedule;
use crate::score::{score, ScoreProfile};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("matches and closeness options are required for multimatch")]
    MissingMultimatchOptions,
    #[error("match {index} does not exist, the schedule has {len} matches")]
    MatchOutOfRange { index: usize, len: usize },
    #[error("match {index} is the last match, there is nothing to pair it with")]
    NoFollowingMatch { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Single,
    /// Regroup the target match together with the next one.
    Multi { round_size: usize, closeness: usize },
}

impl Mode {
    /// Picks the search mode from the command line options. Multimatch
    /// never spans a round boundary; a target at the end of its round falls
    /// back to a single match search.
    pub fn resolve(
        multimatch: bool,
        round_size: usize,
        closeness: usize,
        index: usize,
    ) -> Result<Mode, SearchError> {
        if !multimatch {
            return Ok(Mode::Single);
        }
        if round_size == 0 || closeness == 0 {
            return Err(SearchError::MissingMultimatchOptions);
        }
        if (index + 1) % round_size == 0 {
            warn!("match {index} ends its round, can't multimatch across rounds, searching it alone");
            return Ok(Mode::Single);
        }
        Ok(Mode::Multi { round_size, closeness })
    }

    fn width(&self) -> usize {
        match self {
            Mode::Single => 1,
            Mode::Multi { .. } => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub candidate: Candidate,
    pub profile: ScoreProfile,
}

/// Outcome of a search over a non-empty candidate set.
#[derive(Debug, Clone)]
pub struct Selection {
    pub original: Candidate,
    /// Profile with the target match(es) left as scheduled.
    pub baseline: ScoreProfile,
    /// Every candidate sharing the best profile. The original grouping
    /// comes first when it is among them, the rest follow by their
    /// separator-joined rendering.
    pub winners: Vec<Scored>,
    pub evaluated: usize,
}

impl Selection {
    pub fn best(&self) -> &Scored {
        &self.winners[0]
    }

    pub fn is_improvement(&self) -> bool {
        !self.best().candidate.same_grouping(&self.original)
    }
}

pub struct Search<'a> {
    schedule: &'a Schedule,
    index: usize,
    mode: Mode,
    background: FacingCounts,
    window: Window,
    separator: char,
}

impl<'a> Search<'a> {
    pub fn new(schedule: &'a Schedule, index: usize, mode: Mode) -> Result<Search<'a>, SearchError> {
        if index >= schedule.len() {
            return Err(SearchError::MatchOutOfRange { index, len: schedule.len() });
        }
        let excluded: BTreeSet<usize> = (index..index + mode.width()).collect();
        if excluded.iter().any(|i| *i >= schedule.len()) {
            return Err(SearchError::NoFollowingMatch { index });
        }
        let window = match mode {
            Mode::Single => Window::default(),
            Mode::Multi { closeness, .. } => Window {
                forward: schedule.teams_in(index.saturating_sub(closeness), index),
                after: schedule.teams_in(index + 2, (index + 2).saturating_add(closeness)),
            },
        };
        let background = build_background(schedule, &excluded);
        Ok(Search { schedule, index, mode, background, window, separator: '|' })
    }

    /// Separator used to render candidates when ordering tied winners.
    pub fn separator(mut self, separator: char) -> Search<'a> {
        self.separator = separator;
        self
    }

    /// The target match(es) as currently scheduled.
    pub fn original(&self) -> Candidate {
        let first = self.schedule.matches[self.index].clone();
        match self.mode {
            Mode::Single => Candidate::Single(first),
            Mode::Multi { .. } => Candidate::Pair(first, self.schedule.matches[self.index + 1].clone()),
        }
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        let first = &self.schedule.matches[self.index];
        let candidates = match self.mode {
            Mode::Single => {
                let teams: Vec<Team> = first.teams().cloned().collect();
                unique_matches(&unique_games(&teams), &teams)
                    .into_iter()
                    .map(Candidate::Single)
                    .collect_vec()
            }
            Mode::Multi { .. } => {
                match_pairs(first, &self.schedule.matches[self.index + 1], &self.window)
            }
        };
        debug!("{} candidates for match {}", candidates.len(), self.index);
        candidates
    }

    /// Scores the whole schedule as if `candidate` replaced the target.
    pub fn evaluate(&mut self, candidate: &Candidate) -> ScoreProfile {
        self.background.with_applied(&candidate.games(), score)
    }

    /// Scores every candidate and keeps the least bad. `None` when there is
    /// no valid regrouping at all.
    pub fn select(mut self) -> Option<Selection> {
        let candidates = self.candidates();
        if candidates.is_empty() {
            info!("no valid regrouping of match {}", self.index);
            return None;
        }
        let original = self.original();
        let baseline = self.evaluate(&original);
        let evaluated = candidates.len();
        let scored = candidates
            .into_iter()
            .map(|candidate| {
                let profile = self.evaluate(&candidate);
                Scored { candidate, profile }
            })
            .collect_vec();

        let mut winners = scored.into_iter().min_set_by(|a, b| a.profile.cmp(&b.profile));
        let separator = self.separator;
        winners.sort_by_cached_key(|s| {
            (!s.candidate.same_grouping(&original), s.candidate.normalised(separator))
        });

        let selection = Selection { original, baseline, winners, evaluated };
        info!(
            "evaluated {} candidates, best scored {} against {} as scheduled",
            selection.evaluated,
            selection.best().profile,
            selection.baseline
        );
        Some(selection)
    }
}
