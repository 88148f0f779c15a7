use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::facing::FacingCounts;

pub type Magnitude = u32;

/// Repeat magnitude -> number of team pairings repeated that many times.
///
/// Each unordered pair is tallied once from either team's side, so every
/// count is twice the number of pairs. Profiles compared against each other
/// all carry the same doubling.
///
/// Profiles order from least to most bad: the profile whose largest repeats
/// are smaller wins outright, and only with identical magnitudes do the
/// counts matter, again from the largest magnitude down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreProfile(BTreeMap<Magnitude, u64>);

impl ScoreProfile {
    pub fn worst(&self) -> Option<Magnitude> {
        self.0.keys().next_back().copied()
    }

    fn record(&mut self, magnitude: Magnitude) {
        *self.0.entry(magnitude).or_insert(0) += 1;
    }

    /// Magnitudes from the top, then their counts in the same order.
    fn key(&self) -> (Vec<Magnitude>, Vec<u64>) {
        self.0.iter().rev().map(|(magnitude, count)| (*magnitude, *count)).unzip()
    }
}

impl FromIterator<(Magnitude, u64)> for ScoreProfile {
    fn from_iter<I: IntoIterator<Item = (Magnitude, u64)>>(iter: I) -> Self {
        ScoreProfile(iter.into_iter().filter(|(_, count)| *count > 0).collect())
    }
}

impl Ord for ScoreProfile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for ScoreProfile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ScoreProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0.iter().rev().map(|(magnitude, count)| format!("{magnitude}: {count}")).join(", ")
        )
    }
}

/// `Less` when `x` is the less bad profile.
pub fn scoring_cmp(x: &ScoreProfile, y: &ScoreProfile) -> Ordering {
    x.cmp(y)
}

/// Tallies every non-zero facing count between two different teams.
pub fn score(table: &FacingCounts) -> ScoreProfile {
    let mut profile = ScoreProfile::default();
    for (team, opponents) in table.opponents() {
        for (opponent, times) in opponents {
            if opponent == team || *times <= 0 {
                continue;
            }
            profile.record(*times as Magnitude);
        }
    }
    profile
}
