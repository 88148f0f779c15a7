use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::model::entity::Team;
use crate::model::group::{Game, Schedule};

pub type Count = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Add,
    Remove,
}

impl Sign {
    fn delta(self) -> Count {
        match self {
            Sign::Add => 1,
            Sign::Remove => -1,
        }
    }
}

/// How many games each pair of teams has shared. Every ordered pair is
/// stored, self pairs included, so `count(a, b) == count(b, a)` always holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacingCounts(HashMap<Team, HashMap<Team, Count>>);

impl FacingCounts {
    pub fn new() -> FacingCounts {
        FacingCounts::default()
    }

    pub fn count(&self, a: &str, b: &str) -> Count {
        self.0.get(a).and_then(|opponents| opponents.get(b)).copied().unwrap_or(0)
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> + '_ {
        self.0.keys()
    }

    pub fn opponents(&self) -> impl Iterator<Item = (&Team, &HashMap<Team, Count>)> + '_ {
        self.0.iter()
    }

    fn bump(&mut self, a: &Team, b: &Team, delta: Count) {
        let Some(opponents) = self.0.get_mut(a) else {
            self.0.entry(a.clone()).or_default().insert(b.clone(), delta);
            return;
        };
        let Some(count) = opponents.get_mut(b) else {
            opponents.insert(b.clone(), delta);
            return;
        };
        *count += delta;
        if *count == 0 {
            opponents.remove(b);
            if opponents.is_empty() {
                self.0.remove(a);
            }
        }
    }

    pub fn apply<'a>(&mut self, games: impl IntoIterator<Item = &'a Game>) {
        accumulate(games, self, Sign::Add)
    }

    pub fn revert<'a>(&mut self, games: impl IntoIterator<Item = &'a Game>) {
        accumulate(games, self, Sign::Remove)
    }

    /// Runs `f` with `games` counted in, then takes them back out. The table
    /// is left exactly as it was found.
    pub fn with_applied<R>(&mut self, games: &[&Game], f: impl FnOnce(&FacingCounts) -> R) -> R {
        self.apply(games.iter().copied());
        let result = f(self);
        self.revert(games.iter().copied());
        result
    }
}

/// Adds `sign` to the count of every ordered pair of teams within each game.
pub fn accumulate<'a>(
    games: impl IntoIterator<Item = &'a Game>,
    table: &mut FacingCounts,
    sign: Sign,
) {
    let delta = sign.delta();
    for game in games {
        for a in game.teams() {
            for b in game.teams() {
                table.bump(a, b, delta);
            }
        }
    }
}

/// Counts every game of every match except those in `excluded`.
pub fn build_background(schedule: &Schedule, excluded: &BTreeSet<usize>) -> FacingCounts {
    let mut table = FacingCounts::new();
    let games = schedule
        .matches
        .iter()
        .enumerate()
        .filter(|(index, _)| !excluded.contains(index))
        .flat_map(|(_, m)| m.games());
    table.apply(games);
    debug!(
        "background built from {} of {} matches, {} teams",
        schedule.len() - excluded.iter().filter(|i| **i < schedule.len()).count(),
        schedule.len(),
        table.0.len()
    );
    table
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{parse, Format};

    const TEXT: &str = "A|B|C|D|E|F|G|H\nA|E|I|J\nB|F|I|K\nA|B|I|J\n";

    #[test]
    fn counts_are_symmetric() {
        let schedule = parse(TEXT, &Format::default()).unwrap();
        let table = build_background(&schedule, &BTreeSet::new());
        let teams: Vec<&Team> = table.teams().collect();
        for a in &teams {
            for b in &teams {
                assert_eq!(table.count(a, b), table.count(b, a));
            }
        }
        assert_eq!(table.count("A", "B"), 2);
        assert_eq!(table.count("A", "J"), 2);
        assert_eq!(table.count("A", "E"), 1);
        assert_eq!(table.count("E", "F"), 1);
        assert_eq!(table.count("C", "K"), 0);
        assert_eq!(table.count("A", "A"), 3);
    }

    #[test]
    fn excluded_matches_are_not_counted() {
        let schedule = parse(TEXT, &Format::default()).unwrap();
        let table = build_background(&schedule, &BTreeSet::from([0, 3]));
        assert_eq!(table.count("A", "B"), 0);
        assert_eq!(table.count("A", "I"), 1);
        assert_eq!(table.count("C", "C"), 0);
    }

    #[test]
    fn apply_then_revert_restores_the_table() {
        let schedule = parse(TEXT, &Format::default()).unwrap();
        let mut table = build_background(&schedule, &BTreeSet::from([1]));
        let before = table.clone();
        let games = [
            Game::new(["A", "B", "Z", "Y"]).unwrap(),
            Game::new(["C", "D", "E", "F"]).unwrap(),
        ];
        table.apply(&games);
        assert_ne!(table, before);
        assert_eq!(table.count("A", "B"), 3);
        assert_eq!(table.count("Z", "Y"), 1);
        table.revert(&games);
        assert_eq!(table, before);
    }

    #[test]
    fn with_applied_is_scoped() {
        let schedule = parse(TEXT, &Format::default()).unwrap();
        let mut table = build_background(&schedule, &BTreeSet::new());
        let before = table.clone();
        let game = Game::new(["A", "B", "C", "D"]).unwrap();
        let seen = table.with_applied(&[&game], |t| t.count("A", "C"));
        assert_eq!(seen, 2);
        assert_eq!(table, before);
    }
}
