pub mod entity {
    pub type Team = String;
}


pub mod group {
    use std::collections::BTreeSet;
    use std::fmt;

    use itertools::Itertools;

    use super::entity::Team;

    pub const GAME_SIZE: usize = 4;

    /// Four distinct teams playing concurrently. Stored sorted, so two games
    /// built from the same teams in any order compare equal.
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Game {
        teams: [Team; GAME_SIZE],
    }

    impl Game {
        /// Returns `None` unless `teams` holds exactly four distinct teams.
        pub fn new<I>(teams: I) -> Option<Game>
        where
            I: IntoIterator,
            I::Item: Into<Team>,
        {
            let mut teams: Vec<Team> = teams.into_iter().map(Into::into).collect();
            teams.sort();
            teams.dedup();
            let teams: [Team; GAME_SIZE] = teams.try_into().ok()?;
            Some(Game { teams })
        }

        pub fn teams(&self) -> &[Team] {
            &self.teams
        }

        pub fn contains(&self, team: &str) -> bool {
            self.teams.iter().any(|t| t == team)
        }

        pub fn is_disjoint(&self, other: &Game) -> bool {
            !self.teams.iter().any(|t| other.contains(t))
        }
    }

    impl fmt::Display for Game {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "[{}]", self.teams.iter().join(", "))
        }
    }

    /// One schedule row: one or more games played back to back.
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Match {
        pub games: Vec<Game>,
    }

    impl Match {
        pub fn new(games: Vec<Game>) -> Match {
            Match { games }
        }

        pub fn games(&self) -> &[Game] {
            &self.games
        }

        pub fn teams(&self) -> impl Iterator<Item = &Team> + '_ {
            self.games.iter().flat_map(|game| game.teams().iter())
        }

        pub fn team_set(&self) -> BTreeSet<Team> {
            self.teams().cloned().collect()
        }

        /// Order-independent form of the grouping.
        pub fn canonical(&self) -> Match {
            Match { games: self.games.iter().cloned().sorted().collect() }
        }

        pub fn normalised(&self, separator: char) -> String {
            self.teams().join(&separator.to_string())
        }
    }

    impl fmt::Display for Match {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.games.iter().join(" "))
        }
    }

    /// Matches in play order; the index is the match number.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Schedule {
        pub matches: Vec<Match>,
    }

    impl Schedule {
        pub fn len(&self) -> usize {
            self.matches.len()
        }

        pub fn games_of(&self, index: usize) -> &[Game] {
            self.matches.get(index).map(Match::games).unwrap_or_default()
        }

        /// Every team playing in `matches[range]`, clamped to the schedule.
        pub fn teams_in(&self, start: usize, end: usize) -> BTreeSet<Team> {
            let end = end.min(self.matches.len());
            let start = start.min(end);
            self.matches[start..end].iter().flat_map(|m| m.teams()).cloned().collect()
        }
    }
}
