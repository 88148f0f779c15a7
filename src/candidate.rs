use std::collections::{BTreeSet, HashMap};
use std::iter;

use itertools::Itertools;
use log::debug;

use crate::model::entity::Team;
use crate::model::group::{Game, Match, GAME_SIZE};

/// A proposed regrouping of the target match, or of the target match and
/// the one after it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Candidate {
    Single(Match),
    Pair(Match, Match),
}

impl Candidate {
    pub fn matches(&self) -> impl Iterator<Item = &Match> + '_ {
        let (first, second) = match self {
            Candidate::Single(m) => (m, None),
            Candidate::Pair(m1, m2) => (m1, Some(m2)),
        };
        iter::once(first).chain(second)
    }

    pub fn games(&self) -> Vec<&Game> {
        self.matches().flat_map(Match::games).collect()
    }

    /// Same grouping with games in a fixed order, for "is this a change" checks.
    pub fn canonical(&self) -> Candidate {
        match self {
            Candidate::Single(m) => Candidate::Single(m.canonical()),
            Candidate::Pair(m1, m2) => Candidate::Pair(m1.canonical(), m2.canonical()),
        }
    }

    pub fn same_grouping(&self, other: &Candidate) -> bool {
        self.canonical() == other.canonical()
    }

    pub fn normalised(&self, separator: char) -> Vec<String> {
        self.matches().map(|m| m.normalised(separator)).collect()
    }
}

/// Teams near the target pair that a regrouping must not pull in:
/// `forward` precede the pair, `after` follow it.
#[derive(Debug, Clone, Default)]
pub struct Window {
    pub forward: BTreeSet<Team>,
    pub after: BTreeSet<Team>,
}

impl Window {
    fn clashes(teams: &BTreeSet<Team>, m: &Match) -> bool {
        m.teams().any(|team| teams.contains(team))
    }
}

/// Every distinct set of four teams drawable from `teams`.
pub fn unique_games<'a>(teams: impl IntoIterator<Item = &'a Team>) -> BTreeSet<Game> {
    teams
        .into_iter()
        .unique()
        .combinations(GAME_SIZE)
        .filter_map(Game::new)
        .collect()
}

fn disjoint_selections(
    games: &[&Game],
    n_games: usize,
    accept: impl Fn(&[&Game]) -> bool,
) -> Vec<Match> {
    fn extend<'g>(
        games: &[&'g Game],
        start: usize,
        n_games: usize,
        chosen: &mut Vec<&'g Game>,
        accept: &dyn Fn(&[&Game]) -> bool,
        found: &mut Vec<Match>,
    ) {
        if chosen.len() == n_games {
            if accept(chosen.as_slice()) {
                found.push(Match::new(chosen.iter().map(|game| (*game).clone()).collect()));
            }
            return;
        }
        for (offset, game) in games[start..].iter().enumerate() {
            if chosen.iter().all(|c| c.is_disjoint(game)) {
                chosen.push(*game);
                extend(games, start + offset + 1, n_games, chosen, accept, found);
                chosen.pop();
            }
        }
    }

    let mut found = Vec::new();
    if n_games > 0 {
        extend(games, 0, n_games, &mut Vec::with_capacity(n_games), &accept, &mut found);
    }
    found
}

fn has_distinct_teams(teams: &[Team]) -> bool {
    !teams.is_empty() && teams.len() % GAME_SIZE == 0 && teams.iter().all_unique()
}

/// Every way of splitting exactly `teams` into disjoint games drawn from
/// `games`. Games in each result are in ascending order, so a grouping is
/// produced once however its games could be permuted.
pub fn unique_matches(games: &BTreeSet<Game>, teams: &[Team]) -> Vec<Match> {
    if !has_distinct_teams(teams) {
        return Vec::new();
    }
    let pool: BTreeSet<&Team> = teams.iter().collect();
    let games = games
        .iter()
        .filter(|game| game.teams().iter().all(|team| pool.contains(team)))
        .collect_vec();
    disjoint_selections(&games, teams.len() / GAME_SIZE, |_| true)
}

/// Matches of `n_games` games drawn from the pooled games which either keep
/// the first match's teams (all but at most one) or take almost none of
/// them. At most one team changes sides.
fn partial_matches(games: &[&Game], first: &BTreeSet<Team>, n_games: usize) -> Vec<Match> {
    let size = first.len();
    disjoint_selections(games, n_games, |chosen| {
        let overlap = chosen
            .iter()
            .flat_map(|game| game.teams())
            .filter(|team| first.contains(*team))
            .count();
        overlap <= 1 || overlap + 1 >= size
    })
}

/// Regroupings of two adjacent matches: the pooled teams split into a new
/// earlier and later match, shaped like the originals, without drawing a
/// team next to a neighbour in `window`.
pub fn match_pairs(first: &Match, second: &Match, window: &Window) -> Vec<Candidate> {
    let teams: Vec<Team> = first.teams().chain(second.teams()).cloned().collect();
    if !has_distinct_teams(&teams) {
        return Vec::new();
    }
    let pool: BTreeSet<Team> = teams.iter().cloned().collect();
    let first_teams = first.team_set();
    let games = unique_games(&teams);
    let games = games.iter().collect_vec();

    let earlier = partial_matches(&games, &first_teams, first.games().len());
    let later = if second.games().len() == first.games().len() {
        earlier.clone()
    } else {
        partial_matches(&games, &first_teams, second.games().len())
    };
    debug!("{} earlier and {} later partial matches", earlier.len(), later.len());

    let mut by_teams: HashMap<BTreeSet<Team>, Vec<&Match>> = HashMap::new();
    for m in &later {
        by_teams.entry(m.team_set()).or_default().push(m);
    }

    let mut pairs = Vec::new();
    for m1 in &earlier {
        if Window::clashes(&window.forward, m1) {
            continue;
        }
        let rest: BTreeSet<Team> = pool.difference(&m1.team_set()).cloned().collect();
        let Some(options) = by_teams.get(&rest) else {
            continue;
        };
        for m2 in options {
            if Window::clashes(&window.after, m2) {
                continue;
            }
            pairs.push(Candidate::Pair(m1.clone(), (*m2).clone()));
        }
    }
    pairs
}


#[cfg(test)]
mod tests {
    use super::*;

    fn teams(codes: &str) -> Vec<Team> {
        codes.chars().map(String::from).collect()
    }

    fn game(codes: &str) -> Game {
        Game::new(teams(codes)).unwrap()
    }

    fn single(codes: &[&str]) -> Match {
        Match::new(codes.iter().map(|c| game(c)).collect())
    }

    #[test]
    fn four_teams_make_one_game() {
        let games = unique_games(&teams("ABCD"));
        assert_eq!(games.len(), 1);
        assert!(games.contains(&game("DCBA")));
    }

    #[test]
    fn eight_teams_make_seventy_games() {
        let games = unique_games(&teams("ABCDEFGH"));
        assert_eq!(games.len(), 70);
    }

    #[test]
    fn eight_teams_split_thirty_five_ways() {
        let pool = teams("ABCDEFGH");
        let matches = unique_matches(&unique_games(&pool), &pool);
        assert_eq!(matches.len(), 35);
        let all: BTreeSet<Team> = pool.iter().cloned().collect();
        for m in &matches {
            assert_eq!(m.games().len(), 2);
            assert_eq!(m.team_set(), all);
        }
        let distinct: BTreeSet<Match> = matches.iter().map(Match::canonical).collect();
        assert_eq!(distinct.len(), 35);
    }

    #[test]
    fn four_team_match_only_regroups_to_itself() {
        let pool = teams("AEFG");
        let matches = unique_matches(&unique_games(&pool), &pool);
        assert_eq!(matches, vec![single(&["AEFG"])]);
    }

    #[test]
    fn bad_pools_yield_nothing() {
        let pool = teams("ABCDEFG");
        assert!(unique_matches(&unique_games(&pool), &pool).is_empty());
        let pool = teams("ABCDABCD");
        assert!(unique_matches(&unique_games(&pool), &pool).is_empty());
    }

    #[test]
    fn pairs_move_at_most_one_team_each_way() {
        let first = single(&["ABCD", "EFGH"]);
        let second = single(&["IJKL", "MNOP"]);
        let pairs = match_pairs(&first, &second, &Window::default());
        assert!(!pairs.is_empty());
        let first_teams = first.team_set();
        let original = Candidate::Pair(first.clone(), second.clone());
        assert!(pairs.iter().any(|p| p.same_grouping(&original)));
        for pair in &pairs {
            let Candidate::Pair(m1, m2) = pair else { panic!("expected a pair") };
            let kept = m1.teams().filter(|t| first_teams.contains(*t)).count();
            assert!(matches!(kept, 0 | 1 | 7 | 8), "kept {kept}");
            let moved = m2.teams().filter(|t| first_teams.contains(*t)).count();
            assert_eq!(kept + moved, 8);
        }
        // Both matches unchanged in membership: 35 * 35 groupings. A single
        // swap: 8 * 8 choices, each 35 * 35 ways. Swapping the two wholesale
        // doubles the lot.
        assert_eq!(pairs.len(), 2 * (35 * 35 + 64 * 35 * 35));
    }

    #[test]
    fn window_blocks_neighbouring_teams() {
        let first = single(&["ABCD", "EFGH"]);
        let second = single(&["IJKL", "MNOP"]);
        let window = Window {
            forward: BTreeSet::from(["I".to_string()]),
            after: BTreeSet::from(["A".to_string()]),
        };
        let pairs = match_pairs(&first, &second, &window);
        assert!(!pairs.is_empty());
        for pair in &pairs {
            let Candidate::Pair(m1, m2) = pair else { panic!("expected a pair") };
            assert!(!m1.team_set().contains("I"));
            assert!(!m2.team_set().contains("A"));
        }
    }

    #[test]
    fn overlapping_matches_cannot_pair() {
        let first = single(&["ABCD", "EFGH"]);
        let second = single(&["ABCD", "MNOP"]);
        assert!(match_pairs(&first, &second, &Window::default()).is_empty());
    }
}
