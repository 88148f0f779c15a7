use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use thiserror::Error;

use crate::candidate::Candidate;
use crate::model::entity::Team;
use crate::model::group::{Game, Match, Schedule, GAME_SIZE};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("line {line}: {teams} teams is not a positive multiple of 4")]
    MalformedMatch { line: usize, teams: usize },
    #[error("line {line}: empty team code")]
    EmptyTeam { line: usize },
    #[error("line {line}: team {team} appears twice in one game")]
    DuplicateTeam { line: usize, team: Team },
    #[error("failed to read {path}")]
    Read { path: PathBuf, source: io::Error },
}

/// Characters delimiting fields and comments in a schedule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    pub separator: char,
    pub comment: char,
}

impl Default for Format {
    fn default() -> Self {
        Format { separator: '|', comment: '#' }
    }
}

impl Format {
    /// The match content of a physical line, or `None` for comment and blank lines.
    fn content<'a>(&self, line: &'a str) -> Option<&'a str> {
        let text = line.split(self.comment).next().unwrap_or_default().trim();
        (!text.is_empty()).then_some(text)
    }

    fn render(&self, m: &Match) -> String {
        m.normalised(self.separator)
    }
}

fn parse_match(text: &str, line: usize, format: &Format) -> Result<Match, ScheduleError> {
    let teams: Vec<&str> = text.split(format.separator).map(str::trim).collect();
    if teams.iter().any(|team| team.is_empty()) {
        return Err(ScheduleError::EmptyTeam { line });
    }
    if teams.len() % GAME_SIZE != 0 {
        return Err(ScheduleError::MalformedMatch { line, teams: teams.len() });
    }
    let games = teams
        .chunks(GAME_SIZE)
        .map(|chunk| {
            Game::new(chunk.iter().copied()).ok_or_else(|| {
                let team = chunk.iter().duplicates().next().copied().unwrap_or_default();
                ScheduleError::DuplicateTeam { line, team: team.to_string() }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Match::new(games))
}

/// Parses every non-comment, non-blank line into a match.
pub fn parse(text: &str, format: &Format) -> Result<Schedule, ScheduleError> {
    Ok(ScheduleFile::from_text(text, format)?.schedule)
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    Match { index: usize, raw: String },
    Other(String),
}

/// A schedule together with the verbatim lines it was read from, so that it
/// can be written back with only selected matches changed.
#[derive(Debug, Clone)]
pub struct ScheduleFile {
    pub schedule: Schedule,
    lines: Vec<Line>,
}

impl ScheduleFile {
    pub fn read(path: &Path, format: &Format) -> Result<ScheduleFile, ScheduleError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ScheduleError::Read { path: path.to_path_buf(), source })?;
        ScheduleFile::from_text(&text, format)
    }

    pub fn from_text(text: &str, format: &Format) -> Result<ScheduleFile, ScheduleError> {
        let mut matches = Vec::new();
        let mut lines = Vec::new();
        for (number, raw) in text.split_inclusive('\n').enumerate() {
            match format.content(raw) {
                Some(content) => {
                    matches.push(parse_match(content, number + 1, format)?);
                    lines.push(Line::Match { index: matches.len() - 1, raw: raw.to_string() });
                }
                None => lines.push(Line::Other(raw.to_string())),
            }
        }
        Ok(ScheduleFile { schedule: Schedule { matches }, lines })
    }

    /// The file exactly as it was read.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                Line::Match { raw, .. } | Line::Other(raw) => raw.as_str(),
            })
            .collect()
    }

    /// Renders the file with the match at `index` (and, for a pair, the one
    /// after it) replaced by `candidate`. Every other line is kept byte for
    /// byte, as is any trailing comment on a replaced line.
    pub fn patch(&self, index: usize, candidate: &Candidate, format: &Format) -> String {
        let replacements: Vec<&Match> = candidate.matches().collect();
        self.lines
            .iter()
            .map(|line| match line {
                Line::Match { index: i, raw } if *i >= index && *i - index < replacements.len() => {
                    replace_line(raw, &format.render(replacements[*i - index]), format)
                }
                Line::Match { raw, .. } | Line::Other(raw) => raw.clone(),
            })
            .collect()
    }
}

fn replace_line(raw: &str, rendered: &str, format: &Format) -> String {
    let body = raw.trim_end_matches(['\r', '\n']);
    let ending = &raw[body.len()..];
    let indent = &body[..body.len() - body.trim_start().len()];
    match body.find(format.comment) {
        Some(at) => {
            let before = &body[..at];
            let gap = &before[before.trim_end().len()..];
            format!("{indent}{rendered}{gap}{}{ending}", &body[at..])
        }
        None => format!("{indent}{rendered}{ending}"),
    }
}
