use std::cmp::Ordering;
use std::fmt;

use crate::candidate::Candidate;
use crate::search::Selection;

const MATCH_INDENT: &str = "      ";
const NORMALISED_INDENT: &str = "                ";

struct Grouping<'a> {
    candidate: &'a Candidate,
    separator: char,
}

impl fmt::Display for Grouping<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.candidate.matches().enumerate() {
            let lead = if i == 0 { "Match " } else { MATCH_INDENT };
            writeln!(f, "{lead}{m}")?;
        }
        for (i, line) in self.candidate.normalised(self.separator).iter().enumerate() {
            let lead = if i == 0 { "  normalised as " } else { NORMALISED_INDENT };
            writeln!(f, "{lead}{line}")?;
        }
        Ok(())
    }
}

/// Human readable account of a selection: every best scoring grouping,
/// then how it compares with the schedule as it stands.
pub struct Report<'a> {
    pub selection: &'a Selection,
    pub separator: char,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selection = self.selection;
        for scored in &selection.winners {
            let grouping = Grouping { candidate: &scored.candidate, separator: self.separator };
            write!(f, "{grouping}")?;
            writeln!(f, "  scored: {}", scored.profile)?;
        }
        writeln!(f, "Currently scored: {}", selection.baseline)?;
        if !selection.is_improvement() {
            return writeln!(f, "No improvement available, schedule already optimal for this match");
        }
        let considered = selection.evaluated;
        // The current grouping can be filtered out by the closeness window,
        // in which case the best allowed regrouping may score worse.
        match selection.best().profile.cmp(&selection.baseline) {
            Ordering::Less => writeln!(f, "Improvement found ({considered} candidates considered)"),
            Ordering::Equal => writeln!(
                f,
                "Regrouping found, scoring the same as currently ({considered} candidates considered)"
            ),
            Ordering::Greater => writeln!(
                f,
                "Regrouping found, scoring worse than currently as the current grouping \
                 breaks closeness ({considered} candidates considered)"
            ),
        }
    }
}

pub fn render(selection: &Selection, separator: char) -> String {
    Report { selection, separator }.to_string()
}

pub fn render_empty(index: usize) -> String {
    format!("No valid regrouping of match {index}, no improvement available\n")
}
