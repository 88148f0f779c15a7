//! Regrouping of league schedule matches.
//!
//! Given a schedule (one match per line, teams separated by `|`, four teams
//! per game) and a target match, every way of splitting that match's teams
//! into games is scored against the rest of the schedule. The score counts
//! how often pairs of teams meet repeatedly, and the regrouping that leaves
//! the fewest large repeats wins. Multimatch mode does the same for the
//! target and the following match together, swapping at most one team
//! between them.

pub mod candidate;
pub mod facing;
pub mod model;
pub mod report;
pub mod schedule;
pub mod score;
pub mod search;

pub use candidate::{Candidate, Window};
pub use facing::FacingCounts;
pub use model::entity::Team;
pub use model::group::{Game, Match, Schedule};
pub use schedule::{parse, Format, ScheduleError, ScheduleFile};
pub use score::{scoring_cmp, ScoreProfile};
pub use search::{Mode, Search, SearchError, Selection};
