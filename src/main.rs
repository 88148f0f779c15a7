//! Searches regroupings of one schedule match, or two adjacent ones, for the
//! arrangement with the fewest repeated pairings.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use league_mash::{report, Format, Mode, ScheduleFile, Search};

#[derive(Parser)]
#[command(name = "mash")]
#[command(about = "Identify teams that can be swapped between games inside matches", long_about = None)]
struct Cli {
    /// Input schedule
    schedule_file: PathBuf,

    /// Which match number to fiddle with (0-based, comments and blank lines skipped)
    match_number: usize,

    /// Rewrite the schedule with the match patched
    #[arg(long)]
    auto_alter: bool,

    /// With --auto-alter, print the patched schedule instead of rewriting the file
    #[arg(long, requires = "auto_alter")]
    stdout: bool,

    /// Consider swapping teams between this and the next match
    #[arg(long)]
    multimatch: bool,

    /// Number of matches in each round
    #[arg(long, default_value_t = 0)]
    matches: usize,

    /// How many matches either side of the pair a team must not reappear in
    #[arg(long, default_value_t = 0)]
    closeness: usize,

    /// Field separator in the schedule file
    #[arg(long, default_value_t = '|')]
    separator: char,

    /// Comment marker in the schedule file
    #[arg(long, default_value_t = '#')]
    comment: char,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let mode = Mode::resolve(cli.multimatch, cli.matches, cli.closeness, cli.match_number)?;
    let format = Format { separator: cli.separator, comment: cli.comment };

    let file = ScheduleFile::read(&cli.schedule_file, &format)
        .with_context(|| format!("failed to load schedule {}", cli.schedule_file.display()))?;
    let search = Search::new(&file.schedule, cli.match_number, mode)?
        .separator(format.separator);

    let Some(selection) = search.select() else {
        print!("{}", report::render_empty(cli.match_number));
        return Ok(());
    };

    if !cli.auto_alter {
        print!("{}", report::render(&selection, format.separator));
        return Ok(());
    }

    if !selection.is_improvement() {
        info!("match {} left unchanged", cli.match_number);
        if cli.stdout {
            print!("{}", file.text());
        }
        return Ok(());
    }

    let patched = file.patch(cli.match_number, &selection.best().candidate, &format);
    if cli.stdout {
        print!("{patched}");
    } else {
        fs::write(&cli.schedule_file, patched)
            .with_context(|| format!("failed to write {}", cli.schedule_file.display()))?;
        info!("patched match {} in {}", cli.match_number, cli.schedule_file.display());
    }
    Ok(())
}
