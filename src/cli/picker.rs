//! Interactive date prompt.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the prompt provides the "run `cclock warp` and press Enter" UX

use std::io::{self, Write};

use chrono::{Local, NaiveDate};

use crate::error::AppError;

/// Prompt for the date to warp.
///
/// Behavior:
/// - Enter (or EOF on a piped stdin) accepts today's date
/// - anything else must parse as `YYYY-MM-DD`
/// - `q` cancels
pub fn prompt_for_date() -> Result<NaiveDate, AppError> {
    let today = Local::now().date_naive();

    loop {
        print!("Date to warp [YYYY-MM-DD] (Enter = {today}, q to quit): ");
        io::stdout()
            .flush()
            .map_err(|e| AppError::config(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::config(format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Ok(today);
        }

        let input = input.trim();
        if input.is_empty() {
            return Ok(today);
        }
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::config("Canceled."));
        }

        match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            Ok(date) => return Ok(date),
            Err(_) => {
                println!("Invalid date '{input}'. Use YYYY-MM-DD (e.g. {today}).");
                continue;
            }
        }
    }
}
