//! Helpers shared by every place that reports progress: colored durations and section titles.
//!
//! Gazette only emits records through the [`log`] facade, installing a logger is left to the binary.
use colored::{ColoredString, Colorize};
use log::info;
use std::time::Duration;

/// Target that asks the binary's formatter to print a record as-is, without timestamp or target.
pub const SKIP_FORMAT: &str = "SKIP_FORMAT";

pub struct FormatElapsedTimeOptions<'a> {
    pub sec_yellow_threshold: u64,
    pub sec_red_threshold: u64,
    pub millis_yellow_threshold: Option<u128>,
    pub millis_red_threshold: Option<u128>,
    pub additional_fn: Option<&'a (dyn Fn(ColoredString) -> ColoredString + Sync)>,
}

impl Default for FormatElapsedTimeOptions<'_> {
    fn default() -> Self {
        Self {
            sec_yellow_threshold: 1,
            sec_red_threshold: 2,
            millis_yellow_threshold: Some(100),
            millis_red_threshold: Some(500),
            additional_fn: None,
        }
    }
}

impl FormatElapsedTimeOptions<'_> {
    /// Thresholds for whole sections of work (a full export, a server start), where milliseconds never matter.
    pub fn section() -> Self {
        Self {
            sec_yellow_threshold: 1,
            sec_red_threshold: 5,
            millis_yellow_threshold: None,
            millis_red_threshold: None,
            additional_fn: None,
        }
    }
}

/// Formats `elapsed` with the largest sensible unit, colored yellow or red past the given thresholds.
pub fn format_elapsed_time(elapsed: Duration, options: &FormatElapsedTimeOptions) -> ColoredString {
    let result = match elapsed.as_secs() {
        secs if secs > 60 => format!("{}m{}s", secs / 60, secs % 60).red(),
        secs if secs > options.sec_red_threshold => format!("{}s", secs).red(),
        secs if secs > options.sec_yellow_threshold => format!("{}s", secs).yellow(),
        secs if secs > 0 => format!("{}s", secs).normal(),
        _ => match elapsed.as_millis() {
            millis
                if options
                    .millis_red_threshold
                    .is_some_and(|threshold| millis > threshold) =>
            {
                format!("{}ms", millis).red()
            }
            millis
                if options
                    .millis_yellow_threshold
                    .is_some_and(|threshold| millis > threshold) =>
            {
                format!("{}ms", millis).yellow()
            }
            millis if millis > 0 => format!("{}ms", millis).normal(),
            _ => format!("{}μs", elapsed.as_micros()).normal(),
        },
    };

    match &options.additional_fn {
        Some(additional_fn) => additional_fn(result),
        None => result,
    }
}

pub fn print_title(title: &str) {
    info!(target: SKIP_FORMAT, "{}", "");
    info!(target: SKIP_FORMAT, "{}", format!(" {} ", title).on_green().bold());
}
