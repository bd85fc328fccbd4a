//! Output formatting for lookup rows.
//!
//! This module handles formatting and outputting rows:
//! - [`csv`] - CSV output formatting
//! - [`terminal`] - Terminal output with colors
//! - [`time`] - local time and flag helpers

mod csv;
mod terminal;
mod time;

pub use csv::{csv_row, escape_csv_field, print_csv, CSV_HEADER};
pub use terminal::{format_field, print_rows, render_row, render_rows, RowLines, LOADING_MARKER};
pub use time::{flag_emoji, flag_url, format_local_time};
