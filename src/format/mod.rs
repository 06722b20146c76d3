//! Formatting helpers for dates, colors, numbers and text.
//!
//! All functions here are pure; none of them touch the store or storage.

pub mod color;
pub mod date;
pub mod number;
pub mod text;

pub use color::{darken, hex_to_rgb, lighten, random_color, rgb_to_hex, ParseColorError, Rgb};
pub use date::{add_days, format_date, format_date_str, is_same_day, parse_date, relative_time, relative_time_from_now};
pub use number::{format_currency, format_number, NumberLocale};
pub use text::{capitalize, slugify, truncate};
