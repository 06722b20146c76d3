//! Predicates for common user input: email, URL, digits, passwords, blanks.

mod rules;

pub use rules::{is_email, is_empty, is_numeric, is_strong_password, is_url};
