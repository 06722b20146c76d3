//! Query-string helpers over absolute URLs.

mod query;

pub use query::{is_absolute_url, query_param, query_params, remove_query_param, set_query_param};
