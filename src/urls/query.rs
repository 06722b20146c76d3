use std::collections::HashMap;

use url::{ParseError, Url};

/// First value of `key` in the query of `url`.
pub fn query_param(url: &str, key: &str) -> Result<Option<String>, ParseError> {
    let url = Url::parse(url)?;
    let value = url
        .query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned());
    Ok(value)
}

/// Every query parameter of `url`. Repeated keys keep their last value.
pub fn query_params(url: &str) -> Result<HashMap<String, String>, ParseError> {
    let url = Url::parse(url)?;
    Ok(url.query_pairs().into_owned().collect())
}

/// Return `url` with `key` set to `value`.
///
/// The first occurrence of `key` is replaced in place and later ones are
/// dropped; a missing key is appended. `None` or an empty value removes the
/// key entirely, and the `?` goes away with the last parameter.
pub fn set_query_param(url: &str, key: &str, value: Option<&str>) -> Result<String, ParseError> {
    let mut url = Url::parse(url)?;
    let value = value.filter(|v| !v.is_empty());

    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut placed = false;
    for (name, existing) in url.query_pairs().into_owned() {
        if name != key {
            pairs.push((name, existing));
        } else if let (Some(value), false) = (value, placed) {
            pairs.push((name, value.to_owned()));
            placed = true;
        }
    }
    if let (Some(value), false) = (value, placed) {
        pairs.push((key.to_owned(), value.to_owned()));
    }

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    Ok(url.into())
}

pub fn remove_query_param(url: &str, key: &str) -> Result<String, ParseError> {
    set_query_param(url, key, None)
}

/// Whether `url` starts with a lowercase scheme followed by `:`.
pub fn is_absolute_url(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_lowercase())
        && chars.all(|ch| {
            ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '+' | '.' | '-')
        })
}
