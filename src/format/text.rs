/// Length used by callers that have no better idea.
pub const DEFAULT_TRUNCATE_LENGTH: usize = 30;

/// Keep the first `length` characters of `s`, appending `...` if anything
/// was cut.
pub fn truncate(s: &str, length: usize) -> String {
    match s.char_indices().nth(length) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_owned(),
    }
}

/// URL-friendly form of `s`.
///
/// Lowercases, keeps ASCII letters and digits, turns each run of
/// whitespace, `_` and `-` into a single `-`, and drops everything else.
/// No leading or trailing `-` survives.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;

    for ch in s.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_dash = true;
        }
    }

    slug
}

/// Uppercase the first character of every word.
///
/// A word is a run of alphanumeric characters and underscores.
pub fn capitalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for ch in s.chars() {
        let word_char = ch.is_alphanumeric() || ch == '_';
        if word_char && !in_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        in_word = word_char;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_strings() {
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("", DEFAULT_TRUNCATE_LENGTH), "");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 7), "héllo w...");
        assert_eq!(truncate("日本語テキスト", 3), "日本語...");
    }

    #[test]
    fn slugifies() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Hello World!"), "hello-world");
        assert_eq!(slugify("  --Rust_is   fun--  "), "rust-is-fun");
        assert_eq!(slugify("a - !- b"), "a-b");
        assert_eq!(slugify("Crème brûlée"), "crme-brle");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn capitalizes_words() {
        assert_eq!(capitalize("hello world"), "Hello World");
        assert_eq!(capitalize("snake_case stays"), "Snake_case Stays");
        assert_eq!(capitalize("o'neil-smith"), "O'Neil-Smith");
        assert_eq!(capitalize("élan vital"), "Élan Vital");
        assert_eq!(capitalize(""), "");
    }
}
