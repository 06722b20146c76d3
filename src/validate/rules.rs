use url::Url;

/// Shape check for `local@domain.tld`.
///
/// No whitespace anywhere, exactly one `@` with text on both sides, and a
/// dot inside the domain that is neither its first nor its last character.
pub fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, ch)| ch == '.' && i > 0 && i + 1 < domain.len())
}

/// Whether `s` parses as an absolute URL.
pub fn is_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// Non-empty and made only of ASCII digits.
pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// At least eight characters with a lowercase letter, an uppercase letter
/// and a digit, all on one line.
pub fn is_strong_password(s: &str) -> bool {
    s.chars().count() >= 8
        && !s.chars().any(is_line_terminator)
        && s.chars().any(|ch| ch.is_ascii_lowercase())
        && s.chars().any(|ch| ch.is_ascii_uppercase())
        && s.chars().any(|ch| ch.is_ascii_digit())
}

/// Empty or whitespace only.
pub fn is_empty(s: &str) -> bool {
    s.trim().is_empty()
}

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
