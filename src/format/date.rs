use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Utc};

/// Pattern used when none is given.
pub const DEFAULT_PATTERN: &str = "YYYY-MM-DD";

/// Output of [`format_date_str`] for text that is not a date.
pub const INVALID_DATE: &str = "Invalid Date";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;

/// Substitute `YYYY`, `MM`, `DD`, `HH`, `mm` and `ss` in `pattern`.
///
/// Tokens are matched left to right; everything else is copied as is.
/// All fields except the year are zero padded to two digits.
pub fn format_date<D>(date: &D, pattern: &str) -> String
where
    D: Datelike + Timelike,
{
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut rest = pattern;

    while let Some(ch) = rest.chars().next() {
        let (text, consumed) = if rest.starts_with("YYYY") {
            (date.year().to_string(), 4)
        } else if rest.starts_with("MM") {
            (format!("{:02}", date.month()), 2)
        } else if rest.starts_with("DD") {
            (format!("{:02}", date.day()), 2)
        } else if rest.starts_with("HH") {
            (format!("{:02}", date.hour()), 2)
        } else if rest.starts_with("mm") {
            (format!("{:02}", date.minute()), 2)
        } else if rest.starts_with("ss") {
            (format!("{:02}", date.second()), 2)
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        };
        out.push_str(&text);
        rest = &rest[consumed..];
    }

    out
}

/// Parse `input` and format it, or return [`INVALID_DATE`].
pub fn format_date_str(input: &str, pattern: &str) -> String {
    match parse_date(input) {
        Some(date) => format_date(&date, pattern),
        None => INVALID_DATE.to_owned(),
    }
}

/// Parse RFC 3339 or `YYYY-MM-DD[( |T)HH:MM[:SS]]` text.
///
/// Offsets are dropped: the wall-clock time as written is kept.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Describe how long before `now` the instant `then` was.
///
/// Buckets: under a minute is "just now", then whole minutes, hours and
/// days up to thirty days; anything older is formatted with
/// [`DEFAULT_PATTERN`]. Instants after `now` count as "just now".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - then).num_milliseconds().div_euclid(1000);

    if elapsed < MINUTE {
        "just now".to_owned()
    } else if elapsed < HOUR {
        format!("{} minutes ago", elapsed / MINUTE)
    } else if elapsed < DAY {
        format!("{} hours ago", elapsed / HOUR)
    } else if elapsed < MONTH {
        format!("{} days ago", elapsed / DAY)
    } else {
        format_date(&then, DEFAULT_PATTERN)
    }
}

pub fn relative_time_from_now(then: DateTime<Utc>) -> String {
    relative_time(then, Utc::now())
}

/// Shift `date` by whole calendar days, `None` on overflow.
pub fn add_days(date: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    let delta = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(delta)
    } else {
        date.checked_sub_days(delta)
    }
}

/// Whether two dates fall on the same calendar day.
pub fn is_same_day<A, B>(a: &A, b: &B) -> bool
where
    A: Datelike,
    B: Datelike,
{
    a.year() == b.year() && a.ordinal() == b.ordinal()
}
