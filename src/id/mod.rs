//! Random identifiers.

/// A random RFC 4122 version 4 UUID in lowercase hyphenated form.
pub fn uuid() -> String {
    ::uuid::Uuid::new_v4().to_string()
}
