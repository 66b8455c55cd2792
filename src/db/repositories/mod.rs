pub mod influencer_repository;

pub use influencer_repository::InfluencerRepository;

/// Parse a SQLite datetime string into NaiveDateTime.
pub(crate) fn parse_dt(s: &str) -> chrono::NaiveDateTime {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap_or_default()
}

pub(crate) fn format_dt(dt: &chrono::NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Escape LIKE wildcards so user text is matched literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
