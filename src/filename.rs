use chrono::NaiveDate;

/// Longest slug placed in a filename.
pub const SLUG_MAX_CHARS: usize = 50;

/// Lowercases `title` and replaces every character outside `[a-z0-9_-]` with
/// one `_`, keeping at most `max_chars` characters.
pub fn slug(title: &str, max_chars: usize) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(max_chars)
        .collect()
}

/// Fills the `{id}`, `{slug}`, `{date}` and `{ext}` placeholders of
/// `template`. The date is written as `YYYY-MM-DD`.
pub fn export_filename(template: &str, id: u64, title: &str, date: NaiveDate, ext: &str) -> String {
    template
        .replace("{id}", &id.to_string())
        .replace("{slug}", &slug(title, SLUG_MAX_CHARS))
        .replace("{date}", &date.format("%Y-%m-%d").to_string())
        .replace("{ext}", ext)
}
