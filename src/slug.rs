//! Filename slugs and timestamps.

use chrono::NaiveDateTime;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Turn a title into a filesystem-safe, lowercase, diacritic-free slug.
///
/// Letters are decomposed (NFD) and their combining marks dropped, so `ş`
/// becomes `s`. Characters outside ASCII letters, digits, whitespace and `-`
/// are removed, the result is trimmed, whitespace runs become a single `_`,
/// and everything is lowercased. Letters with no decomposition outside
/// ASCII (such as the dotless `ı`) are removed.
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .nfd()
        .filter(|&c| !is_combining_mark(c))
        .filter(|&c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-')
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Renders the export time for display and for filenames.
///
/// Output must be stable for a given instant and contain nothing that is
/// unsafe in a filename.
pub trait TimestampFormatter: Send + Sync {
    fn format(&self, at: &NaiveDateTime) -> String;
}

/// Day-first local timestamp, `19-10-2026_14-05`.
#[derive(Debug, Clone, Default)]
pub struct FilenameTimestamp;

impl TimestampFormatter for FilenameTimestamp {
    fn format(&self, at: &NaiveDateTime) -> String {
        at.format("%d-%m-%Y_%H-%M").to_string()
    }
}
