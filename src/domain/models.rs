//! Core value types for the rewriting workflow.
//!
//! Word counting and quota classification are pure projections of the input
//! text. Nothing here holds derived state that could drift from the text it
//! was computed from.

use std::time::Duration;

/// Maximum number of words accepted per submission in the free tier.
pub const WORD_LIMIT: usize = 150;

/// Rewriting endpoint used when no override is given.
pub const API_URL: &str = "http://127.0.0.1:8000/api/humanize";

/// How long the "copied" confirmation stays visible after a clipboard write.
pub const COPY_CONFIRMATION_WINDOW: Duration = Duration::from_millis(2000);

/// Counts the maximal runs of non-whitespace characters in `text`.
///
/// Leading, trailing and repeated internal whitespace never produce empty
/// words, so `"  dua   kata  "` counts as two.
///
/// # Examples
///
/// ```
/// use kating::domain::count_words;
///
/// assert_eq!(count_words(""), 0);
/// assert_eq!(count_words("   "), 0);
/// assert_eq!(count_words("satu"), 1);
/// assert_eq!(count_words("  dua   kata  "), 2);
/// ```
pub fn count_words(text: &str) -> usize {
    text.split(is_word_separator)
        .filter(|word| !word.is_empty())
        .count()
}

/// True when `text` has no words, i.e. it is empty after trimming separators.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_word_separator)
}

/// Whitespace as web clients split words: Unicode `White_Space` plus the
/// byte-order mark U+FEFF, minus NEXT LINE U+0085.
pub fn is_word_separator(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

/// Where a word count sits relative to the free-tier limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaStatus {
    /// Comfortably below the limit
    Within,
    /// At or above 80% of the limit, but not over it
    NearLimit,
    /// Over the limit; submission will be rejected
    OverLimit,
}

impl QuotaStatus {
    /// Classifies `count` against `limit`.
    pub fn classify(count: usize, limit: usize) -> Self {
        if count > limit {
            QuotaStatus::OverLimit
        } else if count * 5 >= limit * 4 {
            QuotaStatus::NearLimit
        } else {
            QuotaStatus::Within
        }
    }

    pub fn is_over(self) -> bool {
        matches!(self, QuotaStatus::OverLimit)
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    /// Rendered as a destructive (red) toast
    Error,
}

/// A transient message describing the outcome of an operation.
///
/// Notifications are handed to a sink and never kept by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_words_empty_and_blank() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("\n\t  \r\n"), 0);
    }

    #[test]
    fn test_count_words_collapses_whitespace() {
        assert_eq!(count_words("satu"), 1);
        assert_eq!(count_words("  dua   kata  "), 2);
        assert_eq!(count_words("baris satu\nbaris\tdua"), 4);
    }

    #[test]
    fn test_count_words_unicode_text() {
        assert_eq!(count_words("naïve café — résumé"), 4);
    }

    #[test]
    fn test_count_words_matches_browser_whitespace() {
        assert_eq!(count_words("satu\u{FEFF}dua"), 2);
        assert_eq!(count_words("satu\u{0085}dua"), 1);
        assert_eq!(count_words("satu\u{00A0}dua\u{3000}tiga"), 3);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t"));
        assert!(is_blank("\u{FEFF}\u{00A0}"));
        assert!(!is_blank("\u{0085}"));
        assert!(!is_blank("  kata "));
    }

    #[test]
    fn test_quota_status_thresholds() {
        assert_eq!(QuotaStatus::classify(0, WORD_LIMIT), QuotaStatus::Within);
        assert_eq!(QuotaStatus::classify(119, WORD_LIMIT), QuotaStatus::Within);
        assert_eq!(QuotaStatus::classify(120, WORD_LIMIT), QuotaStatus::NearLimit);
        assert_eq!(QuotaStatus::classify(150, WORD_LIMIT), QuotaStatus::NearLimit);
        assert_eq!(QuotaStatus::classify(151, WORD_LIMIT), QuotaStatus::OverLimit);
        assert!(QuotaStatus::classify(151, WORD_LIMIT).is_over());
    }

    #[test]
    fn test_notification_constructors() {
        let ok = Notification::info("Berhasil", "ok");
        assert_eq!(ok.severity, Severity::Info);
        assert!(!ok.is_error());

        let failed = Notification::error("Terjadi kesalahan", "boom");
        assert!(failed.is_error());
        assert_eq!(failed.description, "boom");
    }
}
