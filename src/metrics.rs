use crate::similarity::similarity_ratio;

/// Submissions faster than this are scored as if they took this long
pub const MIN_ELAPSED_SECS: f64 = 0.01;

/// Numbers derived from one finished attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionMetrics {
    pub total_time_secs: f64,
    pub average_delay_secs: f64,
    pub words_per_minute: f64,
    pub chars_per_minute: f64,
    pub accuracy_percent: f64,
}

impl SessionMetrics {
    /// Score `typed` against `target` for an attempt that lasted
    /// `elapsed_secs`. `typed` must not be empty.
    pub fn compute(typed: &str, target: &str, elapsed_secs: f64) -> Self {
        let total_time_secs = clamp_elapsed(elapsed_secs);
        let chars = char_count(typed) as f64;
        let words = word_count(typed) as f64;

        Self {
            total_time_secs,
            average_delay_secs: total_time_secs / chars.max(1.0),
            words_per_minute: words / total_time_secs * 60.0,
            chars_per_minute: chars / total_time_secs * 60.0,
            accuracy_percent: similarity_ratio(typed, target) * 100.0,
        }
    }
}

pub fn clamp_elapsed(elapsed_secs: f64) -> f64 {
    if elapsed_secs.is_finite() {
        elapsed_secs.max(MIN_ELAPSED_SECS)
    } else {
        MIN_ELAPSED_SECS
    }
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Words are runs of non-whitespace
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Share of the target typed so far, capped at 1.0
pub fn progress(typed: &str, target: &str) -> f64 {
    let target_len = char_count(target);
    if target_len == 0 {
        return 1.0;
    }
    (char_count(typed) as f64 / target_len as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANGRAM: &str = "The quick brown fox jumps over the lazy dog.";

    #[test]
    fn pangram_in_ten_seconds() {
        let m = SessionMetrics::compute(PANGRAM, PANGRAM, 10.0);
        assert_eq!(m.accuracy_percent, 100.0);
        assert_eq!(m.words_per_minute, 54.0);
        assert_eq!(m.total_time_secs, 10.0);
        assert_eq!(m.chars_per_minute, 264.0);
        assert!((m.average_delay_secs - 10.0 / 44.0).abs() < 1e-12);
    }

    #[test]
    fn zero_elapsed_is_clamped() {
        let m = SessionMetrics::compute("hi", "hi", 0.0);
        assert_eq!(m.total_time_secs, MIN_ELAPSED_SECS);
        assert!(m.words_per_minute.is_finite());
        assert!(m.chars_per_minute.is_finite());
    }

    #[test]
    fn negative_and_nan_elapsed_are_clamped() {
        assert_eq!(clamp_elapsed(-3.0), MIN_ELAPSED_SECS);
        assert_eq!(clamp_elapsed(f64::NAN), MIN_ELAPSED_SECS);
        assert_eq!(clamp_elapsed(2.5), 2.5);
    }

    #[test]
    fn word_count_splits_on_whitespace_runs() {
        assert_eq!(word_count("  one   two\tthree\n"), 3);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn char_count_uses_scalar_values() {
        assert_eq!(char_count("naïve"), 5);
    }

    #[test]
    fn progress_is_capped() {
        assert_eq!(progress("", "abcd"), 0.0);
        assert_eq!(progress("ab", "abcd"), 0.5);
        assert_eq!(progress("abcdef", "abcd"), 1.0);
        assert_eq!(progress("x", ""), 1.0);
    }
}
