//! Committed transcript storage

use tracing::debug;

use super::normalize::TextNormalizer;

/// Append-only store of finalized transcript segments.
///
/// Each committed segment is cleaned on entry and reconciled against the
/// immediately preceding final: an exact repeat is dropped (the backend
/// sometimes resends the same final result), and a final that re-sends the
/// previous one with more words appended contributes only its new tail.
/// The guard is deliberately that narrow: a duplicate separated by an
/// intervening different final is appended verbatim.
#[derive(Debug)]
pub struct TranscriptStore {
    normalizer: TextNormalizer,
    segments: Vec<String>,
    /// Cleaned text of the last committed final, for duplicate/overlap checks
    last_final: String,
}

impl TranscriptStore {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self {
            normalizer,
            segments: Vec::new(),
            last_final: String::new(),
        }
    }

    /// Commit a final recognition result.
    ///
    /// Empty (or cleaned-to-empty) segments and immediate duplicates are
    /// absorbed silently.
    pub fn commit_final(&mut self, raw_segment: &str) {
        let cleaned = self.normalizer.clean(raw_segment);

        if cleaned.is_empty() {
            return;
        }
        if cleaned == self.last_final {
            debug!("dropping duplicate final segment: {:?}", cleaned);
            return;
        }

        // A final that extends the previous one word-for-word carries the
        // old text again; only its tail is new.
        let segment = match extension_tail(&self.last_final, &cleaned) {
            Some(tail) => {
                debug!("final extends previous segment, appending tail: {:?}", tail);
                tail.to_string()
            }
            None => cleaned.clone(),
        };

        debug!("committing segment {}: {:?}", self.segments.len() + 1, segment);
        self.segments.push(segment);
        self.last_final = cleaned;
    }

    /// Full committed transcript, segments joined with single spaces.
    ///
    /// Segments are cleaned at commit time, so the join is already
    /// normalized.
    pub fn snapshot(&self) -> String {
        self.segments.join(" ")
    }

    /// Number of committed segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// The part of `current` after `previous`, when `current` repeats the whole
/// of `previous` followed by more words.
fn extension_tail<'a>(previous: &str, current: &'a str) -> Option<&'a str> {
    if previous.is_empty() {
        return None;
    }
    current
        .strip_prefix(previous)
        .and_then(|rest| rest.strip_prefix(' '))
        .filter(|tail| !tail.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TranscriptStore {
        TranscriptStore::new(TextNormalizer::default())
    }

    #[test]
    fn test_append_ordering() {
        let mut store = store();
        store.commit_final("hello");
        store.commit_final("world");
        assert_eq!(store.snapshot(), "hello world");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_duplicate_suppression() {
        let mut store = store();
        store.commit_final("testing one");
        store.commit_final("testing one");
        assert_eq!(store.snapshot(), "testing one");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_after_cleaning() {
        let mut store = store();
        store.commit_final("testing one");
        store.commit_final("  testing   one ");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_extending_final_appends_only_tail() {
        let mut store = store();
        store.commit_final("testing one");
        store.commit_final("testing one two three");
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot(), "testing one two three");

        // A resend of the full extended final is still a duplicate.
        store.commit_final("testing one two three");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_extension_requires_word_boundary() {
        let mut store = store();
        store.commit_final("testing one");
        store.commit_final("testing oneself is hard");
        assert_eq!(store.snapshot(), "testing one testing oneself is hard");
    }

    #[test]
    fn test_intervening_segment_defeats_guard() {
        // Only the immediately preceding final is compared.
        let mut store = store();
        store.commit_final("alpha");
        store.commit_final("beta");
        store.commit_final("alpha");
        assert_eq!(store.snapshot(), "alpha beta alpha");
    }

    #[test]
    fn test_empty_segments_absorbed() {
        let mut store = store();
        store.commit_final("");
        store.commit_final("   ");
        store.commit_final("um,");
        assert!(store.is_empty());
        assert_eq!(store.snapshot(), "");
    }

    #[test]
    fn test_segments_cleaned_on_commit() {
        let mut store = store();
        store.commit_final("um, testing  one ");
        store.commit_final("two , three");
        assert_eq!(store.snapshot(), "testing one two, three");
    }
}
