// WHY: Keystroke path; runs on every text change so the cheap gate comes before any regex work

use tracing::debug;

use super::annotator::Annotator;
use super::{AutoLinkOutcome, SkipReason};
use crate::host::{EditorHost, TextChange, TextRange};
use crate::url_detector::{char_len, UrlDetector};

/// The text must be longer than this (trailing space included) before detection runs
pub const MIN_LINK_LENGTH_WITH_SPACE_AT_END: usize = 4;

/// True when the text ends with a single space typed after a non-space character
pub fn passes_typing_gate(text: &str) -> bool {
    let mut tail = text.chars().rev();
    let (Some(last), Some(before_last)) = (tail.next(), tail.next()) else {
        return false;
    };

    last == ' ' && before_last != ' ' && text.chars().count() > MIN_LINK_LENGTH_WITH_SPACE_AT_END
}

/// Handle a text change reported by the host
pub(super) fn on_text_change<H: EditorHost + ?Sized>(
    detector: &UrlDetector,
    annotator: &Annotator,
    host: &mut H,
    change: &TextChange,
) -> AutoLinkOutcome {
    if !annotator.enablement().is_enabled() {
        return AutoLinkOutcome::Skipped(SkipReason::Disabled);
    }

    let Some(caret) = host.caret() else {
        return AutoLinkOutcome::Skipped(SkipReason::NoCaret);
    };

    let line = host.last_text_line(TextRange::new(host.block_start(caret), caret));
    if !passes_typing_gate(&line.text) {
        return AutoLinkOutcome::Ignored;
    }

    // Gate guarantees a trailing ASCII space, one byte wide
    let before_space = &line.text[..line.text.len() - 1];
    let Some(url) = detector.url_at_text_end(before_space) else {
        return AutoLinkOutcome::NoMatch;
    };

    if !change.batch.is_typing() {
        debug!(url, batch = ?change.batch, "URL found outside a typing batch");
        return AutoLinkOutcome::Skipped(SkipReason::NotTyping);
    }

    let link_range = line
        .range
        .end
        .shifted_back(1)
        .and_then(|link_end| TextRange::ending_at(link_end, char_len(url)));

    match link_range {
        Some(range) => annotator.apply(host, url, range),
        None => AutoLinkOutcome::Skipped(SkipReason::StaleRange),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_requires_single_trailing_space() {
        assert!(passes_typing_gate("google.com "));
        assert!(!passes_typing_gate("google.com"));
        assert!(!passes_typing_gate("google.com  "));
        assert!(!passes_typing_gate("google.com\t"));
    }

    #[test]
    fn test_gate_length_boundary() {
        // "t.co " is five characters, one above the minimum
        assert!(passes_typing_gate("t.co "));
        assert!(!passes_typing_gate("t.c "));
        assert!(!passes_typing_gate(" "));
        assert!(!passes_typing_gate(""));
    }

    #[test]
    fn test_gate_counts_characters() {
        assert!(passes_typing_gate("żółw "));
        assert!(!passes_typing_gate("żół "));
    }

    /// Every string over `alphabet` with at most `max_len` characters
    fn all_strings(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut out = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .flat_map(|prefix| alphabet.iter().map(move |c| format!("{prefix}{c}")))
                .collect();
            out.extend(frontier.iter().cloned());
        }
        out
    }

    #[test]
    fn test_gate_matches_trailing_shape_for_all_short_strings() {
        for core in all_strings(&['a', ' ', '\t'], 3) {
            // Padding in front only changes the length, never the tail
            for padding in ["", "ab", "abcdef"] {
                let text = format!("{padding}{core}");
                let mut tail = text.chars().rev();
                let ends_right = matches!((tail.next(), tail.next()), (Some(' '), Some(c)) if c != ' ');
                let long_enough = text.chars().count() > MIN_LINK_LENGTH_WITH_SPACE_AT_END;

                assert_eq!(passes_typing_gate(&text), ends_right && long_enough, "gate mismatch for {text:?}");
            }
        }
    }
}
