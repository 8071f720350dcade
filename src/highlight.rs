//! Fuzzy highlighting of retrieval snippets inside a page of OCR text.
//!
//! A retrieved chunk ("needle") rarely matches the page it came from
//! character for character: the index may have been built from a cleaned or
//! LLM-corrected variant of the text, and the OCR itself is noisy. This
//! module locates the best-matching contiguous span for each needle in the
//! original page ("haystack") and wraps it in marker strings, leaving every
//! character outside the marked spans untouched, line breaks included.
//!
//! Matching happens on whitespace-normalized copies of both sides; accepted
//! offsets are mapped back onto the original text through
//! [`crate::normalize::NormalizedText`] before rendering.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    matcher::BlockMatcher,
    normalize::{NormalizedText, normalize},
};

/// Default minimum similarity ratio a match must strictly exceed.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Default opening marker inserted before a matched span.
pub const DEFAULT_OPEN_MARKER: &str = "<mark>";

/// Default closing marker inserted after a matched span.
pub const DEFAULT_CLOSE_MARKER: &str = "</mark>";

/// Tuning knobs for the highlighter.
#[derive(Debug, Clone)]
pub struct HighlightOptions {
    /// A needle is accepted only if its best block's similarity ratio
    /// strictly exceeds this value (in `[0, 1]`).
    pub threshold: f64,
    /// String inserted immediately before a matched span.
    pub open_marker: String,
    /// String inserted immediately after a matched span.
    pub close_marker: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            open_marker: DEFAULT_OPEN_MARKER.to_string(),
            close_marker: DEFAULT_CLOSE_MARKER.to_string(),
        }
    }
}

/// A half-open character-offset range `[start, end)` into the original
/// haystack, denoting the best-matching substring for one needle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    fn overlaps(&self, other: &MatchSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Locates needle passages in a haystack and renders them as markup.
///
/// Pure and stateless apart from its options; a single instance may be
/// shared across threads.
///
/// # Examples
///
/// ```
/// use ocrmark::Highlighter;
///
/// let h = Highlighter::default();
/// assert_eq!(
///     h.mark("AAA BBB CCC", &["BBB", "AAA"]),
///     "<mark>AAA</mark> <mark>BBB</mark> CCC"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    options: HighlightOptions,
}

impl Highlighter {
    pub fn new(options: HighlightOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    /// Find the best-matching span for each needle, in character offsets
    /// into the original haystack, sorted ascending by start.
    ///
    /// Needles are processed longest-first so that a short needle cannot
    /// pre-empt a longer, more specific match. A needle whose best ratio
    /// does not exceed the threshold contributes no span. A span that
    /// overlaps an already-accepted span is dropped, so the returned spans
    /// are always disjoint.
    pub fn spans<S: AsRef<str>>(
        &self,
        haystack: &str,
        needles: &[S],
    ) -> Vec<MatchSpan> {
        if haystack.is_empty() {
            return Vec::new();
        }

        let mut cleaned: Vec<String> = needles
            .iter()
            .map(|n| normalize(n.as_ref()).text)
            .filter(|n| !n.is_empty())
            .collect();
        if cleaned.is_empty() {
            return Vec::new();
        }
        // Longest first; stable, so equal lengths keep input order.
        cleaned.sort_by_key(|n| std::cmp::Reverse(n.chars().count()));

        let hay = normalize(haystack);
        if hay.text.is_empty() {
            return Vec::new();
        }
        let original: Vec<char> = haystack.chars().collect();

        let mut accepted: Vec<MatchSpan> = Vec::new();
        for needle in &cleaned {
            let Some((lo, hi)) = self.best_block(needle, &hay) else {
                debug!(needle = needle.as_str(), "no block above threshold");
                continue;
            };

            let Some(span) = to_original_span(&hay, &original, lo, hi) else {
                continue;
            };

            if accepted.iter().any(|s| s.overlaps(&span)) {
                debug!(
                    needle = needle.as_str(),
                    start = span.start,
                    end = span.end,
                    "span overlaps an earlier match, dropped"
                );
                continue;
            }
            accepted.push(span);
        }

        accepted.sort();
        accepted
    }

    /// Wrap every accepted span in the configured markers.
    ///
    /// Characters outside the marked spans pass through verbatim, original
    /// whitespace and line breaks included. Degenerate inputs (empty
    /// haystack, no usable needle, nothing above the threshold) return the
    /// haystack unchanged.
    pub fn mark<S: AsRef<str>>(&self, haystack: &str, needles: &[S]) -> String {
        let spans = self.spans(haystack, needles);
        if spans.is_empty() {
            return haystack.to_string();
        }

        // Character offset -> byte offset, with a final sentinel entry.
        let char_to_byte: Vec<usize> = haystack
            .char_indices()
            .map(|(byte_idx, _)| byte_idx)
            .chain(std::iter::once(haystack.len()))
            .collect();

        // Insert back to front so earlier offsets never shift.
        let mut out = haystack.to_string();
        for span in spans.iter().rev() {
            let start = char_to_byte[span.start];
            let end = char_to_byte[span.end];
            out = format!(
                "{}{}{}{}{}",
                &out[..start],
                self.options.open_marker,
                &out[start..end],
                self.options.close_marker,
                &out[end..]
            );
        }

        out
    }

    /// Best matching block for one normalized needle, as offsets into the
    /// normalized haystack, or `None` if nothing strictly exceeds the
    /// threshold.
    ///
    /// Each non-empty matching block is scored by the similarity ratio
    /// between the needle and the haystack substring the block spans; the
    /// first block reaching the maximum ratio wins.
    fn best_block(
        &self,
        needle: &str,
        hay: &NormalizedText,
    ) -> Option<(usize, usize)> {
        let matcher = BlockMatcher::new(needle, &hay.text);
        let hay_chars: Vec<char> = hay.text.chars().collect();

        let mut best: Option<(usize, usize)> = None;
        let mut best_ratio = self.options.threshold;
        for block in matcher.matching_blocks() {
            if block.len == 0 {
                continue;
            }
            let candidate: String = hay_chars
                [block.b_start..block.b_start + block.len]
                .iter()
                .collect();
            let ratio = BlockMatcher::new(needle, &candidate).ratio();
            if ratio > best_ratio {
                best_ratio = ratio;
                best = Some((block.b_start, block.b_start + block.len));
            }
        }

        best
    }
}

/// Map a normalized-haystack range back to original character offsets,
/// trimmed so the span starts and ends on non-whitespace content.
///
/// Returns `None` when trimming leaves nothing (a span over collapsed
/// whitespace only).
fn to_original_span(
    hay: &NormalizedText,
    original: &[char],
    lo: usize,
    hi: usize,
) -> Option<MatchSpan> {
    debug_assert!(lo < hi && hi <= hay.char_len());

    let mut start = hay.source_index(lo);
    let mut end = hay.source_index(hi - 1) + 1;
    while start < end && original[start].is_whitespace() {
        start += 1;
    }
    while end > start && original[end - 1].is_whitespace() {
        end -= 1;
    }

    (start < end).then_some(MatchSpan { start, end })
}

/// Locate `needles` in `haystack` and wrap the best matches in `<mark>`
/// tags, with the default threshold. Convenience wrapper around
/// [`Highlighter::mark`].
pub fn locate_and_mark<S: AsRef<str>>(haystack: &str, needles: &[S]) -> String {
    Highlighter::default().mark(haystack, needles)
}
