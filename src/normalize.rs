//! Whitespace normalization with an exact offset map back to the source.
//!
//! Matching runs on normalized text (whitespace runs collapsed to single
//! spaces, ends trimmed) so that line breaks and ragged OCR spacing do not
//! break up common runs. Rendering must happen on the *original* text, so
//! every normalized character remembers the character index it came from.

/// A normalized copy of a text together with its source offset map.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    /// The collapsed, trimmed text.
    pub text: String,
    /// For each character of `text`, its character index in the source.
    /// A collapsed whitespace run maps to the run's first character.
    map: Vec<usize>,
}

impl NormalizedText {
    /// Source character index of the `i`-th normalized character.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range; callers only pass offsets produced by
    /// matching against `text`.
    pub fn source_index(&self, i: usize) -> usize {
        self.map[i]
    }

    /// Number of characters in the normalized text.
    pub fn char_len(&self) -> usize {
        self.map.len()
    }
}

/// Collapse whitespace runs to single spaces and trim both ends, keeping a
/// map from each surviving character back to its source position.
///
/// # Examples
///
/// ```
/// use ocrmark::normalize::normalize;
///
/// let n = normalize("  the   quick\nfox ");
/// assert_eq!(n.text, "the quick fox");
/// assert_eq!(n.source_index(0), 2);  // 't'
/// assert_eq!(n.source_index(4), 8);  // 'q'
/// ```
pub fn normalize(input: &str) -> NormalizedText {
    let mut text = String::new();
    let mut map = Vec::new();
    // Source index of the first whitespace character of the pending run,
    // if one is waiting to be emitted as a single space.
    let mut pending_space: Option<usize> = None;

    for (i, c) in input.chars().enumerate() {
        if c.is_whitespace() {
            if !text.is_empty() && pending_space.is_none() {
                pending_space = Some(i);
            }
        } else {
            if let Some(ws) = pending_space.take() {
                text.push(' ');
                map.push(ws);
            }
            text.push(c);
            map.push(i);
        }
    }

    NormalizedText { text, map }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_and_trims() {
        let n = normalize("  a \t b\n\nc  ");
        assert_eq!(n.text, "a b c");
        assert_eq!(n.char_len(), 5);
    }

    #[test]
    fn already_normal_text_maps_identically() {
        let n = normalize("AAA BBB CCC");
        assert_eq!(n.text, "AAA BBB CCC");
        for i in 0..n.char_len() {
            assert_eq!(n.source_index(i), i);
        }
    }

    #[test]
    fn collapsed_run_maps_to_first_whitespace_char() {
        let n = normalize("the   quick\nfox");
        assert_eq!(n.text, "the quick fox");
        assert_eq!(n.source_index(3), 3); // collapsed "   "
        assert_eq!(n.source_index(4), 6); // 'q'
        assert_eq!(n.source_index(9), 11); // collapsed "\n"
        assert_eq!(n.source_index(10), 12); // 'f'
    }

    #[test]
    fn empty_and_whitespace_only() {
        assert_eq!(normalize("").text, "");
        assert_eq!(normalize(" \n\t ").text, "");
        assert_eq!(normalize(" \n\t ").char_len(), 0);
    }

    #[test]
    fn multibyte_offsets_are_character_based() {
        let n = normalize("Gebürge  über");
        assert_eq!(n.text, "Gebürge über");
        assert_eq!(n.source_index(8), 9); // 'ü' of "über"
    }
}
