//! Block matching between two character sequences.
//!
//! This is the similarity primitive underneath the highlighter: find all
//! maximal runs of characters that two strings share in order, and score an
//! arbitrary pair of strings with a normalized ratio. The search follows the
//! Ratcliff/Obershelp scheme (repeatedly take the longest common run, then
//! recurse on the pieces to its left and right).
//!
//! Everything here works in *character* offsets, never bytes, so multi-byte
//! text (umlauts, the long s, ligatures in old OCR output) is safe. Byte
//! positions only matter at render time, in [`crate::highlight`].

use std::collections::HashMap;

/// A maximal run of identical characters common to both sequences.
///
/// `a[a_start..a_start + len] == b[b_start..b_start + len]`, in character
/// offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Start of the run in the first sequence.
    pub a_start: usize,
    /// Start of the run in the second sequence.
    pub b_start: usize,
    /// Run length in characters.
    pub len: usize,
}

/// Finds matching blocks between two strings and scores their similarity.
///
/// # Examples
///
/// ```
/// use ocrmark::matcher::BlockMatcher;
///
/// let m = BlockMatcher::new("abxcd", "abycd");
/// let blocks = m.matching_blocks();
/// assert_eq!(blocks.len(), 2);
/// assert_eq!((blocks[0].a_start, blocks[0].b_start, blocks[0].len), (0, 0, 2));
/// assert_eq!((blocks[1].a_start, blocks[1].b_start, blocks[1].len), (3, 3, 2));
/// assert!((m.ratio() - 0.8).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct BlockMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// Positions of each character in `b`, ascending.
    b_index: HashMap<char, Vec<usize>>,
}

impl BlockMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b_index.entry(c).or_default().push(j);
        }
        Self { a, b, b_index }
    }

    /// Longest common run within `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
    ///
    /// Among equally long runs the earliest wins (smallest `a_start`, then
    /// smallest `b_start`), so block enumeration is deterministic.
    fn longest_match(
        &self,
        a_lo: usize,
        a_hi: usize,
        b_lo: usize,
        b_hi: usize,
    ) -> Block {
        let mut best = Block {
            a_start: a_lo,
            b_start: b_lo,
            len: 0,
        };

        // run_lengths[j] = length of the common run ending at a[i-1], b[j].
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();
        for i in a_lo..a_hi {
            let mut next_runs: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < b_lo {
                        continue;
                    }
                    if j >= b_hi {
                        break;
                    }
                    let len = if j > b_lo {
                        run_lengths.get(&(j - 1)).copied().unwrap_or(0) + 1
                    } else {
                        1
                    };
                    next_runs.insert(j, len);
                    if len > best.len {
                        best = Block {
                            a_start: i + 1 - len,
                            b_start: j + 1 - len,
                            len,
                        };
                    }
                }
            }
            run_lengths = next_runs;
        }

        best
    }

    /// All matching blocks between the two sequences.
    ///
    /// Blocks are non-overlapping, sorted by position, and adjacent blocks
    /// are coalesced into one. Returns an empty vector when the sequences
    /// share nothing (or either is empty).
    pub fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut raw: Vec<Block> = Vec::new();

        while let Some((a_lo, a_hi, b_lo, b_hi)) = queue.pop() {
            let m = self.longest_match(a_lo, a_hi, b_lo, b_hi);
            if m.len == 0 {
                continue;
            }
            if a_lo < m.a_start && b_lo < m.b_start {
                queue.push((a_lo, m.a_start, b_lo, m.b_start));
            }
            if m.a_start + m.len < a_hi && m.b_start + m.len < b_hi {
                queue.push((m.a_start + m.len, a_hi, m.b_start + m.len, b_hi));
            }
            raw.push(m);
        }

        raw.sort_by_key(|m| (m.a_start, m.b_start));

        let mut blocks: Vec<Block> = Vec::new();
        for m in raw {
            if let Some(last) = blocks.last_mut()
                && last.a_start + last.len == m.a_start
                && last.b_start + last.len == m.b_start
            {
                last.len += m.len;
                continue;
            }
            blocks.push(m);
        }

        blocks
    }

    /// Similarity ratio in `[0, 1]`: `2·M / (len(a) + len(b))` where `M` is
    /// the total length of all matching blocks.
    ///
    /// Two empty strings are defined as identical (ratio `1.0`).
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize =
            self.matching_blocks().iter().map(|m| m.len).sum();
        2.0 * matched as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_single_block() {
        let m = BlockMatcher::new("abcdef", "abcdef");
        let blocks = m.matching_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0],
            Block {
                a_start: 0,
                b_start: 0,
                len: 6
            }
        );
        assert_eq!(m.ratio(), 1.0);
    }

    #[test]
    fn disjoint_strings_no_blocks() {
        let m = BlockMatcher::new("abc", "xyz");
        assert!(m.matching_blocks().is_empty());
        assert_eq!(m.ratio(), 0.0);
    }

    #[test]
    fn partial_overlap_two_blocks() {
        let m = BlockMatcher::new("abxcd", "abycd");
        let blocks = m.matching_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].b_start, blocks[0].len), (0, 2));
        assert_eq!((blocks[1].b_start, blocks[1].len), (3, 2));
        // 2 * 4 / 10
        assert!((m.ratio() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn needle_inside_longer_haystack() {
        let m = BlockMatcher::new("BBB", "AAA BBB CCC");
        let blocks = m.matching_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0],
            Block {
                a_start: 0,
                b_start: 4,
                len: 3
            }
        );
    }

    #[test]
    fn empty_inputs() {
        assert!(BlockMatcher::new("", "abc").matching_blocks().is_empty());
        assert!(BlockMatcher::new("abc", "").matching_blocks().is_empty());
        assert_eq!(BlockMatcher::new("", "abc").ratio(), 0.0);
        assert_eq!(BlockMatcher::new("", "").ratio(), 1.0);
    }

    #[test]
    fn earliest_of_equal_runs_wins() {
        // "ab" occurs twice in the haystack; the first occurrence is chosen.
        let m = BlockMatcher::new("ab", "ab ab");
        let blocks = m.matching_blocks();
        assert_eq!(blocks[0].b_start, 0);
        assert_eq!(blocks[0].len, 2);
    }

    #[test]
    fn adjacent_blocks_coalesce() {
        // The recursion finds "abcd" in one piece even though the left and
        // right halves could be matched separately.
        let m = BlockMatcher::new("abcd", "abcd");
        let blocks = m.matching_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].len, 4);
    }

    #[test]
    fn multibyte_characters_counted_as_chars() {
        let m = BlockMatcher::new("Pferde", "Gebürge und Pferde");
        let blocks = m.matching_blocks();
        assert_eq!(blocks.len(), 1);
        // "Gebürge und " is 12 characters; ü is one char, two bytes.
        assert_eq!(blocks[0].b_start, 12);
        assert_eq!(blocks[0].len, 6);
    }

    #[test]
    fn ratio_counts_all_blocks() {
        // Common content "ab" + "cd" split by differing middles.
        let m = BlockMatcher::new("abXcd", "abYcd");
        let matched: usize =
            m.matching_blocks().iter().map(|b| b.len).sum();
        assert_eq!(matched, 4);
    }

    #[test]
    fn repeated_characters() {
        let m = BlockMatcher::new("aaa", "aaaaa");
        let blocks = m.matching_blocks();
        assert_eq!(blocks[0].len, 3);
        assert!((m.ratio() - 0.75).abs() < 1e-9);
    }
}
