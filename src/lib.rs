//! ocrmark - fuzzy highlighting of retrieval snippets in noisy OCR text.
//!
//! Hybrid vector/lexical search over digitized historical texts returns
//! short chunks that rarely match the source page character for character:
//! the index is often built from a cleaned or machine-corrected variant of
//! imperfect OCR. ocrmark locates the best-matching contiguous span for
//! each retrieved chunk in the original page text and wraps it in marker
//! strings for display, tolerating OCR noise and minor wording differences.
//!
//! # Quick start
//!
//! ```
//! use ocrmark::{Highlighter, locate_and_mark};
//!
//! assert_eq!(
//!     locate_and_mark("AAA BBB CCC", &["BBB", "AAA"]),
//!     "<mark>AAA</mark> <mark>BBB</mark> CCC"
//! );
//!
//! // Spans instead of markup, for callers that render themselves.
//! let spans = Highlighter::default().spans("AAA BBB CCC", &["BBB"]);
//! assert_eq!((spans[0].start, spans[0].end), (4, 7));
//! ```

pub mod cli;
pub mod error;
pub mod highlight;
pub mod matcher;
pub mod normalize;

pub use error::{Error, Result};
pub use highlight::{
    HighlightOptions, Highlighter, MatchSpan, locate_and_mark,
};
