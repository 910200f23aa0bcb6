//! Highlight fragment generation
//!
//! Produces bounded excerpts of field text with the query's terms wrapped
//! in configured markers. The field text is split into fixed-width windows
//! (in chars); each window containing at least one matched term becomes a
//! candidate fragment, scored by its match count, and the best fragments
//! win, capped per field.
//!
//! Fragments are computed per yielded match, never eagerly for the whole
//! result set, and only for configured fields: an empty field configuration
//! means this module is never invoked.
//!
//! Token offsets come from the engine's token stream and are validated
//! against the field text; malformed offsets are an error the caller wraps
//! into [`sift_core::Error::HighlightFailure`] and propagates. A partially
//! highlighted match is not a recoverable degraded result.

use sift_core::{HighlightConfig, Query, TextFragment, Token};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Width of one fragment window, in chars
pub const FRAGMENT_SIZE: usize = 100;

/// Offset-mapping failures while generating fragments
#[derive(Debug, Error)]
pub enum FragmentError {
    /// Token offsets point past the end of the field text
    #[error("token offsets {start}..{end} out of bounds for text of {len} bytes")]
    OutOfBounds {
        /// Token start offset
        start: usize,
        /// Token end offset
        end: usize,
        /// Field text length in bytes
        len: usize,
    },

    /// Token offsets fall inside a multi-byte character
    #[error("token offsets {start}..{end} not on char boundaries")]
    NotCharBoundary {
        /// Token start offset
        start: usize,
        /// Token end offset
        end: usize,
    },

    /// Two matched tokens overlap
    #[error("matched token spans overlap at byte {at}")]
    Overlap {
        /// Byte offset where the overlap begins
        at: usize,
    },
}

/// Marks a query's terms inside field text
pub struct FragmentHighlighter {
    terms: HashSet<String>,
    start_marker: String,
    end_marker: String,
}

impl FragmentHighlighter {
    /// Build a highlighter for one query and marker configuration
    pub fn for_query(query: &Query, config: &HighlightConfig) -> Self {
        FragmentHighlighter {
            terms: query.terms().iter().cloned().collect(),
            start_marker: config.start_marker.clone(),
            end_marker: config.end_marker.clone(),
        }
    }

    /// Generate up to `max_fragments` highlighted fragments for one field
    ///
    /// Returns an empty vector when nothing matches; errors only on
    /// malformed token offsets.
    pub fn highlight(
        &self,
        text: &str,
        tokens: &[Token],
        max_fragments: usize,
    ) -> Result<Vec<TextFragment>, FragmentError> {
        if max_fragments == 0 || self.terms.is_empty() {
            return Ok(vec![]);
        }

        let spans = self.matched_spans(text, tokens)?;
        if spans.is_empty() {
            return Ok(vec![]);
        }

        let windows = fragment_windows(text);

        // Group matched spans by the window their start falls into.
        let mut grouped: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
        for span in spans {
            let window = windows.partition_point(|(start, _)| *start <= span.0) - 1;
            grouped.entry(window).or_default().push(span);
        }

        let mut candidates: Vec<(usize, usize, String)> = Vec::new();
        for (window, spans) in grouped {
            let (window_start, window_end) = windows[window];
            // A span may straddle the window edge; extend to cover it.
            let fragment_end = window_end.max(spans.last().map(|(_, e)| *e).unwrap_or(0));

            let mut out = String::new();
            let mut pos = window_start;
            for (start, end) in &spans {
                out.push_str(&text[pos..*start]);
                out.push_str(&self.start_marker);
                out.push_str(&text[*start..*end]);
                out.push_str(&self.end_marker);
                pos = *end;
            }
            out.push_str(&text[pos..fragment_end]);

            candidates.push((window, spans.len(), out));
        }

        // Best fragments first: match count descending, then position.
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        candidates.truncate(max_fragments);

        Ok(candidates
            .into_iter()
            .map(|(_, count, text)| TextFragment::new(text, count as f32))
            .collect())
    }

    /// Collect and validate the byte spans of tokens matching the query
    fn matched_spans(
        &self,
        text: &str,
        tokens: &[Token],
    ) -> Result<Vec<(usize, usize)>, FragmentError> {
        let mut spans = Vec::new();
        for token in tokens {
            if !self.terms.contains(&token.text) {
                continue;
            }
            if token.start >= token.end || token.end > text.len() {
                return Err(FragmentError::OutOfBounds {
                    start: token.start,
                    end: token.end,
                    len: text.len(),
                });
            }
            if !text.is_char_boundary(token.start) || !text.is_char_boundary(token.end) {
                return Err(FragmentError::NotCharBoundary {
                    start: token.start,
                    end: token.end,
                });
            }
            spans.push((token.start, token.end));
        }

        spans.sort_unstable();
        for pair in spans.windows(2) {
            if pair[1].0 < pair[0].1 {
                return Err(FragmentError::Overlap { at: pair[1].0 });
            }
        }
        Ok(spans)
    }
}

/// Byte ranges of consecutive [`FRAGMENT_SIZE`]-char windows covering `text`
fn fragment_windows(text: &str) -> Vec<(usize, usize)> {
    let mut starts = vec![0usize];
    for (count, (offset, _)) in text.char_indices().enumerate() {
        if count > 0 && count % FRAGMENT_SIZE == 0 {
            starts.push(offset);
        }
    }

    let mut windows = Vec::with_capacity(starts.len());
    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        windows.push((*start, end));
    }
    windows
}
