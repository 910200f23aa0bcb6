//! Basic tokenizer for query compilation and token streams
//!
//! This module provides simple text tokenization. Engine implementations
//! with their own analyzers only need to produce the same [`Token`] shape;
//! this tokenizer is the reference used for query-term extraction.

use crate::types::Token;

/// Tokenize text into searchable terms
///
/// - Lowercase
/// - Split on non-alphanumeric characters
/// - Filter tokens shorter than 2 bytes
///
/// # Example
///
/// ```
/// use sift_core::tokenizer::tokenize;
///
/// let tokens = tokenize("Hello, World!");
/// assert_eq!(tokens, vec!["hello", "world"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_with_offsets(text)
        .into_iter()
        .map(|t| t.text)
        .collect()
}

/// Tokenize and deduplicate for query processing
///
/// # Example
///
/// ```
/// use sift_core::tokenizer::tokenize_unique;
///
/// let tokens = tokenize_unique("test test TEST");
/// assert_eq!(tokens, vec!["test"]);
/// ```
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Tokenize text keeping byte offsets into the original string
///
/// Offsets always fall on char boundaries of `text`. Token text is
/// lowercased; offsets refer to the original (non-lowercased) bytes.
///
/// # Example
///
/// ```
/// use sift_core::tokenizer::tokenize_with_offsets;
///
/// let tokens = tokenize_with_offsets("Hello, World!");
/// assert_eq!(tokens[1].text, "world");
/// assert_eq!(&"Hello, World!"[tokens[1].start..tokens[1].end], "World");
/// ```
pub fn tokenize_with_offsets(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_alphanumeric() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            push_token(text, s, i, &mut tokens);
        }
    }
    if let Some(s) = start {
        push_token(text, s, text.len(), &mut tokens);
    }
    tokens
}

fn push_token(text: &str, start: usize, end: usize, out: &mut Vec<Token>) {
    let raw = &text[start..end];
    if raw.len() >= 2 {
        out.push(Token {
            text: raw.to_lowercase(),
            start,
            end,
        });
    }
}
