//! Token-order-insensitive string similarity
//!
//! `token_sort_ratio` sorts the whitespace-separated tokens of both strings,
//! rejoins them with single spaces, and scores the results with the
//! normalized InDel ratio from `rapidfuzz`:
//!
//! ```text
//! ratio = 100 * (1 - indel / (len_a + len_b))
//! ```
//!
//! Lengths count Unicode scalar values. Scores range 0-100; two empty
//! strings score 100.

/// Similarity of two strings, ignoring token order (0-100)
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sort_tokens(a), &sort_tokens(b))
}

/// Normalized InDel similarity (0-100)
pub fn ratio(a: &str, b: &str) -> f64 {
    100.0 * rapidfuzz::fuzz::ratio(a.chars(), b.chars())
}

fn sort_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
