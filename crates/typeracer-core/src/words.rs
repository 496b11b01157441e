//! The words a player can be prompted with.

/// Drawn from at random, with replacement, one prompt at a time.
pub static VOCABULARY: &[&str] = &["apple", "banana", "cherry", "date", "elderberry"];
