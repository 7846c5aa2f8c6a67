//! Character-level Markov model and the machinery around it:
//! - Fixed-order frequency model (`MarkovModel`)
//! - Weighted discrete sampling (`sampling`)
//! - Text generation driver (`Generator`)

/// Fixed-order Markov model built from a circular training text.
///
/// Holds the k-gram and follow-character frequency tables and exposes
/// counting and sampling queries over them.
pub mod markov_model;

/// Weighted discrete sampling over integer weights.
pub mod sampling;

/// Sliding-window text generation on top of a `MarkovModel`.
pub mod generator;

pub use generator::{Generator, seed_of};
pub use markov_model::{ALPHABET_SIZE, MarkovModel, NextCharFrequency};
