//! Character-level Markov text generation library.
//!
//! This crate provides:
//! - An order-`k` Markov model over 7-bit ASCII text, built from a
//!   circular reading of the training text
//! - Frequency queries and weighted-random sampling over that model
//! - A generation driver sliding a `k`-character window
//! - Small I/O helpers to read training text in full
//!
//! A model is immutable once built; it can be shared read-only between
//! threads without locking.

/// Markov model, sampling primitive and generation driver.
pub mod model;

/// Error type shared by every operation of the crate.
pub mod error;

/// I/O utilities (reading training text).
pub mod io;

pub use error::{ErrorKind, ModelError};
pub use model::{Generator, MarkovModel};
