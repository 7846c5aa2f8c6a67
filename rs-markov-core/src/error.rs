use thiserror::Error;

/// Broad classification of a [`ModelError`].
///
/// Every failure reported by the model is either a misuse by the caller
/// (`InvalidArgument`) or a query with nothing to answer it (`NotFound`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	InvalidArgument,
	NotFound,
}

/// Errors raised while building or querying a `MarkovModel`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
	#[error("order {order} is out of range for a text of length {len} (expected 0 <= k <= {len})")]
	InvalidOrder { order: usize, len: usize },

	#[error("training text is empty")]
	EmptyText,

	#[error("training text contains non-ASCII character {character:?} at byte {position}")]
	NonAsciiText { position: usize, character: char },

	#[error("k-gram must be of length {expected}, got {actual}")]
	KGramLength { expected: usize, actual: usize },

	#[error("character {0:?} is outside the 7-bit ASCII alphabet")]
	CharacterOutOfAlphabet(char),

	#[error("seed must be of length {expected}, got {actual}")]
	SeedLength { expected: usize, actual: usize },

	#[error("k-gram {0:?} never appeared in the training text")]
	UnknownKGram(String),

	#[error("cannot sample from a distribution with no positive weight")]
	EmptyDistribution,

	#[error("sum of weights overflows")]
	WeightOverflow,
}

impl ModelError {
	/// Returns the kind of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			ModelError::UnknownKGram(_) | ModelError::EmptyDistribution => ErrorKind::NotFound,
			_ => ErrorKind::InvalidArgument,
		}
	}
}
