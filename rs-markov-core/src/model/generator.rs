use rand::Rng;

use crate::error::ModelError;
use crate::model::markov_model::MarkovModel;

/// Returns the first `order` characters of `text`, the conventional seed
/// of a generation run.
///
/// Returns `None` if `text` is shorter than `order` characters.
pub fn seed_of(text: &str, order: usize) -> Option<&str> {
	match text.char_indices().nth(order) {
		Some((end, _)) => Some(&text[..end]),
		None if text.chars().count() == order => Some(text),
		None => None,
	}
}

/// Drives a `MarkovModel` to produce a stream of characters.
///
/// # Responsibilities
/// - Hold the trailing window of the last `k` characters
/// - Sample the next character from the model given that window
/// - Slide the window (drop the oldest character, append the new one)
///
/// # Notes
/// - With `k == 0` the window is always empty, so every draw comes from
///   the global character distribution of the training text.
/// - When seeded from the training text, every window reached was observed
///   during training (the text is circular), so sampling never runs into
///   an unknown k-gram.
#[derive(Debug)]
pub struct Generator<'a, R> {
	model: &'a MarkovModel,
	window: String,
	rng: R,
	/// Set once a draw fails; the iterator ends after reporting it
	failed: bool,
}

impl<'a, R: Rng> Generator<'a, R> {
	/// Creates a generator whose window starts at `seed`.
	///
	/// # Errors
	/// Returns `SeedLength` if `seed` is not exactly `k` characters long.
	pub fn new(model: &'a MarkovModel, seed: &str, rng: R) -> Result<Self, ModelError> {
		let actual = seed.chars().count();
		if actual != model.order() {
			return Err(ModelError::SeedLength { expected: model.order(), actual });
		}
		Ok(Self { model, window: seed.to_owned(), rng, failed: false })
	}

	/// Returns the current trailing window.
	pub fn window(&self) -> &str {
		&self.window
	}

	/// Samples one character and slides the window over it.
	pub fn next_char(&mut self) -> Result<char, ModelError> {
		let next = self.model.sample(&self.window, &mut self.rng)?;
		if !self.window.is_empty() {
			self.window.remove(0);
			self.window.push(next);
		}
		Ok(next)
	}

	/// Generates a text of `length` characters: the current window verbatim,
	/// followed by `length - k` sampled characters.
	///
	/// If `length <= k`, the window alone is returned.
	///
	/// The output grows as characters are drawn; nothing is reserved from
	/// `length` up front.
	pub fn generate(&mut self, length: usize) -> Result<String, ModelError> {
		let mut text = self.window.clone();
		for _ in 0..length.saturating_sub(self.model.order()) {
			text.push(self.next_char()?);
		}
		Ok(text)
	}
}

/// Stream of sampled characters.
///
/// Never ends on its own while draws succeed. After the first error it is
/// yielded once and the stream ends.
impl<R: Rng> Iterator for Generator<'_, R> {
	type Item = Result<char, ModelError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}
		let next = self.next_char();
		self.failed = next.is_err();
		Some(next)
	}
}
