use std::collections::HashMap;
use std::fmt;

use log::debug;
use rand::Rng;

use super::sampling::discrete;
use crate::error::ModelError;

/// Number of character codes in the supported alphabet (7-bit ASCII).
pub const ALPHABET_SIZE: usize = 128;

/// Occurrences of each character following a k-gram, indexed by character code.
pub type NextCharFrequency = [usize; ALPHABET_SIZE];

/// Represents an order-`k` Markov model over the characters of a training text.
///
/// The text is read circularly: its first `k` characters are conceptually
/// appended to its end, so every one of the `len(text)` starting positions
/// has both a k-gram and a character following it.
///
/// # Responsibilities
/// - Count every k-gram of the circular text
/// - Count, for each k-gram, the characters that follow it
/// - Sample a next character with probability proportional to those counts
///
/// # Invariants
/// - `kgrams` and `next_chars` have exactly the same key set
/// - For every key, `kgrams[key] == sum(next_chars[key])`
/// - The sum of all `kgrams` counts equals `observations`
/// - Tables are never mutated after construction
#[derive(Clone, Debug)]
pub struct MarkovModel {
	/// The order of the model (length of every k-gram)
	order: usize,

	/// Length of the training text, i.e. the number of k-gram occurrences
	observations: usize,

	/// Number of times each k-gram occurs in the circular text
	kgrams: HashMap<String, usize>,

	/// Follow-character counts of each k-gram.
	/// Boxed, as each table is a fixed block of `ALPHABET_SIZE` counters.
	next_chars: HashMap<String, Box<NextCharFrequency>>,
}

impl MarkovModel {
	/// Builds a Markov model of order `order` from `text`.
	///
	/// Both tables are populated in a single pass over the circular text.
	///
	/// # Errors
	/// - `EmptyText` if `text` is empty.
	/// - `NonAsciiText` if `text` contains a character outside 7-bit ASCII.
	/// - `InvalidOrder` if `order > text.len()`.
	pub fn new(text: &str, order: usize) -> Result<Self, ModelError> {
		if text.is_empty() {
			return Err(ModelError::EmptyText);
		}
		if let Some((position, character)) = text.char_indices().find(|(_, c)| !c.is_ascii()) {
			return Err(ModelError::NonAsciiText { position, character });
		}
		if order > text.len() {
			return Err(ModelError::InvalidOrder { order, len: text.len() });
		}

		// Text is ASCII from here on, so byte offsets are character offsets
		let circular = format!("{text}{}", &text[..order]);
		let bytes = circular.as_bytes();

		let mut kgrams: HashMap<String, usize> = HashMap::new();
		let mut next_chars: HashMap<String, Box<NextCharFrequency>> = HashMap::new();

		for i in 0..text.len() {
			let key = &circular[i..i + order];
			let next = bytes[i + order] as usize;

			*kgrams.entry(key.to_owned()).or_insert(0) += 1;
			next_chars
				.entry(key.to_owned())
				.or_insert_with(|| Box::new([0; ALPHABET_SIZE]))[next] += 1;
		}

		debug!(
			"built order-{} model: {} distinct k-grams over {} positions",
			order,
			kgrams.len(),
			text.len()
		);

		Ok(Self { order, observations: text.len(), kgrams, next_chars })
	}

	/// Returns the order of the model (also known as `k`).
	pub fn order(&self) -> usize {
		self.order
	}

	/// Returns the number of k-gram occurrences recorded, which is the
	/// length of the training text.
	pub fn observations(&self) -> usize {
		self.observations
	}

	/// Iterates over every observed k-gram together with its count.
	///
	/// No ordering is guaranteed.
	pub fn kgrams(&self) -> impl Iterator<Item = (&str, usize)> {
		self.kgrams.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// Returns the number of times `kgram` appeared in the circular text,
	/// or 0 if it was never observed.
	///
	/// # Errors
	/// Returns `KGramLength` if `kgram` is not exactly `k` characters long.
	pub fn frequency(&self, kgram: &str) -> Result<usize, ModelError> {
		self.check_kgram(kgram)?;
		Ok(self.kgrams.get(kgram).copied().unwrap_or(0))
	}

	/// Returns the number of times `next` followed `kgram` in the circular
	/// text, or 0 if `kgram` was never observed.
	///
	/// # Errors
	/// - `KGramLength` if `kgram` is not exactly `k` characters long.
	/// - `CharacterOutOfAlphabet` if `next` is not a 7-bit ASCII character.
	pub fn follow_frequency(&self, kgram: &str, next: char) -> Result<usize, ModelError> {
		self.check_kgram(kgram)?;
		if !next.is_ascii() {
			return Err(ModelError::CharacterOutOfAlphabet(next));
		}
		Ok(self.next_chars.get(kgram).map_or(0, |counts| counts[next as usize]))
	}

	/// Draws a character that followed `kgram`, chosen with weight
	/// proportional to the number of times it did so.
	///
	/// The model itself is left untouched; only `rng` advances.
	///
	/// # Errors
	/// - `KGramLength` if `kgram` is not exactly `k` characters long.
	/// - `UnknownKGram` if `kgram` never appeared in the training text.
	pub fn sample<R: Rng + ?Sized>(&self, kgram: &str, rng: &mut R) -> Result<char, ModelError> {
		self.check_kgram(kgram)?;
		let counts = self
			.next_chars
			.get(kgram)
			.ok_or_else(|| ModelError::UnknownKGram(kgram.to_owned()))?;

		let code = discrete(&counts[..], rng)?;
		// code < ALPHABET_SIZE
		Ok(char::from(code as u8))
	}

	/// Same as [`MarkovModel::sample`], drawing from the thread-local RNG.
	pub fn predict(&self, kgram: &str) -> Result<char, ModelError> {
		self.sample(kgram, &mut rand::rng())
	}

	fn check_kgram(&self, kgram: &str) -> Result<(), ModelError> {
		let actual = kgram.chars().count();
		if actual != self.order {
			return Err(ModelError::KGramLength { expected: self.order, actual });
		}
		Ok(())
	}
}

/// Diagnostic dump: one line per k-gram in sorted order, listing each
/// non-zero follow character and its count.
///
/// Not a stable format.
impl fmt::Display for MarkovModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut keys: Vec<&String> = self.next_chars.keys().collect();
		keys.sort();

		for key in keys {
			write!(f, "{key}: ")?;
			for (code, &count) in self.next_chars[key].iter().enumerate() {
				if count != 0 {
					write!(f, "{} {} ", char::from(code as u8), count)?;
				}
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	const REFERENCE: &str = "gagggagaggcgagaaa";

	#[test]
	fn banana_wraps_around() {
		let model = MarkovModel::new("banana", 2).unwrap();
		assert_eq!(model.order(), 2);
		assert_eq!(model.frequency("an"), Ok(2));
		assert_eq!(model.frequency("na"), Ok(2));
		assert_eq!(model.frequency("ba"), Ok(1));
		// "ab" only exists across the boundary
		assert_eq!(model.frequency("ab"), Ok(1));
		assert_eq!(model.follow_frequency("ab", 'a'), Ok(1));
		// the trailing "na" is followed by the wrapped-around 'b'
		assert_eq!(model.follow_frequency("na", 'b'), Ok(1));
		assert_eq!(model.follow_frequency("na", 'n'), Ok(1));
	}

	#[test]
	fn reference_counts() {
		let model = MarkovModel::new(REFERENCE, 2).unwrap();
		assert_eq!(model.frequency("ag"), Ok(5));
		assert_eq!(model.follow_frequency("ag", 'g'), Ok(2));
		assert_eq!(model.follow_frequency("ag", 'a'), Ok(3));
		assert_eq!(model.follow_frequency("ag", 'c'), Ok(0));
		assert_eq!(model.frequency("ga"), Ok(5));
		assert_eq!(model.frequency("gg"), Ok(3));
		assert_eq!(model.frequency("cc"), Ok(0));
		assert_eq!(model.follow_frequency("cc", 'a'), Ok(0));
	}

	#[test]
	fn order_zero_is_global_distribution() {
		let model = MarkovModel::new("banana", 0).unwrap();
		assert_eq!(model.kgrams().collect::<Vec<_>>(), vec![("", 6)]);
		assert_eq!(model.follow_frequency("", 'a'), Ok(3));
		assert_eq!(model.follow_frequency("", 'n'), Ok(2));
		assert_eq!(model.follow_frequency("", 'b'), Ok(1));
	}

	#[test]
	fn order_equal_to_length_uses_rotations() {
		let model = MarkovModel::new("abc", 3).unwrap();
		assert_eq!(model.frequency("abc"), Ok(1));
		assert_eq!(model.frequency("bca"), Ok(1));
		assert_eq!(model.frequency("cab"), Ok(1));
		assert_eq!(model.follow_frequency("abc", 'a'), Ok(1));
		assert_eq!(model.observations(), 3);
	}

	#[test]
	fn rejects_invalid_construction() {
		assert_eq!(MarkovModel::new("", 0).unwrap_err(), ModelError::EmptyText);
		assert_eq!(
			MarkovModel::new("abc", 4).unwrap_err(),
			ModelError::InvalidOrder { order: 4, len: 3 }
		);
		assert_eq!(
			MarkovModel::new("caf\u{e9}", 1).unwrap_err(),
			ModelError::NonAsciiText { position: 3, character: '\u{e9}' }
		);
	}

	#[test]
	fn rejects_wrong_kgram_length() {
		let model = MarkovModel::new(REFERENCE, 2).unwrap();
		for kgram in ["", "a", "agg", "gagg"] {
			let error = model.frequency(kgram).unwrap_err();
			assert_eq!(error.kind(), ErrorKind::InvalidArgument);
			assert_eq!(model.follow_frequency(kgram, 'a').unwrap_err(), error);
			assert_eq!(model.predict(kgram).unwrap_err(), error);
		}
	}

	#[test]
	fn rejects_character_outside_alphabet() {
		let model = MarkovModel::new(REFERENCE, 2).unwrap();
		assert_eq!(
			model.follow_frequency("ag", '\u{e9}'),
			Err(ModelError::CharacterOutOfAlphabet('\u{e9}'))
		);
	}

	#[test]
	fn sampling_unknown_kgram_is_not_found() {
		let model = MarkovModel::new(REFERENCE, 2).unwrap();
		let error = model.predict("cc").unwrap_err();
		assert_eq!(error, ModelError::UnknownKGram("cc".to_owned()));
		assert_eq!(error.kind(), ErrorKind::NotFound);
	}

	#[test]
	fn sampling_matches_follow_ratio() {
		let model = MarkovModel::new(REFERENCE, 2).unwrap();
		let mut rng = StdRng::seed_from_u64(2024);
		let (mut a, mut g) = (0usize, 0usize);
		for _ in 0..10_000 {
			match model.sample("ag", &mut rng).unwrap() {
				'a' => a += 1,
				'g' => g += 1,
				other => panic!("unexpected follower {other:?}"),
			}
		}
		let ratio = a as f64 / g as f64;
		assert!((1.35..1.65).contains(&ratio), "ratio {ratio}");
	}

	#[test]
	fn queries_are_idempotent() {
		let model = MarkovModel::new(REFERENCE, 2).unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		let before = model.to_string();
		for _ in 0..100 {
			model.sample("ga", &mut rng).unwrap();
			assert_eq!(model.frequency("ga"), Ok(5));
			assert_eq!(model.follow_frequency("ga", 'g'), Ok(4));
		}
		assert_eq!(model.to_string(), before);
	}

	#[test]
	fn dump_lists_non_zero_followers() {
		let model = MarkovModel::new("banana", 2).unwrap();
		assert_eq!(model.to_string(), "ab: a 1 \nan: a 2 \nba: n 1 \nna: b 1 n 1 \n");
	}
}
