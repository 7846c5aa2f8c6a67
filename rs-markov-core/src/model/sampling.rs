use rand::Rng;

use crate::error::ModelError;

/// Draws an index from `weights` with probability `weights[i] / sum(weights)`.
///
/// A uniform value is drawn in `[0, total)` and the first index whose
/// cumulative weight exceeds it is returned. All arithmetic is integral, so
/// the only randomness-related rounding is in the uniform draw itself.
///
/// This method performs:
/// - an O(n) pass to compute the total weight
/// - an O(n) cumulative subtraction to select a bucket
///
/// # Errors
/// - `EmptyDistribution` if `weights` is empty or every weight is zero.
/// - `WeightOverflow` if the total weight does not fit in a `usize`.
pub fn discrete<R: Rng + ?Sized>(weights: &[usize], rng: &mut R) -> Result<usize, ModelError> {
	let total = weights
		.iter()
		.try_fold(0usize, |acc, &weight| acc.checked_add(weight))
		.ok_or(ModelError::WeightOverflow)?;
	if total == 0 {
		return Err(ModelError::EmptyDistribution);
	}

	let mut r = rng.random_range(0..total);
	let mut fallback = None;
	for (index, &weight) in weights.iter().enumerate() {
		if r < weight {
			return Ok(index);
		}
		r -= weight;
		if weight > 0 {
			fallback = Some(index);
		}
	}

	// r < total, so a bucket is always selected above
	fallback.ok_or(ModelError::EmptyDistribution)
}
