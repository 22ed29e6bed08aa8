use std::sync::Arc;

use crate::normalize::Normalizer;

/// Width of every hashed vector, persisted and transient alike.
pub const HASHED_DIMENSIONS: usize = 1_024;

/// Corpus-independent bag-of-tokens encoder.
///
/// Each token lands in one bucket chosen by a stable hash and adds `1.0` there. Vectors are not
/// normalized; cosine distance in the store ignores magnitude anyway.
#[derive(Clone)]
pub struct HashedEncoder {
	normalizer: Arc<Normalizer>,
}
impl HashedEncoder {
	pub fn new(normalizer: Arc<Normalizer>) -> Self {
		Self { normalizer }
	}

	pub fn encode(&self, text: &str) -> Vec<f32> {
		let mut vec = vec![0.0_f32; HASHED_DIMENSIONS];

		for token in self.normalizer.tokenize(text) {
			vec[bucket(&token)] += 1.0;
		}

		vec
	}
}

pub fn bucket(token: &str) -> usize {
	let digest = blake3::hash(token.as_bytes());
	let mut prefix = [0_u8; 8];

	prefix.copy_from_slice(&digest.as_bytes()[..8]);

	(u64::from_le_bytes(prefix) % HASHED_DIMENSIONS as u64) as usize
}

pub fn is_zero(vec: &[f32]) -> bool {
	vec.iter().all(|value| *value == 0.0)
}
