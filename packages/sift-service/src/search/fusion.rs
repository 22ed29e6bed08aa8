use std::cmp::Ordering;

use serde::Serialize;

use sift_domain::{fuzzy, normalize::Normalizer, record::Record};

/// Candidates must score strictly above this to be returned.
pub const RELEVANCE_FLOOR: f32 = 70.0;
/// Lexical similarity below this skips fuzzy scoring entirely.
pub const LEXICAL_PREFILTER: f32 = 0.015;

/// Weights for the corpus-resident lexical pipeline.
pub const LEXICAL_WEIGHTS: FusionWeights =
	FusionWeights { retrieval: 200.0, name: 1.5, context: 0.5 };
/// Weights for the hashed-vector pipeline. Context weighs 0.6 here, not 0.5.
pub const VECTOR_WEIGHTS: FusionWeights =
	FusionWeights { retrieval: 200.0, name: 1.5, context: 0.6 };

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FusionWeights {
	pub retrieval: f32,
	pub name: f32,
	pub context: f32,
}
impl FusionWeights {
	pub fn fuse(&self, similarity: f32, fuzzy: FuzzyScores) -> f32 {
		similarity * self.retrieval
			+ f32::from(fuzzy.name) * self.name
			+ f32::from(fuzzy.context) * self.context
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuzzyScores {
	pub name: u8,
	pub context: u8,
}
impl FuzzyScores {
	/// `folded_query` must already be passed through [`Normalizer::fold`].
	pub fn compute(normalizer: &Normalizer, record: &Record, folded_query: &str) -> Self {
		let name = fuzzy::token_set_ratio(&normalizer.fold(&record.name), folded_query);
		let context = fuzzy::token_set_ratio(&normalizer.fold(&record.context_text()), folded_query);

		Self { name, context }
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct ScoredRecord {
	pub record: Record,
	pub score: f32,
}

/// Applies the relevance floor, sorts by score descending, and keeps the first `limit`.
///
/// The sort is stable: equal scores keep the order the candidates arrived in.
pub fn finalize(mut candidates: Vec<ScoredRecord>, limit: usize) -> Vec<ScoredRecord> {
	candidates.retain(|candidate| candidate.score > RELEVANCE_FLOOR);
	candidates.sort_by(|a, b| cmp_score_desc(a.score, b.score));
	candidates.truncate(limit);

	candidates
}

fn cmp_score_desc(a: f32, b: f32) -> Ordering {
	b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::{FuzzyScores, LEXICAL_WEIGHTS, ScoredRecord, VECTOR_WEIGHTS, finalize};
	use sift_domain::{normalize::Normalizer, record::Record};

	fn scored(id: i64, score: f32) -> ScoredRecord {
		ScoredRecord {
			record: Record {
				id,
				name: format!("record {id}"),
				description: String::new(),
				primary_sector: String::new(),
				secondary_sector: String::new(),
				tag: None,
				stage: "Seed".to_string(),
				attributes: json!({}),
			},
			score,
		}
	}

	fn ids(items: &[ScoredRecord]) -> Vec<i64> {
		items.iter().map(|item| item.record.id).collect()
	}

	#[test]
	fn finalize_enforces_strict_floor() {
		let out = finalize(vec![scored(1, 70.0), scored(2, 70.01), scored(3, 12.0)], 5);

		assert_eq!(ids(&out), vec![2]);
	}

	#[test]
	fn finalize_sort_is_stable_for_ties() {
		let out = finalize(
			vec![scored(1, 80.0), scored(2, 95.0), scored(3, 80.0), scored(4, 80.0)],
			10,
		);

		assert_eq!(ids(&out), vec![2, 1, 3, 4]);
	}

	#[test]
	fn finalize_truncates_to_limit() {
		let out = finalize((1..=8).map(|id| scored(id, 100.0 + id as f32)).collect(), 3);

		assert_eq!(ids(&out), vec![8, 7, 6]);
	}

	#[test]
	fn finalize_drops_nan_scores() {
		let out = finalize(vec![scored(1, f32::NAN), scored(2, 90.0)], 5);

		assert_eq!(ids(&out), vec![2]);
	}

	#[test]
	fn pipelines_weigh_context_differently() {
		let fuzzy = FuzzyScores { name: 40, context: 50 };

		assert!((LEXICAL_WEIGHTS.fuse(0.25, fuzzy) - 135.0).abs() < 1e-3);
		assert!((VECTOR_WEIGHTS.fuse(0.25, fuzzy) - 140.0).abs() < 1e-3);
	}

	#[test]
	fn fuzzy_scores_match_transliterated_names() {
		let normalizer = Normalizer::portuguese().expect("Failed to build normalizer.");
		let mut record = scored(1, 0.0).record;

		record.name = "Кофе Москва".to_string();

		let scores = FuzzyScores::compute(&normalizer, &record, &normalizer.fold("Кофе"));

		assert_eq!(scores.name, 100);
	}
}
