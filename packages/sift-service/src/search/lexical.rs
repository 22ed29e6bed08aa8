//! Corpus-fit TF-IDF index over unigrams and bigrams.
//!
//! Weights follow the usual smoothed scheme: raw term counts, `idf = ln((1 + n) / (1 + df)) + 1`,
//! and L2-normalized document vectors, so cosine similarity is a plain dot product.

use std::{collections::HashMap, sync::Arc};

use crate::{
	BoxFuture, Ranker, Result,
	engine::LexicalEngine,
	search::fusion::{self, FuzzyScores, LEXICAL_PREFILTER, LEXICAL_WEIGHTS, ScoredRecord},
};
use sift_domain::{normalize::Normalizer, record::Record};

type SparseVector = Vec<(usize, f32)>;

/// Immutable snapshot of a corpus. Positions in `records` and `vectors` line up.
pub struct LexicalIndex {
	normalizer: Arc<Normalizer>,
	records: Vec<Record>,
	vocabulary: HashMap<String, usize>,
	idf: Vec<f32>,
	vectors: Vec<SparseVector>,
}
impl LexicalIndex {
	pub fn build(normalizer: Arc<Normalizer>, records: Vec<Record>) -> Self {
		let mut vocabulary = HashMap::new();
		let mut document_frequency: Vec<u32> = Vec::new();
		let mut counts_per_record = Vec::with_capacity(records.len());

		for record in &records {
			let mut counts: HashMap<usize, u32> = HashMap::new();

			for term in terms(&normalizer.tokenize(&record.search_text())) {
				let next_id = vocabulary.len();
				let id = *vocabulary.entry(term).or_insert(next_id);

				if id == document_frequency.len() {
					document_frequency.push(0);
				}

				*counts.entry(id).or_insert(0) += 1;
			}
			for id in counts.keys() {
				document_frequency[*id] += 1;
			}

			counts_per_record.push(counts);
		}

		let n = records.len() as f32;
		let idf: Vec<f32> =
			document_frequency.iter().map(|df| ((1.0 + n) / (1.0 + *df as f32)).ln() + 1.0).collect();
		let vectors = counts_per_record.into_iter().map(|counts| weigh(counts, &idf)).collect();

		Self { normalizer, records, vocabulary, idf, vectors }
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn vocabulary_len(&self) -> usize {
		self.vocabulary.len()
	}

	pub fn records(&self) -> &[Record] {
		&self.records
	}

	/// Cosine similarity of `query` against every record, in corpus order.
	pub fn similarities(&self, query: &str) -> Vec<f32> {
		let mut counts: HashMap<usize, u32> = HashMap::new();

		for term in terms(&self.normalizer.tokenize(query)) {
			if let Some(id) = self.vocabulary.get(&term) {
				*counts.entry(*id).or_insert(0) += 1;
			}
		}

		if counts.is_empty() {
			return vec![0.0; self.records.len()];
		}

		let query_weights: HashMap<usize, f32> = weigh(counts, &self.idf).into_iter().collect();

		self.vectors
			.iter()
			.map(|vector| {
				let dot: f32 =
					vector.iter().filter_map(|(id, w)| query_weights.get(id).map(|q| q * w)).sum();

				dot.clamp(0.0, 1.0)
			})
			.collect()
	}

	/// Pipeline A: scan every record, prefilter on lexical similarity, then fuse with fuzzy
	/// scores.
	pub fn rank(&self, query: &str, stage: Option<&str>, limit: usize) -> Vec<ScoredRecord> {
		if limit == 0 || self.is_empty() {
			return Vec::new();
		}

		let similarities = self.similarities(query);
		let folded_query = self.normalizer.fold(query);
		let mut candidates = Vec::new();

		for (record, similarity) in self.records.iter().zip(similarities) {
			if similarity < LEXICAL_PREFILTER {
				continue;
			}
			if let Some(stage) = stage
				&& record.stage != stage
			{
				continue;
			}

			let fuzzy = FuzzyScores::compute(&self.normalizer, record, &folded_query);

			candidates.push(ScoredRecord {
				record: record.clone(),
				score: LEXICAL_WEIGHTS.fuse(similarity, fuzzy),
			});
		}

		tracing::debug!(candidate_count = candidates.len(), "Lexical candidates scored.");

		fusion::finalize(candidates, limit)
	}
}

/// Serves Pipeline A from whatever snapshot the engine currently holds.
#[derive(Clone)]
pub struct LexicalRanker {
	engine: Arc<LexicalEngine>,
}
impl LexicalRanker {
	pub fn new(engine: Arc<LexicalEngine>) -> Self {
		Self { engine }
	}
}

impl Ranker for LexicalRanker {
	fn rank<'a>(
		&'a self,
		query: &'a str,
		stage: Option<&'a str>,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<ScoredRecord>>> {
		Box::pin(async move {
			let Some(index) = self.engine.snapshot() else {
				return Ok(Vec::new());
			};

			Ok(index.rank(query, stage, limit))
		})
	}
}

fn terms(tokens: &[String]) -> Vec<String> {
	let mut out = Vec::with_capacity(tokens.len() * 2);

	out.extend(tokens.iter().cloned());
	out.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));

	out
}

fn weigh(counts: HashMap<usize, u32>, idf: &[f32]) -> SparseVector {
	let mut vector: SparseVector =
		counts.into_iter().map(|(id, count)| (id, count as f32 * idf[id])).collect();
	let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();

	if norm > 0.0 {
		for (_, w) in &mut vector {
			*w /= norm;
		}
	}

	vector.sort_by_key(|(id, _)| *id);

	vector
}
