use std::sync::Arc;

use crate::{
	BoxFuture, Error, Ranker, Result, SimilarityStore, StoreHit,
	search::fusion::{self, FuzzyScores, ScoredRecord, VECTOR_WEIGHTS},
};
use sift_domain::{
	hashing::{self, HashedEncoder},
	normalize::Normalizer,
};
use sift_storage::{db::Db, queries};

/// Pipeline B: hashed query vector, nearest records from the store, then fuzzy re-ranking.
pub struct VectorRanker<S> {
	store: S,
	encoder: HashedEncoder,
	normalizer: Arc<Normalizer>,
	candidate_multiplier: usize,
}
impl<S> VectorRanker<S>
where
	S: SimilarityStore,
{
	pub fn new(
		store: S,
		encoder: HashedEncoder,
		normalizer: Arc<Normalizer>,
		candidate_multiplier: usize,
	) -> Self {
		Self { store, encoder, normalizer, candidate_multiplier: candidate_multiplier.max(1) }
	}

	async fn rank_inner(
		&self,
		query: &str,
		stage: Option<&str>,
		limit: usize,
	) -> Result<Vec<ScoredRecord>> {
		if limit == 0 {
			return Ok(Vec::new());
		}

		let vector = self.encoder.encode(query);

		// No token survived normalization, so every distance would be undefined.
		if hashing::is_zero(&vector) {
			return Ok(Vec::new());
		}

		let hits = self.store.nearest(&vector, stage, limit * self.candidate_multiplier).await?;
		let folded_query = self.normalizer.fold(query);
		let mut candidates = Vec::with_capacity(hits.len());

		for StoreHit { record, distance } in hits {
			if !distance.is_finite() {
				tracing::debug!(record_id = record.id, "Skipping candidate with undefined distance.");

				continue;
			}

			let fuzzy = FuzzyScores::compute(&self.normalizer, &record, &folded_query);
			let score = VECTOR_WEIGHTS.fuse(1.0 - distance, fuzzy);

			candidates.push(ScoredRecord { record, score });
		}

		tracing::debug!(candidate_count = candidates.len(), "Vector candidates scored.");

		Ok(fusion::finalize(candidates, limit))
	}
}

impl<S> Ranker for VectorRanker<S>
where
	S: SimilarityStore,
{
	fn rank<'a>(
		&'a self,
		query: &'a str,
		stage: Option<&'a str>,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<ScoredRecord>>> {
		Box::pin(self.rank_inner(query, stage, limit))
	}
}

/// Similarity store backed by the `records.search_vec` pgvector column.
pub struct PgSimilarityStore {
	db: Db,
}
impl PgSimilarityStore {
	pub fn new(db: &Db) -> Self {
		Self { db: Db { pool: db.pool.clone() } }
	}
}

impl SimilarityStore for PgSimilarityStore {
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		stage: Option<&'a str>,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<StoreHit>>> {
		Box::pin(async move {
			let vec_text = crate::vector_to_pg(vector);
			let limit = i64::try_from(limit).unwrap_or(i64::MAX);
			let rows = queries::nearest_records(&self.db, &vec_text, stage, limit)
				.await
				.map_err(|err| {
					tracing::warn!(error = %err, "Similarity store query failed.");

					Error::Retrieval { message: err.to_string() }
				})?;

			Ok(rows
				.into_iter()
				.map(|row| StoreHit {
					distance: row.distance,
					record: crate::record_from_row(row.record),
				})
				.collect())
		})
	}
}
