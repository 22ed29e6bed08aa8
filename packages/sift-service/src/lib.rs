pub mod admin;
pub mod engine;
pub mod records;
pub mod search;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use admin::{BackfillRequest, BackfillReport, ReloadReport};
pub use engine::{EngineState, LexicalEngine};
pub use error::{Error, Result};
pub use records::{DeleteRecordResponse, ListRecordsResponse, UpdateRecordResponse};
pub use search::{
	SearchItem, SearchRequest, SearchResponse,
	fusion::ScoredRecord,
	lexical::{LexicalIndex, LexicalRanker},
	vector::{PgSimilarityStore, VectorRanker},
};

use sift_config::Config;
use sift_domain::{
	hashing::{HASHED_DIMENSIONS, HashedEncoder},
	normalize::Normalizer,
	record::Record,
};
use sift_storage::{
	db::Db,
	models::{RecordFields, RecordRow},
	queries,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One way of turning a query into an ordered, floor-filtered, truncated list of records.
pub trait Ranker
where
	Self: Send + Sync,
{
	fn rank<'a>(
		&'a self,
		query: &'a str,
		stage: Option<&'a str>,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<ScoredRecord>>>;
}

/// External store able to return the records closest to a hashed vector by cosine distance.
pub trait SimilarityStore
where
	Self: Send + Sync,
{
	/// At most `limit` hits, nearest first. `stage` is an exact-match filter applied by the store.
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		stage: Option<&'a str>,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<StoreHit>>>;
}

#[derive(Clone, Debug)]
pub struct StoreHit {
	pub record: Record,
	pub distance: f32,
}

pub struct SiftService {
	pub cfg: Config,
	pub db: Db,
	pub engine: Arc<LexicalEngine>,
	pub encoder: HashedEncoder,
	lexical: LexicalRanker,
	vector: VectorRanker<Arc<dyn SimilarityStore>>,
}
impl SiftService {
	pub fn new(cfg: Config, db: Db, engine: Arc<LexicalEngine>) -> Self {
		let store: Arc<dyn SimilarityStore> = Arc::new(PgSimilarityStore::new(&db));

		Self::with_store(cfg, db, engine, store)
	}

	pub fn with_store(
		cfg: Config,
		db: Db,
		engine: Arc<LexicalEngine>,
		store: Arc<dyn SimilarityStore>,
	) -> Self {
		let normalizer = engine.normalizer().clone();
		let encoder = HashedEncoder::new(normalizer.clone());
		let lexical = LexicalRanker::new(engine.clone());
		let vector = VectorRanker::new(
			store,
			encoder.clone(),
			normalizer,
			cfg.search.candidate_multiplier as usize,
		);

		Self { cfg, db, engine, encoder, lexical, vector }
	}

	/// Builds the normalizer and the lexical index from the current corpus.
	///
	/// Must finish before the service takes traffic: the index is not rebuilt on writes.
	pub async fn bootstrap(cfg: Config, db: Db) -> Result<Self> {
		let normalizer = Arc::new(Normalizer::portuguese()?);
		let rows = queries::list_records(&db).await?;
		let records: Vec<Record> = rows.into_iter().map(record_from_row).collect();
		let record_count = records.len();
		let engine = Arc::new(LexicalEngine::build(normalizer, records));

		tracing::info!(record_count, state = ?engine.state(), "Lexical engine initialized.");

		Ok(Self::new(cfg, db, engine))
	}

	pub fn vector_dim() -> u32 {
		HASHED_DIMENSIONS as u32
	}
}

impl<T> SimilarityStore for Arc<T>
where
	T: SimilarityStore + ?Sized,
{
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		stage: Option<&'a str>,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<StoreHit>>> {
		(**self).nearest(vector, stage, limit)
	}
}

pub(crate) fn record_from_row(row: RecordRow) -> Record {
	Record {
		id: row.record_id,
		name: row.name,
		description: row.description,
		primary_sector: row.primary_sector,
		secondary_sector: row.secondary_sector,
		tag: row.tag,
		stage: row.stage,
		attributes: row.attributes,
	}
}

pub(crate) fn record_fields(record: &Record) -> RecordFields<'_> {
	RecordFields {
		name: record.name.as_str(),
		description: record.description.as_str(),
		primary_sector: record.primary_sector.as_str(),
		secondary_sector: record.secondary_sector.as_str(),
		tag: record.tag.as_deref(),
		stage: record.stage.as_str(),
		attributes: &record.attributes,
	}
}

pub(crate) fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 4);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

#[cfg(test)]
mod tests {
	use super::vector_to_pg;

	#[test]
	fn vector_to_pg_renders_pgvector_literal() {
		assert_eq!(vector_to_pg(&[0.0, 2.0, 1.5]), "[0,2,1.5]");
		assert_eq!(vector_to_pg(&[]), "[]");
	}
}
