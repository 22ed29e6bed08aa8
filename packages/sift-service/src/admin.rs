use serde::{Deserialize, Serialize};

use crate::{EngineState, Error, Result, SiftService};
use sift_domain::record::Record;
use sift_storage::queries;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BackfillRequest {
	/// Re-encode every record, not only those without a stored vector.
	#[serde(default)]
	pub force: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackfillReport {
	pub scanned_count: u64,
	pub updated_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReloadReport {
	pub record_count: u64,
	pub state: EngineState,
}

impl SiftService {
	/// Writes hashed vectors for records that lack one, or for all records with `force`.
	///
	/// Each record is re-read under a row lock before encoding, so a concurrent update can never
	/// be overwritten with a vector derived from older text.
	pub async fn backfill_vectors(&self, req: BackfillRequest) -> Result<BackfillReport> {
		let rows = queries::records_needing_vectors(&self.db, req.force).await?;
		let scanned_count = rows.len() as u64;
		let mut updated_count = 0;

		for row in rows {
			let mut tx = self.db.pool.begin().await?;
			// Deleted since the scan.
			let Some(current) = queries::fetch_record_for_update(&mut tx, row.record_id).await?
			else {
				continue;
			};
			let record = crate::record_from_row(current);
			let vec_text = crate::vector_to_pg(&self.encoder.encode(&record.search_text()));

			if queries::set_record_vector_tx(&mut tx, record.id, &vec_text).await? {
				updated_count += 1;
			}

			tx.commit().await?;
		}

		tracing::info!(scanned_count, updated_count, force = req.force, "Vector backfill finished.");

		Ok(BackfillReport { scanned_count, updated_count })
	}

	/// Rebuilds the lexical snapshot from the current corpus and swaps it in.
	///
	/// Indexing runs on the blocking pool. When reloads overlap, the one that read the corpus
	/// last wins regardless of which build finishes first.
	pub async fn reload_lexical_index(&self) -> Result<ReloadReport> {
		let generation = self.engine.next_generation();
		let rows = queries::list_records(&self.db).await?;
		let records: Vec<Record> = rows.into_iter().map(crate::record_from_row).collect();
		let record_count = records.len() as u64;
		let engine = self.engine.clone();
		let state = tokio::task::spawn_blocking(move || engine.install_at(generation, records))
			.await
			.map_err(|err| Error::Storage { message: format!("Index build task failed: {err}") })?;

		Ok(ReloadReport { record_count, state })
	}
}
