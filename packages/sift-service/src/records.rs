use serde::{Deserialize, Serialize};

use crate::{Error, Result, SiftService};
use sift_domain::record::{NewRecord, Record, RecordPatch};
use sift_storage::queries;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateRecordResponse {
	pub record: Record,
	/// Whether the stored hashed vector was recomputed by this update.
	pub vector_updated: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListRecordsResponse {
	pub items: Vec<Record>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteRecordResponse {
	pub record_id: i64,
}

impl SiftService {
	/// Inserts a record together with its hashed vector.
	///
	/// Lexical search keeps serving its startup snapshot until the next reload.
	pub async fn create_record(&self, req: NewRecord) -> Result<Record> {
		require_non_blank("name", &req.name)?;
		require_non_blank("stage", &req.stage)?;

		let draft = req.into_record(0);
		let vec_text = crate::vector_to_pg(&self.encoder.encode(&draft.search_text()));
		let row =
			queries::insert_record(&self.db, &crate::record_fields(&draft), Some(&vec_text))
				.await?;

		tracing::info!(record_id = row.record_id, "Record created.");

		Ok(crate::record_from_row(row))
	}

	pub async fn get_record(&self, record_id: i64) -> Result<Record> {
		let row = queries::fetch_record(&self.db, record_id)
			.await?
			.ok_or_else(|| not_found(record_id))?;

		Ok(crate::record_from_row(row))
	}

	pub async fn list_records(&self) -> Result<ListRecordsResponse> {
		let rows = queries::list_records(&self.db).await?;

		Ok(ListRecordsResponse { items: rows.into_iter().map(crate::record_from_row).collect() })
	}

	/// Applies `patch` under a row lock. The hashed vector is recomputed in the same transaction
	/// when the patch touches name, description, either sector, or tag.
	pub async fn update_record(
		&self,
		record_id: i64,
		patch: RecordPatch,
	) -> Result<UpdateRecordResponse> {
		if patch.is_empty() {
			return Err(Error::InvalidRequest { message: "No updates provided.".to_string() });
		}
		if let Some(name) = patch.name.as_deref() {
			require_non_blank("name", name)?;
		}
		if let Some(stage) = patch.stage.as_deref() {
			require_non_blank("stage", stage)?;
		}

		let vector_updated = patch.touches_search_fields();
		let mut tx = self.db.pool.begin().await?;
		let Some(row) = queries::fetch_record_for_update(&mut tx, record_id).await? else {
			return Err(not_found(record_id));
		};
		let mut record = crate::record_from_row(row);

		patch.apply(&mut record);

		let vec_text = vector_updated
			.then(|| crate::vector_to_pg(&self.encoder.encode(&record.search_text())));
		let row = queries::update_record_tx(
			&mut tx,
			record_id,
			&crate::record_fields(&record),
			vec_text.as_deref(),
		)
		.await?;

		tx.commit().await?;

		tracing::info!(record_id, vector_updated, "Record updated.");

		Ok(UpdateRecordResponse { record: crate::record_from_row(row), vector_updated })
	}

	pub async fn delete_record(&self, record_id: i64) -> Result<DeleteRecordResponse> {
		if !queries::delete_record(&self.db, record_id).await? {
			return Err(not_found(record_id));
		}

		tracing::info!(record_id, "Record deleted.");

		Ok(DeleteRecordResponse { record_id })
	}
}

fn require_non_blank(field: &str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::InvalidField {
			field: format!("$.{field}"),
			message: format!("{field} must be non-empty."),
		});
	}

	Ok(())
}

fn not_found(record_id: i64) -> Error {
	Error::NotFound { message: format!("Record {record_id} does not exist.") }
}
