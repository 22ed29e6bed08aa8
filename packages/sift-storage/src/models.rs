use serde_json::Value;
use time::OffsetDateTime;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct RecordRow {
	pub record_id: i64,
	pub name: String,
	pub description: String,
	pub primary_sector: String,
	pub secondary_sector: String,
	pub tag: Option<String>,
	pub stage: String,
	pub attributes: Value,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RecordDistanceRow {
	#[sqlx(flatten)]
	pub record: RecordRow,
	/// Cosine distance between the stored vector and the query vector, `0.0` meaning identical.
	pub distance: f32,
}

/// Column values for an insert or full-row update.
pub struct RecordFields<'a> {
	pub name: &'a str,
	pub description: &'a str,
	pub primary_sector: &'a str,
	pub secondary_sector: &'a str,
	pub tag: Option<&'a str>,
	pub stage: &'a str,
	pub attributes: &'a Value,
}
