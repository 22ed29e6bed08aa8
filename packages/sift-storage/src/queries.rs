use sqlx::{Executor, Postgres, Transaction};

use crate::{
	Result,
	db::Db,
	models::{RecordDistanceRow, RecordFields, RecordRow},
};

pub async fn insert_record(
	db: &Db,
	fields: &RecordFields<'_>,
	vec_text: Option<&str>,
) -> Result<RecordRow> {
	let row = sqlx::query_as::<_, RecordRow>(
		"\
INSERT INTO records (
	name,
	description,
	primary_sector,
	secondary_sector,
	tag,
	stage,
	attributes,
	search_vec
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8::text::vector)
RETURNING
	record_id,
	name,
	description,
	primary_sector,
	secondary_sector,
	tag,
	stage,
	attributes,
	created_at,
	updated_at",
	)
	.bind(fields.name)
	.bind(fields.description)
	.bind(fields.primary_sector)
	.bind(fields.secondary_sector)
	.bind(fields.tag)
	.bind(fields.stage)
	.bind(fields.attributes)
	.bind(vec_text)
	.fetch_one(&db.pool)
	.await?;

	Ok(row)
}

pub async fn fetch_record(db: &Db, record_id: i64) -> Result<Option<RecordRow>> {
	fetch_record_exec(&db.pool, record_id, false).await
}

pub async fn fetch_record_for_update(
	tx: &mut Transaction<'_, Postgres>,
	record_id: i64,
) -> Result<Option<RecordRow>> {
	fetch_record_exec(&mut **tx, record_id, true).await
}

/// Rewrites every column. `vec_text = None` keeps the stored vector.
pub async fn update_record_tx(
	tx: &mut Transaction<'_, Postgres>,
	record_id: i64,
	fields: &RecordFields<'_>,
	vec_text: Option<&str>,
) -> Result<RecordRow> {
	let row = sqlx::query_as::<_, RecordRow>(
		"\
UPDATE records
SET
	name = $2,
	description = $3,
	primary_sector = $4,
	secondary_sector = $5,
	tag = $6,
	stage = $7,
	attributes = $8,
	search_vec = COALESCE($9::text::vector, search_vec),
	updated_at = now()
WHERE record_id = $1
RETURNING
	record_id,
	name,
	description,
	primary_sector,
	secondary_sector,
	tag,
	stage,
	attributes,
	created_at,
	updated_at",
	)
	.bind(record_id)
	.bind(fields.name)
	.bind(fields.description)
	.bind(fields.primary_sector)
	.bind(fields.secondary_sector)
	.bind(fields.tag)
	.bind(fields.stage)
	.bind(fields.attributes)
	.bind(vec_text)
	.fetch_one(&mut **tx)
	.await?;

	Ok(row)
}

pub async fn delete_record(db: &Db, record_id: i64) -> Result<bool> {
	let result = sqlx::query("DELETE FROM records WHERE record_id = $1")
		.bind(record_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected() > 0)
}

/// Full corpus in id order. Index positions follow this order.
pub async fn list_records(db: &Db) -> Result<Vec<RecordRow>> {
	let rows = sqlx::query_as::<_, RecordRow>(
		"\
SELECT
	record_id,
	name,
	description,
	primary_sector,
	secondary_sector,
	tag,
	stage,
	attributes,
	created_at,
	updated_at
FROM records
ORDER BY record_id",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn nearest_records(
	db: &Db,
	vec_text: &str,
	stage: Option<&str>,
	limit: i64,
) -> Result<Vec<RecordDistanceRow>> {
	let rows = sqlx::query_as::<_, RecordDistanceRow>(
		"\
SELECT
	record_id,
	name,
	description,
	primary_sector,
	secondary_sector,
	tag,
	stage,
	attributes,
	created_at,
	updated_at,
	(search_vec <=> $1::text::vector)::real AS distance
FROM records
WHERE search_vec IS NOT NULL
	AND ($2::text IS NULL OR stage = $2)
ORDER BY search_vec <=> $1::text::vector, record_id
LIMIT $3",
	)
	.bind(vec_text)
	.bind(stage)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Records without a stored vector, or every record when `all` is set.
pub async fn records_needing_vectors(db: &Db, all: bool) -> Result<Vec<RecordRow>> {
	let rows = sqlx::query_as::<_, RecordRow>(
		"\
SELECT
	record_id,
	name,
	description,
	primary_sector,
	secondary_sector,
	tag,
	stage,
	attributes,
	created_at,
	updated_at
FROM records
WHERE $1 OR search_vec IS NULL
ORDER BY record_id",
	)
	.bind(all)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn set_record_vector_tx(
	tx: &mut Transaction<'_, Postgres>,
	record_id: i64,
	vec_text: &str,
) -> Result<bool> {
	let result =
		sqlx::query("UPDATE records SET search_vec = $2::text::vector WHERE record_id = $1")
			.bind(record_id)
			.bind(vec_text)
			.execute(&mut **tx)
			.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn record_vector_text(db: &Db, record_id: i64) -> Result<Option<String>> {
	let vec_text: Option<Option<String>> =
		sqlx::query_scalar("SELECT search_vec::text FROM records WHERE record_id = $1")
			.bind(record_id)
			.fetch_optional(&db.pool)
			.await?;

	Ok(vec_text.flatten())
}

async fn fetch_record_exec<'e, E>(
	executor: E,
	record_id: i64,
	for_update: bool,
) -> Result<Option<RecordRow>>
where
	E: Executor<'e, Database = Postgres>,
{
	let sql = if for_update {
		"\
SELECT
	record_id,
	name,
	description,
	primary_sector,
	secondary_sector,
	tag,
	stage,
	attributes,
	created_at,
	updated_at
FROM records
WHERE record_id = $1
FOR UPDATE"
	} else {
		"\
SELECT
	record_id,
	name,
	description,
	primary_sector,
	secondary_sector,
	tag,
	stage,
	attributes,
	created_at,
	updated_at
FROM records
WHERE record_id = $1"
	};
	let row = sqlx::query_as::<_, RecordRow>(sql).bind(record_id).fetch_optional(executor).await?;

	Ok(row)
}
