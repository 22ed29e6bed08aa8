pub fn render_schema(vector_dim: u32) -> String {
	let init = include_str!("../../../sql/init.sql");
	let expanded = expand_includes(init);

	expanded.replace("<VECTOR_DIM>", &vector_dim.to_string())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		match line.trim().strip_prefix("\\ir ").map(str::trim) {
			Some("00_extensions.sql") => out.push_str(include_str!("../../../sql/00_extensions.sql")),
			Some("tables/001_records.sql") =>
				out.push_str(include_str!("../../../sql/tables/001_records.sql")),
			_ => out.push_str(line),
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::render_schema;

	#[test]
	fn render_schema_expands_includes_and_dimension() {
		let sql = render_schema(1_024);

		assert!(!sql.contains("\\ir"));
		assert!(!sql.contains("<VECTOR_DIM>"));
		assert!(sql.contains("CREATE EXTENSION IF NOT EXISTS vector"));
		assert!(sql.contains("search_vec vector(1024) NULL"));
	}
}
