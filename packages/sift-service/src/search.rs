pub mod fusion;
pub mod lexical;
pub mod vector;

use serde::{Deserialize, Serialize};

use crate::{EngineState, Error, Ranker, Result, SiftService};
use sift_config::SearchPipeline;
use sift_domain::record::Record;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	/// Exact, case-sensitive stage filter.
	pub stage: Option<String>,
	pub limit: Option<u32>,
	/// Overrides `search.pipeline` for this request.
	pub pipeline: Option<SearchPipeline>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
	pub pipeline: SearchPipeline,
	/// False while the lexical engine has no snapshot. Always true for the vector pipeline.
	pub ready: bool,
	pub items: Vec<SearchItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchItem {
	pub record_id: i64,
	pub score: f32,
	pub record: Record,
}

impl SiftService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let limit = resolve_limit(req.limit, &self.cfg.search)?;
		let stage = req.stage.as_deref().filter(|stage| !stage.is_empty());
		let pipeline = req.pipeline.unwrap_or(self.cfg.search.pipeline);
		let (ranker, ready): (&dyn Ranker, bool) = match pipeline {
			SearchPipeline::Lexical =>
				(&self.lexical, self.engine.state() == EngineState::Ready),
			SearchPipeline::Vector => (&self.vector, true),
		};
		let ranked = ranker.rank(&req.query, stage, limit).await?;

		tracing::debug!(?pipeline, ready, limit, result_count = ranked.len(), "Search finished.");

		let items = ranked
			.into_iter()
			.map(|scored| SearchItem {
				record_id: scored.record.id,
				score: scored.score,
				record: scored.record,
			})
			.collect();

		Ok(SearchResponse { pipeline, ready, items })
	}
}

fn resolve_limit(requested: Option<u32>, cfg: &sift_config::Search) -> Result<usize> {
	let limit = requested.unwrap_or(cfg.default_limit);

	if limit == 0 {
		return Err(Error::InvalidRequest { message: "limit must be greater than zero.".to_string() });
	}
	if limit > cfg.max_limit {
		return Err(Error::InvalidRequest {
			message: format!("limit must be at most {}.", cfg.max_limit),
		});
	}

	Ok(limit as usize)
}

#[cfg(test)]
mod tests {
	use super::resolve_limit;

	#[test]
	fn resolve_limit_defaults_and_bounds() {
		let cfg = sift_config::Search::default();

		assert_eq!(resolve_limit(None, &cfg).expect("Default limit must resolve."), 5);
		assert_eq!(resolve_limit(Some(12), &cfg).expect("Limit must resolve."), 12);
		assert!(resolve_limit(Some(0), &cfg).is_err());
		assert!(resolve_limit(Some(cfg.max_limit + 1), &cfg).is_err());
	}
}
