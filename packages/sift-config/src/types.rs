use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub security: Security,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Which ranker answers a search request that does not name one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPipeline {
	/// In-memory TF-IDF snapshot of the whole corpus.
	#[default]
	Lexical,
	/// Hashed vectors persisted per record and ordered by the store.
	Vector,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Search {
	#[serde(default)]
	pub pipeline: SearchPipeline,
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
	/// Oversampling factor applied to `limit` when asking the vector store for candidates.
	#[serde(default = "default_candidate_multiplier")]
	pub candidate_multiplier: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			pipeline: SearchPipeline::default(),
			default_limit: default_limit(),
			max_limit: default_max_limit(),
			candidate_multiplier: default_candidate_multiplier(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Security {
	#[serde(default = "default_true")]
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: default_true() }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_limit() -> u32 {
	5
}

fn default_max_limit() -> u32 {
	50
}

fn default_candidate_multiplier() -> u32 {
	3
}

fn default_true() -> bool {
	true
}
