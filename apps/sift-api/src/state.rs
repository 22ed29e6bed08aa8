use std::sync::Arc;

use sift_service::SiftService;
use sift_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SiftService>,
}
impl AppState {
	/// Connects, applies the schema, and indexes the corpus before any route is served.
	pub async fn new(config: sift_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(SiftService::vector_dim()).await?;

		let service = SiftService::bootstrap(config, db).await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: SiftService) -> Self {
		Self { service: Arc::new(service) }
	}
}
