pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	/// A request field failed validation. `field` is a JSON path such as `$.name`.
	#[error("Invalid field {field}: {message}")]
	InvalidField { field: String, message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	/// The similarity store could not answer. Distinct from a search with no matches.
	#[error("Retrieval failed: {message}")]
	Retrieval { message: String },
	#[error("Normalizer error: {message}")]
	Normalizer { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<sift_storage::Error> for Error {
	fn from(err: sift_storage::Error) -> Self {
		match err {
			sift_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			sift_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			sift_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl From<sift_domain::Error> for Error {
	fn from(err: sift_domain::Error) -> Self {
		Self::Normalizer { message: err.to_string() }
	}
}
