pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to compile token pattern.")]
	Pattern(#[from] regex::Error),
}
