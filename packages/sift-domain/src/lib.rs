pub mod fuzzy;
pub mod hashing;
pub mod normalize;
pub mod record;
pub mod stopwords;

mod error;

pub use error::{Error, Result};
