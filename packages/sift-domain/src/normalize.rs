use std::collections::HashSet;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{Result, stopwords};

const TOKEN_PATTERN: &str = r"\w+|[^\w\s]+";

/// Text canonicalizer shared by index builds, query vectorization, and the hashed encoder.
///
/// Every component that compares tokens must hold the same instance, otherwise build-time and
/// query-time vocabularies drift apart.
pub struct Normalizer {
	stopwords: HashSet<String>,
	stemmer: Stemmer,
	token_pattern: Regex,
}
impl Normalizer {
	pub fn portuguese() -> Result<Self> {
		Self::with_stopwords(
			Algorithm::Portuguese,
			stopwords::PORTUGUESE.iter().chain(stopwords::DIRECTORY_BOILERPLATE),
		)
	}

	pub fn with_stopwords<I, S>(algorithm: Algorithm, words: I) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let token_pattern = Regex::new(TOKEN_PATTERN)?;
		let stopwords = words.into_iter().map(|word| fold(word.as_ref())).collect();

		Ok(Self { stopwords, stemmer: Stemmer::create(algorithm), token_pattern })
	}

	/// Transliterates to ASCII and lowercases. No tokenization.
	pub fn fold(&self, text: &str) -> String {
		fold(text)
	}

	pub fn is_stopword(&self, token: &str) -> bool {
		self.stopwords.contains(token)
	}

	pub fn tokenize(&self, text: &str) -> Vec<String> {
		let folded = fold(text);
		let mut tokens = Vec::new();

		for found in self.token_pattern.find_iter(&folded) {
			let raw = found.as_str();

			if raw.chars().count() <= 1 || self.stopwords.contains(raw) {
				continue;
			}

			if raw.chars().all(char::is_alphabetic) {
				tokens.push(self.stemmer.stem(raw).into_owned());
			} else if raw.chars().all(char::is_alphanumeric) {
				tokens.push(raw.to_string());
			}
		}

		tokens
	}
}

fn fold(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for ch in text.nfkd() {
		if is_combining_mark(ch) {
			continue;
		}
		if ch.is_ascii() {
			out.push(ch);

			continue;
		}

		// Characters without an ASCII spelling are dropped.
		if let Some(replacement) = deunicode::deunicode_char(ch) {
			out.push_str(replacement);
		}
	}

	out.to_lowercase()
}

#[cfg(test)]
mod tests {
	use super::fold;

	#[test]
	fn fold_strips_marks_and_lowercases() {
		assert_eq!(fold("Logística AGRÍCOLA"), "logistica agricola");
		assert_eq!(fold("Straße"), "strasse");
		assert_eq!(fold("São Paulo"), "sao paulo");
	}

	#[test]
	fn fold_transliterates_non_latin_scripts() {
		assert_eq!(fold("Кофе Москва"), "kofe moskva");
		assert_eq!(fold("Αθήνα"), "athena");
	}

	#[test]
	fn fold_keeps_punctuation() {
		assert_eq!(fold("S.A., Ltda."), "s.a., ltda.");
	}
}
