//! Token-set string similarity.
//!
//! Scores are integers in `0..=100`. Both inputs are reduced to ASCII word tokens, so the score
//! ignores token order, duplicated tokens, and punctuation.

use std::collections::BTreeSet;

/// Similarity of the shared token set against each side's full token set.
///
/// Extra tokens on one side only lower the score through the two "shared + leftover" strings,
/// so a short query fully contained in a long description still scores high.
pub fn token_set_ratio(left: &str, right: &str) -> u8 {
	let left = preprocess(left);
	let right = preprocess(right);

	if left.is_empty() || right.is_empty() {
		return 0;
	}

	let left_tokens: BTreeSet<&str> = left.split_whitespace().collect();
	let right_tokens: BTreeSet<&str> = right.split_whitespace().collect();
	let shared = join(left_tokens.intersection(&right_tokens));
	let left_only = join(left_tokens.difference(&right_tokens));
	let right_only = join(right_tokens.difference(&left_tokens));
	let left_combined = format!("{shared} {left_only}");
	let right_combined = format!("{shared} {right_only}");
	let left_combined = left_combined.trim();
	let right_combined = right_combined.trim();

	[
		ratio(&shared, left_combined),
		ratio(&shared, right_combined),
		ratio(left_combined, right_combined),
	]
	.into_iter()
	.max()
	.unwrap_or(0)
}

/// Indel similarity: `2 * LCS / (len(a) + len(b))`, scaled to 100 and rounded half to even.
pub fn ratio(left: &str, right: &str) -> u8 {
	if left.is_empty() || right.is_empty() {
		return 0;
	}

	let left: Vec<char> = left.chars().collect();
	let right: Vec<char> = right.chars().collect();
	let common = longest_common_subsequence(&left, &right);
	let total = (left.len() + right.len()) as f64;
	let score = (200.0 * common as f64 / total).round_ties_even();

	score.clamp(0.0, 100.0) as u8
}

fn preprocess(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for ch in text.chars().filter(char::is_ascii) {
		if ch.is_ascii_alphanumeric() || ch == '_' {
			out.push(ch.to_ascii_lowercase());
		} else {
			out.push(' ');
		}
	}

	out.trim().to_string()
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
	tokens.copied().collect::<Vec<_>>().join(" ")
}

fn longest_common_subsequence(left: &[char], right: &[char]) -> usize {
	let mut previous = vec![0_usize; right.len() + 1];
	let mut current = vec![0_usize; right.len() + 1];

	for &a in left {
		for (j, &b) in right.iter().enumerate() {
			current[j + 1] =
				if a == b { previous[j] + 1 } else { current[j].max(previous[j + 1]) };
		}

		std::mem::swap(&mut previous, &mut current);
	}

	previous[right.len()]
}

#[cfg(test)]
mod tests {
	use super::{preprocess, ratio};

	#[test]
	fn preprocess_replaces_non_word_characters() {
		assert_eq!(preprocess("  Bem-estar, saude! "), "bem estar  saude");
	}

	#[test]
	fn ratio_matches_indel_similarity() {
		assert_eq!(ratio("abc", "abc"), 100);
		assert_eq!(ratio("abcd", "abef"), 50);
		assert_eq!(ratio("", "abc"), 0);
	}
}
