//! Lifecycle of the in-memory lexical index.
//!
//! The engine starts `Uninitialized` and moves to `Ready` once a non-empty corpus has been
//! indexed. There is no way back. Readers take a cheap `Arc` clone of the current snapshot, so a
//! reload builds the replacement without holding the lock and swaps it in with one assignment.
//!
//! Every reload draws a generation before it reads the corpus. A snapshot only replaces one from
//! an older generation, so overlapping reloads settle on the newest corpus read.

use std::sync::{
	Arc, RwLock,
	atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::search::lexical::LexicalIndex;
use sift_domain::{normalize::Normalizer, record::Record};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
	/// No snapshot yet. Lexical searches return nothing.
	Uninitialized,
	Ready,
}

#[derive(Default)]
struct Slot {
	generation: u64,
	index: Option<Arc<LexicalIndex>>,
}

pub struct LexicalEngine {
	normalizer: Arc<Normalizer>,
	generations: AtomicU64,
	slot: RwLock<Slot>,
}
impl LexicalEngine {
	pub fn new(normalizer: Arc<Normalizer>) -> Self {
		Self { normalizer, generations: AtomicU64::new(0), slot: RwLock::new(Slot::default()) }
	}

	pub fn build(normalizer: Arc<Normalizer>, records: Vec<Record>) -> Self {
		let engine = Self::new(normalizer);

		engine.install(records);

		engine
	}

	pub fn normalizer(&self) -> &Arc<Normalizer> {
		&self.normalizer
	}

	pub fn state(&self) -> EngineState {
		match self.snapshot() {
			Some(_) => EngineState::Ready,
			None => EngineState::Uninitialized,
		}
	}

	pub fn snapshot(&self) -> Option<Arc<LexicalIndex>> {
		self.slot.read().unwrap_or_else(|err| err.into_inner()).index.clone()
	}

	/// Reserves the generation for a corpus about to be read.
	pub fn next_generation(&self) -> u64 {
		self.generations.fetch_add(1, Ordering::SeqCst) + 1
	}

	/// Indexes `records` under a fresh generation and replaces the current snapshot.
	pub fn install(&self, records: Vec<Record>) -> EngineState {
		let generation = self.next_generation();

		self.install_at(generation, records)
	}

	/// Indexes `records` read under `generation` and swaps them in unless a newer generation is
	/// already installed.
	///
	/// An empty corpus leaves the engine as it was: a ready engine keeps serving its previous
	/// snapshot and an uninitialized one stays uninitialized.
	pub fn install_at(&self, generation: u64, records: Vec<Record>) -> EngineState {
		if records.is_empty() {
			let state = self.state();

			tracing::warn!(?state, "Corpus is empty. Keeping the current lexical snapshot.");

			return state;
		}

		let index = Arc::new(LexicalIndex::build(self.normalizer.clone(), records));
		let record_count = index.len();
		let term_count = index.vocabulary_len();

		let mut slot = self.slot.write().unwrap_or_else(|err| err.into_inner());

		if slot.generation > generation {
			tracing::info!(
				generation,
				installed = slot.generation,
				"Discarding lexical snapshot from an older reload."
			);

			return EngineState::Ready;
		}

		*slot = Slot { generation, index: Some(index) };

		tracing::info!(generation, record_count, term_count, "Lexical snapshot installed.");

		EngineState::Ready
	}
}
