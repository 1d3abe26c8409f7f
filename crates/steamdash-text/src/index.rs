use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::Path;
use tantivy::schema::{Facet, Field};
use tantivy::{Index, IndexWriter, TantivyDocument, Term};
use tracing::{debug, info};

use steamdash_core::traits::SearchIndex;
use steamdash_core::types::{FilterSpec, GameRecord};

use crate::tantivy_utils::{build_schema, register_tokenizer, APP_ID, REVIEW_TEXT, SOURCE, TAGS, TAG_FACET, TITLE};

const WRITER_HEAP_BYTES: usize = 50_000_000;
const DEFAULT_FUZZY_DISTANCE: u8 = 1;

pub struct GameIndex {
	pub(crate) index: Index,
	pub(crate) fields: GameFields,
	pub(crate) fuzzy_distance: u8,
	show_progress: bool,
}

#[derive(Clone, Copy)]
pub(crate) struct GameFields {
	pub(crate) app_id: Field,
	pub(crate) title: Field,
	pub(crate) tags: Field,
	pub(crate) review_text: Field,
	pub(crate) tag: Field,
	pub(crate) source: Field,
}

impl GameFields {
	fn resolve(index: &Index) -> Result<Self> {
		let schema = index.schema();
		Ok(Self {
			app_id: schema.get_field(APP_ID)?,
			title: schema.get_field(TITLE)?,
			tags: schema.get_field(TAGS)?,
			review_text: schema.get_field(REVIEW_TEXT)?,
			tag: schema.get_field(TAG_FACET)?,
			source: schema.get_field(SOURCE)?,
		})
	}
}

impl GameIndex {
	/// Create a fresh on-disk index, wiping whatever was at `index_dir`.
	pub fn create(index_dir: &Path) -> Result<Self> {
		if index_dir.exists() { std::fs::remove_dir_all(index_dir)?; }
		std::fs::create_dir_all(index_dir)?;
		let index = Index::create_in_dir(index_dir, build_schema())?;
		info!(dir = %index_dir.display(), "created search index");
		Self::wrap(index)
	}

	pub fn open(index_dir: &Path) -> Result<Self> {
		let index = Index::open_in_dir(index_dir)
			.map_err(|e| anyhow::anyhow!("Failed to open search index at {}: {}", index_dir.display(), e))?;
		Self::wrap(index)
	}

	pub fn in_memory() -> Result<Self> {
		Self::wrap(Index::create_in_ram(build_schema()))
	}

	fn wrap(index: Index) -> Result<Self> {
		register_tokenizer(&index);
		let fields = GameFields::resolve(&index)?;
		Ok(Self { index, fields, fuzzy_distance: DEFAULT_FUZZY_DISTANCE, show_progress: false })
	}

	/// Edit distance for fuzzy term matching; 0 disables it.
	pub fn with_fuzzy_distance(mut self, distance: u8) -> Self {
		self.fuzzy_distance = distance;
		self
	}

	pub fn with_progress(mut self, show: bool) -> Self {
		self.show_progress = show;
		self
	}

	pub fn num_docs(&self) -> Result<u64> {
		Ok(self.index.reader()?.searcher().num_docs())
	}

	fn to_document(&self, record: &GameRecord) -> Result<TantivyDocument> {
		let f = self.fields;
		let mut doc = TantivyDocument::default();
		doc.add_text(f.app_id, record.app_id.to_string());
		doc.add_text(f.title, &record.title);
		if let Some(tags) = &record.tags { doc.add_text(f.tags, tags.joined()); }
		if let Some(review_text) = &record.review_text { doc.add_text(f.review_text, review_text); }
		for tag in record.tag_names() { doc.add_facet(f.tag, Facet::from_path([tag])); }
		doc.add_text(f.source, serde_json::to_string(record)?);
		Ok(doc)
	}

	fn progress_bar(&self, len: usize) -> ProgressBar {
		if !self.show_progress { return ProgressBar::hidden(); }
		let pb = ProgressBar::new(len as u64);
		let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({percent}%)")
			.unwrap_or_else(|_| ProgressStyle::default_bar())
			.progress_chars("#>-");
		pb.set_style(style);
		pb
	}
}

impl SearchIndex for GameIndex {
	/// Upsert keyed by `app_id`: an id already in the index (or repeated
	/// within `records`) ends up with its last version only.
	fn index(&self, records: &[GameRecord]) -> Result<usize> {
		let mut last_by_id: HashMap<String, usize> = HashMap::new();
		for (i, r) in records.iter().enumerate() { last_by_id.insert(r.app_id.to_string(), i); }

		let mut writer: IndexWriter = self.index.writer(WRITER_HEAP_BYTES)?;
		let pb = self.progress_bar(records.len());
		let mut written = 0usize;
		for (i, record) in records.iter().enumerate() {
			pb.inc(1);
			let id = record.app_id.to_string();
			if last_by_id.get(&id) != Some(&i) { continue; }
			writer.delete_term(Term::from_field_text(self.fields.app_id, &id));
			writer.add_document(self.to_document(record)?)?;
			written += 1;
		}
		writer.commit()?;
		pb.finish_and_clear();
		let skipped = records.len() - written;
		if skipped > 0 { debug!(skipped, "duplicate app ids collapsed"); }
		info!(indexed = written, "indexed games");
		Ok(written)
	}

	fn search(&self, spec: &FilterSpec, fetch_size: usize) -> Result<Vec<GameRecord>> {
		self.search_candidates(spec, fetch_size)
	}
}
