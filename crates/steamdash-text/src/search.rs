use anyhow::Result;
use tantivy::collector::TopDocs;
use tantivy::query::{AllQuery, BooleanQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{Facet, IndexRecordOption, Value};
use tantivy::{TantivyDocument, Term};
use tracing::{debug, warn};

use steamdash_core::types::{FilterSpec, GameRecord};

use crate::index::GameIndex;

const TITLE_BOOST: f32 = 3.0;

impl GameIndex {
	/// Query for the free text and tag parts of `spec`.
	///
	/// Text goes through both an exact parser and, unless fuzzy matching is off,
	/// a fuzzy one; either may match and exact hits score higher. Title
	/// matches are boosted over tags and review text. Every selected tag is
	/// a mandatory exact facet match. No text means match-all.
	pub fn build_query(&self, spec: &FilterSpec) -> Box<dyn Query> {
		let f = self.fields;
		let fuzzy_distance = self.fuzzy_distance;
		let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

		match spec.text_query() {
			Some(text) => {
				let text_fields = vec![f.title, f.tags, f.review_text];
				let mut exact = QueryParser::for_index(&self.index, text_fields.clone());
				exact.set_field_boost(f.title, TITLE_BOOST);
				let (exact_query, errors) = exact.parse_query_lenient(text);
				if !errors.is_empty() { warn!(query = text, ?errors, "query parsed leniently"); }

				if fuzzy_distance > 0 {
					let mut fuzzy = QueryParser::for_index(&self.index, text_fields.clone());
					fuzzy.set_field_boost(f.title, TITLE_BOOST);
					for field in text_fields { fuzzy.set_field_fuzzy(field, false, fuzzy_distance, true); }
					let (fuzzy_query, _) = fuzzy.parse_query_lenient(text);
					let either: Box<dyn Query> = Box::new(BooleanQuery::new(vec![(Occur::Should, exact_query), (Occur::Should, fuzzy_query)]));
					clauses.push((Occur::Must, either));
				} else {
					clauses.push((Occur::Must, exact_query));
				}
			}
			None => clauses.push((Occur::Must, Box::new(AllQuery))),
		}

		for tag in &spec.selected_tags {
			let term = Term::from_facet(f.tag, &Facet::from_path([tag.trim()]));
			clauses.push((Occur::Must, Box::new(TermQuery::new(term, IndexRecordOption::Basic))));
		}

		Box::new(BooleanQuery::new(clauses))
	}

	/// Top `fetch_size` candidates in relevance order.
	pub(crate) fn search_candidates(&self, spec: &FilterSpec, fetch_size: usize) -> Result<Vec<GameRecord>> {
		if fetch_size == 0 { return Ok(vec![]); }
		let query = self.build_query(spec);
		let searcher = self.index.reader()?.searcher();
		let top_docs = searcher.search(&*query, &TopDocs::with_limit(fetch_size))?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (_score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			let Some(source) = doc.get_first(self.fields.source).and_then(|v| v.as_str()) else { continue; };
			match serde_json::from_str::<GameRecord>(source) {
				Ok(record) => hits.push(record),
				Err(e) => warn!(error = %e, "skipping hit with unreadable source"),
			}
		}
		debug!(fetch_size, returned = hits.len(), "index search");
		Ok(hits)
	}
}
