use tantivy::schema::{FacetOptions, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{AsciiFoldingFilter, LowerCaser, RemoveLongFilter, SimpleTokenizer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

pub const GAME_TOKENIZER: &str = "game_text";

pub const APP_ID: &str = "app_id";
pub const TITLE: &str = "title";
pub const TAGS: &str = "tags";
pub const REVIEW_TEXT: &str = "review_text";
pub const TAG_FACET: &str = "tag";
pub const SOURCE: &str = "source";

pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field(APP_ID, STRING | STORED);
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(GAME_TOKENIZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	let text_options = TextOptions::default().set_indexing_options(text_field_indexing);
	schema_builder.add_text_field(TITLE, text_options.clone());
	schema_builder.add_text_field(TAGS, text_options.clone());
	schema_builder.add_text_field(REVIEW_TEXT, text_options);
	schema_builder.add_facet_field(TAG_FACET, FacetOptions::default());
	// Full record as JSON, returned verbatim on hits.
	schema_builder.add_text_field(SOURCE, STORED);
	schema_builder.build()
}

pub fn register_tokenizer(index: &Index) {
	let stop_words = vec![
		"le","la","les","un","une","des","de","du","et","en","au","aux","à","pour","par","sur","avec","dans",
		"a","an","and","of","the","to","in","on","for","with","or",
	];
	let tokenizer = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(40))
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.into_iter().map(|s| s.to_string())))
		.filter(AsciiFoldingFilter)
		.build();
	index.tokenizers().register(GAME_TOKENIZER, tokenizer);
}
