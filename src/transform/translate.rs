//! Text-id translation table.
//!
//! Master-data rows reference display text by id. The `assetname` and `text`
//! tables map those ids to English strings. The table is built once per run
//! and shared by reference with every transform that needs it.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::core::TranslationError;

/// Table loaded first; its ids can be overridden by [`TEXT_TABLE`].
pub const ASSETNAME_TABLE: &str = "assetname";
/// Table loaded second; wins on id collisions.
pub const TEXT_TABLE: &str = "text";

/// Strings this short are never looked up.
const MIN_LOOKUP_LEN: usize = 5;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid html tag regex"));

/// One row of a translation table. Extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranslationEntry {
    /// Text id referenced by other tables.
    pub id: String,
    /// English text, if the row has been translated.
    #[serde(default)]
    pub text_english: Option<String>,
}

/// Parse the JSON body of a translation table.
pub fn parse_table(table: &str, body: &str) -> Result<Vec<TranslationEntry>, TranslationError> {
    serde_json::from_str(body).map_err(|source| TranslationError::Malformed {
        table: table.to_string(),
        source,
    })
}

/// Options for [`TranslationTable::translate_str`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslateOptions {
    /// Remove `<...>` markup from translated text.
    pub strip_tags: bool,
}

/// Immutable id → English text lookup.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: HashMap<String, Option<String>>,
    collisions: Vec<String>,
}

impl TranslationTable {
    /// Build a table from the `assetname` and `text` rows. On an id present in
    /// both, the `text` row replaces the `assetname` row.
    #[must_use]
    pub fn from_sources(assetnames: Vec<TranslationEntry>, texts: Vec<TranslationEntry>) -> Self {
        let mut entries = HashMap::with_capacity(assetnames.len() + texts.len());
        for row in assetnames {
            entries.insert(row.id, row.text_english);
        }

        let mut collisions = Vec::new();
        for row in texts {
            if entries.contains_key(&row.id) {
                collisions.push(row.id.clone());
            }
            entries.insert(row.id, row.text_english);
        }

        if !collisions.is_empty() {
            debug!(
                count = collisions.len(),
                "translation id collisions, text rows take precedence"
            );
        }
        info!(entries = entries.len(), "translation table built");
        Self { entries, collisions }
    }

    /// Number of distinct ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no ids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids that appeared in both source tables, in `text` order.
    #[must_use]
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    /// English text for `id`, if the id exists and has non-empty text.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.entries
            .get(id)
            .and_then(Option::as_deref)
            .filter(|text| !text.is_empty())
    }

    /// Translate a single string. Short strings and unknown ids come back
    /// unchanged; tag stripping only applies to strings that were looked up.
    #[must_use]
    pub fn translate_str(&self, value: &str, opts: TranslateOptions) -> String {
        if value.chars().count() < MIN_LOOKUP_LEN {
            return value.to_string();
        }
        let translated = self.lookup(value).unwrap_or(value);
        if opts.strip_tags {
            HTML_TAG.replace_all(translated, "").into_owned()
        } else {
            translated.to_string()
        }
    }

    /// Translate every string leaf of a JSON document.
    #[must_use]
    pub fn translate_value(&self, value: Value, opts: TranslateOptions) -> Value {
        match value {
            Value::String(s) => Value::String(self.translate_str(&s, opts)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.translate_value(item, opts))
                    .collect(),
            ),
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, self.translate_value(v, opts)))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// Where translation rows come from.
#[async_trait]
pub trait TranslationSource: Send + Sync {
    /// Load every row of `table`.
    async fn load_table(&self, table: &str) -> Result<Vec<TranslationEntry>, TranslationError>;
}

/// Build-once translation table backed by a [`TranslationSource`].
///
/// The first [`get`](Self::get) loads both tables concurrently; later calls,
/// concurrent ones included, reuse the result. A failed load is not cached,
/// so the next caller tries again.
pub struct LazyTranslations<S> {
    source: S,
    table: OnceCell<TranslationTable>,
}

impl<S: TranslationSource> LazyTranslations<S> {
    /// Wrap a source without loading anything yet.
    pub fn new(source: S) -> Self {
        Self {
            source,
            table: OnceCell::new(),
        }
    }

    /// The table, loading it on first use.
    pub async fn get(&self) -> Result<&TranslationTable, TranslationError> {
        self.table
            .get_or_try_init(|| async {
                let (assetnames, texts) = tokio::try_join!(
                    self.source.load_table(ASSETNAME_TABLE),
                    self.source.load_table(TEXT_TABLE),
                )?;
                Ok::<_, TranslationError>(TranslationTable::from_sources(assetnames, texts))
            })
            .await
    }

    /// True once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.table.initialized()
    }
}
