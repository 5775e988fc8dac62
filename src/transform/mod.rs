//! Shared data transforms used by the per-route builders.

pub mod reconcile;
pub mod sentinel;
pub mod translate;

pub use reconcile::{compare_ids, merge_by_key, ItemRecord, Keyed, MergeReport, Reconcile};
pub use sentinel::{strip_sentinel, strip_zero_props, ZERO_SENTINEL};
pub use translate::{
    parse_table, LazyTranslations, TranslateOptions, TranslationEntry, TranslationSource,
    TranslationTable,
};
