//! Keyed reconciliation of records from different data sources.
//!
//! Game tables, wiki metadata and asset listings each know part of a record.
//! Each source is modelled as an optional-field struct, and sources are joined
//! by id with a fixed precedence: present overlay fields win, absent overlay
//! fields keep the base value.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A record identified by a shared string id.
pub trait Keyed {
    /// The id shared across sources.
    fn key(&self) -> &str;
}

/// Field-wise merge of two records describing the same entity.
pub trait Reconcile {
    /// Fold `overlay` into `self`. Fields `overlay` sets replace the current
    /// value; fields it leaves unset are kept.
    fn reconcile(&mut self, overlay: Self);
}

/// Result of [`merge_by_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport<T> {
    /// Merged records ordered by id (see [`compare_ids`]).
    pub records: Vec<T>,
    /// Ids only the base source knew about.
    pub only_in_base: Vec<String>,
    /// Ids only the overlay source knew about.
    pub only_in_overlay: Vec<String>,
}

/// Order ids numerically when both parse as integers; numeric ids sort before
/// non-numeric ones, which fall back to string order.
#[must_use]
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Join `base` and `overlay` by id.
///
/// Records present on both sides are reconciled with the overlay taking
/// precedence; one-sided records are kept as they are. If a side repeats an
/// id, later records fold into earlier ones with the same precedence.
pub fn merge_by_key<T>(base: Vec<T>, overlay: Vec<T>) -> MergeReport<T>
where
    T: Keyed + Reconcile,
{
    let mut merged: BTreeMap<String, Slot<T>> = BTreeMap::new();
    for record in base {
        fold(&mut merged, record, Side::Base);
    }
    for record in overlay {
        fold(&mut merged, record, Side::Overlay);
    }

    let mut only_in_base = Vec::new();
    let mut only_in_overlay = Vec::new();
    let mut records: Vec<(String, T)> = Vec::with_capacity(merged.len());
    for (id, slot) in merged {
        match (slot.in_base, slot.in_overlay) {
            (true, false) => only_in_base.push(id.clone()),
            (false, true) => only_in_overlay.push(id.clone()),
            _ => {}
        }
        records.push((id, slot.record));
    }

    records.sort_by(|(a, _), (b, _)| compare_ids(a, b));
    only_in_base.sort_by(|a, b| compare_ids(a, b));
    only_in_overlay.sort_by(|a, b| compare_ids(a, b));

    if !only_in_base.is_empty() {
        warn!(ids = ?only_in_base, "records missing from overlay source");
    }
    if !only_in_overlay.is_empty() {
        warn!(ids = ?only_in_overlay, "records missing from base source");
    }

    MergeReport {
        records: records.into_iter().map(|(_, record)| record).collect(),
        only_in_base,
        only_in_overlay,
    }
}

#[derive(Clone, Copy)]
enum Side {
    Base,
    Overlay,
}

struct Slot<T> {
    record: T,
    in_base: bool,
    in_overlay: bool,
}

fn fold<T: Keyed + Reconcile>(merged: &mut BTreeMap<String, Slot<T>>, record: T, side: Side) {
    let slot = match merged.entry(record.key().to_string()) {
        Entry::Occupied(entry) => {
            let slot = entry.into_mut();
            slot.record.reconcile(record);
            slot
        }
        Entry::Vacant(entry) => entry.insert(Slot {
            record,
            in_base: false,
            in_overlay: false,
        }),
    };
    match side {
        Side::Base => slot.in_base = true,
        Side::Overlay => slot.in_overlay = true,
    }
}

/// An item as assembled from master data, wiki metadata and asset listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Numeric item id as a string.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Flavour text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rarity tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    /// Repository path of the icon asset.
    ///
    /// Always written, as `null` when no icon matched, so every emitted row
    /// carries the key.
    #[serde(default)]
    pub icon_path: Option<String>,
}

impl ItemRecord {
    /// Record with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

impl Keyed for ItemRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Reconcile for ItemRecord {
    fn reconcile(&mut self, overlay: Self) {
        fn take(field: &mut Option<String>, overlay: Option<String>) {
            if overlay.is_some() {
                *field = overlay;
            }
        }
        take(&mut self.name, overlay.name);
        take(&mut self.description, overlay.description);
        take(&mut self.rarity, overlay.rarity);
        take(&mut self.icon_path, overlay.icon_path);
    }
}
