//! Equality queries and pagination
//!
//! A filter is a record with some fields populated. Each populated field
//! becomes one prefix scan over its index entries, producing a sorted id
//! list; the lists are intersected with a merge step. There is no planner:
//! every populated field is scanned.
//!
//! Filtering on a field that is not indexed scans an empty index range
//! and therefore matches nothing.

use slap_core::{
    codec, Error, FieldDef, KeyBuilder, Record, Result, ResultExt, Schema, TableEntry,
};
use slap_storage::{KvEngineExt, ReadTxn, ScanFlow};
use tracing::debug;

use crate::crud::load;
use crate::store::Store;

impl Store {
    /// Ids of records matching every populated field of `filter`
    ///
    /// Zero-valued fields are ignored; a filter with no populated field
    /// matches nothing. Ids come back sorted.
    pub fn where_ids<R: Record>(&self, filter: &R) -> Result<Vec<String>> {
        self.where_inner(filter).op("where")
    }

    /// Records matching `filter`, decoding only `fields` (all when empty)
    ///
    /// Matching and loading run in one read-only transaction. Records come
    /// back in id order.
    pub fn select<R: Record>(&self, filter: &R, fields: &[&str]) -> Result<Vec<R>> {
        self.select_inner(filter, fields).op("select")
    }

    /// Up to `count` records in id order, starting after id `after`
    ///
    /// `None` or an empty `after` starts from the first record. Passing the
    /// last id of one page as `after` returns the next page with no overlap.
    pub fn take<R: Record>(
        &self,
        fields: &[&str],
        after: Option<&str>,
        count: usize,
    ) -> Result<Vec<R>> {
        self.take_inner(fields, after, count).op("take")
    }

    fn where_inner<R: Record>(&self, filter: &R) -> Result<Vec<String>> {
        let schema = Schema::model::<R>(false)?;
        let keys = self.keys(schema.table());
        self.engine.read(|txn| matching_ids(txn, &keys, &schema, filter))
    }

    fn select_inner<R: Record>(&self, filter: &R, fields: &[&str]) -> Result<Vec<R>> {
        let schema = Schema::model::<R>(false)?;
        let selected = schema.select(fields)?;
        let keys = self.keys(schema.table());

        self.engine.read(|txn| {
            let ids = matching_ids(txn, &keys, &schema, filter)?;
            let mut out = Vec::with_capacity(ids.len());
            for id in &ids {
                if let Some(record) = load::<R, _>(txn, &keys, &schema, &selected, id)? {
                    out.push(record);
                }
            }
            Ok(out)
        })
    }

    fn take_inner<R: Record>(
        &self,
        fields: &[&str],
        after: Option<&str>,
        count: usize,
    ) -> Result<Vec<R>> {
        let schema = Schema::model::<R>(true)?;
        let selected = schema.select(fields)?;
        let keys = self.keys(schema.table());
        if count == 0 {
            return Ok(Vec::new());
        }

        let after = after.filter(|id| !id.is_empty());
        let prefix = keys.table_prefix()?;
        let start = after.map(|id| keys.record_key(id)).transpose()?;

        self.engine.read(|txn| {
            let ids = page_ids(txn, &keys, &prefix, start.as_deref(), after, count)?;
            let mut out = Vec::with_capacity(ids.len());
            for id in &ids {
                if let Some(record) = load::<R, _>(txn, &keys, &schema, &selected, id)? {
                    out.push(record);
                }
            }
            Ok(out)
        })
    }
}

fn matching_ids<R, T>(
    txn: &T,
    keys: &KeyBuilder<'_>,
    schema: &Schema,
    filter: &R,
) -> Result<Vec<String>>
where
    R: Record,
    T: ReadTxn + ?Sized,
{
    let mut lists = Vec::new();
    for fv in schema.values(filter) {
        if !fv.def.is_indexed() {
            debug!(
                target: "slap::query",
                table = schema.table(),
                field = fv.def.name,
                "Filter on non-indexed field matches nothing"
            );
        }
        lists.push(index_ids(txn, keys, fv.def, &codec::encode(&fv.value))?);
    }

    let matched = intersect_all(lists);
    debug!(
        target: "slap::query",
        table = schema.table(),
        matched = matched.len(),
        "Evaluated filter"
    );
    Ok(matched)
}

/// Sorted ids holding `value` in `field`
fn index_ids<T>(
    txn: &T,
    keys: &KeyBuilder<'_>,
    field: &FieldDef,
    value: &[u8],
) -> Result<Vec<String>>
where
    T: ReadTxn + ?Sized,
{
    let prefix = keys.index_prefix(field.name, value)?;
    let mut ids = Vec::new();
    txn.scan(&prefix, None, &mut |_, id| {
        let id = String::from_utf8(id.to_vec()).map_err(|e| {
            Error::MalformedKey(format!("index entry holds a non-UTF-8 id: {}", e))
        })?;
        ids.push(id);
        Ok(ScanFlow::Continue)
    })?;
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// Ids of the first `count` records under `prefix`, skipping `after`
fn page_ids<T>(
    txn: &T,
    keys: &KeyBuilder<'_>,
    prefix: &[u8],
    start: Option<&[u8]>,
    after: Option<&str>,
    count: usize,
) -> Result<Vec<String>>
where
    T: ReadTxn + ?Sized,
{
    let mut ids = Vec::with_capacity(count);
    txn.scan(prefix, start, &mut |key, _| {
        if let Some(TableEntry::Record(id)) = keys.parse_table_entry(key)? {
            if after != Some(id.as_str()) {
                ids.push(id);
                if ids.len() >= count {
                    return Ok(ScanFlow::Stop);
                }
            }
        }
        Ok(ScanFlow::Continue)
    })?;
    Ok(ids)
}

/// AND of sorted, deduplicated id lists
fn intersect_all(lists: Vec<Vec<String>>) -> Vec<String> {
    let mut lists = lists.into_iter();
    let Some(first) = lists.next() else {
        return Vec::new();
    };
    lists.fold(first, |acc, list| intersect_sorted(&acc, &list))
}

fn intersect_sorted(a: &[String], b: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    out
}
