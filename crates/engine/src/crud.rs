//! Create, read, update and delete
//!
//! Each write is one engine transaction, so a record is either fully
//! written, fully updated or fully removed. Reads run in one read-only
//! transaction and see a single consistent state.

use slap_core::key::SENTINEL;
use slap_core::{codec, Error, FieldDef, KeyBuilder, Record, Result, ResultExt, Schema, Value};
use slap_storage::{KvEngineExt, ReadTxn};
use tracing::debug;

use crate::store::Store;

impl Store {
    /// Persist a new record and return its freshly minted id
    ///
    /// Writes the existence key, every populated field and the index entry
    /// of every indexed field. Plain fields holding their zero value and
    /// absent optional fields are not written; they read back the same way.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if the record's id is already set, plus
    /// schema and storage errors.
    pub fn create<R: Record>(&self, record: &R) -> Result<String> {
        self.create_inner(record).op("create")
    }

    /// [`create`](Self::create) every record in order, one transaction each
    ///
    /// Returns the ids in input order. A failure stops the batch; records
    /// before it stay committed.
    pub fn create_many<R: Record>(&self, records: &[R]) -> Result<Vec<String>> {
        self.create_many_inner(records).op("create")
    }

    /// Load records by id, decoding only `fields` (all fields when empty)
    ///
    /// Missing ids are skipped, except when a single id was requested, in
    /// which case [`Error::NoRecord`] is returned. Results follow the order
    /// of `ids`.
    pub fn read<R: Record>(&self, fields: &[&str], ids: &[&str]) -> Result<Vec<R>> {
        self.read_inner(fields, ids).op("read")
    }

    /// Overwrite the populated fields of `partial` on record `id`
    ///
    /// Fields holding their zero value are left alone (use an `Option`
    /// field to write an explicit zero). Index entries of changed indexed
    /// fields move with the value. The id carried by `partial` is ignored.
    ///
    /// # Errors
    ///
    /// [`Error::NoRecord`] if `id` does not exist.
    pub fn update<R: Record>(&self, partial: &R, id: &str) -> Result<()> {
        self.update_inner(partial, id).op("update")
    }

    /// Remove record `id` with all its fields and index entries
    ///
    /// Deleting an id that does not exist succeeds.
    pub fn delete<R: Record>(&self, id: &str) -> Result<()> {
        self.delete_inner::<R>(id).op("delete")
    }

    fn create_inner<R: Record>(&self, record: &R) -> Result<String> {
        let schema = Schema::model::<R>(true)?;
        self.insert(&schema, record)
    }

    fn create_many_inner<R: Record>(&self, records: &[R]) -> Result<Vec<String>> {
        let schema = Schema::model::<R>(true)?;
        records
            .iter()
            .map(|record| self.insert(&schema, record))
            .collect()
    }

    fn insert<R: Record>(&self, schema: &Schema, record: &R) -> Result<String> {
        let current = schema.id_of(record)?;
        if !current.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "{} record already has id {}",
                schema.table(),
                current
            )));
        }

        let id = self.ids.next_id();
        let keys = self.keys(schema.table());

        let mut writes = vec![(keys.record_key(&id)?, SENTINEL.to_vec())];
        let mut written = 0;
        for fv in schema.values(record) {
            if !fv.def.is_indexed() && !fv.def.optional && fv.value.is_zero() {
                continue;
            }
            let bytes = codec::encode(&fv.value);
            if fv.def.is_indexed() {
                writes.push((
                    keys.index_key(fv.def.name, &bytes, &id)?,
                    id.as_bytes().to_vec(),
                ));
            }
            writes.push((keys.field_key(&id, fv.def.name)?, bytes));
            written += 1;
        }

        self.engine.write(|txn| {
            for (key, value) in &writes {
                txn.put(key, value)?;
            }
            Ok(())
        })?;

        debug!(
            target: "slap::store",
            table = schema.table(),
            id = %id,
            fields = written,
            "Created record"
        );
        Ok(id)
    }

    fn read_inner<R: Record>(&self, fields: &[&str], ids: &[&str]) -> Result<Vec<R>> {
        let schema = Schema::model::<R>(true)?;
        let selected = schema.select(fields)?;
        let keys = self.keys(schema.table());

        self.engine.read(|txn| {
            let mut out = Vec::with_capacity(ids.len());
            for &id in ids {
                match load::<R, _>(txn, &keys, &schema, &selected, id)? {
                    Some(record) => out.push(record),
                    None if ids.len() == 1 => {
                        return Err(Error::NoRecord(format!("{} {}", schema.table(), id)))
                    }
                    None => {
                        debug!(
                            target: "slap::store",
                            table = schema.table(),
                            id,
                            "Skipping missing record"
                        );
                    }
                }
            }
            Ok(out)
        })
    }

    fn update_inner<R: Record>(&self, partial: &R, id: &str) -> Result<()> {
        let schema = Schema::model::<R>(false)?;
        let keys = self.keys(schema.table());
        let record_key = keys.record_key(id)?;

        let mut changes = Vec::new();
        for fv in schema.values(partial) {
            let bytes = codec::encode(&fv.value);
            let index_key = if fv.def.is_indexed() {
                Some(keys.index_key(fv.def.name, &bytes, id)?)
            } else {
                None
            };
            changes.push((fv.def, keys.field_key(id, fv.def.name)?, bytes, index_key));
        }

        self.engine.write(|txn| {
            if !txn.contains(&record_key)? {
                return Err(Error::NoRecord(format!("{} {}", schema.table(), id)));
            }
            for (def, field_key, bytes, index_key) in &changes {
                if let Some(index_key) = index_key {
                    if let Some(old) = txn.get(field_key)? {
                        txn.delete(&keys.index_key(def.name, &old, id)?)?;
                    }
                    txn.put(index_key, id.as_bytes())?;
                }
                txn.put(field_key, bytes)?;
            }
            Ok(())
        })?;

        debug!(
            target: "slap::store",
            table = schema.table(),
            id,
            fields = changes.len(),
            "Updated record"
        );
        Ok(())
    }

    fn delete_inner<R: Record>(&self, id: &str) -> Result<()> {
        let schema = Schema::model::<R>(true)?;
        let keys = self.keys(schema.table());
        let record_key = keys.record_key(id)?;
        let field_prefix = keys.field_prefix(id)?;

        let removed = self.engine.write(|txn| {
            for def in schema.fields().iter().filter(|def| def.is_indexed()) {
                if let Some(old) = txn.get(&keys.field_key(id, def.name)?)? {
                    txn.delete(&keys.index_key(def.name, &old, id)?)?;
                }
            }

            let field_keys = txn.scan_prefix(&field_prefix)?;
            for (key, _) in &field_keys {
                txn.delete(key)?;
            }

            let existed = txn.contains(&record_key)?;
            txn.delete(&record_key)?;
            Ok(existed)
        })?;

        debug!(
            target: "slap::store",
            table = schema.table(),
            id,
            existed = removed,
            "Deleted record"
        );
        Ok(())
    }
}

/// Decode record `id` from `txn`, or `None` if it does not exist
///
/// Only `fields` are decoded; the rest keep their `Default` value.
pub(crate) fn load<R, T>(
    txn: &T,
    keys: &KeyBuilder<'_>,
    schema: &Schema,
    fields: &[&'static FieldDef],
    id: &str,
) -> Result<Option<R>>
where
    R: Record,
    T: ReadTxn + ?Sized,
{
    if !txn.contains(&keys.record_key(id)?)? {
        return Ok(None);
    }

    let mut record = R::default();
    record.set_field(schema.primary(), Value::Text(id.to_string()))?;
    for def in fields {
        if let Some(bytes) = txn.get(&keys.field_key(id, def.name)?)? {
            record.set_field(def.name, codec::decode(&bytes, def.ty)?)?;
        }
    }
    Ok(Some(record))
}
