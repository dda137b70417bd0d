//! Schema model derived from a record type
//!
//! There is no schema catalog: the layout of the data is the schema. Each
//! call derives a [`Schema`] from the [`Record`] implementation of the type
//! it was given, validates it, and uses it to decide which keys to touch.
//!
//! Record types usually get their [`Record`] implementation from the
//! [`record!`](crate::record) macro.

use crate::error::{Error, Result};
use crate::key::is_reserved;
use crate::value::{FieldType, Value};

/// Role a field plays in its record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// The primary identifier (string typed, exactly one per record)
    Primary,
    /// A field with secondary index entries
    Indexed,
    /// An ordinary field
    Plain,
}

/// Static description of one declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name, used as the key segment
    pub name: &'static str,
    /// Declared type driving the codec
    pub ty: FieldType,
    /// Field has an explicit absent state (`Option<T>`)
    pub optional: bool,
    /// Primary, indexed or plain
    pub role: FieldRole,
}

impl FieldDef {
    /// Returns true if the field carries index entries
    pub fn is_indexed(&self) -> bool {
        self.role == FieldRole::Indexed
    }

    /// Returns true if this is the primary identifier field
    pub fn is_primary(&self) -> bool {
        self.role == FieldRole::Primary
    }
}

/// A type whose values can be stored as records
///
/// `Default` provides the fresh instance reads decode into: fields that are
/// not read keep their default.
pub trait Record: Default {
    /// Table name, normally the type name
    fn table() -> &'static str;

    /// Every declared field, primary identifier included
    fn fields() -> &'static [FieldDef];

    /// Current value of `name`; `None` if the field is absent or unknown
    fn field(&self, name: &str) -> Option<Value>;

    /// Overwrite `name` with a decoded value
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] for an unknown field,
    /// [`Error::TypeConversion`] if the value does not fit the field type.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;
}

/// A field paired with the value it currently holds
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    /// Field description
    pub def: &'static FieldDef,
    /// Current value
    pub value: Value,
}

/// Validated view of a record type
#[derive(Debug, Clone)]
pub struct Schema {
    table: &'static str,
    primary: &'static FieldDef,
    fields: Vec<&'static FieldDef>,
    include_zero: bool,
}

impl Schema {
    /// Derive the schema of `R`
    ///
    /// With `include_zero == false`, [`values`](Self::values) leaves out
    /// fields holding their zero value so that unset fields are not
    /// mistaken for explicit zero writes.
    ///
    /// # Errors
    ///
    /// - [`Error::NoPrimaryId`] if no field is marked primary
    /// - [`Error::InvalidParameter`] for several primary fields or a
    ///   non-text primary field
    /// - [`Error::ReservedWord`] if the table or a field uses a reserved name
    /// - [`Error::MalformedKey`] if the table or a field name is empty
    pub fn model<R: Record>(include_zero: bool) -> Result<Self> {
        let table = R::table();
        check_name(table, "table")?;

        let mut primary: Option<&'static FieldDef> = None;
        let mut fields: Vec<&'static FieldDef> = Vec::new();
        for def in R::fields() {
            check_name(def.name, "field")?;
            if fields.iter().any(|f| f.name == def.name)
                || primary.map_or(false, |p| p.name == def.name)
            {
                return Err(Error::InvalidParameter(format!(
                    "{} declares field {} twice",
                    table, def.name
                )));
            }
            if def.is_primary() {
                if let Some(existing) = primary {
                    return Err(Error::InvalidParameter(format!(
                        "{} declares two primary fields: {} and {}",
                        table, existing.name, def.name
                    )));
                }
                if def.ty != FieldType::Text || def.optional {
                    return Err(Error::InvalidParameter(format!(
                        "primary field {}.{} must be a String",
                        table, def.name
                    )));
                }
                primary = Some(def);
            } else {
                fields.push(def);
            }
        }

        let primary = primary.ok_or_else(|| Error::NoPrimaryId(table.to_string()))?;
        Ok(Self {
            table,
            primary,
            fields,
            include_zero,
        })
    }

    /// Table name
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Name of the primary identifier field
    pub fn primary(&self) -> &'static str {
        self.primary.name
    }

    /// Persistable fields in declaration order (primary excluded)
    pub fn fields(&self) -> &[&'static FieldDef] {
        &self.fields
    }

    /// Look up a persistable field by name
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().copied().find(|f| f.name == name)
    }

    /// Primary identifier of `record` (empty when not yet created)
    pub fn id_of<R: Record>(&self, record: &R) -> Result<String> {
        match record.field(self.primary.name) {
            Some(Value::Text(id)) => Ok(id),
            Some(other) => Err(Error::TypeConversion(format!(
                "primary field {} holds {}",
                self.primary.name,
                other.field_type()
            ))),
            None => Ok(String::new()),
        }
    }

    /// Current field values of `record`, primary excluded
    ///
    /// Absent optional fields are always skipped. Zero values of
    /// non-optional fields are skipped unless the schema was modelled with
    /// `include_zero`. An optional field set to `Some(zero)` is kept.
    pub fn values<R: Record>(&self, record: &R) -> Vec<FieldValue> {
        self.fields
            .iter()
            .copied()
            .filter_map(|def| {
                let value = record.field(def.name)?;
                if !self.include_zero && !def.optional && value.is_zero() {
                    return None;
                }
                Some(FieldValue { def, value })
            })
            .collect()
    }

    /// Resolve a read allow-list; an empty list selects every field
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if a name is not a persistable field.
    pub fn select(&self, names: &[&str]) -> Result<Vec<&'static FieldDef>> {
        if names.is_empty() {
            return Ok(self.fields.clone());
        }
        names
            .iter()
            .map(|name| {
                self.field(name).ok_or_else(|| {
                    Error::InvalidParameter(format!("{} has no field {}", self.table, name))
                })
            })
            .collect()
    }
}

fn check_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::MalformedKey(format!("empty {} name", what)));
    }
    if is_reserved(name) {
        return Err(Error::ReservedWord(format!("{} name {}", what, name)));
    }
    Ok(())
}
