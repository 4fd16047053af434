
use crate::{
    error::{MarshalError, SchemaError},
    store::Row,
    value::{FieldType, Record, Value, WireValue, from_wire, to_wire},
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

///
/// FieldDecl
///
/// A declared field: name plus its finite semantic type tag. Immutable once
/// attached to a schema.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDecl {
    name: String,
    ty: FieldType,
}

impl FieldDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> FieldType {
        self.ty
    }
}

///
/// SecondaryIndex
///
/// Key-only projection over the base rows with its own key field order.
/// Index keys may overlap the base primary key; key completion dedups.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SecondaryIndex {
    pub name: String,
    pub key: Vec<String>,
}

///
/// IndexMode
///
/// Per-field indexing behavior inside a search index.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexMode {
    Keyword,
    Text,
    Numeric,
    Boolean,
    Geo,
}

///
/// SearchField / SearchIndex
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchField {
    pub name: String,
    pub mode: IndexMode,
    pub sortable: bool,
    pub stored: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchIndex {
    pub name: String,
    pub fields: Vec<SearchField>,
}

///
/// PatchOp / UpdatePatch
///
/// Column-level update instructions emitted by `to_wire_update_patch`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum PatchOp {
    /// Set/overwrite the column with a fresh cell.
    Put(WireValue),
    /// Delete every stored version of the column.
    DeleteAll,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct UpdatePatch {
    pub ops: Vec<(String, PatchOp)>,
}

impl UpdatePatch {
    #[must_use]
    pub fn op_for(&self, field: &str) -> Option<&PatchOp> {
        self.ops
            .iter()
            .find_map(|(name, op)| (name == field).then_some(op))
    }
}

///
/// WireKey
///
/// Result of marshalling a (possibly partial) application key. `fields` is
/// the full applicable key order; a `None` slot awaits sentinel completion
/// by the range builder, and its name is repeated in `missing`.
///

#[derive(Clone, Debug, PartialEq)]
pub struct WireKey {
    pub fields: Vec<(String, Option<WireValue>)>,
    pub missing: Vec<String>,
}

impl WireKey {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Collapse into wire pairs, substituting `fill` for every missing slot.
    #[must_use]
    pub fn complete_with(&self, fill: &WireValue) -> Vec<(String, WireValue)> {
        self.fields
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    value.clone().unwrap_or_else(|| fill.clone()),
                )
            })
            .collect()
    }

    /// Collapse into wire pairs, dropping missing slots.
    #[must_use]
    pub fn into_present(self) -> Vec<(String, WireValue)> {
        self.fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

///
/// Schema
///
/// Declarative record schema: field declarations, primary-key order,
/// secondary-index and search-index definitions. Every reference is checked
/// eagerly at build time; stateless and read-only afterwards, safe for
/// concurrent use by any number of builders.
///

#[derive(Clone, Debug)]
pub struct Schema {
    fields: Vec<FieldDecl>,
    primary_key: Vec<String>,
    indexes: Vec<SecondaryIndex>,
    search_indexes: Vec<SearchIndex>,
    touch_field: Option<String>,
}

impl Schema {
    #[must_use]
    pub const fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|decl| decl.name == name)
    }

    #[must_use]
    pub fn is_primary_key_field(&self, name: &str) -> bool {
        self.primary_key.iter().any(|key| key == name)
    }

    #[must_use]
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    #[must_use]
    pub fn secondary_index(&self, name: &str) -> Option<&SecondaryIndex> {
        self.indexes.iter().find(|index| index.name == name)
    }

    #[must_use]
    pub fn search_index(&self, name: &str) -> Option<&SearchIndex> {
        self.search_indexes.iter().find(|index| index.name == name)
    }

    /// Declared fields that are not part of the base primary key, in
    /// declaration order.
    pub fn attribute_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields
            .iter()
            .filter(|decl| !self.is_primary_key_field(&decl.name))
    }

    /// All declared field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|decl| decl.name.as_str())
    }

    /// The physical key field order applicable to a lookup.
    ///
    /// A secondary-index lookup key must be completed to a full physical
    /// primary key before the store can use it: index key fields come
    /// first, then any base key fields not already covered. An undeclared
    /// index name falls back to the base order; the emitted request still
    /// names the index, so the store stays authoritative on existence.
    #[must_use]
    pub fn primary_key_fields_for(&self, index: Option<&str>) -> Vec<&str> {
        let Some(index) = index.and_then(|name| self.secondary_index(name)) else {
            return self.primary_key.iter().map(String::as_str).collect();
        };

        let mut fields: Vec<&str> = index.key.iter().map(String::as_str).collect();
        for key in &self.primary_key {
            if !fields.contains(&key.as_str()) {
                fields.push(key);
            }
        }
        fields
    }

    /// Marshal a (possibly partial) application key into wire pairs.
    ///
    /// Fields that convert to nothing are reported as missing rather than
    /// failing, so a range builder can later fill them with open-range
    /// sentinels instead of erroring.
    #[must_use]
    pub fn to_wire_key(&self, values: &Record, index: Option<&str>) -> WireKey {
        let mut fields = Vec::new();
        let mut missing = Vec::new();

        for name in self.primary_key_fields_for(index) {
            let ty = self.field(name).map_or(FieldType::Raw, FieldDecl::ty);
            let wire = values.get(name).and_then(|value| to_wire(value, ty));
            if wire.is_none() {
                missing.push(name.to_string());
            }
            fields.push((name.to_string(), wire));
        }

        WireKey { fields, missing }
    }

    /// Marshal the non-key attribute columns of a record.
    ///
    /// Absent and null fields are skipped. A declared, present field that
    /// fails to convert is an error; all failing names are collected into
    /// one [`MarshalError`] rather than failing fast on the first.
    pub fn to_wire_attributes(
        &self,
        values: &Record,
    ) -> Result<Vec<(String, WireValue)>, MarshalError> {
        let mut columns = Vec::new();
        let mut failing = Vec::new();

        for decl in self.attribute_fields() {
            match values.get(&decl.name) {
                None => {}
                Some(Value::Null) => {}
                Some(value) => match to_wire(value, decl.ty) {
                    Some(wire) => columns.push((decl.name.clone(), wire)),
                    None => failing.push(decl.name.clone()),
                },
            }
        }

        if failing.is_empty() {
            Ok(columns)
        } else {
            Err(MarshalError { fields: failing })
        }
    }

    /// Marshal a partial record into column update instructions.
    ///
    /// Unmentioned fields are left unchanged in storage; an explicit null
    /// deletes all versions of the column; anything else overwrites. A
    /// configured touch field always emits a fresh timestamp regardless of
    /// caller input.
    pub fn to_wire_update_patch(&self, partial: &Record) -> Result<UpdatePatch, MarshalError> {
        let mut ops = Vec::new();
        let mut failing = Vec::new();

        for decl in self.attribute_fields() {
            if self.touch_field.as_deref() == Some(decl.name.as_str()) {
                ops.push((decl.name.clone(), PatchOp::Put(WireValue::Int(now_millis()))));
                continue;
            }

            match partial.get(&decl.name) {
                None => {}
                Some(Value::Null) => ops.push((decl.name.clone(), PatchOp::DeleteAll)),
                Some(value) => match to_wire(value, decl.ty) {
                    Some(wire) => ops.push((decl.name.clone(), PatchOp::Put(wire))),
                    None => failing.push(decl.name.clone()),
                },
            }
        }

        if failing.is_empty() {
            Ok(UpdatePatch { ops })
        } else {
            Err(MarshalError { fields: failing })
        }
    }

    /// Decode a store row into one flat application record.
    ///
    /// Primary-key fields and attribute columns merge; a cell that decodes
    /// to nothing is omitted from the result rather than erroring. An
    /// absent row decodes to `None`.
    #[must_use]
    pub fn from_wire_row(&self, row: Option<&Row>) -> Option<Record> {
        let row = row?;
        let mut record = Record::new();

        let cells = row.primary_key.iter().chain(row.attributes.iter());
        for (name, wire) in cells {
            let ty = self.field(name).map_or(FieldType::Raw, FieldDecl::ty);
            if let Some(value) = from_wire(wire, ty) {
                record.insert(name.clone(), value);
            }
        }

        Some(record)
    }
}

///
/// SchemaBuilder
///
/// Fluent schema constructor. All reference validation happens in `build`;
/// violations are fatal construction errors, never runtime errors.
///

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDecl>,
    primary_key: Vec<String>,
    indexes: Vec<SecondaryIndex>,
    search_indexes: Vec<SearchIndex>,
    touch_field: Option<String>,
}

impl SchemaBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: Vec::new(),
            primary_key: Vec::new(),
            indexes: Vec::new(),
            search_indexes: Vec::new(),
            touch_field: None,
        }
    }

    /// Declare a field.
    #[must_use]
    pub fn field(mut self, name: &str, ty: FieldType) -> Self {
        self.fields.push(FieldDecl::new(name, ty));
        self
    }

    /// Set the ordered primary-key field names. Order is significant and
    /// must match the store's physical key order.
    #[must_use]
    pub fn primary_key<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add a secondary index with its own key field order.
    #[must_use]
    pub fn secondary_index<I, S>(mut self, name: &str, key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexes.push(SecondaryIndex {
            name: name.to_string(),
            key: key.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add a search (inverted) index definition.
    #[must_use]
    pub fn search_index(mut self, index: SearchIndex) -> Self {
        self.search_indexes.push(index);
        self
    }

    /// Force `field` to receive a fresh timestamp on every update patch.
    #[must_use]
    pub fn touch_on_update(mut self, field: &str) -> Self {
        self.touch_field = Some(field.to_string());
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        if self.primary_key.is_empty() {
            return Err(SchemaError::MissingPrimaryKey);
        }

        for (i, decl) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|prior| prior.name == decl.name) {
                return Err(SchemaError::DuplicateField {
                    field: decl.name.clone(),
                });
            }
        }

        let declared = |name: &str| self.fields.iter().any(|decl| decl.name == name);

        for key in &self.primary_key {
            if !declared(key) {
                return Err(SchemaError::UnknownPrimaryKeyField { field: key.clone() });
            }
        }

        for index in &self.indexes {
            for key in &index.key {
                if !declared(key) {
                    return Err(SchemaError::UnknownIndexField {
                        index: index.name.clone(),
                        field: key.clone(),
                    });
                }
            }
        }

        for index in &self.search_indexes {
            for field in &index.fields {
                if !declared(&field.name) {
                    return Err(SchemaError::UnknownSearchField {
                        index: index.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        if let Some(touch) = &self.touch_field
            && !declared(touch)
        {
            return Err(SchemaError::UnknownTouchField {
                field: touch.clone(),
            });
        }

        Ok(Schema {
            fields: self.fields,
            primary_key: self.primary_key,
            indexes: self.indexes,
            search_indexes: self.search_indexes,
            touch_field: self.touch_field,
        })
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
