
use crate::{
    error::{MarshalError, QueryError},
    query::{RangeScan, SearchScan},
    schema::Schema,
    store::{
        DeleteRowRequest, GetRowRequest, PutRowRequest, StoreClient, UpdateRowRequest,
    },
    value::{Record, WireValue},
};

///
/// Model
///
/// Thin document collaborator over one table: single-row CRUD built
/// verbatim on the schema marshalling operations, plus entry points for
/// the range and search builders.
///

pub struct Model<'a, C> {
    schema: &'a Schema,
    client: &'a C,
    table: String,
}

impl<'a, C: StoreClient> Model<'a, C> {
    #[must_use]
    pub fn new(schema: &'a Schema, client: &'a C, table: impl Into<String>) -> Self {
        Self {
            schema,
            client,
            table: table.into(),
        }
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        self.schema
    }

    /// Start a primary-key interval query on this table.
    #[must_use]
    pub fn range(&self) -> RangeScan<'a, C> {
        RangeScan::new(self.schema, self.client, self.table.clone())
    }

    /// Start an inverted-index query against `index` on this table.
    #[must_use]
    pub fn search(&self, index: &str) -> SearchScan<'a, C> {
        SearchScan::new(self.schema, self.client, self.table.clone(), index.to_string())
    }

    /// Fetch one row by complete primary key.
    pub async fn get(&self, key: &Record) -> Result<Option<Record>, QueryError> {
        let key = self.complete_key(key)?;
        let row = self
            .client
            .get_row(GetRowRequest {
                table: self.table.clone(),
                key,
                projection: None,
            })
            .await?;

        Ok(self.schema.from_wire_row(row.as_ref()))
    }

    /// Insert or replace one row.
    pub async fn put(&self, record: &Record) -> Result<(), QueryError> {
        let key = self.complete_key(record)?;
        let attributes = self.schema.to_wire_attributes(record)?;

        self.client
            .put_row(PutRowRequest {
                table: self.table.clone(),
                key,
                attributes,
            })
            .await?;
        Ok(())
    }

    /// Apply a partial update: unmentioned fields stay, explicit nulls
    /// delete, everything else overwrites.
    pub async fn update(&self, key: &Record, partial: &Record) -> Result<(), QueryError> {
        let key = self.complete_key(key)?;
        let patch = self.schema.to_wire_update_patch(partial)?;

        self.client
            .update_row(UpdateRowRequest {
                table: self.table.clone(),
                key,
                patch,
            })
            .await?;
        Ok(())
    }

    /// Delete one row by complete primary key.
    pub async fn delete(&self, key: &Record) -> Result<(), QueryError> {
        let key = self.complete_key(key)?;

        self.client
            .delete_row(DeleteRowRequest {
                table: self.table.clone(),
                key,
            })
            .await?;
        Ok(())
    }

    // Single-row operations need the full physical key; missing segments
    // here are caller errors, not candidates for sentinel completion.
    fn complete_key(&self, values: &Record) -> Result<Vec<(String, WireValue)>, QueryError> {
        let wire_key = self.schema.to_wire_key(values, None);
        if wire_key.is_complete() {
            Ok(wire_key.into_present())
        } else {
            Err(MarshalError {
                fields: wire_key.missing,
            }
            .into())
        }
    }
}
