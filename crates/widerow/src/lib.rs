//! widerow — a schema-driven object mapper and query layer for wide-column,
//! multi-model stores (primary-key rows, global secondary indexes, inverted
//! search indexes).
//!
//! Application code declares a field schema once, then interacts with the
//! store through typed operations: the schema performs bidirectional value
//! marshalling between application values and the store's narrow cell
//! model, and the query builders turn chained declarative configuration
//! into single, well-formed store requests.
//!
//! The crate prepares and interprets request payloads only. Connection
//! lifecycle lives behind the [`store::StoreClient`] seam; there is no
//! retry, caching, or transaction layer here.

pub mod cond;
pub mod error;
pub mod model;
pub mod query;
pub mod schema;
pub mod search;
pub mod session;
pub mod store;
pub mod value;

#[cfg(test)]
pub(crate) mod testkit;

pub mod prelude {
    pub use crate::{
        cond::{Comparator, Filter, FilterBuilder},
        error::{ConditionError, MarshalError, QueryError, SchemaError, StoreError},
        model::Model,
        query::{RangeResult, RangeScan, SearchResult, SearchScan},
        schema::{
            FieldDecl, IndexMode, PatchOp, Schema, SchemaBuilder, SearchField, SearchIndex,
            SecondaryIndex, UpdatePatch, WireKey,
        },
        search::{SearchFactory, SearchFragment, SearchQuery, SortClause, SortOrder},
        session::{Session, StoreConfig},
        store::{Direction, ProjectionMode, RangeRequest, Row, SearchRequest, StoreClient},
        value::{FieldType, Record, Value, WireValue},
    };
}
