//! Request/response records exchanged with the connection collaborator.
//!
//! The core prepares and interprets single-request payloads only; endpoint
//! management, credentials, and retries live outside (see `session`).

use crate::{
    cond::Filter,
    error::StoreError,
    schema::UpdatePatch,
    search::{SearchQuery, SortClause},
    value::WireValue,
};
use serde::{Deserialize, Serialize};

///
/// Direction
///
/// Scan order for interval queries.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

///
/// ProjectionMode
///
/// Returned-column selection for search requests: the store's returnable
/// default, or an explicit field list.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ProjectionMode {
    All,
    Fields(Vec<String>),
}

///
/// Row
///
/// One stored row on the wire: ordered primary-key field list plus
/// attribute-column list.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Row {
    pub primary_key: Vec<(String, WireValue)>,
    pub attributes: Vec<(String, WireValue)>,
}

///
/// RangeRequest / RangeResponse
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RangeRequest {
    pub table: String,
    pub index: Option<String>,
    /// Inclusive start key in physical key order.
    pub start: Vec<(String, WireValue)>,
    /// Exclusive end key in physical key order.
    pub end: Vec<(String, WireValue)>,
    pub direction: Direction,
    pub limit: u32,
    pub filter: Option<Filter>,
    pub projection: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RangeResponse {
    pub rows: Vec<Row>,
    /// Key to resume the scan from; absent when the range is exhausted.
    pub next_start: Option<Vec<(String, WireValue)>>,
}

///
/// SearchRequest / SearchResponse
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchRequest {
    pub table: String,
    pub index: String,
    pub query: SearchQuery,
    pub collapse: Option<String>,
    pub sort: Vec<SortClause>,
    pub token: Option<String>,
    pub limit: u32,
    pub offset: u32,
    pub total_count: bool,
    pub projection: ProjectionMode,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SearchResponse {
    /// Whether every shard reported in. Partial responses are downgraded to
    /// empty results by the builder rather than surfaced as success.
    pub fully_succeeded: bool,
    pub rows: Vec<Row>,
    pub total_count: i64,
    pub next_token: Option<String>,
}

///
/// Single-row request records used by the document collaborator.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GetRowRequest {
    pub table: String,
    pub key: Vec<(String, WireValue)>,
    pub projection: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PutRowRequest {
    pub table: String,
    pub key: Vec<(String, WireValue)>,
    pub attributes: Vec<(String, WireValue)>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct UpdateRowRequest {
    pub table: String,
    pub key: Vec<(String, WireValue)>,
    pub patch: UpdatePatch,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DeleteRowRequest {
    pub table: String,
    pub key: Vec<(String, WireValue)>,
}

///
/// StoreClient
///
/// The single seam to the connection collaborator: one asynchronous
/// call-and-await per fully-formed request. Implementations perform no
/// internal parallelism, no retries, and no caching on behalf of the core.
///

// Futures are deliberately not required to be Send: the core follows a
// single-threaded, cooperative suspension model (one await per execute).
#[allow(async_fn_in_trait)]
pub trait StoreClient {
    async fn scan(&self, request: RangeRequest) -> Result<RangeResponse, StoreError>;

    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, StoreError>;

    async fn get_row(&self, request: GetRowRequest) -> Result<Option<Row>, StoreError>;

    async fn put_row(&self, request: PutRowRequest) -> Result<(), StoreError>;

    async fn update_row(&self, request: UpdateRowRequest) -> Result<(), StoreError>;

    async fn delete_row(&self, request: DeleteRowRequest) -> Result<(), StoreError>;
}
