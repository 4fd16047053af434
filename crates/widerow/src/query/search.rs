use crate::{
    error::QueryError,
    query::DEFAULT_SEARCH_LIMIT,
    schema::Schema,
    search::{SearchFactory, SearchFragment, SortClause, SortOrder},
    store::{ProjectionMode, SearchRequest, StoreClient},
    value::Record,
};

///
/// SearchScan
///
/// Chained configuration for one inverted-index query. Mirrors the range
/// builder's lifecycle: single-owner mutation, one round-trip per execute,
/// state survives execution for repeat requests.
///

pub struct SearchScan<'a, C> {
    schema: &'a Schema,
    client: &'a C,
    table: String,
    index: String,
    fragment: Option<SearchFragment>,
    limit: Option<i64>,
    offset: u32,
    token: Option<String>,
    total_count: bool,
    sort: Vec<SortClause>,
    projection: Option<Vec<String>>,
}

///
/// SearchResult
///
/// Decoded rows, exact total match count (when requested), and the opaque
/// continuation token for deep pagination.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchResult {
    pub rows: Vec<Record>,
    pub total_count: u64,
    pub next_token: Option<String>,
}

impl<'a, C: StoreClient> SearchScan<'a, C> {
    #[must_use]
    pub const fn new(schema: &'a Schema, client: &'a C, table: String, index: String) -> Self {
        Self {
            schema,
            client,
            table,
            index,
            fragment: None,
            limit: None,
            offset: 0,
            token: None,
            total_count: true,
            sort: Vec::new(),
            projection: None,
        }
    }

    /// Compose the query fragment. The callback runs exactly once per call
    /// and replaces any prior fragment; a collapse directive rides along.
    #[must_use]
    pub fn filter<F>(mut self, compose: F) -> Self
    where
        F: FnOnce(&SearchFactory) -> SearchFragment,
    {
        self.fragment = Some(compose(&SearchFactory));
        self
    }

    /// Page size; defaults to 10 when unset or non-positive.
    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Page position. Prefer [`Self::token`] for deep pagination — large
    /// offsets degrade in inverted-index back ends.
    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Opaque continuation token from a prior response.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Request (at extra cost) the exact total match count. Default true.
    #[must_use]
    pub const fn total_count(mut self, flag: bool) -> Self {
        self.total_count = flag;
        self
    }

    /// Append a per-field sort clause.
    #[must_use]
    pub fn sort_by(mut self, field: &str, order: SortOrder) -> Self {
        self.sort.push(SortClause::Field {
            name: field.to_string(),
            order,
        });
        self
    }

    /// Append a primary-key sort clause.
    #[must_use]
    pub fn sort_by_primary_key(mut self, order: SortOrder) -> Self {
        self.sort.push(SortClause::PrimaryKey { order });
        self
    }

    /// Append a relevance-score sort clause.
    #[must_use]
    pub fn sort_by_score(mut self, order: SortOrder) -> Self {
        self.sort.push(SortClause::Score { order });
        self
    }

    /// Restrict returned columns. Unset or empty falls back to the store's
    /// returnable default; unknown names are silently dropped.
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Issue the search request and decode the response rows.
    ///
    /// A not-fully-succeeded response (e.g. unavailable shards) returns an
    /// empty zero-count result instead of a partial one, so callers never
    /// mistake an under-reported match set for a complete answer.
    pub async fn execute(&self) -> Result<SearchResult, QueryError> {
        let request = self.build_request(None, None);
        log::debug!(
            "search: table={} index={} limit={} offset={}",
            request.table,
            request.index,
            request.limit,
            request.offset
        );

        let response = self.client.search(request).await?;

        if !response.fully_succeeded {
            return Ok(SearchResult::default());
        }

        let rows = response
            .rows
            .iter()
            .filter_map(|row| self.schema.from_wire_row(Some(row)))
            .collect();

        Ok(SearchResult {
            rows,
            // A nonsensical count degrades to zero, never to an error.
            total_count: u64::try_from(response.total_count).unwrap_or(0),
            next_token: response.next_token,
        })
    }

    /// Force limit 1 / offset 0 and return the first row, or `None`.
    pub async fn find_one(&self) -> Result<Option<Record>, QueryError> {
        let request = self.build_request(Some(1), Some(0));
        let response = self.client.search(request).await?;

        if !response.fully_succeeded {
            return Ok(None);
        }

        Ok(response
            .rows
            .first()
            .and_then(|row| self.schema.from_wire_row(Some(row))))
    }

    fn build_request(&self, limit_override: Option<u32>, offset_override: Option<u32>) -> SearchRequest {
        let fragment = self
            .fragment
            .clone()
            .unwrap_or_else(|| SearchFactory.match_all());

        let limit = limit_override.unwrap_or_else(|| match self.limit {
            Some(n) if n > 0 => n as u32,
            Some(_) => DEFAULT_SEARCH_LIMIT,
            None => DEFAULT_SEARCH_LIMIT,
        });

        SearchRequest {
            table: self.table.clone(),
            index: self.index.clone(),
            query: fragment.query,
            collapse: fragment.collapse,
            sort: self.sort.clone(),
            token: self.token.clone(),
            limit,
            offset: offset_override.unwrap_or(self.offset),
            total_count: self.total_count,
            projection: self.resolve_projection(),
        }
    }

    // Projection mode derives from whether a non-empty selection was set.
    fn resolve_projection(&self) -> ProjectionMode {
        match &self.projection {
            None => ProjectionMode::All,
            Some(requested) if requested.is_empty() => ProjectionMode::All,
            Some(requested) => ProjectionMode::Fields(
                requested
                    .iter()
                    .filter(|name| self.schema.field(name).is_some())
                    .cloned()
                    .collect(),
            ),
        }
    }
}
