use crate::{
    cond::{Filter, FilterBuilder},
    error::{ConditionError, QueryError},
    query::DEFAULT_RANGE_LIMIT,
    schema::{FieldDecl, Schema},
    store::{Direction, RangeRequest, StoreClient},
    value::{FieldType, Record, WireValue, from_wire},
};

///
/// RangeScan
///
/// Chained configuration for one primary-key interval query, optionally
/// against a secondary index. Single-owner: configuration mutates private
/// state in place and is not safe for concurrent use. Executing does not
/// reset state; re-executing without reconfiguring repeats the request.
///

pub struct RangeScan<'a, C> {
    schema: &'a Schema,
    client: &'a C,
    table: String,
    index: Option<String>,
    start: Option<Record>,
    end: Option<Record>,
    direction: Direction,
    limit: Option<i64>,
    projection: Option<Vec<String>>,
    filter: Option<Result<Filter, ConditionError>>,
}

///
/// RangeResult
///
/// Decoded rows plus the continuation key to resume from. An absent
/// continuation key signals the end of the range.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeResult {
    pub rows: Vec<Record>,
    pub next: Option<Record>,
}

impl<'a, C: StoreClient> RangeScan<'a, C> {
    #[must_use]
    pub const fn new(schema: &'a Schema, client: &'a C, table: String) -> Self {
        Self {
            schema,
            client,
            table,
            index: None,
            start: None,
            end: None,
            direction: Direction::Forward,
            limit: None,
            projection: None,
            filter: None,
        }
    }

    /// Scan a secondary index instead of the base table. Key completion
    /// then follows the index key order.
    #[must_use]
    pub fn index(mut self, name: &str) -> Self {
        self.index = Some(name.to_string());
        self
    }

    /// Set the inclusive start boundary from a (possibly partial) key.
    /// Missing key segments complete to negative-infinity sentinels.
    #[must_use]
    pub fn start_with(mut self, partial: Record) -> Self {
        self.start = Some(partial);
        self
    }

    /// Set the exclusive end boundary from a (possibly partial) key.
    /// Missing key segments complete to positive-infinity sentinels.
    #[must_use]
    pub fn end_at(mut self, partial: Record) -> Self {
        self.end = Some(partial);
        self
    }

    /// Toggle scan order; forward by default.
    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the page size. Non-positive values silently fall back to the
    /// default (20): a zero/negative limit is a caller mistake with an
    /// unambiguous safe interpretation.
    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict returned columns. An empty list means every declared
    /// field; unknown names are silently dropped.
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Compose a server-side post-filter. The callback runs exactly once
    /// per call and replaces any prior tree; factory errors surface as one
    /// wrapped error at execute time.
    #[must_use]
    pub fn filter<F>(mut self, compose: F) -> Self
    where
        F: FnOnce(&FilterBuilder<'_>) -> Result<Filter, ConditionError>,
    {
        let factory = FilterBuilder::new(self.schema);
        self.filter = Some(compose(&factory));
        self
    }

    /// Issue the interval-scan request and decode the response rows.
    pub async fn execute(&self) -> Result<RangeResult, QueryError> {
        let request = self.build_request(None)?;
        log::debug!(
            "range scan: table={} index={:?} limit={}",
            request.table,
            request.index,
            request.limit
        );

        let response = self.client.scan(request).await?;

        let rows = response
            .rows
            .iter()
            .filter_map(|row| self.schema.from_wire_row(Some(row)))
            .collect();
        let next = response.next_start.map(|key| self.decode_key(&key));

        Ok(RangeResult { rows, next })
    }

    /// Force limit 1 and return the first row, or `None` for no match.
    pub async fn find_one(&self) -> Result<Option<Record>, QueryError> {
        let request = self.build_request(Some(1))?;
        let response = self.client.scan(request).await?;

        Ok(response
            .rows
            .first()
            .and_then(|row| self.schema.from_wire_row(Some(row))))
    }

    fn build_request(&self, limit_override: Option<u32>) -> Result<RangeRequest, QueryError> {
        let filter = match &self.filter {
            None => None,
            Some(Ok(filter)) => Some(filter.clone()),
            Some(Err(err)) => return Err(QueryError::Condition(err.clone())),
        };

        let empty = Record::new();
        let index = self.index.as_deref();

        // Boundary completion: partial keys fill out with open-range
        // sentinels, so an unset boundary becomes the fully-open interval.
        let start = self
            .schema
            .to_wire_key(self.start.as_ref().unwrap_or(&empty), index)
            .complete_with(&WireValue::InfMin);
        let end = self
            .schema
            .to_wire_key(self.end.as_ref().unwrap_or(&empty), index)
            .complete_with(&WireValue::InfMax);

        let limit = limit_override.unwrap_or_else(|| resolve_limit(self.limit));

        Ok(RangeRequest {
            table: self.table.clone(),
            index: self.index.clone(),
            start,
            end,
            direction: self.direction,
            limit,
            filter,
            projection: self.projection.as_ref().map(|p| self.resolve_projection(p)),
        })
    }

    // Empty selection expands to all declared fields; otherwise intersect
    // the request with the declared set, tolerating unknown names.
    fn resolve_projection(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            return self.schema.field_names().map(ToString::to_string).collect();
        }
        requested
            .iter()
            .filter(|name| self.schema.field(name).is_some())
            .cloned()
            .collect()
    }

    fn decode_key(&self, key: &[(String, WireValue)]) -> Record {
        let mut record = Record::new();
        for (name, wire) in key {
            let ty = self.schema.field(name).map_or(FieldType::Raw, FieldDecl::ty);
            if let Some(value) = from_wire(wire, ty) {
                record.insert(name.clone(), value);
            }
        }
        record
    }
}

pub(crate) fn resolve_limit(limit: Option<i64>) -> u32 {
    match limit {
        Some(n) if n > 0 => n as u32,
        _ => DEFAULT_RANGE_LIMIT,
    }
}
