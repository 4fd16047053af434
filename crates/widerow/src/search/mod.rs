
use crate::value::Value;
use serde::{Deserialize, Serialize};

///
/// SearchQuery
///
/// Declarative inverted-index query fragment: a plain record carrying its
/// kind tag and parameters. Fragments never validate field existence
/// against the schema — search indexes are independently defined and may
/// reference analyzer-specific virtual fields.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum SearchQuery {
    MatchAll,
    Term {
        field: String,
        value: Value,
    },
    Terms {
        field: String,
        values: Vec<Value>,
    },
    Prefix {
        field: String,
        prefix: String,
    },
    Range {
        field: String,
        from: Option<Value>,
        to: Option<Value>,
        include_lower: bool,
        include_upper: bool,
    },
    Wildcard {
        field: String,
        pattern: String,
    },
    Exists {
        field: String,
    },
    GeoDistance {
        field: String,
        /// Center points as "lat,lon" text, matched within `distance_meters`.
        center_points: Vec<String>,
        distance_meters: f64,
    },
}

///
/// SearchFragment
///
/// A query fragment plus the optional collapse (deduplicate-by-field)
/// directive carried alongside it.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchFragment {
    pub query: SearchQuery,
    pub collapse: Option<String>,
}

impl SearchFragment {
    const fn plain(query: SearchQuery) -> Self {
        Self {
            query,
            collapse: None,
        }
    }

    /// Make the lower range bound exclusive. No effect on other kinds.
    #[must_use]
    pub fn exclusive_lower(mut self) -> Self {
        if let SearchQuery::Range { include_lower, .. } = &mut self.query {
            *include_lower = false;
        }
        self
    }

    /// Make the upper range bound exclusive. No effect on other kinds.
    #[must_use]
    pub fn exclusive_upper(mut self) -> Self {
        if let SearchQuery::Range { include_upper, .. } = &mut self.query {
            *include_upper = false;
        }
        self
    }
}

///
/// SortOrder / SortClause
///
/// Sort directives serialized into the search request.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SortClause {
    Field { name: String, order: SortOrder },
    PrimaryKey { order: SortOrder },
    Score { order: SortOrder },
}

///
/// SearchFactory
///
/// One fragment constructor per query kind. Stateless; builders hand a
/// reference into the caller's composition callback.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SearchFactory;

impl SearchFactory {
    #[must_use]
    pub const fn match_all(&self) -> SearchFragment {
        SearchFragment::plain(SearchQuery::MatchAll)
    }

    #[must_use]
    pub fn term(&self, field: &str, value: impl Into<Value>) -> SearchFragment {
        SearchFragment::plain(SearchQuery::Term {
            field: field.to_string(),
            value: value.into(),
        })
    }

    /// Multi-term membership: matches rows whose field equals any value.
    #[must_use]
    pub fn terms<I, V>(&self, field: &str, values: I) -> SearchFragment
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        SearchFragment::plain(SearchQuery::Terms {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    #[must_use]
    pub fn prefix(&self, field: &str, prefix: &str) -> SearchFragment {
        SearchFragment::plain(SearchQuery::Prefix {
            field: field.to_string(),
            prefix: prefix.to_string(),
        })
    }

    /// Numeric/lexical range; both bounds inclusive until overridden via
    /// [`SearchFragment::exclusive_lower`] / [`SearchFragment::exclusive_upper`].
    #[must_use]
    pub fn range(
        &self,
        field: &str,
        from: Option<Value>,
        to: Option<Value>,
    ) -> SearchFragment {
        SearchFragment::plain(SearchQuery::Range {
            field: field.to_string(),
            from,
            to,
            include_lower: true,
            include_upper: true,
        })
    }

    #[must_use]
    pub fn wildcard(&self, field: &str, pattern: &str) -> SearchFragment {
        SearchFragment::plain(SearchQuery::Wildcard {
            field: field.to_string(),
            pattern: pattern.to_string(),
        })
    }

    #[must_use]
    pub fn exists(&self, field: &str) -> SearchFragment {
        SearchFragment::plain(SearchQuery::Exists {
            field: field.to_string(),
        })
    }

    #[must_use]
    pub fn geo_distance<I, S>(
        &self,
        field: &str,
        center_points: I,
        distance_meters: f64,
    ) -> SearchFragment
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchFragment::plain(SearchQuery::GeoDistance {
            field: field.to_string(),
            center_points: center_points.into_iter().map(Into::into).collect(),
            distance_meters,
        })
    }

    /// Deduplicate results by `field`: a match-all fragment annotated with
    /// the collapse directive.
    #[must_use]
    pub fn collapse(&self, field: &str) -> SearchFragment {
        SearchFragment {
            query: SearchQuery::MatchAll,
            collapse: Some(field.to_string()),
        }
    }
}
