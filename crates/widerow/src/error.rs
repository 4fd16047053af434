use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Fatal schema-definition errors, surfaced from `SchemaBuilder::build`.
/// These represent programmer error at model-definition time and fail fast;
/// nothing downstream ever sees a schema that violates its own references.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("schema has no primary key")]
    MissingPrimaryKey,

    #[error("duplicate field declaration: {field}")]
    DuplicateField { field: String },

    #[error("primary key references undeclared field: {field}")]
    UnknownPrimaryKeyField { field: String },

    #[error("secondary index '{index}' references undeclared field: {field}")]
    UnknownIndexField { index: String, field: String },

    #[error("search index '{index}' references undeclared field: {field}")]
    UnknownSearchField { index: String, field: String },

    #[error("touch-on-update references undeclared field: {field}")]
    UnknownTouchField { field: String },
}

///
/// MarshalError
///
/// Value-level conversion failure over a (possibly partial) record. Carries
/// every offending field name rather than failing fast on the first, and is
/// returned as a value, never raised from the hot conversion path.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("cannot convert fields: {}", fields.join(", "))]
pub struct MarshalError {
    pub fields: Vec<String>,
}

///
/// ConditionError
///
/// Synchronous filter/query composition misuse. Fails fast at construction
/// because it represents programmer error, not a runtime data condition.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConditionError {
    #[error("'{op}' combinator requires at least one child condition")]
    EmptyCombinator { op: &'static str },

    #[error("filter condition references undeclared field: {field}")]
    UnknownField { field: String },

    #[error("filter condition literal for '{field}' must not be null")]
    NullLiteral { field: String },

    #[error("filter condition literal for '{field}' does not fit the declared type")]
    UnencodableLiteral { field: String },
}

///
/// StoreError
///
/// Transport/store failure reported by the connection collaborator. The
/// core performs no retry; it wraps and returns.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum StoreError {
    #[error("store transport failure: {message}")]
    Transport { message: String },

    #[error("store rejected request ({code}): {message}")]
    Rejected { code: String, message: String },
}

///
/// QueryError
///
/// Umbrella for a single builder execution: composition errors captured
/// during chaining, marshalling errors, and transport failures.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("filter composition failed: {0}")]
    Condition(#[from] ConditionError),

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
