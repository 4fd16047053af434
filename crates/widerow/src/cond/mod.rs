#[cfg(test)]
mod tests;

use crate::{
    error::ConditionError,
    schema::Schema,
    value::{Value, WireValue, to_wire},
};
use serde::{Deserialize, Serialize};

/// Advisory leaf-condition ceiling. The true limit is store-version
/// dependent, so exceeding it logs a warning instead of failing.
const SOFT_LEAF_LIMIT: usize = 10;

///
/// Comparator
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Comparator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

///
/// Filter
///
/// Server-side post-filter tree for non-indexed row filtering. An explicit
/// tagged union: leaves carry the encoded literal, composites carry their
/// children as a plain ordered list, so counting and traversal are
/// structural. Immutable once constructed; consumed by a builder's execute.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Filter {
    Cmp {
        field: String,
        op: Comparator,
        value: WireValue,
        /// Rows lacking the field still pass (lenient default).
        missing_ok: bool,
        /// Compare only the latest cell version.
        latest_only: bool,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// Total number of comparison leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Cmp { .. } => 1,
            Self::And(children) | Self::Or(children) => {
                children.iter().map(Self::leaf_count).sum()
            }
            Self::Not(child) => child.leaf_count(),
        }
    }

    /// Override the pass-if-missing flag on a comparison leaf.
    ///
    /// No effect on composites; set the flag on leaves before combining.
    #[must_use]
    pub fn missing_ok(mut self, flag: bool) -> Self {
        if let Self::Cmp { missing_ok, .. } = &mut self {
            *missing_ok = flag;
        }
        self
    }

    /// Override the latest-version-only flag on a comparison leaf.
    #[must_use]
    pub fn latest_only(mut self, flag: bool) -> Self {
        if let Self::Cmp { latest_only, .. } = &mut self {
            *latest_only = flag;
        }
        self
    }
}

///
/// FilterBuilder
///
/// Schema-bound factory for filter trees. Validates every leaf's field name
/// against the schema and rejects null literals at construction time; the
/// query builders invoke the caller's composition callback exactly once and
/// surface its error as a single wrapped failure.
///

pub struct FilterBuilder<'a> {
    schema: &'a Schema,
}

impl<'a> FilterBuilder<'a> {
    #[must_use]
    pub const fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    fn leaf(
        &self,
        field: &str,
        op: Comparator,
        value: &Value,
    ) -> Result<Filter, ConditionError> {
        let Some(decl) = self.schema.field(field) else {
            return Err(ConditionError::UnknownField {
                field: field.to_string(),
            });
        };

        if value.is_null() {
            return Err(ConditionError::NullLiteral {
                field: field.to_string(),
            });
        }

        let Some(encoded) = to_wire(value, decl.ty()) else {
            return Err(ConditionError::UnencodableLiteral {
                field: field.to_string(),
            });
        };

        Ok(Filter::Cmp {
            field: field.to_string(),
            op,
            value: encoded,
            missing_ok: true,
            latest_only: true,
        })
    }

    pub fn eq(&self, field: &str, value: impl Into<Value>) -> Result<Filter, ConditionError> {
        self.leaf(field, Comparator::Eq, &value.into())
    }

    pub fn ne(&self, field: &str, value: impl Into<Value>) -> Result<Filter, ConditionError> {
        self.leaf(field, Comparator::Ne, &value.into())
    }

    pub fn gt(&self, field: &str, value: impl Into<Value>) -> Result<Filter, ConditionError> {
        self.leaf(field, Comparator::Gt, &value.into())
    }

    pub fn ge(&self, field: &str, value: impl Into<Value>) -> Result<Filter, ConditionError> {
        self.leaf(field, Comparator::Ge, &value.into())
    }

    pub fn lt(&self, field: &str, value: impl Into<Value>) -> Result<Filter, ConditionError> {
        self.leaf(field, Comparator::Lt, &value.into())
    }

    pub fn le(&self, field: &str, value: impl Into<Value>) -> Result<Filter, ConditionError> {
        self.leaf(field, Comparator::Le, &value.into())
    }

    /// Combine children under AND. Requires at least one child.
    pub fn and(&self, children: Vec<Filter>) -> Result<Filter, ConditionError> {
        if children.is_empty() {
            return Err(ConditionError::EmptyCombinator { op: "and" });
        }
        Ok(Self::warn_if_large(Filter::And(children)))
    }

    /// Combine children under OR. Requires at least one child.
    pub fn or(&self, children: Vec<Filter>) -> Result<Filter, ConditionError> {
        if children.is_empty() {
            return Err(ConditionError::EmptyCombinator { op: "or" });
        }
        Ok(Self::warn_if_large(Filter::Or(children)))
    }

    /// Negate exactly one child.
    #[must_use]
    pub fn not(&self, child: Filter) -> Filter {
        Filter::Not(Box::new(child))
    }

    fn warn_if_large(filter: Filter) -> Filter {
        let leaves = filter.leaf_count();
        if leaves > SOFT_LEAF_LIMIT {
            log::warn!(
                "filter tree has {leaves} leaf conditions; stores commonly cap at {SOFT_LEAF_LIMIT}"
            );
        }
        filter
    }
}
