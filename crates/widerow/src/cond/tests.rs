use crate::{
    cond::{Comparator, Filter, FilterBuilder},
    error::ConditionError,
    schema::Schema,
    value::{FieldType, Value, WireValue},
};

fn user_schema() -> Schema {
    Schema::builder()
        .field("user_id", FieldType::Text)
        .field("age", FieldType::Integer)
        .field("score", FieldType::Float)
        .field("active", FieldType::Bool)
        .primary_key(["user_id"])
        .build()
        .expect("fixture schema is valid")
}

#[test]
fn leaf_encodes_literal_with_declared_type() {
    let schema = user_schema();
    let q = FilterBuilder::new(&schema);

    let filter = q.eq("age", 30).unwrap();
    assert_eq!(
        filter,
        Filter::Cmp {
            field: "age".to_string(),
            op: Comparator::Eq,
            value: WireValue::Int(30),
            missing_ok: true,
            latest_only: true,
        }
    );

    // Integers widen to floats when the declared type asks for it.
    let filter = q.ge("score", 4).unwrap();
    let Filter::Cmp { value, op, .. } = filter else {
        panic!("expected a comparison leaf");
    };
    assert_eq!(op, Comparator::Ge);
    assert_eq!(value, WireValue::Float(4.0));
}

#[test]
fn leaf_rejects_unknown_field() {
    let schema = user_schema();
    let err = FilterBuilder::new(&schema).eq("ghost", 1).unwrap_err();
    assert_eq!(
        err,
        ConditionError::UnknownField {
            field: "ghost".to_string()
        }
    );
}

#[test]
fn leaf_rejects_null_literal() {
    let schema = user_schema();
    let err = FilterBuilder::new(&schema).eq("age", Value::Null).unwrap_err();
    assert_eq!(
        err,
        ConditionError::NullLiteral {
            field: "age".to_string()
        }
    );
}

#[test]
fn leaf_rejects_unencodable_literal() {
    let schema = user_schema();
    let err = FilterBuilder::new(&schema)
        .eq("age", "thirty")
        .unwrap_err();
    assert_eq!(
        err,
        ConditionError::UnencodableLiteral {
            field: "age".to_string()
        }
    );
}

#[test]
fn combinators_require_at_least_one_child() {
    let schema = user_schema();
    let q = FilterBuilder::new(&schema);

    assert_eq!(
        q.and(vec![]).unwrap_err(),
        ConditionError::EmptyCombinator { op: "and" }
    );
    assert_eq!(
        q.or(vec![]).unwrap_err(),
        ConditionError::EmptyCombinator { op: "or" }
    );
}

#[test]
fn composite_trees_count_leaves_structurally() {
    let schema = user_schema();
    let q = FilterBuilder::new(&schema);

    let tree = q
        .and(vec![
            q.eq("active", true).unwrap(),
            q.or(vec![q.gt("age", 18).unwrap(), q.lt("age", 5).unwrap()])
                .unwrap(),
            q.not(q.ne("user_id", "root").unwrap()),
        ])
        .unwrap();

    assert_eq!(tree.leaf_count(), 4);
    let Filter::And(children) = &tree else {
        panic!("expected an AND root");
    };
    assert_eq!(children.len(), 3);
    assert!(matches!(children[2], Filter::Not(_)));
}

#[test]
fn leaf_flags_default_lenient_and_override() {
    let schema = user_schema();
    let q = FilterBuilder::new(&schema);

    let filter = q
        .eq("age", 1)
        .unwrap()
        .missing_ok(false)
        .latest_only(false);
    assert_eq!(
        filter,
        Filter::Cmp {
            field: "age".to_string(),
            op: Comparator::Eq,
            value: WireValue::Int(1),
            missing_ok: false,
            latest_only: false,
        }
    );

    // Flag setters are leaf-only; a composite passes through unchanged.
    let composite = q.and(vec![q.eq("age", 1).unwrap()]).unwrap();
    assert_eq!(composite.clone().missing_ok(false), composite);
}

#[test]
fn oversized_trees_build_anyway() {
    let schema = user_schema();
    let q = FilterBuilder::new(&schema);

    // Eleven leaves is over the advisory ceiling but still a valid tree.
    let leaves: Vec<Filter> = (0..11).map(|n| q.eq("age", n).unwrap()).collect();
    let tree = q.or(leaves).unwrap();
    assert_eq!(tree.leaf_count(), 11);
}
