use crate::{
    cond::{Comparator, Filter},
    error::{ConditionError, QueryError},
    query::{RangeScan, SearchScan, range::resolve_limit},
    schema::Schema,
    search::{SearchQuery, SortClause, SortOrder},
    store::{Direction, ProjectionMode, RangeResponse, Row, SearchResponse},
    testkit::{MockStore, rec},
    value::{FieldType, Value, WireValue},
};

fn product_schema() -> Schema {
    Schema::builder()
        .field("category", FieldType::Text)
        .field("product_id", FieldType::Text)
        .field("owner", FieldType::Text)
        .field("age", FieldType::Integer)
        .primary_key(["category", "product_id"])
        .secondary_index("by_owner", ["owner", "product_id"])
        .build()
        .expect("fixture schema is valid")
}

fn range<'a>(schema: &'a Schema, store: &'a MockStore) -> RangeScan<'a, MockStore> {
    RangeScan::new(schema, store, "products".to_string())
}

fn search<'a>(schema: &'a Schema, store: &'a MockStore) -> SearchScan<'a, MockStore> {
    SearchScan::new(schema, store, "products".to_string(), "main".to_string())
}

// ---- interval scans ----------------------------------------------------

#[tokio::test]
async fn unbounded_scan_requests_the_fully_open_interval() {
    let schema = product_schema();
    let store = MockStore::default();

    range(&schema, &store).execute().await.unwrap();

    let request = store.last_scan();
    assert_eq!(
        request.start,
        vec![
            ("category".to_string(), WireValue::InfMin),
            ("product_id".to_string(), WireValue::InfMin),
        ]
    );
    assert_eq!(
        request.end,
        vec![
            ("category".to_string(), WireValue::InfMax),
            ("product_id".to_string(), WireValue::InfMax),
        ]
    );
    assert_eq!(request.direction, Direction::Forward);
    assert_eq!(request.limit, 20);
    assert_eq!(request.filter, None);
    assert_eq!(request.projection, None);
}

#[tokio::test]
async fn partial_boundaries_complete_with_open_sentinels() {
    let schema = product_schema();
    let store = MockStore::default();

    range(&schema, &store)
        .start_with(rec([("category", Value::from("books"))]))
        .end_at(rec([("category", Value::from("books"))]))
        .direction(Direction::Backward)
        .execute()
        .await
        .unwrap();

    let request = store.last_scan();
    assert_eq!(
        request.start,
        vec![
            ("category".to_string(), WireValue::Text("books".to_string())),
            ("product_id".to_string(), WireValue::InfMin),
        ]
    );
    assert_eq!(
        request.end,
        vec![
            ("category".to_string(), WireValue::Text("books".to_string())),
            ("product_id".to_string(), WireValue::InfMax),
        ]
    );
    assert_eq!(request.direction, Direction::Backward);
}

#[tokio::test]
async fn index_scans_complete_keys_in_index_order() {
    let schema = product_schema();
    let store = MockStore::default();

    range(&schema, &store)
        .index("by_owner")
        .start_with(rec([("owner", Value::from("ada"))]))
        .execute()
        .await
        .unwrap();

    let request = store.last_scan();
    assert_eq!(request.index.as_deref(), Some("by_owner"));
    assert_eq!(
        request.start,
        vec![
            ("owner".to_string(), WireValue::Text("ada".to_string())),
            ("product_id".to_string(), WireValue::InfMin),
            ("category".to_string(), WireValue::InfMin),
        ]
    );
}

#[test]
fn non_positive_limits_fall_back_to_the_default() {
    assert_eq!(resolve_limit(None), 20);
    assert_eq!(resolve_limit(Some(0)), 20);
    assert_eq!(resolve_limit(Some(-5)), 20);
    assert_eq!(resolve_limit(Some(7)), 7);
}

#[tokio::test]
async fn scan_limit_is_clamped_in_the_request() {
    let schema = product_schema();
    let store = MockStore::default();

    range(&schema, &store).limit(0).execute().await.unwrap();
    assert_eq!(store.last_scan().limit, 20);

    range(&schema, &store).limit(-5).execute().await.unwrap();
    assert_eq!(store.last_scan().limit, 20);

    range(&schema, &store).limit(3).execute().await.unwrap();
    assert_eq!(store.last_scan().limit, 3);
}

#[tokio::test]
async fn empty_selection_expands_to_every_declared_field() {
    let schema = product_schema();
    let store = MockStore::default();

    range(&schema, &store)
        .select(Vec::<String>::new())
        .execute()
        .await
        .unwrap();

    assert_eq!(
        store.last_scan().projection,
        Some(vec![
            "category".to_string(),
            "product_id".to_string(),
            "owner".to_string(),
            "age".to_string(),
        ])
    );
}

#[tokio::test]
async fn selection_intersects_with_declared_fields() {
    let schema = product_schema();
    let store = MockStore::default();

    range(&schema, &store)
        .select(["age", "ghost"])
        .execute()
        .await
        .unwrap();
    assert_eq!(store.last_scan().projection, Some(vec!["age".to_string()]));

    // Nothing declared survives the intersection.
    range(&schema, &store)
        .select(["ghost"])
        .execute()
        .await
        .unwrap();
    assert_eq!(store.last_scan().projection, Some(vec![]));
}

#[tokio::test]
async fn filter_tree_rides_the_request() {
    let schema = product_schema();
    let store = MockStore::default();

    range(&schema, &store)
        .filter(|q| q.and(vec![q.eq("owner", "ada")?, q.gt("age", 1)?]))
        .execute()
        .await
        .unwrap();

    let Some(Filter::And(children)) = store.last_scan().filter else {
        panic!("expected an AND filter on the request");
    };
    assert_eq!(children.len(), 2);
    assert!(matches!(
        &children[1],
        Filter::Cmp {
            op: Comparator::Gt,
            value: WireValue::Int(1),
            ..
        }
    ));
}

#[tokio::test]
async fn filter_composition_errors_surface_at_execute() {
    let schema = product_schema();
    let store = MockStore::default();

    let err = range(&schema, &store)
        .filter(|q| q.eq("ghost", 1))
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        QueryError::Condition(ConditionError::UnknownField { .. })
    ));
    assert!(store.scans.borrow().is_empty());
}

#[tokio::test]
async fn scan_decodes_rows_and_continuation_key() {
    let schema = product_schema();
    let store = MockStore::with_scan_response(RangeResponse {
        rows: vec![Row {
            primary_key: vec![
                ("category".to_string(), WireValue::Text("books".to_string())),
                ("product_id".to_string(), WireValue::Text("p1".to_string())),
            ],
            attributes: vec![("age".to_string(), WireValue::Int(3))],
        }],
        next_start: Some(vec![
            ("category".to_string(), WireValue::Text("books".to_string())),
            ("product_id".to_string(), WireValue::Text("p2".to_string())),
        ]),
    });

    let result = range(&schema, &store).execute().await.unwrap();

    assert_eq!(result.rows.len(), 1);
    assert_eq!(
        result.rows[0].get("age"),
        Some(&Value::Int(3))
    );
    let next = result.next.expect("continuation key present");
    assert_eq!(next.get("product_id"), Some(&Value::Text("p2".to_string())));
}

#[tokio::test]
async fn find_one_forces_a_single_row_request() {
    let schema = product_schema();
    let store = MockStore::default();

    let found = range(&schema, &store).limit(50).find_one().await.unwrap();
    assert_eq!(found, None);
    assert_eq!(store.last_scan().limit, 1);
}

// ---- inverted-index searches -------------------------------------------

#[tokio::test]
async fn default_search_is_match_all_with_default_page() {
    let schema = product_schema();
    let store = MockStore::default();

    search(&schema, &store).execute().await.unwrap();

    let request = store.last_search();
    assert_eq!(request.index, "main");
    assert_eq!(request.query, SearchQuery::MatchAll);
    assert_eq!(request.collapse, None);
    assert_eq!(request.limit, 10);
    assert_eq!(request.offset, 0);
    assert!(request.total_count);
    assert_eq!(request.projection, ProjectionMode::All);
}

#[tokio::test]
async fn non_positive_search_limit_falls_back_to_the_default() {
    let schema = product_schema();
    let store = MockStore::default();

    search(&schema, &store).limit(-2).execute().await.unwrap();
    assert_eq!(store.last_search().limit, 10);

    search(&schema, &store).limit(25).execute().await.unwrap();
    assert_eq!(store.last_search().limit, 25);
}

#[tokio::test]
async fn search_request_carries_fragment_sort_and_token() {
    let schema = product_schema();
    let store = MockStore::default();

    search(&schema, &store)
        .filter(|s| s.prefix("owner", "ad"))
        .sort_by("owner", SortOrder::Desc)
        .sort_by_primary_key(SortOrder::Asc)
        .sort_by_score(SortOrder::Desc)
        .token("resume-here")
        .offset(30)
        .total_count(false)
        .execute()
        .await
        .unwrap();

    let request = store.last_search();
    assert_eq!(
        request.query,
        SearchQuery::Prefix {
            field: "owner".to_string(),
            prefix: "ad".to_string(),
        }
    );
    assert_eq!(
        request.sort,
        vec![
            SortClause::Field {
                name: "owner".to_string(),
                order: SortOrder::Desc,
            },
            SortClause::PrimaryKey {
                order: SortOrder::Asc,
            },
            SortClause::Score {
                order: SortOrder::Desc,
            },
        ]
    );
    assert_eq!(request.token.as_deref(), Some("resume-here"));
    assert_eq!(request.offset, 30);
    assert!(!request.total_count);
}

#[tokio::test]
async fn collapse_directive_rides_the_request() {
    let schema = product_schema();
    let store = MockStore::default();

    search(&schema, &store)
        .filter(|s| s.collapse("owner"))
        .execute()
        .await
        .unwrap();

    let request = store.last_search();
    assert_eq!(request.query, SearchQuery::MatchAll);
    assert_eq!(request.collapse.as_deref(), Some("owner"));
}

#[tokio::test]
async fn search_projection_modes() {
    let schema = product_schema();
    let store = MockStore::default();

    search(&schema, &store)
        .select(Vec::<String>::new())
        .execute()
        .await
        .unwrap();
    assert_eq!(store.last_search().projection, ProjectionMode::All);

    search(&schema, &store)
        .select(["owner", "ghost"])
        .execute()
        .await
        .unwrap();
    assert_eq!(
        store.last_search().projection,
        ProjectionMode::Fields(vec!["owner".to_string()])
    );
}

#[tokio::test]
async fn degraded_search_responses_collapse_to_empty_results() {
    let schema = product_schema();
    let store = MockStore::with_search_response(SearchResponse {
        fully_succeeded: false,
        rows: vec![Row {
            primary_key: vec![(
                "category".to_string(),
                WireValue::Text("books".to_string()),
            )],
            attributes: vec![],
        }],
        total_count: 40,
        next_token: Some("t".to_string()),
    });

    let result = search(&schema, &store).execute().await.unwrap();
    assert!(result.rows.is_empty());
    assert_eq!(result.total_count, 0);
    assert_eq!(result.next_token, None);

    let found = search(&schema, &store).find_one().await.unwrap();
    assert_eq!(found, None);
}

#[tokio::test]
async fn search_decodes_rows_and_sanitizes_the_count() {
    let schema = product_schema();
    let store = MockStore::with_search_response(SearchResponse {
        fully_succeeded: true,
        rows: vec![Row {
            primary_key: vec![
                ("category".to_string(), WireValue::Text("books".to_string())),
                ("product_id".to_string(), WireValue::Text("p1".to_string())),
            ],
            attributes: vec![("owner".to_string(), WireValue::Text("ada".to_string()))],
        }],
        total_count: -1,
        next_token: Some("next".to_string()),
    });

    let result = search(&schema, &store).execute().await.unwrap();
    assert_eq!(result.rows.len(), 1);
    assert_eq!(
        result.rows[0].get("owner"),
        Some(&Value::Text("ada".to_string()))
    );
    assert_eq!(result.total_count, 0);
    assert_eq!(result.next_token.as_deref(), Some("next"));
}

#[tokio::test]
async fn search_find_one_forces_first_page() {
    let schema = product_schema();
    let store = MockStore::with_search_response(SearchResponse {
        fully_succeeded: true,
        ..SearchResponse::default()
    });

    search(&schema, &store)
        .limit(50)
        .offset(40)
        .find_one()
        .await
        .unwrap();

    let request = store.last_search();
    assert_eq!(request.limit, 1);
    assert_eq!(request.offset, 0);
}
