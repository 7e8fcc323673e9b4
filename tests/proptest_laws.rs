//! Property-based tests for filter compilation and pagination.
//!
//! Uses proptest to check the algebraic laws of the filter compiler and the
//! exhaustiveness of cursor pagination over random datasets.
//!
//! Run with: `cargo test --test proptest_laws`

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{json, Value};

use search_retrieve::backend::InMemoryBackend;
use search_retrieve::filter::FilterCompiler;
use search_retrieve::{
    compile_filter, retrieve, Combinator, FilterNode, OperatorLeaf, OrderBy, Page, RetrieveParams,
    SearchBackend,
};

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Operator filters that compile to a positive `filter` clause
fn positive_leaf_strategy() -> impl Strategy<Value = OperatorLeaf> {
    prop_oneof![
        (-1000i64..1000).prop_map(OperatorLeaf::eq),
        (-1000i64..1000).prop_map(OperatorLeaf::gt),
        (-1000i64..1000).prop_map(OperatorLeaf::gte),
        (-1000i64..1000).prop_map(OperatorLeaf::lt),
        (-1000i64..1000).prop_map(OperatorLeaf::lte),
        "[a-zA-Z0-9]{1,12}".prop_map(OperatorLeaf::starts_with),
        "[a-z]{1,12}".prop_map(OperatorLeaf::matches),
        Just(OperatorLeaf::exists()),
    ]
}

/// Every supported operator filter
fn leaf_strategy() -> impl Strategy<Value = OperatorLeaf> {
    prop_oneof![
        positive_leaf_strategy(),
        (-1000i64..1000).prop_map(OperatorLeaf::not_eq),
        Just(OperatorLeaf::not_exists()),
    ]
}

fn attribute_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,10}"
}

/// Generate arbitrary JSON values (including invalid filter shapes)
fn arbitrary_json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        prop_oneof![Just("and"), Just("or"), Just("="), Just("exists"), Just("geoDistance")]
            .prop_map(|s| Value::String(s.to_string())),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::hash_map(
                prop_oneof![
                    Just("op".to_string()),
                    Just("filters".to_string()),
                    Just("attributeName".to_string()),
                    Just("value".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0..5
            )
            .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn backend_with(numbers: &[i64]) -> InMemoryBackend {
    let numbers: Vec<Option<i64>> = numbers.iter().copied().map(Some).collect();
    backend_with_optional(&numbers).await
}

/// Documents whose `number` is left out where the entry is `None`
async fn backend_with_optional(numbers: &[Option<i64>]) -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    backend.create_index("laws", &json!({})).await.unwrap();
    for (seq, number) in numbers.iter().enumerate() {
        let document = match number {
            Some(n) => json!({"seq": seq, "number": n}),
            None => json!({"seq": seq}),
        };
        backend.index_document("laws", &document).await.unwrap();
    }
    backend
}

fn seqs(page: &Page<Value>) -> Vec<u64> {
    page.items.iter().filter_map(|i| i["seq"].as_u64()).collect()
}

// =============================================================================
// Compiler laws
// =============================================================================

proptest! {
    /// A single operator filter compiles the same with or without a combinator
    #[test]
    fn single_filter_shortcut(name in attribute_strategy(), leaf in leaf_strategy()) {
        let bare = FilterNode::attribute(name.clone(), leaf.clone());
        let with_and = FilterNode::attribute_groups(name.clone(), Some(Combinator::And), vec![FilterNode::Leaf(leaf.clone())]);
        let with_or = FilterNode::attribute_groups(name, Some(Combinator::Or), vec![FilterNode::Leaf(leaf)]);

        let expected = compile_filter(Some(&bare)).unwrap();
        prop_assert_eq!(&compile_filter(Some(&with_and)).unwrap(), &expected);
        prop_assert_eq!(&compile_filter(Some(&with_or)).unwrap(), &expected);
    }

    /// AND over positive operator filters keeps one filter clause per child, in order
    #[test]
    fn and_preserves_length_and_order(
        name in attribute_strategy(),
        leaves in prop::collection::vec(positive_leaf_strategy(), 2..8),
    ) {
        let expected: Vec<Value> = leaves
            .iter()
            .map(|leaf| {
                let clause = FilterCompiler::compile(&FilterNode::Leaf(leaf.clone()), Some(name.as_str())).unwrap();
                clause.filter[0].clone()
            })
            .collect();

        let tree = FilterNode::attribute_all(name, leaves.clone());
        let compiled = FilterCompiler::compile(&tree, None).unwrap();
        prop_assert_eq!(compiled.filter.len(), leaves.len());
        prop_assert_eq!(compiled.filter, expected);
        prop_assert!(compiled.must_not.is_empty());
    }

    /// Parsing arbitrary JSON as a filter tree never panics
    #[test]
    fn fuzz_filter_tree_from_arbitrary_json(json in arbitrary_json_strategy()) {
        if let Ok(tree) = FilterNode::from_json(&json) {
            // Compilation may reject the tree, but cleanly
            let _ = compile_filter(Some(&tree));
        }
    }
}

// =============================================================================
// Retrieval laws
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// `=` and `!=` on the same value partition the dataset
    #[test]
    fn equality_and_inequality_partition(
        numbers in prop::collection::vec(0i64..6, 0..25),
        value in 0i64..6,
    ) {
        let (eq, not_eq) = runtime().block_on(async {
            let backend = backend_with(&numbers).await;
            let fetch = |leaf: OperatorLeaf| {
                let params = RetrieveParams::new("laws")
                    .filters(FilterNode::attribute("number", leaf))
                    .limit(100);
                let backend = &backend;
                async move { retrieve::<Value, _>(backend, &params).await.unwrap() }
            };
            (fetch(OperatorLeaf::eq(value)).await, fetch(OperatorLeaf::not_eq(value)).await)
        });

        let eq: BTreeSet<u64> = seqs(&eq).into_iter().collect();
        let not_eq: BTreeSet<u64> = seqs(&not_eq).into_iter().collect();
        prop_assert!(eq.is_disjoint(&not_eq));
        prop_assert_eq!(eq.len() + not_eq.len(), numbers.len());
        prop_assert_eq!(eq.len(), numbers.iter().filter(|n| **n == value).count());
    }

    /// Following endCursor visits every document exactly once, including
    /// documents without the sort field
    #[test]
    fn pagination_is_exhaustive_and_non_overlapping(
        numbers in prop::collection::vec(prop::option::of(0i64..5), 0..30),
        limit in 1usize..8,
        descending in any::<bool>(),
    ) {
        let order = if descending { OrderBy::desc("number") } else { OrderBy::asc("number") };
        let pages = runtime().block_on(async {
            let backend = backend_with_optional(&numbers).await;
            let dyn_backend: &dyn SearchBackend = &backend;
            let mut pages = Vec::new();
            let mut cursor = None;
            loop {
                let params = RetrieveParams::new("laws")
                    .order_by(order.clone())
                    .cursor(cursor)
                    .limit(limit);
                let page: Page<Value> = retrieve(dyn_backend, &params).await.unwrap();
                cursor = page.page_info.end_cursor.clone();
                pages.push(page);
                if cursor.is_none() || pages.len() > numbers.len() + 1 {
                    break;
                }
            }
            pages
        });

        prop_assert!(pages.last().is_some_and(|p| p.page_info.end_cursor.is_none()));

        let visited: Vec<u64> = pages.iter().flat_map(seqs).collect();
        let unique: BTreeSet<u64> = visited.iter().copied().collect();
        prop_assert_eq!(visited.len(), numbers.len());
        prop_assert_eq!(unique.len(), numbers.len());

        // Present values in order, then every document without one
        let visited_numbers: Vec<Option<i64>> = pages
            .iter()
            .flat_map(|p| p.items.iter().map(|i| i["number"].as_i64()))
            .collect();
        let mut present: Vec<i64> = numbers.iter().flatten().copied().collect();
        present.sort_unstable();
        if descending {
            present.reverse();
        }
        let missing = numbers.len() - present.len();
        let mut expected: Vec<Option<i64>> = present.into_iter().map(Some).collect();
        expected.extend(std::iter::repeat(None).take(missing));
        prop_assert_eq!(visited_numbers, expected);
    }
}
