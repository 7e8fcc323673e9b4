// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic search-retrieve usage example.
//!
//! Demonstrates:
//! 1. Creating an index with `.retrieve` and `_searchN` fields
//! 2. Indexing 10 simple JSON documents
//! 3. Walking cursor-paginated pages
//! 4. Filtering with a nested filter tree and searching by free text
//! 5. Displaying metrics (OTEL-compatible)
//!
//! Runs against the in-memory backend unless `ELASTIC_HOST` is set, in which
//! case it talks to that node (port from `ELASTIC_PORT`, default 9200).
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ELASTIC_HOST=127.0.0.1 cargo run --example basic_usage
//! ```

use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde::Deserialize;
use serde_json::json;

use search_retrieve::mapping::{self, IndexConfig, PropertyOptions, SearchPriority};
use search_retrieve::{
    retrieve, FilterNode, HttpBackend, InMemoryBackend, OrderBy, RetrieveConfig, RetrieveParams,
    SearchBackend,
};

const INDEX: &str = "basic-usage";

#[derive(Debug, Deserialize)]
struct Item {
    string: String,
    number: i64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install metrics recorder (captures all metrics for OTEL export)
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "search_retrieve=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║           search-retrieve: Basic Usage Example                ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Pick a backend and create the index
    // ─────────────────────────────────────────────────────────────────────────
    let backend: Box<dyn SearchBackend> = if std::env::var("ELASTIC_HOST").is_ok() {
        let config = RetrieveConfig::from_env();
        println!("🔌 Using search node at {}", config.node_url());
        Box::new(HttpBackend::new(&config)?)
    } else {
        println!("🧠 Using in-memory backend");
        Box::new(InMemoryBackend::new())
    };
    let backend = backend.as_ref();

    let config = IndexConfig::new()
        .property("string", PropertyOptions::new().search_priority(SearchPriority::Level1))
        .property("number", PropertyOptions::new().field_type("integer"));
    mapping::create_index(backend, INDEX, &config).await?;

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Index documents
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📝 Indexing 10 documents...");
    for n in 0..10 {
        let prefix = if n < 5 { "my" } else { "your" };
        let doc = json!({"string": format!("{prefix}String{n} is awesome"), "number": n});
        backend.index_document(INDEX, &doc).await?;
    }
    backend.refresh(INDEX).await?;

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Walk pages of 4, ordered by number
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📄 Paginating (limit 4, number asc)...");
    let mut cursor = None;
    let mut page_no = 1;
    loop {
        let params = RetrieveParams::new(INDEX)
            .order_by(OrderBy::asc("number"))
            .cursor(cursor)
            .limit(4);
        let page = retrieve::<Item, _>(backend, &params).await?;
        let numbers: Vec<i64> = page.items.iter().map(|i| i.number).collect();
        println!(
            "   page {page_no}: {numbers:?} (size {}, total {})",
            page.page_info.size, page.page_info.total
        );
        cursor = page.page_info.end_cursor;
        match &cursor {
            Some(c) => println!("   └─ endCursor token: {}", c.to_token()),
            None => break,
        }
        page_no += 1;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Filters and free text
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🔎 number: (> 3 and < 6) or = 9");
    let tree = FilterNode::from_json(&json!({
        "attributeName": "number",
        "op": "or",
        "filters": [
            {"op": "and", "filters": [{"op": ">", "value": 3}, {"op": "<", "value": 6}]},
            {"filters": [{"op": "=", "value": 9}]}
        ]
    }))?;
    let page = retrieve::<Item, _>(
        backend,
        &RetrieveParams::new(INDEX).filters(tree).order_by(OrderBy::asc("number")),
    )
    .await?;
    for item in &page.items {
        println!("   └─ {} ({})", item.string, item.number);
    }

    println!("\n🔎 queryString \"string7\"");
    let page = retrieve::<Item, _>(backend, &RetrieveParams::new(INDEX).query("string7")).await?;
    for item in &page.items {
        println!("   └─ {} ({})", item.string, item.number);
    }

    mapping::delete_index(backend, INDEX).await?;

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Metrics
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📊 Metrics:");
    dump_metrics(&snapshotter);
    println!();
    Ok(())
}

/// Dump all captured metrics in OTEL-compatible format
fn dump_metrics(snapshotter: &Snapshotter) {
    let mut counters = Vec::new();
    let mut histograms = Vec::new();

    for (composite_key, _, _, value) in snapshotter.snapshot().into_vec() {
        let (_, key) = composite_key.into_parts();
        let labels: Vec<_> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
        let label_str = if labels.is_empty() { String::new() } else { format!("{{{}}}", labels.join(",")) };
        let name = format!("{}{}", key.name(), label_str);

        match value {
            DebugValue::Counter(v) => counters.push((name, v)),
            DebugValue::Histogram(samples) => {
                let values: Vec<f64> = samples.iter().map(|v| v.into_inner()).collect();
                let sum: f64 = values.iter().sum();
                histograms.push((name, values.len(), sum));
            }
            DebugValue::Gauge(_) => {}
        }
    }
    counters.sort();
    histograms.sort_by(|a, b| a.0.cmp(&b.0));

    if !counters.is_empty() {
        println!("   ┌─ Counters (cumulative)");
        for (name, value) in &counters {
            println!("   │  └─ {name} = {value}");
        }
    }
    if !histograms.is_empty() {
        println!("   └─ Histograms (distributions)");
        for (name, count, sum) in &histograms {
            println!("      └─ {name} count={count} sum={sum:.4}");
        }
    }
    if counters.is_empty() && histograms.is_empty() {
        println!("   └─ (no metrics recorded)");
    }
}
