//! Property tests for ranking behaviour

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use std::collections::HashSet;
use std::sync::Arc;

use voicerag::embedding::{HashingEncoder, TextEncoder};
use voicerag::RetrievalEngine;

fn engine_over(documents: &[String]) -> Option<RetrievalEngine> {
    let documents: Vec<String> = documents
        .iter()
        .filter(|d| !d.trim().is_empty())
        .cloned()
        .collect();
    if documents.is_empty() {
        return None;
    }
    RetrievalEngine::initialize(documents, Arc::new(HashingEncoder::new(256).ok()?)).ok()
}

#[quickcheck]
fn prop_search_is_deterministic(documents: Vec<String>, query: String, k: u8) -> TestResult {
    let Some(engine) = engine_over(&documents) else {
        return TestResult::discard();
    };
    if query.trim().is_empty() {
        return TestResult::discard();
    }
    let k = k as usize % 8 + 1;

    let first = engine.search(&query, k).unwrap();
    let second = engine.search(&query, k).unwrap();
    TestResult::from_bool(first == second)
}

#[quickcheck]
fn prop_results_are_ordered_unique_and_clamped(
    documents: Vec<String>,
    query: String,
    k: u8,
) -> TestResult {
    let Some(engine) = engine_over(&documents) else {
        return TestResult::discard();
    };
    if query.trim().is_empty() {
        return TestResult::discard();
    }
    let k = k as usize % 16 + 1;

    let ranked = engine.search_ranked(&query, k).unwrap();

    let expected_len = k.min(engine.len());
    let ordered = ranked.windows(2).all(|pair| {
        pair[0].distance < pair[1].distance
            || (pair[0].distance == pair[1].distance && pair[0].index < pair[1].index)
    });
    let unique = ranked.iter().map(|r| r.index).collect::<HashSet<_>>().len() == ranked.len();
    let in_range = ranked.iter().all(|r| r.index < engine.len());

    TestResult::from_bool(ranked.len() == expected_len && ordered && unique && in_range)
}

#[quickcheck]
fn prop_document_finds_itself(documents: Vec<String>, pick: usize) -> TestResult {
    let Some(engine) = engine_over(&documents) else {
        return TestResult::discard();
    };
    let position = pick % engine.len();
    let target = engine.documents()[position].clone();

    let ranked = engine.search_ranked(&target, 1).unwrap();
    if ranked.len() != 1 || ranked[0].distance > 1e-5 {
        return TestResult::failed();
    }

    // An earlier document that encodes to the same vector wins the tie by position
    let top = &ranked[0];
    let encoder = HashingEncoder::new(256).unwrap();
    let same_vector = encoder.encode(&top.text).unwrap() == encoder.encode(&target).unwrap();
    TestResult::from_bool(
        top.text == target || (top.index < position && same_vector),
    )
}
