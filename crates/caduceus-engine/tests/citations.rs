mod common;

use std::sync::atomic::Ordering;

use caduceus_core::models::citation::CitationStatus;
use caduceus_engine::EngineConfig;
use caduceus_engine::citations::{CitationResolver, ClaimRequest};

use common::{FlakyIndex, OfflineIndex, StalledIndex, memory_index, tags};

fn config() -> EngineConfig {
    EngineConfig {
        source_timeout_ms: 50,
        ..EngineConfig::default()
    }
}

#[tokio::test]
async fn matching_excerpts_become_citations() {
    let index = memory_index();
    let config = config();
    let resolver = CitationResolver::new(&index, &config);

    let resolution = resolver.resolve("12-lead ECG", &tags(&["ecg"])).await;
    assert_eq!(resolution.status, CitationStatus::Found);
    assert_eq!(resolution.citations.len(), 1);

    let citation = &resolution.citations[0];
    assert_eq!(citation.excerpt_id, "cp-ecg");
    assert_eq!(citation.claim, "12-lead ECG");
    assert_eq!(citation.label(), "[chest-pain-guideline.pdf p.6]");
    assert!(citation.snippet.starts_with("Record a 12-lead ECG"));
}

#[tokio::test]
async fn relevance_threshold_and_cap_apply() {
    let index = memory_index();
    let config = EngineConfig {
        relevance_threshold: 1.0,
        max_citations_per_claim: 2,
        ..config()
    };
    let resolver = CitationResolver::new(&index, &config);

    // Only cp-acs carries both tags.
    let strict = resolver
        .resolve("Radiation to arm or jaw", &tags(&["acs", "red_flags"]))
        .await;
    let ids: Vec<_> = strict.citations.iter().map(|c| c.excerpt_id.as_str()).collect();
    assert_eq!(ids, vec!["cp-acs"]);

    // Four excerpts carry `acs`; ties order by excerpt id, capped at two.
    let capped = resolver.resolve("Acute Coronary Syndrome", &tags(&["acs"])).await;
    let ids: Vec<_> = capped.citations.iter().map(|c| c.excerpt_id.as_str()).collect();
    assert_eq!(ids, vec!["cp-acs", "cp-aspirin"]);
}

#[tokio::test]
async fn unmatched_tags_yield_not_found() {
    let index = memory_index();
    let config = config();
    let resolver = CitationResolver::new(&index, &config);

    let resolution = resolver.resolve("Chest X-ray", &tags(&["chest_xray"])).await;
    assert_eq!(resolution.status, CitationStatus::NotFound);
    assert!(resolution.citations.is_empty());
    assert_eq!(resolution.claim, "Chest X-ray");
}

#[tokio::test]
async fn stalled_lookup_times_out() {
    let index = StalledIndex;
    let config = config();
    let resolver = CitationResolver::new(&index, &config);

    let resolution = resolver.resolve("12-lead ECG", &tags(&["ecg"])).await;
    assert_eq!(resolution.status, CitationStatus::TimedOut);
    assert!(resolution.citations.is_empty());
}

#[tokio::test]
async fn transient_failure_is_retried_once() {
    let index = FlakyIndex::new(1);
    let config = config();
    let resolver = CitationResolver::new(&index, &config);

    let resolution = resolver.resolve("12-lead ECG", &tags(&["ecg"])).await;
    assert_eq!(resolution.status, CitationStatus::Found);
    assert_eq!(index.calls(), 2);
}

#[tokio::test]
async fn second_transient_failure_is_unavailable() {
    let index = FlakyIndex::new(2);
    let config = config();
    let resolver = CitationResolver::new(&index, &config);

    let resolution = resolver.resolve("12-lead ECG", &tags(&["ecg"])).await;
    assert_eq!(resolution.status, CitationStatus::Unavailable);
    assert!(resolution.citations.is_empty());
    assert_eq!(index.calls(), 2);
}

#[tokio::test]
async fn permanent_failure_is_not_retried() {
    let index = OfflineIndex::new();
    let config = config();
    let resolver = CitationResolver::new(&index, &config);

    let resolution = resolver.resolve("12-lead ECG", &tags(&["ecg"])).await;
    assert_eq!(resolution.status, CitationStatus::Unavailable);
    assert_eq!(index.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn resolve_all_keeps_input_order() {
    let index = memory_index();
    let config = config();
    let resolver = CitationResolver::new(&index, &config);

    let claims = vec![
        ClaimRequest::new("Chest X-ray", &tags(&["chest_xray"])),
        ClaimRequest::new("High-sensitivity troponin", &tags(&["troponin"])),
        ClaimRequest::new("Analgesia", &tags(&["analgesia"])),
    ];
    let resolutions = resolver.resolve_all(&claims).await;

    let claims: Vec<_> = resolutions.iter().map(|r| r.claim.as_str()).collect();
    assert_eq!(
        claims,
        vec!["Chest X-ray", "High-sensitivity troponin", "Analgesia"]
    );
    let statuses: Vec<_> = resolutions.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            CitationStatus::NotFound,
            CitationStatus::Found,
            CitationStatus::Found
        ]
    );
}
