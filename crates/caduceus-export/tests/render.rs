use std::sync::Arc;

use caduceus_core::language::Language;
use caduceus_core::models::encounter::RawEncounter;
use caduceus_core::models::report::SectionKind;
use caduceus_core::models::source::SourceExcerpt;
use caduceus_engine::{ApprovedReport, Engine, EngineConfig};
use caduceus_export::headings::Headings;
use caduceus_export::render::{render_json, render_markdown};
use caduceus_scenarios::builtin;
use caduceus_scenarios::registry::ScenarioRegistry;
use caduceus_sources::memory::MemorySourceIndex;
use serde_json::json;

fn excerpt(id: &str, locator: &str, tags: &[&str], text: &str) -> SourceExcerpt {
    SourceExcerpt {
        id: id.to_string(),
        document_id: "chest-pain-guideline.pdf".to_string(),
        locator: locator.to_string(),
        text: text.to_string(),
        topic_tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

async fn approved(excerpts: Vec<SourceExcerpt>) -> ApprovedReport {
    let registry = Arc::new(ScenarioRegistry::new(builtin::builtin_snapshot(1).unwrap()));
    let engine = Engine::new(
        registry,
        MemorySourceIndex::new(excerpts).unwrap(),
        EngineConfig::default(),
    )
    .unwrap();

    let mut raw = RawEncounter::new("2026-03-02T14:05:00Z".parse().unwrap());
    raw.fields.insert("radiation".to_string(), json!("left_arm"));
    raw.fields.insert("character".to_string(), json!("pressure"));
    engine.evaluate("chest_pain", &raw).await.unwrap()
}

fn acs_excerpts() -> Vec<SourceExcerpt> {
    vec![
        excerpt(
            "cp-acs",
            "p.4",
            &["acs", "red_flags"],
            "Pain radiating to the arm or jaw should be managed as a possible \
             acute coronary syndrome.",
        ),
        excerpt(
            "cp-ecg",
            "p.6",
            &["ecg"],
            "Record a 12-lead ECG within 10 minutes of arrival.",
        ),
    ]
}

#[tokio::test]
async fn markdown_has_every_section_in_order() {
    let report = approved(acs_excerpts()).await;
    let markdown = render_markdown(&report, Language::En).unwrap();

    assert!(markdown.starts_with("# Assistive report (only from provided references)\n"));
    assert!(markdown.contains("Scenario: Adult chest pain (chest_pain v1.2.0)\n"));
    assert!(markdown.contains("Recorded: 2026-03-02T14:05:00Z\n"));

    let positions: Vec<usize> = SectionKind::ORDER
        .iter()
        .map(|kind| {
            let heading = format!(
                "## {}. {}\n",
                kind.letter(),
                Headings::for_language(Language::En).section(*kind)
            );
            markdown.find(&heading).unwrap()
        })
        .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[tokio::test]
async fn cited_lines_carry_reference_labels() {
    let report = approved(acs_excerpts()).await;
    let markdown = render_markdown(&report, Language::En).unwrap();

    assert!(markdown.contains("- 12-lead ECG [chest-pain-guideline.pdf p.6]\n"));
    assert!(markdown.contains(
        "- [chest-pain-guideline.pdf p.4] Pain radiating to the arm or jaw should be \
         managed as a possible acute coronary syndrome.\n"
    ));
    assert!(markdown.contains("- Not found in provided references: Chest X-ray\n"));
}

#[tokio::test]
async fn empty_sections_point_to_references() {
    let report = approved(Vec::new()).await;
    let markdown = render_markdown(&report, Language::En).unwrap();

    assert!(markdown.contains(
        "## C. Differential Diagnosis (Ranked)\n\n_No supported items; see References._\n"
    ));
    assert!(markdown.ends_with('\n'));
    assert!(!markdown.ends_with("\n\n"));
}

#[tokio::test]
async fn arabic_headings_replace_english() {
    let report = approved(acs_excerpts()).await;
    let markdown = render_markdown(&report, Language::Ar).unwrap();

    assert!(markdown.starts_with("# تقرير داعم (من المصادر المرفوعة فقط)\n"));
    assert!(markdown.contains("## B. إنذارات خطر\n"));
    assert!(!markdown.contains("Red Flags (Must-Not-Miss)"));
}

#[tokio::test]
async fn json_output_is_the_bare_report() {
    let report = approved(acs_excerpts()).await;
    let value: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();

    assert_eq!(value["metadata"]["scenario_id"], "chest_pain");
    assert_eq!(value["metadata"]["language"], "en");
    assert_eq!(value["sections"].as_array().unwrap().len(), 7);
    assert_eq!(value["sections"][0]["kind"], "summary");
    assert_eq!(value["sections"][0]["lines"][0]["exemption"], "safety_notice");
}
