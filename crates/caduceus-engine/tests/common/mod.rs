#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use caduceus_core::models::encounter::RawEncounter;
use caduceus_core::models::flag::FlagResult;
use caduceus_core::models::report::Report;
use caduceus_core::models::scenario::Scenario;
use caduceus_core::models::source::{ScoredExcerpt, SourceExcerpt};
use caduceus_engine::EngineConfig;
use caduceus_engine::citations::CitationResolver;
use caduceus_engine::compose::{self, ComposeInputs, Evidence};
use caduceus_engine::normalize::normalize;
use caduceus_engine::ranker::rank;
use caduceus_engine::redflags;
use caduceus_scenarios::builtin::{self, CHEST_PAIN, SHORTNESS_OF_BREATH};
use caduceus_scenarios::registry::ScenarioRegistry;
use caduceus_sources::SourceIndex;
use caduceus_sources::error::SourceError;
use caduceus_sources::memory::MemorySourceIndex;
use serde_json::{Value, json};

pub const NOT_FOUND: &str = "Not found in provided references";

pub fn recorded_at() -> jiff::Timestamp {
    "2026-01-15T09:30:00Z".parse().unwrap()
}

pub fn chest_pain() -> Scenario {
    builtin::get_scenario(CHEST_PAIN).unwrap()
}

pub fn shortness_of_breath() -> Scenario {
    builtin::get_scenario(SHORTNESS_OF_BREATH).unwrap()
}

pub fn registry() -> Arc<ScenarioRegistry> {
    Arc::new(ScenarioRegistry::new(builtin::builtin_snapshot(7).unwrap()))
}

pub fn raw(fields: Value) -> RawEncounter {
    let mut raw = RawEncounter::new(recorded_at());
    if let Value::Object(map) = fields {
        raw.fields = map.into_iter().collect();
    }
    raw
}

/// Radiation to the jaw with crushing pain; haemodynamics not recorded.
pub fn suspected_acs() -> RawEncounter {
    raw(json!({
        "age": 58,
        "radiation": "jaw",
        "character": "crushing"
    }))
}

/// A complete chest pain encounter with no red flag present.
pub fn benign_chest_pain() -> RawEncounter {
    raw(json!({
        "age": 34,
        "radiation": "none",
        "character": "sharp",
        "onset": "gradual",
        "duration_minutes": 30,
        "diaphoresis": false,
        "syncope": false,
        "systolic_bp": 128,
        "heart_rate": 78,
        "spo2": "98%"
    }))
}

fn excerpt(id: &str, document: &str, locator: &str, tags: &[&str], text: &str) -> SourceExcerpt {
    SourceExcerpt {
        id: id.to_string(),
        document_id: document.to_string(),
        locator: locator.to_string(),
        text: text.to_string(),
        topic_tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Approved excerpts for both built-in scenarios. Nothing is tagged
/// `chest_xray`, so that claim is never supported.
pub fn excerpts() -> Vec<SourceExcerpt> {
    const CP: &str = "chest-pain-guideline.pdf";
    const SOB: &str = "breathlessness-guideline.pdf";
    vec![
        excerpt("cp-msk", CP, "p.2", &["musculoskeletal", "chest_pain"],
            "Chest wall tenderness that reproduces the pain suggests a musculoskeletal cause."),
        excerpt("cp-gord", CP, "p.3", &["gord"],
            "Burning retrosternal pain related to meals or lying flat suggests reflux."),
        excerpt("cp-anxiety", CP, "p.3", &["anxiety"],
            "Panic symptoms are considered only after organic causes have been addressed."),
        excerpt("cp-acs", CP, "p.4", &["acs", "red_flags"],
            "Pain radiating to the arm or jaw, or crushing central chest pain, should be \
             managed as a possible acute coronary syndrome."),
        excerpt("cp-shock", CP, "p.5", &["shock", "red_flags"],
            "Systolic pressure below 90 mmHg with chest pain requires emergency transfer."),
        excerpt("cp-syncope", CP, "p.5", &["syncope"],
            "Syncope accompanying chest pain warrants same-day emergency assessment."),
        excerpt("cp-ecg", CP, "p.6", &["ecg", "acs"],
            "Record a 12-lead ECG within 10 minutes of arrival when acute coronary \
             syndrome is suspected."),
        excerpt("cp-troponin", CP, "p.7", &["troponin", "acs"],
            "Measure high-sensitivity troponin at presentation and repeat per local protocol."),
        excerpt("cp-aspirin", CP, "p.8", &["aspirin", "acs"],
            "Aspirin may be given when acute coronary syndrome is suspected, unless \
             contraindicated."),
        excerpt("cp-analgesia", CP, "p.8", &["analgesia"],
            "Offer analgesia proportionate to the severity of pain."),
        excerpt("cp-pe", CP, "p.9", &["pulmonary_embolism", "d_dimer"],
            "Apply a clinical probability score before requesting a D-dimer."),
        excerpt("cp-dissection", CP, "p.10", &["aortic_dissection", "red_flags"],
            "Tearing pain radiating to the back raises concern for aortic dissection."),
        excerpt("cp-hypoxia", CP, "p.11", &["hypoxia", "tachycardia"],
            "Hypoxia or persistent tachycardia prompts assessment for pulmonary causes."),
        excerpt("cp-disposition", CP, "p.12", &["disposition", "chest_pain"],
            "Without red flags, follow-up in primary care with safety-netting advice is \
             appropriate."),
        excerpt("sob-oxygen", SOB, "s.3.1", &["oxygen", "copd", "hypoxia"],
            "Target saturation 88-92% in patients at risk of hypercapnic respiratory \
             failure and 94-98% otherwise."),
        excerpt("sob-distress", SOB, "s.3.2", &["respiratory_distress", "altered_mental_status"],
            "A respiratory rate above 30/min or new confusion indicates severe illness."),
        excerpt("sob-asthma", SOB, "s.4.1", &["asthma", "peak_flow"],
            "Measure peak expiratory flow and compare with the best or predicted value."),
        excerpt("sob-pneumonia", SOB, "s.4.3", &["pneumonia"],
            "Fever, focal chest signs and productive cough point towards pneumonia."),
        excerpt("sob-hf", SOB, "s.4.4", &["heart_failure"],
            "Orthopnoea and peripheral oedema raise concern for heart failure."),
        excerpt("sob-pe", SOB, "s.4.5", &["pulmonary_embolism", "hemoptysis"],
            "Pleuritic pain, haemoptysis or unilateral leg swelling raise concern for \
             thromboembolism."),
        excerpt("sob-ptx", SOB, "s.4.6", &["pneumothorax"],
            "Sudden pleuritic breathlessness in a tall young adult suggests pneumothorax."),
        excerpt("sob-spo2", SOB, "s.5.1", &["spo2", "abg"],
            "Repeat pulse oximetry and obtain a blood gas when saturation is low."),
        excerpt("sob-bronchodilator", SOB, "s.6.1", &["bronchodilator"],
            "Give an inhaled short-acting bronchodilator for wheeze."),
        excerpt("sob-disposition", SOB, "s.7", &["disposition", "breathlessness"],
            "Review within 48 hours when no red flag is present."),
    ]
}

pub fn memory_index() -> MemorySourceIndex {
    MemorySourceIndex::new(excerpts()).unwrap()
}

/// Fails the first `failures` lookups with a transient error, then answers
/// from the fixture excerpts.
pub struct FlakyIndex {
    inner: MemorySourceIndex,
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyIndex {
    pub fn new(failures: usize) -> Self {
        Self {
            inner: memory_index(),
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SourceIndex for FlakyIndex {
    async fn search(&self, topic_tags: &[String]) -> Result<Vec<ScoredExcerpt>, SourceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(SourceError::Transient("document store busy".to_string()));
        }
        Ok(self.inner.search_blocking(topic_tags))
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Never answers within any reasonable timeout.
pub struct StalledIndex;

impl SourceIndex for StalledIndex {
    async fn search(&self, _topic_tags: &[String]) -> Result<Vec<ScoredExcerpt>, SourceError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }

    fn len(&self) -> usize {
        0
    }
}

/// Fails every lookup with a permanent error.
pub struct OfflineIndex {
    pub calls: AtomicUsize,
}

impl OfflineIndex {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl SourceIndex for OfflineIndex {
    async fn search(&self, _topic_tags: &[String]) -> Result<Vec<ScoredExcerpt>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SourceError::Unavailable("index not mounted".to_string()))
    }

    fn len(&self) -> usize {
        0
    }
}

pub fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

/// Run every stage up to composition, without the guard.
pub async fn compose_report<S: SourceIndex>(
    scenario: &Scenario,
    raw: &RawEncounter,
    index: &S,
    config: &EngineConfig,
) -> (Report, Vec<FlagResult>) {
    let encounter = normalize(scenario, raw);
    let flags = redflags::evaluate(scenario, &encounter);
    let differentials = rank(scenario, &flags, &config.weights);

    let (keys, requests): (Vec<_>, Vec<_>) = compose::claims(scenario, &flags, &differentials)
        .into_iter()
        .unzip();
    let resolutions = CitationResolver::new(index, config)
        .resolve_all(&requests)
        .await;
    let evidence = Evidence::new(keys, resolutions);

    let report = compose::compose(&ComposeInputs {
        scenario,
        encounter: &encounter,
        flags: &flags,
        differentials: &differentials,
        evidence: &evidence,
        registry_version: 7,
        style_guide_version: config.style_guide_version,
        language: config.language,
    });
    (report, flags)
}
