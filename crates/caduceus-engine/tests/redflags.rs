mod common;

use caduceus_core::models::flag::{FlagResult, FlagState};
use caduceus_core::models::scenario::{Comparison, Condition};
use caduceus_engine::normalize::normalize;
use caduceus_engine::redflags::{evaluate, evaluate_condition};
use serde_json::json;

use common::{chest_pain, raw, shortness_of_breath};

fn state(results: &[FlagResult], rule_id: &str) -> FlagState {
    results
        .iter()
        .find(|r| r.rule_id == rule_id)
        .map(|r| r.state)
        .unwrap()
}

#[test]
fn copd_threshold_replaces_general_hypoxia_rule() {
    let scenario = shortness_of_breath();
    let encounter = normalize(&scenario, &raw(json!({ "spo2": 88, "known_copd": true })));
    let results = evaluate(&scenario, &encounter);

    assert_eq!(state(&results, "hypoxia_non_copd"), FlagState::NotTriggered);
    assert_eq!(state(&results, "hypoxia_copd"), FlagState::Triggered);
}

#[test]
fn hypoxia_without_copd_triggers_general_rule() {
    let scenario = shortness_of_breath();
    let encounter = normalize(&scenario, &raw(json!({ "spo2": 89, "known_copd": "no" })));
    let results = evaluate(&scenario, &encounter);

    assert_eq!(state(&results, "hypoxia_non_copd"), FlagState::Triggered);
    assert_eq!(state(&results, "hypoxia_copd"), FlagState::NotTriggered);
}

#[test]
fn unknown_fields_make_rules_indeterminate() {
    let scenario = shortness_of_breath();
    let encounter = normalize(&scenario, &raw(json!({ "known_copd": false })));
    let results = evaluate(&scenario, &encounter);

    assert_eq!(state(&results, "hypoxia_non_copd"), FlagState::Indeterminate);
    // known_copd=false already decides the conjunction.
    assert_eq!(state(&results, "hypoxia_copd"), FlagState::NotTriggered);
    assert_eq!(state(&results, "tachypnoea"), FlagState::Indeterminate);
}

#[test]
fn chest_pain_radiation_and_character_trigger_high_flags() {
    let scenario = chest_pain();
    let encounter = normalize(
        &scenario,
        &raw(json!({ "radiation": "jaw", "character": "crushing" })),
    );
    let results = evaluate(&scenario, &encounter);

    assert_eq!(results.len(), scenario.red_flags.len());
    let ids: Vec<_> = results.iter().map(|r| r.rule_id.as_str()).collect();
    let declared: Vec<_> = scenario.red_flags.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, declared);

    assert_eq!(state(&results, "radiation_arm_jaw"), FlagState::Triggered);
    assert_eq!(state(&results, "crushing_pain"), FlagState::Triggered);
    assert_eq!(state(&results, "tearing_to_back"), FlagState::NotTriggered);
    assert_eq!(state(&results, "hypotension"), FlagState::Indeterminate);

    let radiation = results.iter().find(|r| r.rule_id == "radiation_arm_jaw").unwrap();
    assert_eq!(radiation.label, "Radiation to arm or jaw");
    assert!(radiation.requires_escalation());
}

#[test]
fn compound_conditions_follow_kleene_logic() {
    let scenario = chest_pain();
    // heart_rate known and normal, systolic_bp unknown.
    let encounter = normalize(&scenario, &raw(json!({ "heart_rate": 80 })));

    let fast = Condition::Threshold {
        field: "heart_rate".to_string(),
        op: Comparison::Gt,
        value: 120.0,
    };
    let slow = Condition::Threshold {
        field: "heart_rate".to_string(),
        op: Comparison::Lt,
        value: 100.0,
    };
    let low_bp = Condition::Threshold {
        field: "systolic_bp".to_string(),
        op: Comparison::Lt,
        value: 90.0,
    };

    let all = |c: Vec<Condition>| Condition::All { conditions: c };
    let any = |c: Vec<Condition>| Condition::Any { conditions: c };

    assert_eq!(
        evaluate_condition(&all(vec![fast.clone(), low_bp.clone()]), &encounter),
        FlagState::NotTriggered
    );
    assert_eq!(
        evaluate_condition(&all(vec![slow.clone(), low_bp.clone()]), &encounter),
        FlagState::Indeterminate
    );
    assert_eq!(
        evaluate_condition(&any(vec![slow.clone(), low_bp.clone()]), &encounter),
        FlagState::Triggered
    );
    assert_eq!(
        evaluate_condition(&any(vec![fast.clone(), low_bp.clone()]), &encounter),
        FlagState::Indeterminate
    );
    assert_eq!(
        evaluate_condition(
            &Condition::Not {
                condition: Box::new(low_bp)
            },
            &encounter
        ),
        FlagState::Indeterminate
    );
    assert_eq!(
        evaluate_condition(
            &Condition::Not {
                condition: Box::new(fast)
            },
            &encounter
        ),
        FlagState::Triggered
    );
}

#[test]
fn range_bounds_are_inclusive() {
    let scenario = chest_pain();
    let in_range = Condition::Range {
        field: "heart_rate".to_string(),
        min: 50.0,
        max: 100.0,
    };

    for (rate, expected) in [
        (50, FlagState::Triggered),
        (100, FlagState::Triggered),
        (101, FlagState::NotTriggered),
    ] {
        let encounter = normalize(&scenario, &raw(json!({ "heart_rate": rate })));
        assert_eq!(evaluate_condition(&in_range, &encounter), expected, "rate {rate}");
    }
}

#[test]
fn evaluation_is_deterministic() {
    let scenario = chest_pain();
    let encounter = normalize(&scenario, &common::suspected_acs());
    assert_eq!(evaluate(&scenario, &encounter), evaluate(&scenario, &encounter));
}
