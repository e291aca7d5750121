use std::collections::BTreeMap;

use super::common::*;
use crate::eligibility::CategoryCode::{self, A, A1, B, BE, C, C1, D};
use crate::eligibility::{
    CategoryRequest, CategoryRule, CombinationWhitelist, Prerequisite, RuleBook, RuleBookError,
};

fn standard_table() -> BTreeMap<CategoryCode, CategoryRule> {
    rules()
        .rules()
        .map(|(category, rule)| (category, rule.clone()))
        .collect()
}

#[test]
fn standard_rule_book_passes_its_own_invariants() {
    let standard = rules();
    let rebuilt = RuleBook::new(standard_table(), standard.whitelist().clone());

    assert_eq!(rebuilt, Ok(standard));
}

#[test]
fn every_category_has_a_rule() {
    let standard = rules();
    for category in CategoryCode::ALL {
        assert!(standard.rule(category).is_some(), "missing rule for {category}");
    }
    assert_eq!(standard.rule(D).map(|rule| rule.minimum_age), Some(24));
}

#[test]
fn prerequisite_cycles_are_rejected() {
    let mut table = standard_table();
    if let Some(rule) = table.get_mut(&C1) {
        rule.prerequisite = Prerequisite::Exact(C);
    }
    if let Some(rule) = table.get_mut(&C) {
        rule.prerequisite = Prerequisite::AnyOf(vec![D, C1]);
    }

    let error = RuleBook::new(table, rules().whitelist().clone()).expect_err("cycle detected");
    assert!(matches!(error, RuleBookError::PrerequisiteCycle(_)));
}

#[test]
fn base_categories_need_single_entries() {
    let whitelist = CombinationWhitelist::new(vec![vec![A1], vec![B], vec![A, B]]);

    let error = RuleBook::new(standard_table(), whitelist).expect_err("missing base entry");
    assert_eq!(error, RuleBookError::MissingBaseEntry(A));
}

#[test]
fn missing_rules_are_rejected() {
    let mut table = standard_table();
    table.remove(&BE);

    let error = RuleBook::new(table, rules().whitelist().clone()).expect_err("missing rule");
    assert_eq!(error, RuleBookError::MissingRule(BE));
}

#[test]
fn light_vehicle_unlocks_every_dependent_category() {
    assert_eq!(rules().upgrades_from(&codes(&[B])), codes(&[C1, C, D, BE]));
    assert_eq!(rules().upgrades_from(&codes(&[B, C1])), codes(&[C, D, BE]));
    assert!(rules().upgrades_from(&codes(&[A1])).is_empty());
}

#[test]
fn category_parsing_is_case_insensitive_and_keeps_unknown_codes() {
    assert_eq!(CategoryCode::parse(" c1 "), Some(C1));
    assert_eq!(CategoryCode::parse("be"), Some(BE));
    assert_eq!(CategoryCode::parse("B2"), None);

    let request = CategoryRequest::parse(["b", "B", "x", " x "]);
    assert_eq!(request.recognized(), &codes(&[B]));
    assert_eq!(request.unrecognized().to_vec(), vec!["x".to_string()]);
    assert!(!request.is_empty());
    assert!(CategoryRequest::parse(Vec::<String>::new()).is_empty());
}

#[test]
fn categories_serialize_as_short_codes() {
    let json = serde_json::to_string(&codes(&[BE, A1])).expect("serializes");
    assert_eq!(json, r#"["A1","BE"]"#);
}
