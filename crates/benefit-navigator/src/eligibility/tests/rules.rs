use std::cell::Cell;

use super::common::*;
use crate::eligibility::rules::INCOMPLETE_NOTICE;
use crate::eligibility::{
    Benefit, EligibilityStatus, FieldValue, FormData, FormField, Nationality, Rationale, RuleChain,
};

fn success(_: &FormData) -> Rationale {
    Rationale::new("passt", "https://example.org/benefit")
}

#[test]
fn absent_field_makes_result_incomplete() {
    let data = answers(&[(FormField::IsStudent, flag(true))]);

    let result = RuleChain::new(Benefit::HousingBenefit, &data)
        .fail_if(FormField::IsStudent, |_| false, "never")
        .fail_if(FormField::MonthlyRent, |_| true, "would fail")
        .or_else_success(success);

    assert_eq!(result.status, EligibilityStatus::Incomplete);
    assert_eq!(result.reason, INCOMPLETE_NOTICE);
    assert!(result.missing_fields.contains(&FormField::MonthlyRent));
    assert!(result.checked_fields.contains(&FormField::IsStudent));
    assert!(result.url.is_none());
}

#[test]
fn passing_rules_with_complete_data_are_eligible() {
    let data = answers(&[
        (FormField::IsStudent, flag(true)),
        (FormField::MonthlyRent, number(650.0)),
    ]);

    let result = RuleChain::new(Benefit::HousingBenefit, &data)
        .fail_if(FormField::IsStudent, |_| false, "never")
        .fail_if(FormField::MonthlyRent, |_| false, "never")
        .or_else_success(success);

    assert!(result.is_eligible());
    assert_eq!(result.reason, "passt");
    assert_eq!(result.url.as_deref(), Some("https://example.org/benefit"));
    assert!(result.missing_fields.is_empty());
}

#[test]
fn failure_short_circuits_later_rules() {
    let data = answers(&[
        (FormField::IsStudent, flag(false)),
        (FormField::MonthlyRent, number(650.0)),
    ]);
    let later_rule_ran = Cell::new(false);

    let result = RuleChain::new(Benefit::HousingBenefit, &data)
        .fail_if(FormField::IsStudent, |_| true, "first failure")
        .fail_if(
            FormField::MonthlyRent,
            |_| {
                later_rule_ran.set(true);
                true
            },
            "second failure",
        )
        .fail_if(FormField::HouseholdSize, |_| true, "missing after failure")
        .or_else_success(success);

    assert!(result.is_ineligible());
    assert_eq!(result.reason, "first failure");
    assert!(!later_rule_ran.get());
    assert!(!result.checked_fields.contains(&FormField::MonthlyRent));
    assert!(!result.checked_fields.contains(&FormField::HouseholdSize));
}

#[test]
fn fields_seen_before_a_failure_stay_checked() {
    let data = answers(&[(FormField::MonthlyRent, number(100.0))]);

    let result = RuleChain::new(Benefit::HousingBenefit, &data)
        .fail_if(FormField::IsStudent, |_| false, "never")
        .fail_if(FormField::MonthlyRent, |_| true, "rent too low")
        .or_else_success(success);

    assert!(result.is_ineligible());
    assert_eq!(result.reason, "rent too low");
    assert!(result.checked_fields.contains(&FormField::IsStudent));
    assert!(result.checked_fields.contains(&FormField::MonthlyRent));
}

#[test]
fn multi_field_rule_waits_for_every_field() {
    let data = answers(&[(FormField::HouseholdSize, number(2.0))]);
    let predicate_ran = Cell::new(false);

    let result = RuleChain::new(Benefit::HousingBenefit, &data)
        .fail_if_all(
            &[FormField::HouseholdSize, FormField::NetMonthlyIncome],
            |_| {
                predicate_ran.set(true);
                true
            },
            "income too high",
        )
        .or_else_success(success);

    assert!(result.is_incomplete());
    assert!(!predicate_ran.get());
    assert_eq!(
        result.missing_fields.iter().copied().collect::<Vec<_>>(),
        vec![FormField::NetMonthlyIncome]
    );
}

#[test]
fn require_adds_a_field_that_cannot_fail() {
    let present = answers(&[(
        FormField::Nationality,
        FieldValue::Nationality(Nationality::NonEu),
    )]);
    let result = RuleChain::new(Benefit::UnemploymentBenefit, &present)
        .require(FormField::Nationality)
        .or_else_success(success);
    assert!(result.is_eligible());
    assert!(result.checked_fields.contains(&FormField::Nationality));

    let empty = FormData::new();
    let result = RuleChain::new(Benefit::UnemploymentBenefit, &empty)
        .require(FormField::Nationality)
        .or_else_success(success);
    assert!(result.is_incomplete());
    assert!(result.missing_fields.contains(&FormField::Nationality));
}

#[test]
fn when_only_appends_rules_if_condition_holds() {
    let data = FormData::new();

    let skipped = RuleChain::new(Benefit::ChildBenefit, &data)
        .when(false, |chain| {
            chain.fail_if(FormField::NumberOfChildren, |_| true, "no children")
        })
        .or_else_success(success);
    assert!(skipped.is_eligible());
    assert!(skipped.checked_fields.is_empty());

    let appended = RuleChain::new(Benefit::ChildBenefit, &data)
        .when(true, |chain| {
            chain.fail_if(FormField::NumberOfChildren, |_| true, "no children")
        })
        .or_else_success(success);
    assert!(appended.is_incomplete());
    assert!(appended.missing_fields.contains(&FormField::NumberOfChildren));
}
