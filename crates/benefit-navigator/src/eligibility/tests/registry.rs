use std::collections::BTreeSet;

use super::common::*;
use crate::eligibility::{
    should_show_field, Benefit, CheckResult, CycleResult, FieldValue, FormData, FormField,
    FormProgress, Nationality, RegistryState, ResidenceStatus, SectionId, StrategyKind,
    RAPID_QUESTIONS_SECTION,
};

fn section_ids(result: &CycleResult) -> Vec<&str> {
    result
        .visible_sections
        .iter()
        .map(|section| section.id.as_str())
        .collect()
}

fn extends_reveal(before: &RegistryState, after: &RegistryState) -> bool {
    after.revealed_sections.starts_with(&before.revealed_sections)
}

fn rapid_answers() -> FormData {
    answers(&[
        (FormField::ResidenceInGermany, flag(true)),
        (FormField::LivesWithParents, flag(false)),
        (FormField::IsSingleParent, flag(false)),
        (FormField::IsStudent, flag(false)),
        (FormField::PensionEligible, flag(false)),
        (FormField::HasFinancialHardship, flag(false)),
        (FormField::ReceivesUnemploymentBenefit1, flag(false)),
        (FormField::ReceivesUnemploymentBenefit2, flag(false)),
        (FormField::ReceivesPension, flag(false)),
        (FormField::HasCareInsurance, flag(false)),
        (FormField::ReceivesChildBenefit, flag(false)),
        (FormField::ReceivesHousingBenefit, flag(false)),
        (FormField::ReceivesStudentAid, flag(false)),
    ])
}

#[test]
fn empty_answers_reveal_only_the_first_section() {
    let registry = registry(StrategyKind::RapidQuestionsFirst);

    let (state, result) =
        registry.evaluate(&RegistryState::default(), &FormData::new(), None, &context());

    assert_eq!(section_ids(&result), vec![RAPID_QUESTIONS_SECTION]);
    assert_eq!(
        state.revealed_sections,
        vec![SectionId::from(RAPID_QUESTIONS_SECTION)]
    );
    assert!(result
        .result(Benefit::HousingBenefit)
        .is_some_and(CheckResult::is_incomplete));
    assert!(result.eligible.is_empty());
    assert_eq!(result.incomplete.len(), 10);

    let visible: BTreeSet<FormField> = result.visible_fields.iter().copied().collect();
    let expected: BTreeSet<FormField> = rapid_answers().iter().map(|(field, _)| field).collect();
    assert_eq!(visible, expected);
    assert!(!visible.contains(&FormField::HasDisability));
    assert!(result.prefilled_fields.is_empty());
}

#[test]
fn ordered_strategy_starts_with_relevant_personal_fields() {
    let registry = registry(StrategyKind::Ordered);

    let (_, result) =
        registry.evaluate(&RegistryState::default(), &FormData::new(), None, &context());

    assert_eq!(section_ids(&result), vec!["personalInfo"]);
    assert_eq!(
        result.visible_sections[0].fields,
        vec![
            FormField::DateOfBirth,
            FormField::Nationality,
            FormField::ResidenceStatus,
            FormField::ResidenceInGermany,
        ]
    );
}

#[test]
fn repeating_a_cycle_with_unchanged_answers_is_idempotent() {
    let registry = registry(StrategyKind::RapidQuestionsFirst);
    let data = answers(&[(FormField::IsStudent, flag(true))]);

    let (first_state, first) =
        registry.evaluate(&RegistryState::default(), &data, None, &context());
    let (second_state, second) = registry.evaluate(&first_state, &data, None, &context());

    assert_eq!(first_state, second_state);
    assert_eq!(first, second);
}

#[test]
fn answering_every_visible_field_reveals_the_next_section() {
    let registry = registry(StrategyKind::RapidQuestionsFirst);

    let (state, first) =
        registry.evaluate(&RegistryState::default(), &FormData::new(), None, &context());
    let (next_state, second) = registry.evaluate(&state, &rapid_answers(), None, &context());

    assert_eq!(
        section_ids(&second),
        vec![RAPID_QUESTIONS_SECTION, "personalInfo"]
    );
    assert!(extends_reveal(&state, &next_state));
    assert!(second.visible_fields.contains(&FormField::Nationality));
    assert!(!second
        .visible_sections
        .iter()
        .skip(1)
        .any(|section| section.fields.contains(&FormField::ResidenceInGermany)));
    assert_eq!(section_ids(&first).len(), 1);
}

#[test]
fn unanswered_visible_fields_hold_back_further_sections() {
    let registry = registry(StrategyKind::RapidQuestionsFirst);
    let (state, _) =
        registry.evaluate(&RegistryState::default(), &FormData::new(), None, &context());

    let mut partial = rapid_answers();
    partial.remove(FormField::IsStudent);
    let (next_state, result) = registry.evaluate(&state, &partial, None, &context());

    assert_eq!(next_state.revealed_sections, state.revealed_sections);
    assert_eq!(section_ids(&result), vec![RAPID_QUESTIONS_SECTION]);
}

#[test]
fn fields_drop_out_once_no_check_needs_them() {
    let registry = registry(StrategyKind::Ordered);
    let (state, first) =
        registry.evaluate(&RegistryState::default(), &FormData::new(), None, &context());
    assert!(first.visible_fields.contains(&FormField::ResidenceStatus));

    let german = answers(&[(
        FormField::Nationality,
        FieldValue::Nationality(Nationality::German),
    )]);
    let (next_state, second) = registry.evaluate(&state, &german, None, &context());

    assert!(!second.visible_fields.contains(&FormField::ResidenceStatus));
    assert!(!next_state.visible_fields.contains(&FormField::ResidenceStatus));
    assert!(second.visible_fields.contains(&FormField::Nationality));
    assert!(second.visible_fields.contains(&FormField::DateOfBirth));
}

#[test]
fn fully_prefilled_sections_pull_in_the_next_one() {
    let registry = registry(StrategyKind::Ordered);
    let prefill = answers(&[
        (FormField::DateOfBirth, date(1992, 4, 3)),
        (
            FormField::Nationality,
            FieldValue::Nationality(Nationality::Eu),
        ),
        (
            FormField::ResidenceStatus,
            FieldValue::ResidenceStatus(ResidenceStatus::PermanentResidence),
        ),
        (FormField::ResidenceInGermany, flag(true)),
    ]);

    let (_, result) = registry.evaluate(
        &RegistryState::default(),
        &FormData::new(),
        Some(&prefill),
        &context(),
    );

    assert_eq!(section_ids(&result), vec!["personalInfo", "financialInfo"]);
    assert_eq!(result.prefilled_fields, prefill);
    assert!(result.visible_fields.contains(&FormField::MonthlyRent));
}

#[test]
fn missing_prefill_value_stops_the_loop() {
    let registry = registry(StrategyKind::Ordered);
    let prefill = answers(&[
        (FormField::DateOfBirth, date(1992, 4, 3)),
        (
            FormField::Nationality,
            FieldValue::Nationality(Nationality::Eu),
        ),
    ]);

    let (_, result) = registry.evaluate(
        &RegistryState::default(),
        &FormData::new(),
        Some(&prefill),
        &context(),
    );

    assert_eq!(section_ids(&result), vec!["personalInfo"]);
    assert_eq!(result.prefilled_fields.len(), 2);
}

#[test]
fn prefill_never_replaces_caller_answers() {
    let registry = registry(StrategyKind::Ordered);
    let data = answers(&[(
        FormField::Nationality,
        FieldValue::Nationality(Nationality::NonEu),
    )]);
    let prefill = answers(&[
        (
            FormField::Nationality,
            FieldValue::Nationality(Nationality::German),
        ),
        (FormField::DateOfBirth, date(1980, 1, 20)),
        (
            FormField::ResidenceStatus,
            FieldValue::ResidenceStatus(ResidenceStatus::ResidencePermit),
        ),
        (FormField::ResidenceInGermany, flag(true)),
    ]);

    let (_, result) = registry.evaluate(
        &RegistryState::default(),
        &data,
        Some(&prefill),
        &context(),
    );

    assert!(!result.prefilled_fields.contains(FormField::Nationality));
    assert_eq!(result.prefilled_fields.len(), 3);
    assert_eq!(section_ids(&result), vec!["personalInfo", "financialInfo"]);
}

#[test]
fn sections_without_missing_fields_are_skipped() {
    let registry = registry(StrategyKind::Ordered);
    let data = answers(&[
        (
            FormField::Nationality,
            FieldValue::Nationality(Nationality::German),
        ),
        (FormField::DateOfBirth, date(1970, 8, 8)),
        (FormField::ResidenceInGermany, flag(true)),
    ]);

    let (state, result) = registry.evaluate(&RegistryState::default(), &data, None, &context());

    assert_eq!(
        result.revealed_section_ids(),
        vec![&SectionId::from("financialInfo")]
    );
    assert_eq!(state.revealed_sections.len(), 1);
}

#[test]
fn complete_answers_exhaust_every_section() {
    let registry = registry(StrategyKind::RapidQuestionsFirst);

    let (state, result) =
        registry.evaluate(&RegistryState::default(), &full_profile(), None, &context());

    assert!(state.revealed_sections.is_empty());
    assert!(result.visible_sections.is_empty());
    assert!(result.missing_fields.is_empty());
    assert_eq!(result.incomplete.len(), 0);
    assert_eq!(result.eligible.len() + result.ineligible.len(), 10);
}

#[test]
fn progress_counts_filled_visible_fields_against_everything_required() {
    let registry = registry(StrategyKind::Ordered);
    let (_, mut result) =
        registry.evaluate(&RegistryState::default(), &FormData::new(), None, &context());

    result.visible_fields = vec![FormField::DateOfBirth, FormField::Nationality];
    result.missing_fields = [FormField::Nationality, FormField::MonthlyRent]
        .into_iter()
        .collect();
    let data = answers(&[(FormField::DateOfBirth, date(1990, 1, 1))]);

    let progress = FormProgress::from_cycle(&result, &data);
    assert_eq!(progress.filled, 1);
    assert_eq!(progress.total, 3);
    assert_eq!(progress.percent, 33);
    assert!(!progress.complete);

    result.missing_fields.clear();
    let data = data.with(
        FormField::Nationality,
        FieldValue::Nationality(Nationality::German),
    );
    let progress = FormProgress::from_cycle(&result, &data);
    assert_eq!(progress.percent, 100);
    assert!(progress.complete);
}

#[test]
fn progress_is_zero_without_required_fields() {
    let registry = registry(StrategyKind::Ordered);
    let (_, result) =
        registry.evaluate(&RegistryState::default(), &full_profile(), None, &context());

    let progress = FormProgress::from_cycle(&result, &full_profile());
    assert_eq!(progress.total, 0);
    assert_eq!(progress.percent, 0);
    assert!(!progress.complete);
}

#[test]
fn hidden_fields_are_not_shown_even_when_visible() {
    let visible = vec![FormField::ResidenceStatus];
    let german = answers(&[(
        FormField::Nationality,
        FieldValue::Nationality(Nationality::German),
    )]);
    let non_german = answers(&[(
        FormField::Nationality,
        FieldValue::Nationality(Nationality::NonEu),
    )]);

    assert!(!should_show_field(
        FormField::ResidenceStatus,
        &visible,
        &german,
        &context()
    ));
    assert!(should_show_field(
        FormField::ResidenceStatus,
        &visible,
        &non_german,
        &context()
    ));
    assert!(!should_show_field(
        FormField::MonthlyRent,
        &visible,
        &non_german,
        &context()
    ));
}
