//! End-to-end questionnaire runs through the public registry and session facade.
//!
//! Each scenario plays a user who answers exactly the fields currently shown, cycle after
//! cycle, until no section is left to reveal.

use std::sync::Arc;

use benefit_navigator::eligibility::{
    apply_defaults_for_hidden_fields, evaluate_all, Benefit, CheckResult, CycleResult,
    EducationLevel, EligibilityRegistry, EligibilitySessionService, EligibilityStatus,
    EmploymentStatus, EvaluationContext, FieldValue, FormData, FormField, FormProgress, Gender,
    HealthInsurance, MaritalStatus, Nationality, RefreshRequest, RegistryState, StrategyKind,
    WorkAbility,
};
use chrono::NaiveDate;

mod common {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use benefit_navigator::eligibility::{AnswerStore, FormData, StoreError, UserId};

    #[derive(Default)]
    pub struct MemoryStore {
        answers: Mutex<HashMap<UserId, FormData>>,
    }

    impl AnswerStore for MemoryStore {
        fn load(&self, user: &UserId) -> Result<Option<FormData>, StoreError> {
            Ok(self.answers.lock().expect("store mutex").get(user).cloned())
        }

        fn save(&self, user: &UserId, answers: &FormData) -> Result<(), StoreError> {
            self.answers
                .lock()
                .expect("store mutex")
                .insert(user.clone(), answers.clone());
            Ok(())
        }
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

/// Single parent in part-time work with one child, renting a flat.
fn single_parent() -> FormData {
    let date = |y, m, d| FieldValue::Date(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"));
    [
        (FormField::FirstName, FieldValue::Text("Lea".to_string())),
        (FormField::LastName, FieldValue::Text("Brandt".to_string())),
        (FormField::DateOfBirth, date(1991, 2, 14)),
        (FormField::Gender, FieldValue::Gender(Gender::Female)),
        (
            FormField::MaritalStatus,
            FieldValue::MaritalStatus(MaritalStatus::Single),
        ),
        (
            FormField::Nationality,
            FieldValue::Nationality(Nationality::German),
        ),
        (FormField::ResidenceInGermany, FieldValue::Flag(true)),
        (FormField::GrossMonthlyIncome, FieldValue::Number(1400.0)),
        (FormField::NetMonthlyIncome, FieldValue::Number(1100.0)),
        (FormField::Assets, FieldValue::Number(1500.0)),
        (FormField::MonthlyRent, FieldValue::Number(690.0)),
        (FormField::HouseholdSize, FieldValue::Number(2.0)),
        (FormField::NumberOfChildren, FieldValue::Number(1.0)),
        (FormField::ChildrenAges, FieldValue::Numbers(vec![6.0])),
        (FormField::IsSingleParent, FieldValue::Flag(true)),
        (FormField::LivesWithParents, FieldValue::Flag(false)),
        (
            FormField::EmploymentStatus,
            FieldValue::EmploymentStatus(EmploymentStatus::Employed),
        ),
        (
            FormField::EducationLevel,
            FieldValue::EducationLevel(EducationLevel::VocationalTraining),
        ),
        (FormField::IsStudent, FieldValue::Flag(false)),
        (FormField::HasDisability, FieldValue::Flag(false)),
        (FormField::IsPregnant, FieldValue::Flag(false)),
        (FormField::HasCareNeeds, FieldValue::Flag(false)),
        (FormField::PensionEligible, FieldValue::Flag(false)),
        (FormField::CitizenBenefitLast3Years, FieldValue::Flag(false)),
        (FormField::HasFinancialHardship, FieldValue::Flag(true)),
        (
            FormField::WorkAbility,
            FieldValue::WorkAbility(WorkAbility::Full),
        ),
        (
            FormField::HealthInsurance,
            FieldValue::HealthInsurance(HealthInsurance::Public),
        ),
        (FormField::HasCareInsurance, FieldValue::Flag(true)),
        (FormField::ReceivesUnemploymentBenefit1, FieldValue::Flag(false)),
        (FormField::ReceivesUnemploymentBenefit2, FieldValue::Flag(false)),
        (FormField::ReceivesPension, FieldValue::Flag(false)),
        (FormField::ReceivesChildBenefit, FieldValue::Flag(true)),
        (FormField::ReceivesHousingBenefit, FieldValue::Flag(false)),
        (FormField::ReceivesStudentAid, FieldValue::Flag(false)),
    ]
    .into_iter()
    .collect()
}

fn statuses(results: &[CheckResult]) -> Vec<(Benefit, EligibilityStatus)> {
    results
        .iter()
        .map(|result| (result.benefit, result.status))
        .collect()
}

/// Copy the truthful answer of every visible field the user has not answered yet.
fn answer_visible(answers: &mut FormData, cycle: &CycleResult, truth: &FormData) -> usize {
    let mut added = 0;
    for &field in &cycle.visible_fields {
        if answers.contains(field) || cycle.prefilled_fields.contains(field) {
            continue;
        }
        if let Some(value) = truth.get(field) {
            answers.insert(field, value.clone());
            added += 1;
        }
    }
    added
}

#[test]
fn questionnaire_converges_for_both_strategies() {
    let context = EvaluationContext::new(today());
    let truth = single_parent();
    let expected = evaluate_all(
        &apply_defaults_for_hidden_fields(&truth, &context),
        &context,
    );

    for kind in [StrategyKind::Ordered, StrategyKind::RapidQuestionsFirst] {
        let registry = EligibilityRegistry::from_kind(kind);
        let mut state = RegistryState::default();
        let mut answers = FormData::new();
        let mut cycles = 0;

        let final_cycle = loop {
            let (next, cycle) = registry.evaluate(&state, &answers, None, &context);
            state = next;
            cycles += 1;
            assert!(cycles <= 12, "{kind} strategy never settled");

            if cycle.missing_fields.is_empty() {
                break cycle;
            }
            assert!(
                answer_visible(&mut answers, &cycle, &truth) > 0,
                "{kind} strategy left missing fields hidden: {:?}",
                cycle.missing_fields
            );
        };

        assert!(final_cycle.incomplete.is_empty());
        assert_eq!(statuses(&final_cycle.all), statuses(&expected));
        assert!(
            answers.len() < truth.len(),
            "fields no check needs were still asked"
        );
        assert!(!answers.contains(FormField::FirstName));
    }
}

#[test]
fn single_parent_outcomes_are_stable() {
    let context = EvaluationContext::new(today());
    let results = evaluate_all(
        &apply_defaults_for_hidden_fields(&single_parent(), &context),
        &context,
    );

    let status = |benefit: Benefit| {
        results
            .iter()
            .find(|result| result.benefit == benefit)
            .map(|result| result.is_eligible())
    };

    assert_eq!(status(Benefit::ChildBenefit), Some(true));
    assert_eq!(status(Benefit::StudentAid), Some(false));
    assert_eq!(status(Benefit::UnemploymentBenefit), Some(false));
    assert_eq!(results.len(), Benefit::ALL.len());
    for result in &results {
        assert!(result.missing_fields.is_empty(), "{:?}", result.benefit);
        if result.is_eligible() {
            assert!(result.url.is_some());
        } else {
            assert!(result.url.is_none());
        }
    }
}

#[test]
fn session_service_tracks_progress_across_cycles() {
    let store = Arc::new(common::MemoryStore::default());
    let service = EligibilitySessionService::new(
        EligibilityRegistry::from_kind(StrategyKind::RapidQuestionsFirst),
        store,
    );
    let session = service.create_session(None);
    let truth = single_parent();
    let mut answers = FormData::new();
    let mut last = FormProgress {
        filled: 0,
        total: 0,
        percent: 0,
        complete: false,
    };

    for _ in 0..12 {
        let outcome = service
            .refresh(
                &session,
                RefreshRequest {
                    today: Some(today()),
                    ..RefreshRequest::new(answers.clone())
                },
            )
            .expect("cycle succeeds");

        assert!(outcome.progress.percent <= 100);
        last = outcome.progress;

        if outcome.cycle.missing_fields.is_empty() {
            break;
        }
        answer_visible(&mut answers, &outcome.cycle, &truth);
    }

    assert!(last.complete);
    assert_eq!(last.percent, 100);
    service.end_session(&session).expect("session ends");
}
