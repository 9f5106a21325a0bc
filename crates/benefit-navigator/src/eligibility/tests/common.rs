use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::eligibility::{
    AnswerStore, EducationLevel, EligibilityRegistry, EligibilitySessionService,
    EmploymentStatus, EvaluationContext, FieldValue, FormData, FormField, Gender,
    HealthInsurance, MaritalStatus, Nationality, ResidenceStatus, StoreError, StrategyKind,
    UserId, WorkAbility,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn context() -> EvaluationContext {
    EvaluationContext::new(today())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> FieldValue {
    FieldValue::Date(NaiveDate::from_ymd_opt(year, month, day).expect("valid date"))
}

pub(super) fn flag(value: bool) -> FieldValue {
    FieldValue::Flag(value)
}

pub(super) fn number(value: f64) -> FieldValue {
    FieldValue::Number(value)
}

pub(super) fn answers(entries: &[(FormField, FieldValue)]) -> FormData {
    entries.iter().cloned().collect()
}

/// German job seeker who qualifies for Arbeitslosengeld.
pub(super) fn job_seeker() -> FormData {
    answers(&[
        (FormField::Nationality, FieldValue::Nationality(Nationality::German)),
        (FormField::ResidenceInGermany, flag(true)),
        (
            FormField::EmploymentStatus,
            FieldValue::EmploymentStatus(EmploymentStatus::Unemployed),
        ),
        (FormField::WorkAbility, FieldValue::WorkAbility(WorkAbility::Full)),
        (FormField::ReceivesUnemploymentBenefit1, flag(false)),
        (FormField::ReceivesPension, flag(false)),
        (FormField::PensionEligible, flag(false)),
    ])
}

/// Two-parent household with two children under 25.
pub(super) fn family() -> FormData {
    answers(&[
        (FormField::HouseholdSize, number(4.0)),
        (FormField::NumberOfChildren, number(2.0)),
        (FormField::ChildrenAges, FieldValue::Numbers(vec![4.0, 9.0])),
        (FormField::IsSingleParent, flag(false)),
        (FormField::GrossMonthlyIncome, number(2400.0)),
        (FormField::ResidenceInGermany, flag(true)),
        (FormField::Nationality, FieldValue::Nationality(Nationality::German)),
        (FormField::ReceivesChildBenefit, flag(true)),
        (FormField::ReceivesUnemploymentBenefit2, flag(false)),
        (FormField::ReceivesHousingBenefit, flag(true)),
    ])
}

/// Every catalog field answered.
pub(super) fn full_profile() -> FormData {
    answers(&[
        (FormField::FirstName, FieldValue::Text("Mara".to_string())),
        (FormField::LastName, FieldValue::Text("Klein".to_string())),
        (FormField::DateOfBirth, date(1990, 3, 2)),
        (FormField::Gender, FieldValue::Gender(Gender::Female)),
        (
            FormField::MaritalStatus,
            FieldValue::MaritalStatus(MaritalStatus::Married),
        ),
        (FormField::Nationality, FieldValue::Nationality(Nationality::Eu)),
        (
            FormField::ResidenceStatus,
            FieldValue::ResidenceStatus(ResidenceStatus::PermanentResidence),
        ),
        (FormField::ResidenceInGermany, flag(true)),
        (FormField::GrossMonthlyIncome, number(2100.0)),
        (FormField::NetMonthlyIncome, number(1500.0)),
        (FormField::Assets, number(2000.0)),
        (FormField::MonthlyRent, number(800.0)),
        (FormField::HouseholdSize, number(3.0)),
        (FormField::NumberOfChildren, number(1.0)),
        (FormField::ChildrenAges, FieldValue::Numbers(vec![3.0])),
        (FormField::LivesWithParents, flag(false)),
        (FormField::IsSingleParent, flag(false)),
        (
            FormField::EmploymentStatus,
            FieldValue::EmploymentStatus(EmploymentStatus::Employed),
        ),
        (
            FormField::EducationLevel,
            FieldValue::EducationLevel(EducationLevel::VocationalTraining),
        ),
        (FormField::IsStudent, flag(false)),
        (FormField::HasDisability, flag(false)),
        (FormField::DisabilityDegree, number(0.0)),
        (FormField::IsPregnant, flag(false)),
        (FormField::HasCareNeeds, flag(false)),
        (FormField::PensionEligible, flag(false)),
        (FormField::CitizenBenefitLast3Years, flag(false)),
        (FormField::HasFinancialHardship, flag(false)),
        (FormField::WorkAbility, FieldValue::WorkAbility(WorkAbility::Full)),
        (FormField::ReceivesUnemploymentBenefit1, flag(false)),
        (FormField::ReceivesUnemploymentBenefit2, flag(false)),
        (FormField::ReceivesPension, flag(false)),
        (
            FormField::HealthInsurance,
            FieldValue::HealthInsurance(HealthInsurance::Public),
        ),
        (FormField::HasCareInsurance, flag(true)),
        (FormField::ReceivesChildBenefit, flag(true)),
        (FormField::ReceivesHousingBenefit, flag(false)),
        (FormField::ReceivesStudentAid, flag(false)),
    ])
}

pub(super) fn registry(kind: StrategyKind) -> EligibilityRegistry {
    EligibilityRegistry::from_kind(kind)
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) answers: Arc<Mutex<HashMap<UserId, FormData>>>,
}

impl AnswerStore for MemoryStore {
    fn load(&self, user: &UserId) -> Result<Option<FormData>, StoreError> {
        let guard = self.answers.lock().expect("store mutex poisoned");
        Ok(guard.get(user).cloned())
    }

    fn save(&self, user: &UserId, answers: &FormData) -> Result<(), StoreError> {
        let mut guard = self.answers.lock().expect("store mutex poisoned");
        guard.insert(user.clone(), answers.clone());
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl AnswerStore for UnavailableStore {
    fn load(&self, _user: &UserId) -> Result<Option<FormData>, StoreError> {
        Err(StoreError::Unavailable("pod offline".to_string()))
    }

    fn save(&self, _user: &UserId, _answers: &FormData) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("pod offline".to_string()))
    }
}

pub(super) fn build_service(
    kind: StrategyKind,
) -> (Arc<EligibilitySessionService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(EligibilitySessionService::new(
        registry(kind),
        store.clone(),
    ));
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
