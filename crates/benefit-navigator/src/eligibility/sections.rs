use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{FormData, FormField};
use super::fields::{metadata, FieldKind};
use super::rules::CheckResult;

/// Identifier of a form section, unique within one strategy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl SectionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        SectionId(value.to_string())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionDefinition {
    pub id: SectionId,
    pub title: String,
    pub fields: Vec<FormField>,
}

impl SectionDefinition {
    fn new(id: &str, title: &str, fields: &[FormField]) -> Self {
        Self {
            id: SectionId::from(id),
            title: title.to_string(),
            fields: fields.to_vec(),
        }
    }
}

/// Revealed section as presented to the user: only its currently visible fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleSection {
    pub id: SectionId,
    pub title: String,
    pub fields: Vec<FormField>,
}

/// Partition of the field catalog into sections plus the policy picking the next one.
///
/// `next_section` must never return an id from `considered` and must return `None` once
/// every section has been considered.
pub trait SectionStrategy: Send + Sync {
    fn sections(&self) -> &[SectionDefinition];

    fn next_section(
        &self,
        considered: &[SectionId],
        data: &FormData,
        results: &[CheckResult],
    ) -> Option<SectionId>;

    fn section(&self, id: &SectionId) -> Option<&SectionDefinition> {
        self.sections().iter().find(|section| &section.id == id)
    }

    fn section_fields(&self, id: &SectionId) -> &[FormField] {
        self.section(id)
            .map(|section| section.fields.as_slice())
            .unwrap_or(&[])
    }
}

fn first_unconsidered(
    sections: &[SectionDefinition],
    considered: &[SectionId],
) -> Option<SectionId> {
    sections
        .iter()
        .find(|section| !considered.contains(&section.id))
        .map(|section| section.id.clone())
}

fn domain_sections() -> Vec<SectionDefinition> {
    use FormField as F;

    vec![
        SectionDefinition::new(
            "personalInfo",
            "Persönliche Informationen",
            &[
                F::FirstName,
                F::LastName,
                F::DateOfBirth,
                F::Gender,
                F::MaritalStatus,
                F::Nationality,
                F::ResidenceStatus,
                F::ResidenceInGermany,
            ],
        ),
        SectionDefinition::new(
            "financialInfo",
            "Finanzielle Angaben",
            &[
                F::GrossMonthlyIncome,
                F::NetMonthlyIncome,
                F::Assets,
                F::MonthlyRent,
            ],
        ),
        SectionDefinition::new(
            "householdInfo",
            "Haushalt",
            &[
                F::HouseholdSize,
                F::NumberOfChildren,
                F::ChildrenAges,
                F::IsSingleParent,
                F::LivesWithParents,
            ],
        ),
        SectionDefinition::new(
            "educationEmployment",
            "Bildung & Beschäftigung",
            &[F::EmploymentStatus, F::EducationLevel, F::IsStudent],
        ),
        SectionDefinition::new(
            "specialCircumstances",
            "Besondere Umstände",
            &[
                F::HasDisability,
                F::DisabilityDegree,
                F::IsPregnant,
                F::HasCareNeeds,
                F::PensionEligible,
                F::CitizenBenefitLast3Years,
                F::HasFinancialHardship,
                F::WorkAbility,
            ],
        ),
        SectionDefinition::new(
            "insuranceBenefits",
            "Versicherung & Leistungen",
            &[
                F::HealthInsurance,
                F::HasCareInsurance,
                F::ReceivesUnemploymentBenefit1,
                F::ReceivesUnemploymentBenefit2,
                F::ReceivesPension,
                F::ReceivesChildBenefit,
                F::ReceivesHousingBenefit,
                F::ReceivesStudentAid,
            ],
        ),
    ]
}

/// Six domain sections presented in a fixed order.
#[derive(Debug, Clone)]
pub struct OrderedSectionStrategy {
    sections: Vec<SectionDefinition>,
}

impl Default for OrderedSectionStrategy {
    fn default() -> Self {
        Self {
            sections: domain_sections(),
        }
    }
}

impl SectionStrategy for OrderedSectionStrategy {
    fn sections(&self) -> &[SectionDefinition] {
        &self.sections
    }

    fn next_section(
        &self,
        considered: &[SectionId],
        _data: &FormData,
        _results: &[CheckResult],
    ) -> Option<SectionId> {
        first_unconsidered(&self.sections, considered)
    }
}

pub const RAPID_QUESTIONS_SECTION: &str = "rapidQuestions";

/// Every yes/no question up front, then the domain sections without them.
#[derive(Debug, Clone)]
pub struct RapidQuestionsFirstStrategy {
    sections: Vec<SectionDefinition>,
}

impl Default for RapidQuestionsFirstStrategy {
    fn default() -> Self {
        let is_yes_no = |field: &FormField| matches!(metadata(*field).kind, FieldKind::YesNo);

        let rapid = SectionDefinition {
            id: SectionId::from(RAPID_QUESTIONS_SECTION),
            title: "Schnellfragen".to_string(),
            fields: FormField::ALL.into_iter().filter(is_yes_no).collect(),
        };

        let mut sections = vec![rapid];
        sections.extend(domain_sections().into_iter().map(|mut section| {
            section.fields.retain(|field| !is_yes_no(field));
            section
        }));

        Self { sections }
    }
}

impl SectionStrategy for RapidQuestionsFirstStrategy {
    fn sections(&self) -> &[SectionDefinition] {
        &self.sections
    }

    fn next_section(
        &self,
        considered: &[SectionId],
        _data: &FormData,
        _results: &[CheckResult],
    ) -> Option<SectionId> {
        first_unconsidered(&self.sections, considered)
    }
}

/// Strategy selector used by configuration and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Ordered,
    #[default]
    #[serde(rename = "rapid")]
    RapidQuestionsFirst,
}

impl StrategyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Ordered => "ordered",
            StrategyKind::RapidQuestionsFirst => "rapid",
        }
    }

    pub fn build(self) -> Arc<dyn SectionStrategy> {
        match self {
            StrategyKind::Ordered => Arc::new(OrderedSectionStrategy::default()),
            StrategyKind::RapidQuestionsFirst => Arc::new(RapidQuestionsFirstStrategy::default()),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section strategy `{0}` (expected `ordered` or `rapid`)")]
pub struct UnknownStrategyError(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ordered" => Ok(StrategyKind::Ordered),
            "rapid" | "rapid_questions_first" => Ok(StrategyKind::RapidQuestionsFirst),
            other => Err(UnknownStrategyError(other.to_string())),
        }
    }
}
