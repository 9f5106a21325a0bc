//! Rule chains for the fixed catalog of benefit programs.

mod education;
mod employment;
mod family;
mod housing;
mod social_assistance;

use serde::{Deserialize, Serialize};

use super::context::EvaluationContext;
use super::domain::{FormData, FormField};
use super::rules::CheckResult;

/// Benefit programs the navigator screens for, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Benefit {
    HousingBenefit,
    UnemploymentBenefit,
    StudentAid,
    VocationalTrainingAllowance,
    EducationAndParticipation,
    CitizensIncome,
    BasicIncomeSupport,
    SubsistenceAssistance,
    ChildBenefit,
    ChildSupplement,
}

impl Benefit {
    /// Registration order. Every cycle evaluates checks in exactly this order.
    pub const ALL: [Benefit; 10] = [
        Benefit::HousingBenefit,
        Benefit::UnemploymentBenefit,
        Benefit::StudentAid,
        Benefit::VocationalTrainingAllowance,
        Benefit::EducationAndParticipation,
        Benefit::CitizensIncome,
        Benefit::BasicIncomeSupport,
        Benefit::SubsistenceAssistance,
        Benefit::ChildBenefit,
        Benefit::ChildSupplement,
    ];

    pub const fn subsidy_name(self) -> &'static str {
        match self {
            Benefit::HousingBenefit => "Wohngeld",
            Benefit::UnemploymentBenefit => "Arbeitslosengeld",
            Benefit::StudentAid => "BAföG",
            Benefit::VocationalTrainingAllowance => "Berufsausbildungsbeihilfe (BAB)",
            Benefit::EducationAndParticipation => "Bildung und Teilhabe",
            Benefit::CitizensIncome => "Bürgergeld",
            Benefit::BasicIncomeSupport => "Grundsicherung im Alter und bei Erwerbsminderung",
            Benefit::SubsistenceAssistance => "Hilfe zum Lebensunterhalt",
            Benefit::ChildBenefit => "Kindergeld",
            Benefit::ChildSupplement => "Kinderzuschlag",
        }
    }

    pub fn evaluate(self, data: &FormData, context: &EvaluationContext) -> CheckResult {
        match self {
            Benefit::HousingBenefit => housing::housing_benefit(data, context),
            Benefit::UnemploymentBenefit => employment::unemployment_benefit(data, context),
            Benefit::StudentAid => education::student_aid(data, context),
            Benefit::VocationalTrainingAllowance => {
                education::vocational_training_allowance(data, context)
            }
            Benefit::EducationAndParticipation => {
                family::education_and_participation(data, context)
            }
            Benefit::CitizensIncome => employment::citizens_income(data, context),
            Benefit::BasicIncomeSupport => social_assistance::basic_income_support(data, context),
            Benefit::SubsistenceAssistance => {
                social_assistance::subsistence_assistance(data, context)
            }
            Benefit::ChildBenefit => family::child_benefit(data, context),
            Benefit::ChildSupplement => family::child_supplement(data, context),
        }
    }
}

/// Run every registered check, in registration order, against the same answers.
pub fn evaluate_all(data: &FormData, context: &EvaluationContext) -> Vec<CheckResult> {
    Benefit::ALL
        .into_iter()
        .map(|benefit| benefit.evaluate(data, context))
        .collect()
}

pub(crate) const RESIDENCE_IN_GERMANY_REQUIRED: &str =
    "Ihr gewöhnlicher Aufenthalt muss in Deutschland sein.";

pub(crate) const RESIDENCE_TITLE_REQUIRED: &str =
    "Sie benötigen die deutsche Staatsbürgerschaft oder eine gültige Aufenthaltserlaubnis/Niederlassungserlaubnis.";

fn is_true(data: &FormData, field: FormField) -> bool {
    data.flag(field) == Some(true)
}

fn is_false(data: &FormData, field: FormField) -> bool {
    data.flag(field) == Some(false)
}

/// "1 Kind", "3 Kinder"; unanswered counts as zero.
fn children_phrase(data: &FormData) -> String {
    let count = data.number(FormField::NumberOfChildren).unwrap_or(0.0);
    let noun = if count == 1.0 { "Kind" } else { "Kinder" };
    format!("{count} {noun}")
}
