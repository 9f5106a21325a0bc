use super::super::context::EvaluationContext;
use super::super::domain::{FormData, FormField, Nationality, ResidenceStatus};
use super::super::rules::{CheckResult, Rationale, RuleChain};
use super::{
    children_phrase, is_false, is_true, Benefit, RESIDENCE_IN_GERMANY_REQUIRED,
    RESIDENCE_TITLE_REQUIRED,
};

const NO_CHILDREN: &str = "Sie haben keine Kinder angegeben.";

fn lives_alone(data: &FormData) -> bool {
    data.number(FormField::HouseholdSize) == Some(1.0)
}

fn has_no_children(data: &FormData) -> bool {
    data.number(FormField::NumberOfChildren)
        .is_some_and(|count| count <= 0.0)
}

/// True when no listed child is young enough to count.
fn no_eligible_child_age(data: &FormData, age_limit: f64) -> bool {
    match data.numbers(FormField::ChildrenAges) {
        Some(ages) => !ages.iter().any(|&age| age < age_limit),
        None => false,
    }
}

pub(super) fn education_and_participation(
    data: &FormData,
    context: &EvaluationContext,
) -> CheckResult {
    let age_limit = context.thresholds.child_age_limit;

    RuleChain::new(Benefit::EducationAndParticipation, data)
        .fail_if(
            FormField::HouseholdSize,
            lives_alone,
            "Leistungen für Bildung und Teilhabe werden für Kinder gewährt.",
        )
        .when(!lives_alone(data), |chain| {
            chain
                .fail_if(FormField::NumberOfChildren, has_no_children, NO_CHILDREN)
                .fail_if(
                    FormField::ChildrenAges,
                    |data| no_eligible_child_age(data, age_limit),
                    format!(
                        "Bildung und Teilhabe wird nur für Kinder unter {age_limit} Jahren gewährt."
                    ),
                )
        })
        .fail_if(
            FormField::ResidenceInGermany,
            |data| is_false(data, FormField::ResidenceInGermany),
            RESIDENCE_IN_GERMANY_REQUIRED,
        )
        .fail_if_all(
            &[
                FormField::ReceivesUnemploymentBenefit2,
                FormField::ReceivesHousingBenefit,
            ],
            |data| {
                !is_true(data, FormField::ReceivesUnemploymentBenefit2)
                    && !is_true(data, FormField::ReceivesHousingBenefit)
            },
            "Sie müssen Bürgergeld oder Wohngeld beziehen, um Leistungen für Bildung und Teilhabe zu erhalten.",
        )
        .or_else_success(|data| {
            Rationale::new(
                format!(
                    "Sie haben {} und beziehen eine berechtigende Leistung. Sie könnten für Leistungen zur Bildung und Teilhabe berechtigt sein.",
                    children_phrase(data)
                ),
                "https://www.bmas.de/DE/Arbeit/Grundsicherung-Buergergeld/Bildungspaket/bildungspaket.html",
            )
        })
}

pub(super) fn child_benefit(data: &FormData, _context: &EvaluationContext) -> CheckResult {
    RuleChain::new(Benefit::ChildBenefit, data)
        .fail_if(
            FormField::HouseholdSize,
            lives_alone,
            "Kindergeld wird für Kinder gezahlt.",
        )
        .when(!lives_alone(data), |chain| {
            chain.fail_if(FormField::NumberOfChildren, has_no_children, NO_CHILDREN)
        })
        .or_else_success(|data| {
            Rationale::new(
                format!(
                    "Sie haben {} angegeben. Sie könnten für Kindergeld berechtigt sein.",
                    children_phrase(data)
                ),
                "https://www.arbeitsagentur.de/familie-und-kinder/kindergeld",
            )
        })
}

pub(super) fn child_supplement(data: &FormData, context: &EvaluationContext) -> CheckResult {
    let limits = &context.thresholds;
    let age_limit = limits.child_age_limit;
    let single_parent = is_true(data, FormField::IsSingleParent);
    let income_message = if single_parent {
        format!(
            "Als Alleinerziehende/r müssen Sie mindestens {}€ Einkommen haben.",
            limits.child_supplement_min_income_single_parent_eur
        )
    } else {
        format!(
            "Paare müssen mindestens {}€ Einkommen haben.",
            limits.child_supplement_min_income_couple_eur
        )
    };

    RuleChain::new(Benefit::ChildSupplement, data)
        .fail_if(
            FormField::HouseholdSize,
            lives_alone,
            "Für Kinderzuschlag müssen Kinder im Haushalt leben.",
        )
        .when(!lives_alone(data), |chain| {
            chain
                .fail_if(FormField::NumberOfChildren, has_no_children, NO_CHILDREN)
                .fail_if(
                    FormField::ChildrenAges,
                    |data| no_eligible_child_age(data, age_limit),
                    format!("Kinderzuschlag wird nur für Kinder unter {age_limit} Jahren gewährt."),
                )
        })
        .fail_if(
            FormField::ResidenceInGermany,
            |data| is_false(data, FormField::ResidenceInGermany),
            RESIDENCE_IN_GERMANY_REQUIRED,
        )
        .require(FormField::Nationality)
        .when(data.nationality() != Some(Nationality::German), |chain| {
            chain.fail_if(
                FormField::ResidenceStatus,
                |data| data.residence_status() == Some(ResidenceStatus::None),
                RESIDENCE_TITLE_REQUIRED,
            )
        })
        .fail_if_all(
            &[FormField::IsSingleParent, FormField::GrossMonthlyIncome],
            |data| {
                let income = data.number(FormField::GrossMonthlyIncome).unwrap_or(0.0);
                let minimum = if is_true(data, FormField::IsSingleParent) {
                    limits.child_supplement_min_income_single_parent_eur
                } else {
                    limits.child_supplement_min_income_couple_eur
                };
                income < minimum
            },
            income_message,
        )
        .fail_if(
            FormField::ReceivesChildBenefit,
            |data| is_false(data, FormField::ReceivesChildBenefit),
            "Sie müssen Kindergeld beziehen, um Kinderzuschlag zu erhalten.",
        )
        .fail_if(
            FormField::ReceivesUnemploymentBenefit2,
            |data| is_true(data, FormField::ReceivesUnemploymentBenefit2),
            "Bezieher von Bürgergeld sind nicht für Kinderzuschlag berechtigt.",
        )
        .or_else_success(|data| {
            Rationale::new(
                format!(
                    "Sie haben {} und beziehen Kindergeld. Sie könnten für Kinderzuschlag berechtigt sein.",
                    children_phrase(data)
                ),
                "https://www.arbeitsagentur.de/familie-und-kinder/kinderzuschlag",
            )
        })
}
