use super::super::context::EvaluationContext;
use super::super::domain::{FormData, FormField};
use super::super::rules::{CheckResult, Rationale, RuleChain};
use super::{is_false, is_true, Benefit};

pub(super) fn housing_benefit(data: &FormData, context: &EvaluationContext) -> CheckResult {
    let limits = &context.thresholds;

    RuleChain::new(Benefit::HousingBenefit, data)
        .fail_if(
            FormField::ReceivesUnemploymentBenefit2,
            |data| is_true(data, FormField::ReceivesUnemploymentBenefit2),
            "Bezieher von Arbeitslosengeld II sind nicht berechtigt für Wohngeld.",
        )
        .fail_if(
            FormField::IsStudent,
            |data| is_false(data, FormField::IsStudent),
            "Wohngeld wird in dieser Prüfung nur für Studierende berücksichtigt.",
        )
        .fail_if(
            FormField::MonthlyRent,
            |data| {
                data.number(FormField::MonthlyRent)
                    .is_some_and(|rent| rent <= limits.minimum_rent_eur)
            },
            "Die Miete ist zu niedrig für Wohngeld.",
        )
        .fail_if_all(
            &[FormField::HouseholdSize, FormField::NetMonthlyIncome],
            |data| {
                match (
                    data.number(FormField::HouseholdSize),
                    data.number(FormField::NetMonthlyIncome),
                ) {
                    (Some(size), Some(income)) => {
                        income >= limits.income_ceiling_per_person_eur * size
                    }
                    _ => false,
                }
            },
            "Das Einkommen liegt über der Grenze.",
        )
        .or_else_success(|_| {
            Rationale::new(
                "Basierend auf Ihren Angaben könnten Sie für Wohngeld berechtigt sein.",
                "https://www.muenchen.de/rathaus/Stadtverwaltung/Sozialreferat/Wohnungsamt/Mietzuschuss.html",
            )
        })
}
