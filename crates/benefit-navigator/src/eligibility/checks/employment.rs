use super::super::context::EvaluationContext;
use super::super::domain::{
    EmploymentStatus, FormData, FormField, Nationality, ResidenceStatus, WorkAbility,
};
use super::super::rules::{CheckResult, Rationale, RuleChain};
use super::{is_false, is_true, Benefit, RESIDENCE_IN_GERMANY_REQUIRED, RESIDENCE_TITLE_REQUIRED};

pub(super) fn unemployment_benefit(data: &FormData, _context: &EvaluationContext) -> CheckResult {
    RuleChain::new(Benefit::UnemploymentBenefit, data)
        .fail_if(
            FormField::PensionEligible,
            |data| is_true(data, FormField::PensionEligible),
            "Personen, die die Altersgrenze für ihre Rente erreicht haben, sind nicht berechtigt.",
        )
        // Nationality decides whether the residence title is asked for.
        .require(FormField::Nationality)
        .when(data.nationality() != Some(Nationality::German), |chain| {
            chain.fail_if(
                FormField::ResidenceStatus,
                |data| data.residence_status() == Some(ResidenceStatus::None),
                RESIDENCE_TITLE_REQUIRED,
            )
        })
        .fail_if(
            FormField::ResidenceInGermany,
            |data| is_false(data, FormField::ResidenceInGermany),
            RESIDENCE_IN_GERMANY_REQUIRED,
        )
        .fail_if(
            FormField::WorkAbility,
            |data| data.work_ability() == Some(WorkAbility::None),
            "Sie müssen in der Lage sein, mindestens 15 Stunden pro Woche zu arbeiten.",
        )
        .fail_if(
            FormField::EmploymentStatus,
            |data| data.employment_status() != Some(EmploymentStatus::Unemployed),
            "Arbeitslosengeld ist für arbeitslose Personen vorgesehen.",
        )
        .fail_if(
            FormField::ReceivesUnemploymentBenefit1,
            |data| is_true(data, FormField::ReceivesUnemploymentBenefit1),
            "Sie beziehen bereits Arbeitslosengeld.",
        )
        .fail_if(
            FormField::ReceivesPension,
            |data| is_true(data, FormField::ReceivesPension),
            "Rentenbezieher sind nicht für Arbeitslosengeld berechtigt.",
        )
        .or_else_success(|_| {
            Rationale::new(
                "Sie erfüllen die Grundvoraussetzungen für Arbeitslosengeld. Das Arbeitslosengeld sichert Sie sozial ab und ersetzt einen Teil Ihres fehlenden Einkommens.",
                "https://www.arbeitsagentur.de/arbeitslos-arbeit-finden/arbeitslosengeld",
            )
        })
}

pub(super) fn citizens_income(data: &FormData, context: &EvaluationContext) -> CheckResult {
    let limits = &context.thresholds;
    let today = context.today;
    let asset_allowance = |age: i32| {
        limits.asset_allowance_base_eur + f64::from(age) * limits.asset_allowance_per_year_eur
    };

    let asset_message = match (data.age_on(today), data.number(FormField::Assets)) {
        (Some(age), Some(assets)) => format!(
            "Ihr Vermögen ({assets}€) überschreitet die Freigrenze (ca. {:.0}€).",
            asset_allowance(age)
        ),
        _ => "Ihr Vermögen überschreitet die Freigrenze.".to_string(),
    };

    RuleChain::new(Benefit::CitizensIncome, data)
        .fail_if(
            FormField::Nationality,
            |data| data.nationality() != Some(Nationality::German),
            RESIDENCE_TITLE_REQUIRED,
        )
        .fail_if(
            FormField::HasFinancialHardship,
            |data| is_false(data, FormField::HasFinancialHardship),
            "Bürgergeld ist für Personen in finanzieller Notlage vorgesehen.",
        )
        .fail_if(
            FormField::ResidenceInGermany,
            |data| is_false(data, FormField::ResidenceInGermany),
            RESIDENCE_IN_GERMANY_REQUIRED,
        )
        .fail_if(
            FormField::DateOfBirth,
            |data| {
                data.age_on(today)
                    .is_some_and(|age| age < limits.citizens_income_min_age)
            },
            format!(
                "Sie müssen mindestens {} Jahre alt sein.",
                limits.citizens_income_min_age
            ),
        )
        .fail_if(
            FormField::PensionEligible,
            |data| is_true(data, FormField::PensionEligible),
            "Personen, die die Altersgrenze für ihre Rente erreicht haben, sind nicht berechtigt.",
        )
        .fail_if(
            FormField::WorkAbility,
            |data| data.work_ability() == Some(WorkAbility::None),
            "Sie müssen in der Lage sein, mindestens 3 Stunden täglich zu arbeiten.",
        )
        .fail_if(
            FormField::EmploymentStatus,
            |data| {
                matches!(
                    data.employment_status(),
                    Some(
                        EmploymentStatus::Student
                            | EmploymentStatus::SelfEmployed
                            | EmploymentStatus::Retired
                    )
                )
            },
            "Studierende, Selbständige und Rentner sind nicht berechtigt.",
        )
        .fail_if(
            FormField::ReceivesUnemploymentBenefit2,
            |data| is_true(data, FormField::ReceivesUnemploymentBenefit2),
            "Sie beziehen bereits Bürgergeld.",
        )
        .fail_if(
            FormField::ReceivesPension,
            |data| is_true(data, FormField::ReceivesPension),
            "Rentenbezieher sind nicht berechtigt.",
        )
        .fail_if(
            FormField::ReceivesHousingBenefit,
            |data| is_true(data, FormField::ReceivesHousingBenefit),
            "Wohngeldbezieher sind in der Regel nicht zusätzlich für Bürgergeld berechtigt.",
        )
        .fail_if(
            FormField::HouseholdSize,
            |data| {
                data.number(FormField::HouseholdSize)
                    .is_some_and(|size| size < 1.0)
            },
            "Haushaltsangaben sind erforderlich.",
        )
        .fail_if_all(
            &[FormField::DateOfBirth, FormField::Assets],
            |data| match (data.age_on(today), data.number(FormField::Assets)) {
                (Some(age), Some(assets)) => assets > asset_allowance(age),
                _ => false,
            },
            asset_message,
        )
        .or_else_success(|_| {
            Rationale::new(
                "Sie erfüllen die Grundvoraussetzungen für Bürgergeld. Das Bürgergeld ist Teil der Grundsicherung für Arbeitsuchende und sichert Ihren Lebensunterhalt.",
                "https://www.arbeitsagentur.de/arbeitslosengeld-2/buergergeld",
            )
        })
}
