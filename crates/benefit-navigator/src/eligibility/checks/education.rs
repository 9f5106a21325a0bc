use super::super::context::EvaluationContext;
use super::super::domain::{EmploymentStatus, FormData, FormField, HealthInsurance, WorkAbility};
use super::super::rules::{CheckResult, Rationale, RuleChain};
use super::{is_false, is_true, Benefit, RESIDENCE_IN_GERMANY_REQUIRED};

pub(super) fn student_aid(data: &FormData, context: &EvaluationContext) -> CheckResult {
    let limits = &context.thresholds;
    let today = context.today;

    RuleChain::new(Benefit::StudentAid, data)
        .fail_if(
            FormField::HasFinancialHardship,
            |data| is_true(data, FormField::HasFinancialHardship),
            "Bei akuter finanzieller Notlage sind andere Leistungen vorrangig.",
        )
        .fail_if(
            FormField::DateOfBirth,
            |data| {
                data.age_on(today).is_some_and(|age| {
                    age < limits.student_aid_min_age || age >= limits.student_aid_max_age
                })
            },
            format!(
                "Das Alter muss zwischen {} und {} Jahren liegen.",
                limits.student_aid_min_age,
                limits.student_aid_max_age - 1
            ),
        )
        .fail_if(
            FormField::HealthInsurance,
            |data| data.health_insurance() == Some(HealthInsurance::None),
            "Eine Krankenversicherung ist erforderlich.",
        )
        .fail_if(
            FormField::HasCareInsurance,
            |data| is_false(data, FormField::HasCareInsurance),
            "Eine Pflegeversicherung ist erforderlich.",
        )
        .fail_if(
            FormField::WorkAbility,
            |data| data.work_ability() == Some(WorkAbility::None),
            "Eine gewisse Arbeitsfähigkeit ist erforderlich.",
        )
        .fail_if(
            FormField::EmploymentStatus,
            |data| data.employment_status() != Some(EmploymentStatus::Student),
            "Sie müssen sich in einer Ausbildung befinden (Student/in).",
        )
        .fail_if(
            FormField::ReceivesPension,
            |data| is_true(data, FormField::ReceivesPension),
            "Rentenbezieher sind nicht berechtigt.",
        )
        .or_else_success(|_| {
            Rationale::new(
                "Sie erfüllen die Voraussetzungen für BAföG. Mit dem Bundesausbildungsförderungsgesetz (BAföG) werden junge Menschen finanziell bei der Schulausbildung und dem Studium unterstützt.",
                "https://www.bafög.de/",
            )
        })
}

pub(super) fn vocational_training_allowance(
    data: &FormData,
    _context: &EvaluationContext,
) -> CheckResult {
    RuleChain::new(Benefit::VocationalTrainingAllowance, data)
        .fail_if(
            FormField::PensionEligible,
            |data| is_true(data, FormField::PensionEligible),
            "Personen im Rentenalter sind nicht für BAB berechtigt.",
        )
        .fail_if(
            FormField::ResidenceInGermany,
            |data| is_false(data, FormField::ResidenceInGermany),
            RESIDENCE_IN_GERMANY_REQUIRED,
        )
        .fail_if(
            FormField::EmploymentStatus,
            |data| data.employment_status() != Some(EmploymentStatus::Student),
            "BAB ist für Personen in einer Berufsausbildung vorgesehen.",
        )
        .fail_if(
            FormField::ReceivesUnemploymentBenefit1,
            |data| is_true(data, FormField::ReceivesUnemploymentBenefit1),
            "Bezieher von Arbeitslosengeld sind nicht für BAB berechtigt.",
        )
        .fail_if(
            FormField::ReceivesStudentAid,
            |data| is_true(data, FormField::ReceivesStudentAid),
            "BAföG-Bezieher sind nicht für BAB berechtigt.",
        )
        .fail_if(
            FormField::ReceivesPension,
            |data| is_true(data, FormField::ReceivesPension),
            "Rentenbezieher sind nicht für BAB berechtigt.",
        )
        .fail_if(
            FormField::LivesWithParents,
            |data| is_true(data, FormField::LivesWithParents),
            "BAB wird in der Regel nur gewährt, wenn Sie nicht bei Ihren Eltern wohnen.",
        )
        .or_else_success(|_| {
            Rationale::new(
                "Sie erfüllen die Grundvoraussetzungen für BAB. Diese Leistung hilft jungen Menschen in ihrer ersten Berufsausbildung.",
                "https://www.arbeitsagentur.de/bildung/ausbildung/berufsausbildungsbeihilfe-bab",
            )
        })
}
