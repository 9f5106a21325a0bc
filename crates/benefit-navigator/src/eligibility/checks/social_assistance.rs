use super::super::context::EvaluationContext;
use super::super::domain::{EmploymentStatus, FormData, FormField, WorkAbility};
use super::super::rules::{CheckResult, Rationale, RuleChain};
use super::{is_false, is_true, Benefit, RESIDENCE_IN_GERMANY_REQUIRED};

pub(super) fn basic_income_support(data: &FormData, _context: &EvaluationContext) -> CheckResult {
    RuleChain::new(Benefit::BasicIncomeSupport, data)
        .fail_if(
            FormField::ResidenceInGermany,
            |data| is_false(data, FormField::ResidenceInGermany),
            RESIDENCE_IN_GERMANY_REQUIRED,
        )
        .fail_if(
            FormField::HasFinancialHardship,
            |data| is_false(data, FormField::HasFinancialHardship),
            "Grundsicherung ist für Personen in finanzieller Notlage vorgesehen.",
        )
        .fail_if_all(
            &[FormField::WorkAbility, FormField::EmploymentStatus],
            |data| {
                let fully_disabled = data.work_ability() == Some(WorkAbility::None);
                let retired = data.employment_status() == Some(EmploymentStatus::Retired);
                !fully_disabled && !retired
            },
            "Sie müssen entweder das Rentenalter erreicht haben oder dauerhaft voll erwerbsgemindert sein.",
        )
        .fail_if(
            FormField::ReceivesUnemploymentBenefit1,
            |data| is_true(data, FormField::ReceivesUnemploymentBenefit1),
            "Bezieher von Arbeitslosengeld I sind nicht berechtigt.",
        )
        .fail_if(
            FormField::ReceivesStudentAid,
            |data| is_true(data, FormField::ReceivesStudentAid),
            "BAföG-Bezieher sind nicht berechtigt.",
        )
        .or_else_success(|data| {
            let situation = if data.employment_status() == Some(EmploymentStatus::Retired) {
                "Sie haben das Rentenalter erreicht und befinden sich in finanzieller Notlage."
            } else {
                "Sie sind dauerhaft voll erwerbsgemindert und befinden sich in finanzieller Notlage."
            };
            Rationale::new(
                format!(
                    "{situation} Sie könnten für Grundsicherung im Alter und bei Erwerbsminderung berechtigt sein."
                ),
                "https://www.deutsche-rentenversicherung.de/DRV/DE/Rente/Grundsicherung/grundsicherung_node.html",
            )
        })
}

pub(super) fn subsistence_assistance(data: &FormData, _context: &EvaluationContext) -> CheckResult {
    RuleChain::new(Benefit::SubsistenceAssistance, data)
        .fail_if(
            FormField::ResidenceInGermany,
            |data| is_false(data, FormField::ResidenceInGermany),
            RESIDENCE_IN_GERMANY_REQUIRED,
        )
        .fail_if(
            FormField::PensionEligible,
            |data| is_true(data, FormField::PensionEligible),
            "Personen, die die Altersgrenze erreicht haben, sollten Grundsicherung im Alter beantragen.",
        )
        .fail_if(
            FormField::WorkAbility,
            |data| data.work_ability() != Some(WorkAbility::None),
            "Hilfe zum Lebensunterhalt ist für Personen vorgesehen, die vorübergehend nicht arbeiten können.",
        )
        .fail_if(
            FormField::ReceivesUnemploymentBenefit1,
            |data| is_true(data, FormField::ReceivesUnemploymentBenefit1),
            "Bezieher von Arbeitslosengeld sind nicht für Hilfe zum Lebensunterhalt berechtigt.",
        )
        .fail_if(
            FormField::ReceivesUnemploymentBenefit2,
            |data| is_true(data, FormField::ReceivesUnemploymentBenefit2),
            "Bezieher von Bürgergeld sind nicht für Hilfe zum Lebensunterhalt berechtigt.",
        )
        .or_else_success(|_| {
            Rationale::new(
                "Sie erfüllen die Grundvoraussetzungen für Hilfe zum Lebensunterhalt. Diese Leistung richtet sich an Menschen, die vorübergehend nicht arbeiten können.",
                "https://www.bmas.de/DE/Soziales/Sozialhilfe/Leistungen-der-Sozialhilfe/hilfe-zum-lebensunterhalt.html",
            )
        })
}
